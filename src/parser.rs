// File: src/parser.rs
//
// Parser for Nix expressions.
// Recursive descent for the keyword forms, Pratt-style precedence
// climbing for operators, and implicit juxtaposition for function
// application. The parser buffers the token stream so it can look
// ahead when distinguishing `{ a, b }: body` patterns from attribute
// set literals.
//
// Errors accumulate into a ParseErrors collection; a failed production
// returns None and parsing backs out to the nearest recovery point.

use std::rc::Rc;

use crate::ast::{
    AttrBinding, BinaryOp, Binding, Expr, ExprKind, InheritClause, Pattern, SourcePos, UnaryOp,
};
use crate::errors::ParseErrors;
use crate::lexer::{Lexer, Token, TokenKind};

/// Binding strength, weakest first. Function application sits between
/// the arithmetic operators and attribute selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Implication, // ->
    Or,          // ||
    And,         // &&
    Equality,    // == !=
    Comparison,  // < > <= >= ?
    Update,      // //
    Concat,      // ++
    Sum,         // + -
    Product,     // * /
    Call,        // function application
    Select,      // . and `or` defaults
}

fn token_precedence(kind: &TokenKind) -> Option<Precedence> {
    match kind {
        TokenKind::Implies => Some(Precedence::Implication),
        TokenKind::OrOr => Some(Precedence::Or),
        TokenKind::AndAnd | TokenKind::And => Some(Precedence::And),
        TokenKind::Eq | TokenKind::NotEq => Some(Precedence::Equality),
        TokenKind::Lt | TokenKind::Gt | TokenKind::Le | TokenKind::Ge | TokenKind::Question => {
            Some(Precedence::Comparison)
        }
        TokenKind::Update => Some(Precedence::Update),
        TokenKind::Concat => Some(Precedence::Concat),
        TokenKind::Plus | TokenKind::Minus => Some(Precedence::Sum),
        TokenKind::Star | TokenKind::Slash => Some(Precedence::Product),
        TokenKind::Dot | TokenKind::Or => Some(Precedence::Select),
        _ => None,
    }
}

/// Parses one expression from a lexed token stream.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: ParseErrors,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        Parser {
            tokens,
            pos: 0,
            errors: ParseErrors::new(),
        }
    }

    /// Parses the whole input as a single expression. Returns the tree
    /// only when no errors were recorded.
    pub fn parse(mut self) -> Result<Expr, ParseErrors> {
        let expr = self.parse_expression(Precedence::Lowest);

        // A complete parse leaves nothing but EOF behind.
        if !self.errors.has_errors() && !self.peek_is(&TokenKind::Eof) {
            let (line, column, kind) = {
                let peek = self.peek();
                (peek.line, peek.column, peek.kind.clone())
            };
            self.errors
                .add(line, column, format!("expected end of input, got {}", kind));
        }

        match expr {
            Some(expr) if !self.errors.has_errors() => Ok(expr),
            _ => {
                if self.errors.is_empty() {
                    self.errors.add(0, 0, "no expression found");
                }
                Err(self.errors)
            }
        }
    }

    // --- token window -----------------------------------------------------

    fn cur(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    fn kind_at(&self, index: usize) -> &TokenKind {
        self.tokens
            .get(index)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn cur_is(&self, kind: &TokenKind) -> bool {
        self.cur().kind == *kind
    }

    fn peek_is(&self, kind: &TokenKind) -> bool {
        self.peek().kind == *kind
    }

    fn cur_pos(&self) -> SourcePos {
        SourcePos::new(self.cur().line, self.cur().column)
    }

    fn error_at_cur(&mut self, message: String) {
        let (line, column) = (self.cur().line, self.cur().column);
        self.errors.add(line, column, message);
    }

    /// Consumes the next token if it matches, otherwise records an error
    /// and leaves the window in place.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(&kind) {
            self.advance();
            true
        } else {
            let (line, column, got) = {
                let peek = self.peek();
                (peek.line, peek.column, peek.kind.clone())
            };
            self.errors.add(
                line,
                column,
                format!("expected next token to be {}, got {}", kind, got),
            );
            false
        }
    }

    /// True when the upcoming token could begin a function argument.
    /// Application is implicit, so this decides whether `f x` continues
    /// the expression or `x` belongs to an enclosing context.
    fn could_be_argument(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Int
                | TokenKind::Float
                | TokenKind::Str
                | TokenKind::PathLit
                | TokenKind::Ident
                | TokenKind::LBrace
                | TokenKind::LBracket
                | TokenKind::LParen
                | TokenKind::Not
                | TokenKind::Minus
                | TokenKind::If
                | TokenKind::Let
                | TokenKind::With
                | TokenKind::Assert
        )
    }

    // --- Pratt core -------------------------------------------------------

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let mut left = self.parse_prefix()?;

        loop {
            if self.peek_is(&TokenKind::Semicolon) || self.peek_is(&TokenKind::Eof) {
                break;
            }
            match token_precedence(&self.peek().kind) {
                // An operator that binds tighter than the current context
                Some(prec) if precedence < prec => {
                    self.advance();
                    left = self.parse_infix(left)?;
                }
                // An operator that binds looser; the caller handles it
                Some(_) => break,
                None => {
                    if self.could_be_argument() && precedence < Precedence::Call {
                        self.advance();
                        let pos = left.pos;
                        let arg = self.parse_expression(Precedence::Call)?;
                        left = Expr::new(
                            ExprKind::Apply {
                                func: Box::new(left),
                                arg: Box::new(arg),
                            },
                            pos,
                        );
                    } else {
                        break;
                    }
                }
            }
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        let pos = self.cur_pos();
        match self.cur().kind.clone() {
            TokenKind::Int => {
                let literal = self.cur().literal.clone();
                match literal.parse::<i64>() {
                    Ok(value) => Some(Expr::new(ExprKind::Int(value), pos)),
                    Err(_) => {
                        self.error_at_cur(format!("could not parse {:?} as integer", literal));
                        None
                    }
                }
            }
            TokenKind::Float => {
                let literal = self.cur().literal.clone();
                match literal.parse::<f64>() {
                    Ok(value) => Some(Expr::new(ExprKind::Float(value), pos)),
                    Err(_) => {
                        self.error_at_cur(format!("could not parse {:?} as float", literal));
                        None
                    }
                }
            }
            TokenKind::Str => {
                let value = self.cur().literal.clone();
                Some(Expr::new(ExprKind::Str { value, indented: false }, pos))
            }
            TokenKind::PathLit => {
                let value = self.cur().literal.clone();
                let absolute = value.starts_with('/');
                Some(Expr::new(ExprKind::Path { value, absolute }, pos))
            }
            TokenKind::Ident => self.parse_ident_or_function(),
            TokenKind::If => self.parse_if(),
            TokenKind::Let => self.parse_let(),
            TokenKind::With => self.parse_with(),
            TokenKind::Assert => self.parse_assert(),
            TokenKind::Not => self.parse_unary(UnaryOp::Not),
            TokenKind::Minus => self.parse_unary(UnaryOp::Neg),
            TokenKind::Rec => {
                if !self.expect_peek(TokenKind::LBrace) {
                    return None;
                }
                self.parse_attr_set_body(true, pos)
            }
            TokenKind::LBrace => {
                if self.looks_like_pattern() {
                    self.parse_pattern_function()
                } else {
                    self.parse_attr_set_body(false, pos)
                }
            }
            TokenKind::LBracket => self.parse_list(),
            TokenKind::LParen => self.parse_grouped(),
            TokenKind::Illegal => {
                let literal = self.cur().literal.clone();
                self.error_at_cur(format!("illegal character {:?}", literal));
                None
            }
            other => {
                self.error_at_cur(format!("expected an expression, found {}", other));
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expr) -> Option<Expr> {
        match self.cur().kind.clone() {
            TokenKind::Plus => self.parse_binary(left, BinaryOp::Add),
            TokenKind::Minus => self.parse_binary(left, BinaryOp::Sub),
            TokenKind::Star => self.parse_binary(left, BinaryOp::Mul),
            TokenKind::Slash => self.parse_binary(left, BinaryOp::Div),
            TokenKind::Concat => self.parse_binary(left, BinaryOp::Concat),
            TokenKind::Update => self.parse_binary(left, BinaryOp::Update),
            TokenKind::Eq => self.parse_binary(left, BinaryOp::Eq),
            TokenKind::NotEq => self.parse_binary(left, BinaryOp::NotEq),
            TokenKind::Lt => self.parse_binary(left, BinaryOp::Lt),
            TokenKind::Gt => self.parse_binary(left, BinaryOp::Gt),
            TokenKind::Le => self.parse_binary(left, BinaryOp::Le),
            TokenKind::Ge => self.parse_binary(left, BinaryOp::Ge),
            TokenKind::AndAnd | TokenKind::And => self.parse_binary(left, BinaryOp::And),
            TokenKind::OrOr => self.parse_binary(left, BinaryOp::Or),
            TokenKind::Implies => self.parse_binary(left, BinaryOp::Implies),
            TokenKind::Dot => self.parse_select(left),
            TokenKind::Question => self.parse_has_attr(left),
            TokenKind::Or => self.parse_or_default(left),
            other => {
                self.error_at_cur(format!("{} cannot be used as an operator here", other));
                None
            }
        }
    }

    fn parse_binary(&mut self, left: Expr, op: BinaryOp) -> Option<Expr> {
        let pos = self.cur_pos();
        let precedence = match token_precedence(&self.cur().kind) {
            Some(prec) => prec,
            None => Precedence::Lowest,
        };
        // `->` is the one right-associative operator
        let rhs_precedence = if op == BinaryOp::Implies {
            Precedence::Lowest
        } else {
            precedence
        };
        self.advance();
        let right = self.parse_expression(rhs_precedence)?;
        Some(Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            pos,
        ))
    }

    fn parse_unary(&mut self, op: UnaryOp) -> Option<Expr> {
        let pos = self.cur_pos();
        self.advance();
        // The operand binds at the application level, so `-f x`
        // applies the negated value rather than negating the call.
        let expr = self.parse_expression(Precedence::Call)?;
        Some(Expr::new(
            ExprKind::Unary {
                op,
                expr: Box::new(expr),
            },
            pos,
        ))
    }

    // --- prefix forms -----------------------------------------------------

    fn parse_ident_or_function(&mut self) -> Option<Expr> {
        let pos = self.cur_pos();
        let name = self.cur().literal.clone();

        // true/false/null are ordinary identifiers to the lexer
        match name.as_str() {
            "true" => return Some(Expr::new(ExprKind::Bool(true), pos)),
            "false" => return Some(Expr::new(ExprKind::Bool(false), pos)),
            "null" => return Some(Expr::new(ExprKind::Null, pos)),
            _ => {}
        }

        if self.peek_is(&TokenKind::Colon) {
            self.advance(); // ':'
            self.advance(); // body start
            let body = self.parse_expression(Precedence::Lowest)?;
            return Some(Expr::new(
                ExprKind::Function {
                    param: Pattern::Ident(name),
                    body: Rc::new(body),
                },
                pos,
            ));
        }

        Some(Expr::new(ExprKind::Ident(name), pos))
    }

    fn parse_if(&mut self) -> Option<Expr> {
        let pos = self.cur_pos();
        self.advance();
        let cond = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Then) {
            return None;
        }
        self.advance();
        let then = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Else) {
            return None;
        }
        self.advance();
        let otherwise = self.parse_expression(Precedence::Lowest)?;
        Some(Expr::new(
            ExprKind::If {
                cond: Box::new(cond),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            },
            pos,
        ))
    }

    fn parse_let(&mut self) -> Option<Expr> {
        let pos = self.cur_pos();
        self.advance();

        let mut bindings = Vec::new();
        while !self.cur_is(&TokenKind::In) && !self.cur_is(&TokenKind::Eof) {
            if !self.cur_is(&TokenKind::Ident) {
                let kind = self.cur().kind.clone();
                self.error_at_cur(format!("expected identifier in let binding, got {}", kind));
                return None;
            }
            let name = self.cur().literal.clone();
            if !self.expect_peek(TokenKind::Assign) {
                return None;
            }
            self.advance();
            let value = self.parse_expression(Precedence::Lowest)?;
            bindings.push(Binding { name, value });
            if !self.expect_peek(TokenKind::Semicolon) {
                return None;
            }
            self.advance();
        }

        if !self.cur_is(&TokenKind::In) {
            let kind = self.cur().kind.clone();
            self.error_at_cur(format!("expected 'in' after let bindings, got {}", kind));
            return None;
        }
        self.advance();
        let body = self.parse_expression(Precedence::Lowest)?;
        Some(Expr::new(
            ExprKind::Let {
                bindings,
                body: Box::new(body),
            },
            pos,
        ))
    }

    fn parse_with(&mut self) -> Option<Expr> {
        let pos = self.cur_pos();
        self.advance();
        let scope = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Semicolon) {
            return None;
        }
        self.advance();
        let body = self.parse_expression(Precedence::Lowest)?;
        Some(Expr::new(
            ExprKind::With {
                scope: Box::new(scope),
                body: Box::new(body),
            },
            pos,
        ))
    }

    fn parse_assert(&mut self) -> Option<Expr> {
        let pos = self.cur_pos();
        self.advance();
        let cond = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Semicolon) {
            return None;
        }
        self.advance();
        let body = self.parse_expression(Precedence::Lowest)?;
        Some(Expr::new(
            ExprKind::Assert {
                cond: Box::new(cond),
                body: Box::new(body),
            },
            pos,
        ))
    }

    fn parse_grouped(&mut self) -> Option<Expr> {
        self.advance();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_list(&mut self) -> Option<Expr> {
        let pos = self.cur_pos();

        if self.peek_is(&TokenKind::RBracket) {
            self.advance();
            return Some(Expr::new(ExprKind::List(Vec::new()), pos));
        }

        self.advance();
        // Elements bind above application, so `[ f x ]` is two elements;
        // an application must be parenthesized to form one.
        let mut elements = vec![self.parse_expression(Precedence::Call)?];

        loop {
            if self.peek_is(&TokenKind::RBracket) {
                self.advance();
                break;
            }
            if self.peek_is(&TokenKind::Eof) {
                let (line, column) = (self.peek().line, self.peek().column);
                self.errors.add(line, column, "expected ']', got end of input");
                return None;
            }
            self.advance();
            // Commas between elements are optional
            if self.cur_is(&TokenKind::Comma) {
                if self.peek_is(&TokenKind::RBracket) {
                    self.advance();
                    break;
                }
                self.advance();
            }
            elements.push(self.parse_expression(Precedence::Call)?);
        }

        Some(Expr::new(ExprKind::List(elements), pos))
    }

    // --- attribute sets and patterns --------------------------------------

    /// Called with the window on `{`. Consumes through the matching `}`.
    fn parse_attr_set_body(&mut self, recursive: bool, pos: SourcePos) -> Option<Expr> {
        self.advance();

        let mut bindings = Vec::new();
        let mut inherits = Vec::new();

        while !self.cur_is(&TokenKind::RBrace) && !self.cur_is(&TokenKind::Eof) {
            if self.cur_is(&TokenKind::Inherit) {
                inherits.push(self.parse_inherit()?);
            } else {
                bindings.push(self.parse_attr_binding()?);
            }
        }

        if !self.cur_is(&TokenKind::RBrace) {
            let kind = self.cur().kind.clone();
            self.error_at_cur(format!("expected '}}', got {}", kind));
            return None;
        }

        Some(Expr::new(
            ExprKind::AttrSet {
                recursive,
                bindings,
                inherits,
            },
            pos,
        ))
    }

    fn parse_attr_binding(&mut self) -> Option<AttrBinding> {
        let path = self.parse_attr_path()?;
        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Semicolon) {
            return None;
        }
        self.advance();
        Some(AttrBinding { path, value })
    }

    fn parse_attr_path(&mut self) -> Option<Vec<String>> {
        if !self.cur_is(&TokenKind::Ident) && !self.cur_is(&TokenKind::Str) {
            let kind = self.cur().kind.clone();
            self.error_at_cur(format!("expected identifier or string, got {}", kind));
            return None;
        }
        let mut path = vec![self.cur().literal.clone()];

        while self.peek_is(&TokenKind::Dot) {
            self.advance();
            self.advance();
            if !self.cur_is(&TokenKind::Ident) && !self.cur_is(&TokenKind::Str) {
                let kind = self.cur().kind.clone();
                self.error_at_cur(format!(
                    "expected identifier or string after '.', got {}",
                    kind
                ));
                return None;
            }
            path.push(self.cur().literal.clone());
        }

        Some(path)
    }

    fn parse_inherit(&mut self) -> Option<InheritClause> {
        let mut from = None;
        if self.peek_is(&TokenKind::LParen) {
            self.advance();
            self.advance();
            from = Some(self.parse_expression(Precedence::Lowest)?);
            if !self.expect_peek(TokenKind::RParen) {
                return None;
            }
        }

        let mut names = Vec::new();
        while self.peek_is(&TokenKind::Ident) || self.peek_is(&TokenKind::Str) {
            self.advance();
            names.push(self.cur().literal.clone());
        }

        if !self.expect_peek(TokenKind::Semicolon) {
            return None;
        }
        self.advance();
        Some(InheritClause { from, names })
    }

    /// Looks ahead from a `{` to decide whether it opens a function
    /// parameter pattern: `{ a, b }`, `{ a, ... }`, optionally followed
    /// by `@ name`, and always followed by `:`.
    fn looks_like_pattern(&self) -> bool {
        let mut i = self.pos + 1;
        loop {
            match self.kind_at(i) {
                TokenKind::RBrace => {
                    i += 1;
                    break;
                }
                TokenKind::Ident => {
                    i += 1;
                    match self.kind_at(i) {
                        TokenKind::Comma => i += 1,
                        TokenKind::RBrace => {
                            i += 1;
                            break;
                        }
                        _ => return false,
                    }
                }
                TokenKind::Ellipsis => {
                    i += 1;
                    if *self.kind_at(i) == TokenKind::RBrace {
                        i += 1;
                        break;
                    }
                    return false;
                }
                _ => return false,
            }
        }
        match self.kind_at(i) {
            TokenKind::Colon => true,
            TokenKind::At => {
                *self.kind_at(i + 1) == TokenKind::Ident
                    && *self.kind_at(i + 2) == TokenKind::Colon
            }
            _ => false,
        }
    }

    /// Called with the window on `{` after `looks_like_pattern` matched.
    fn parse_pattern_function(&mut self) -> Option<Expr> {
        let pos = self.cur_pos();
        let mut attrs = Vec::new();
        let mut ellipsis = false;

        loop {
            if self.peek_is(&TokenKind::RBrace) {
                self.advance();
                break;
            }
            self.advance();
            match self.cur().kind.clone() {
                TokenKind::Ident => attrs.push(self.cur().literal.clone()),
                TokenKind::Ellipsis => ellipsis = true,
                other => {
                    self.error_at_cur(format!("expected parameter name, got {}", other));
                    return None;
                }
            }
            if self.peek_is(&TokenKind::Comma) {
                self.advance();
            }
        }

        let mut bind = None;
        if self.peek_is(&TokenKind::At) {
            self.advance();
            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            bind = Some(self.cur().literal.clone());
        }

        if !self.expect_peek(TokenKind::Colon) {
            return None;
        }
        self.advance();
        let body = self.parse_expression(Precedence::Lowest)?;
        Some(Expr::new(
            ExprKind::Function {
                param: Pattern::AttrSet {
                    attrs,
                    ellipsis,
                    bind,
                },
                body: Rc::new(body),
            },
            pos,
        ))
    }

    // --- attribute access -------------------------------------------------

    fn parse_select(&mut self, left: Expr) -> Option<Expr> {
        let pos = self.cur_pos();
        self.advance();
        let path = self.parse_attr_path()?;
        Some(Expr::new(
            ExprKind::Select {
                target: Box::new(left),
                path,
                default: None,
            },
            pos,
        ))
    }

    fn parse_has_attr(&mut self, left: Expr) -> Option<Expr> {
        let pos = self.cur_pos();
        self.advance();
        let path = self.parse_attr_path()?;
        Some(Expr::new(
            ExprKind::HasAttr {
                target: Box::new(left),
                path,
            },
            pos,
        ))
    }

    fn parse_or_default(&mut self, mut left: Expr) -> Option<Expr> {
        if !matches!(left.kind, ExprKind::Select { .. }) {
            self.error_at_cur("'or' can only be used with attribute selection".to_string());
            return None;
        }
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        if let ExprKind::Select { default, .. } = &mut left.kind {
            *default = Some(Box::new(value));
        }
        Some(left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Expr {
        let parser = Parser::new(Lexer::new(input));
        match parser.parse() {
            Ok(expr) => expr,
            Err(errors) => panic!("parse of {:?} failed: {}", input, errors),
        }
    }

    fn parse_err(input: &str) -> ParseErrors {
        let parser = Parser::new(Lexer::new(input));
        match parser.parse() {
            Ok(expr) => panic!("parse of {:?} unexpectedly succeeded: {}", input, expr),
            Err(errors) => errors,
        }
    }

    fn renders(input: &str, expected: &str) {
        assert_eq!(parse(input).to_string(), expected, "input: {:?}", input);
    }

    #[test]
    fn operator_precedence() {
        renders("1 + 2 * 3", "(1 + (2 * 3))");
        renders("1 * 2 - 3", "((1 * 2) - 3)");
        renders("1 + 2 == 3", "((1 + 2) == 3)");
        renders("a && b || c", "((a && b) || c)");
        renders("a == b && c != d", "((a == b) && (c != d))");
        renders("1 < 2 == true", "((1 < 2) == true)");
        renders("a // b // c", "((a // b) // c)");
        renders("x ++ y ++ z", "((x ++ y) ++ z)");
        renders("2 * (5 + 10)", "(2 * (5 + 10))");
    }

    #[test]
    fn implication_is_right_associative() {
        renders("a -> b -> c", "(a -> (b -> c))");
    }

    #[test]
    fn keyword_logic_aliases() {
        renders("a and b", "(a && b)");
        renders("not a", "(!a)");
    }

    #[test]
    fn implicit_application() {
        renders("f x", "(f x)");
        renders("f x y", "((f x) y)");
        renders("f 1 + 2", "((f 1) + 2)");
        renders("isNull null", "(isNull null)");
    }

    #[test]
    fn unary_binds_at_application_level() {
        renders("-f x", "((-f) x)");
        renders("-5", "(-5)");
        renders("!true", "(!true)");
        renders("-a + b", "((-a) + b)");
    }

    #[test]
    fn literals() {
        renders("42", "42");
        renders("3.14", "3.14");
        renders("true", "true");
        renders("false", "false");
        renders("null", "null");
        renders(r#""hello""#, r#""hello""#);
        renders("/bin/sh", "/bin/sh");
    }

    #[test]
    fn simple_functions() {
        renders("x: x + 1", "x: (x + 1)");
        renders("x: y: x + y", "x: y: (x + y)");
        renders("(x: x) 5", "((x: x) 5)");
    }

    #[test]
    fn pattern_functions() {
        renders("{ a, b }: a + b", "{ a, b }: (a + b)");
        renders("{ a, b, ... }: a", "{ a, b, ... }: a");
        renders("{ a } @ args: args", "{ a } @ args: args");
        renders("{}: 1", "{ }: 1");
    }

    #[test]
    fn empty_braces_are_an_attribute_set() {
        let expr = parse("{}");
        assert!(matches!(expr.kind, ExprKind::AttrSet { .. }));
    }

    #[test]
    fn control_flow() {
        renders(
            r#"if 1 < 2 then "yes" else "no""#,
            r#"if (1 < 2) then "yes" else "no""#,
        );
        renders("let x = 5; y = 10; in x + y", "let x = 5; y = 10; in (x + y)");
        renders("with attrs; a + b", "with attrs; (a + b)");
        renders("assert x > 0; x", "assert (x > 0); x");
    }

    #[test]
    fn lists() {
        renders("[ 1 2 3 ]", "[ 1 2 3 ]");
        renders("[1, 2, 3]", "[ 1 2 3 ]");
        renders("[]", "[ ]");
        renders("[ (f 3) ]", "[ (f 3) ]");

        // Elements bind above application: two elements, not one call
        let expr = parse("[ f x ]");
        match expr.kind {
            ExprKind::List(elements) => assert_eq!(elements.len(), 2),
            other => panic!("expected list, got {:?}", other),
        }

        // Selection still binds inside an element
        let expr = parse("[ a.b ]");
        match expr.kind {
            ExprKind::List(elements) => assert_eq!(elements.len(), 1),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn attribute_sets() {
        renders("{ a = 1; b = 2; }", "{ a = 1; b = 2; }");
        renders("{ a.b.c = 1; }", "{ a.b.c = 1; }");
        renders("rec { x = 1; y = x; }", "rec { x = 1; y = x; }");
        renders(
            r#"{ "key with spaces" = 1; }"#,
            "{ key with spaces = 1; }",
        );
    }

    #[test]
    fn inherit_clauses() {
        renders("{ inherit a b; }", "{ inherit a b; }");
        renders("{ inherit (s) c d; x = 1; }", "{ inherit (s) c d; x = 1; }");
    }

    #[test]
    fn selection_and_defaults() {
        renders("a.b.c", "a.b.c");
        renders("a.b or 1", "a.b or 1");
        renders("s ? a.b", "s ? a.b");
        renders("{ a = 1; }.a", "{ a = 1; }.a");
    }

    #[test]
    fn update_after_attr_set() {
        renders(
            "{ a = 1; } // { b = 2; }",
            "({ a = 1; } // { b = 2; })",
        );
    }

    #[test]
    fn or_without_selection_is_an_error() {
        parse_err("a or b");
    }

    #[test]
    fn trailing_input_is_an_error() {
        parse_err("1; 2");
        parse_err("1 }");
    }

    #[test]
    fn missing_pieces_are_errors() {
        parse_err("let x = ; in x");
        parse_err("if true then 1");
        parse_err("{ a = 1 }");
        parse_err("(1 + 2");
        parse_err("1 +");
    }

    #[test]
    fn illegal_characters_are_reported() {
        let errors = parse_err("1 & 2");
        assert!(errors.has_errors());
    }

    #[test]
    fn errors_carry_positions() {
        let errors = parse_err("let x = ; in x");
        let first = errors.first().expect("at least one error");
        assert_eq!(first.line, 1);
        assert!(first.column > 0);
    }

    #[test]
    fn parenthesized_grouping_is_transparent() {
        renders("(1 + 2) * 3", "((1 + 2) * 3)");
        renders("((x))", "x");
    }
}
