// File: src/repl.rs
//
// Interactive shell for the rix interpreter.
// Reads a line, evaluates it, prints the value. Provides command
// history, a couple of ':' commands, and colored error reporting.

use std::path::Path;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::{eval_str, Error};

/// A REPL session wrapping a line editor.
pub struct Repl {
    editor: DefaultEditor,
}

impl Repl {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Repl {
            editor: DefaultEditor::new()?,
        })
    }

    /// Runs the read-eval-print loop until ':quit' or EOF.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        println!("rix repl - Type :quit to exit");
        println!();

        loop {
            match self.editor.readline(&"nix-repl> ".bright_green().to_string()) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(line);

                    if let Some(command) = line.strip_prefix(':') {
                        if !self.handle_command(command) {
                            break;
                        }
                        continue;
                    }

                    self.eval_line(line);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C (:quit to exit)".bright_yellow());
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("{} {}", "Error:".bright_red(), err);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handles a ':' command. Returns false when the REPL should exit.
    fn handle_command(&self, command: &str) -> bool {
        match command {
            "quit" | "q" => false,
            "help" | "h" => {
                println!("Available commands:");
                println!("  :help, :h    Show this help");
                println!("  :quit, :q    Exit the REPL");
                true
            }
            other => {
                println!("Unknown command: :{}", other);
                println!("Type :help for available commands");
                true
            }
        }
    }

    fn eval_line(&self, line: &str) {
        match eval_str(line, Path::new(".")) {
            Ok(value) => println!("{}", value),
            Err(Error::Parse(errors)) => {
                eprintln!("{} {}", "Parse error:".bright_red(), errors);
            }
            Err(Error::Eval(error)) => {
                eprintln!("{} {}", "Evaluation error:".bright_red(), error);
            }
        }
    }
}
