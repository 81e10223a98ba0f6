// File: src/derivation.rs
//
// Derivation construction and content addressing.
// A derivation is a build specification; its store path is derived from
// a SHA-256 hash over a canonical rendering of every input, so equal
// inputs always map to the same path.

use std::collections::BTreeMap;

use log::debug;
use sha2::{Digest, Sha256};

use crate::errors::{EvalError, EvalErrorKind};
use crate::interpreter::{AttrMap, Value};

pub const DEFAULT_SYSTEM: &str = "x86_64-linux";

const STORE_DIR: &str = "/nix/store";

/// Attribute names with structural meaning; everything else that is a
/// string becomes an environment variable for the builder.
const RESERVED_ATTRS: [&str; 6] = ["name", "builder", "system", "args", "outputs", "inputSrcs"];

/// A finalized derivation with its computed hash and store path.
#[derive(Debug, Clone)]
pub struct Derivation {
    pub name: String,
    pub builder: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub outputs: BTreeMap<String, String>,
    pub input_drvs: BTreeMap<String, Vec<String>>,
    pub input_srcs: Vec<String>,
    pub system: String,
    pub hash: String,
    pub store_path: String,
}

impl Derivation {
    /// Starts building a derivation with the given name and default
    /// system.
    pub fn new(name: impl Into<String>) -> DerivationBuilder {
        DerivationBuilder {
            drv: Derivation {
                name: name.into(),
                builder: String::new(),
                args: Vec::new(),
                env: BTreeMap::new(),
                outputs: BTreeMap::new(),
                input_drvs: BTreeMap::new(),
                input_srcs: Vec::new(),
                system: DEFAULT_SYSTEM.to_string(),
                hash: String::new(),
                store_path: String::new(),
            },
        }
    }

    pub fn drv_path(&self) -> String {
        format!("{}.drv", self.store_path)
    }

    /// Converts an attribute set from the expression language into a
    /// finalized derivation. `name` and `builder` are required strings;
    /// `system`, `args`, `outputs`, and `inputSrcs` are optional with
    /// checked types; every other string attribute becomes an
    /// environment variable.
    pub fn from_attrs(attrs: &AttrMap) -> Result<Derivation, EvalError> {
        let name = require_string(attrs, "name")?;
        let builder = require_string(attrs, "builder")?;

        let mut db = Derivation::new(name).builder(builder);

        if let Some(system) = attrs.get("system") {
            match system {
                Value::Str(s) => db = db.system(s.as_ref()),
                other => {
                    return Err(invalid(format!(
                        "derivation 'system' must be a string, got {}",
                        other.type_name()
                    )))
                }
            }
        }

        if let Some(args) = attrs.get("args") {
            db = db.args(string_list(args, "args")?);
        }

        if let Some(outputs) = attrs.get("outputs") {
            for output in string_list(outputs, "outputs")? {
                db = db.output(output, "");
            }
        }

        if let Some(srcs) = attrs.get("inputSrcs") {
            for src in string_list(srcs, "inputSrcs")? {
                db = db.input_src(src);
            }
        }

        for (key, value) in attrs {
            if RESERVED_ATTRS.contains(&key.as_str()) {
                continue;
            }
            if let Value::Str(s) = value {
                db = db.env(key.clone(), s.as_ref());
            }
        }

        Ok(db.build())
    }

    /// Renders the computed fields as attribute-set entries: the core
    /// inputs normalized, `drvPath`, the `outputs` sub-set, and each
    /// output flattened at the top level.
    pub fn to_attrs(&self) -> AttrMap {
        let mut attrs = AttrMap::new();
        attrs.insert("name".to_string(), Value::string(&self.name));
        attrs.insert("builder".to_string(), Value::string(&self.builder));
        attrs.insert("system".to_string(), Value::string(&self.system));
        attrs.insert("drvPath".to_string(), Value::string(self.drv_path()));
        attrs.insert(
            "args".to_string(),
            Value::list(self.args.iter().map(Value::string).collect()),
        );

        let mut outputs = AttrMap::new();
        for (output, path) in &self.outputs {
            outputs.insert(output.clone(), Value::string(path));
        }
        attrs.insert("outputs".to_string(), Value::attrs(outputs));

        for (output, path) in &self.outputs {
            attrs.insert(output.clone(), Value::string(path));
        }

        attrs
    }
}

/// Fluent construction of a derivation; `build` computes the hash and
/// store paths.
pub struct DerivationBuilder {
    drv: Derivation,
}

impl DerivationBuilder {
    pub fn builder(mut self, builder: impl Into<String>) -> Self {
        self.drv.builder = builder.into();
        self
    }

    pub fn args(mut self, args: Vec<String>) -> Self {
        self.drv.args = args;
        self
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.drv.system = system.into();
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.drv.env.insert(key.into(), value.into());
        self
    }

    pub fn output(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.drv.outputs.insert(name.into(), path.into());
        self
    }

    pub fn input_drv(mut self, path: impl Into<String>, outputs: Vec<String>) -> Self {
        self.drv.input_drvs.insert(path.into(), outputs);
        self
    }

    pub fn input_src(mut self, path: impl Into<String>) -> Self {
        self.drv.input_srcs.push(path.into());
        self
    }

    /// Finalizes the derivation: defaults the output set to `out`,
    /// computes the hash and store path, and fills in the path of every
    /// output that was left empty.
    pub fn build(mut self) -> Derivation {
        if self.drv.outputs.is_empty() {
            self.drv.outputs.insert("out".to_string(), String::new());
        }

        self.drv.hash = self.compute_hash();
        self.drv.store_path = format!("{}/{}-{}", STORE_DIR, self.drv.hash, self.drv.name);

        let store_path = self.drv.store_path.clone();
        for (name, path) in self.drv.outputs.iter_mut() {
            if path.is_empty() {
                *path = format!("{}/{}", store_path, name);
            }
        }

        debug!("derivation {} hashed to {}", self.drv.name, self.drv.store_path);
        self.drv
    }

    /// The first 32 hex characters of SHA-256 over the canonical field
    /// rendering: name, builder, args, system, then sorted env entries,
    /// sorted input derivations, and sorted input sources.
    fn compute_hash(&self) -> String {
        let drv = &self.drv;
        let mut parts = vec![
            format!("name={}", drv.name),
            format!("builder={}", drv.builder),
            format!("args={}", drv.args.join(",")),
            format!("system={}", drv.system),
        ];

        for (key, value) in &drv.env {
            parts.push(format!("env.{}={}", key, value));
        }

        for (path, outputs) in &drv.input_drvs {
            let mut outputs = outputs.clone();
            outputs.sort();
            parts.push(format!("inputDrv.{}={}", path, outputs.join(",")));
        }

        let mut srcs = drv.input_srcs.clone();
        srcs.sort();
        for src in srcs {
            parts.push(format!("inputSrc={}", src));
        }

        let mut hasher = Sha256::new();
        hasher.update(parts.join("\n").as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..32].to_string()
    }
}

fn invalid(message: String) -> EvalError {
    EvalError::new(EvalErrorKind::InvalidDerivation, message)
}

fn require_string(attrs: &AttrMap, key: &str) -> Result<String, EvalError> {
    match attrs.get(key) {
        Some(Value::Str(s)) => Ok(s.to_string()),
        Some(other) => Err(invalid(format!(
            "derivation '{}' must be a string, got {}",
            key,
            other.type_name()
        ))),
        None => Err(invalid(format!(
            "derivation missing required '{}' attribute",
            key
        ))),
    }
}

/// Extracts a list of strings (paths allowed) from a derivation input.
fn string_list(value: &Value, key: &str) -> Result<Vec<String>, EvalError> {
    let elements = match value {
        Value::List(elements) => elements,
        other => {
            return Err(invalid(format!(
                "derivation '{}' must be a list, got {}",
                key,
                other.type_name()
            )))
        }
    };
    let mut out = Vec::with_capacity(elements.len());
    for element in elements.iter() {
        match element {
            Value::Str(s) => out.push(s.to_string()),
            Value::Path(p) => out.push(p.to_string()),
            other => {
                return Err(invalid(format!(
                    "derivation '{}' must contain only strings, got {}",
                    key,
                    other.type_name()
                )))
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_attrs() -> AttrMap {
        let mut attrs = AttrMap::new();
        attrs.insert("name".to_string(), Value::string("hello"));
        attrs.insert("builder".to_string(), Value::string("/bin/sh"));
        attrs
    }

    fn is_lower_hex(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    }

    #[test]
    fn minimal_derivation_gets_defaults_and_a_store_path() {
        let drv = Derivation::from_attrs(&minimal_attrs()).unwrap();
        assert_eq!(drv.name, "hello");
        assert_eq!(drv.builder, "/bin/sh");
        assert_eq!(drv.system, DEFAULT_SYSTEM);
        assert!(drv.args.is_empty());

        assert_eq!(drv.hash.len(), 32);
        assert!(is_lower_hex(&drv.hash));
        assert_eq!(drv.store_path, format!("/nix/store/{}-hello", drv.hash));
        assert_eq!(drv.drv_path(), format!("{}.drv", drv.store_path));
        assert_eq!(
            drv.outputs.get("out"),
            Some(&format!("{}/out", drv.store_path))
        );
    }

    #[test]
    fn hashing_is_deterministic() {
        let a = Derivation::from_attrs(&minimal_attrs()).unwrap();
        let b = Derivation::from_attrs(&minimal_attrs()).unwrap();
        assert_eq!(a.hash, b.hash);
        assert_eq!(a.store_path, b.store_path);
    }

    #[test]
    fn every_input_feeds_the_hash() {
        let base = Derivation::from_attrs(&minimal_attrs()).unwrap();

        let mut with_env = minimal_attrs();
        with_env.insert("PATH".to_string(), Value::string("/bin"));
        let with_env = Derivation::from_attrs(&with_env).unwrap();
        assert_ne!(base.hash, with_env.hash);

        let mut with_args = minimal_attrs();
        with_args.insert(
            "args".to_string(),
            Value::list(vec![Value::string("-c"), Value::string("echo hi")]),
        );
        let with_args = Derivation::from_attrs(&with_args).unwrap();
        assert_ne!(base.hash, with_args.hash);

        let mut with_system = minimal_attrs();
        with_system.insert("system".to_string(), Value::string("aarch64-linux"));
        let with_system = Derivation::from_attrs(&with_system).unwrap();
        assert_ne!(base.hash, with_system.hash);
    }

    #[test]
    fn input_derivations_hash_in_sorted_order() {
        let a = Derivation::new("x")
            .builder("/bin/sh")
            .input_drv("/nix/store/aaa-dep.drv", vec!["out".into(), "dev".into()])
            .input_drv("/nix/store/bbb-dep.drv", vec!["out".into()])
            .build();
        let b = Derivation::new("x")
            .builder("/bin/sh")
            .input_drv("/nix/store/bbb-dep.drv", vec!["out".into()])
            .input_drv("/nix/store/aaa-dep.drv", vec!["dev".into(), "out".into()])
            .build();
        assert_eq!(a.hash, b.hash);

        let without = Derivation::new("x").builder("/bin/sh").build();
        assert_ne!(a.hash, without.hash);
    }

    #[test]
    fn input_sources_hash_in_sorted_order() {
        let a = Derivation::new("x")
            .builder("/bin/sh")
            .input_src("/src/b")
            .input_src("/src/a")
            .build();
        let b = Derivation::new("x")
            .builder("/bin/sh")
            .input_src("/src/a")
            .input_src("/src/b")
            .build();
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn named_outputs_are_flattened() {
        let mut attrs = minimal_attrs();
        attrs.insert(
            "outputs".to_string(),
            Value::list(vec![Value::string("out"), Value::string("dev")]),
        );
        let drv = Derivation::from_attrs(&attrs).unwrap();
        let rendered = drv.to_attrs();

        assert!(rendered.contains_key("out"));
        assert!(rendered.contains_key("dev"));
        match rendered.get("outputs") {
            Some(Value::Attrs(outputs)) => {
                assert_eq!(outputs.len(), 2);
            }
            other => panic!("expected outputs sub-set, got {:?}", other),
        }
    }

    #[test]
    fn rendered_attrs_contain_the_core_fields() {
        let drv = Derivation::from_attrs(&minimal_attrs()).unwrap();
        let rendered = drv.to_attrs();
        for key in ["name", "builder", "system", "args", "drvPath", "outputs", "out"] {
            assert!(rendered.contains_key(key), "missing {}", key);
        }
        match rendered.get("drvPath") {
            Some(Value::Str(path)) => assert!(path.ends_with(".drv")),
            other => panic!("expected drvPath string, got {:?}", other),
        }
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let err = Derivation::from_attrs(&AttrMap::new()).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::InvalidDerivation);

        let mut attrs = minimal_attrs();
        attrs.insert("builder".to_string(), Value::Int(5));
        assert_eq!(
            Derivation::from_attrs(&attrs).unwrap_err().kind,
            EvalErrorKind::InvalidDerivation
        );

        let mut attrs = minimal_attrs();
        attrs.insert("args".to_string(), Value::list(vec![Value::Int(1)]));
        assert_eq!(
            Derivation::from_attrs(&attrs).unwrap_err().kind,
            EvalErrorKind::InvalidDerivation
        );

        let mut attrs = minimal_attrs();
        attrs.insert("system".to_string(), Value::Int(1));
        assert_eq!(
            Derivation::from_attrs(&attrs).unwrap_err().kind,
            EvalErrorKind::InvalidDerivation
        );
    }

    #[test]
    fn non_string_extra_attributes_are_not_env_vars() {
        let mut attrs = minimal_attrs();
        attrs.insert("count".to_string(), Value::Int(3));
        attrs.insert("GREETING".to_string(), Value::string("hi"));
        let drv = Derivation::from_attrs(&attrs).unwrap();
        assert!(drv.env.contains_key("GREETING"));
        assert!(!drv.env.contains_key("count"));
    }
}
