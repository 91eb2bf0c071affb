//! # Schema Documents
//!
//! A [`SchemaDocument`] is a parsed JSON Schema file (YAML or JSON) plus every
//! sibling file its `$ref`s point into. Everything is read once, at
//! construction; afterwards the document is immutable and may be shared
//! across threads.
//!
//! ## Reference Resolution
//!
//! `$ref` values take two forms:
//!
//! - `#/definitions/<name>` points into the document that contains the ref.
//! - `common.yaml#/definitions/<name>` points into a sibling file, resolved
//!   relative to the directory of the root document.
//!
//! Chains of references are followed until a non-reference schema is found.
//! A chain that revisits a location is a [`SchemaError::CyclicReference`],
//! and so is a schema that would have to be inlined into itself: recursive
//! schemas cannot be flattened into a self-contained validator.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tsys_core::repr_str;

/// Keywords whose values are instance data, never schemas.
const DATA_KEYWORDS: [&str; 5] = ["example", "examples", "enum", "const", "default"];

/// Keywords whose values map names to schemas.
const SCHEMA_MAP_KEYWORDS: [&str; 3] = ["properties", "patternProperties", "dependencies"];

/// Errors raised while loading a schema document or deriving a type from it.
///
/// All of these are construction-time failures.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A schema file could not be read or parsed.
    #[error("schema load error for '{path}': {reason}")]
    Load {
        /// Path of the file that failed to load.
        path: String,
        /// Reason the file could not be loaded.
        reason: String,
    },

    /// A reference names a file that was not loaded.
    #[error("Unresolvable reference: {}", repr_str(.reference))]
    UnresolvableDocument {
        /// The file part of the reference.
        reference: String,
    },

    /// A JSON pointer does not address anything in its document.
    #[error("Unresolvable JSON pointer: {}", repr_str(.pointer))]
    UnresolvablePointer {
        /// The pointer, without its leading slash.
        pointer: String,
    },

    /// Following references revisits a location.
    #[error("Cyclic reference: {}", .chain.join(" -> "))]
    CyclicReference {
        /// The locations visited, ending with the repeated one.
        chain: Vec<String>,
    },

    /// The document root has no description.
    #[error("Schema is missing a description.")]
    MissingDescription,

    /// The document root has no type.
    #[error("Schema is missing a type.")]
    MissingType,

    /// The document root has no example and none can be synthesized.
    #[error("Schema is missing an example.")]
    MissingExample,

    /// The requested definition key is absent from `definitions`.
    #[error("Definition `{0}` is not defined in the schema.")]
    UndefinedDefinition(String),

    /// A definition lacks a required keyword.
    #[error("Definition `{definition}` is missing {}.", article(.keyword))]
    DefinitionMissing {
        /// The definition key (or `root`).
        definition: String,
        /// The missing keyword.
        keyword: String,
    },

    /// The declared type is not a JSON Schema primitive type.
    #[error("Schema type `{0}` is not supported.")]
    UnsupportedType(String),

    /// The resolved schema could not be compiled into a validator.
    #[error("validator build error for schema '{name}': {reason}")]
    Compile {
        /// Name of the schema being compiled.
        name: String,
        /// Reason the validator could not be built.
        reason: String,
    },
}

fn article(word: &str) -> String {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => format!("an {word}"),
        _ => format!("a {word}"),
    }
}

/// Where a reference points: a document (`None` for the root) and a pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Location {
    document: Option<String>,
    pointer: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.document.as_deref().unwrap_or(""), self.pointer)
    }
}

/// A parsed schema document and the sibling files it references.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    name: String,
    base_dir: Option<PathBuf>,
    root: Value,
    externals: HashMap<String, Value>,
}

impl SchemaDocument {
    /// Load a document from a `.json`, `.yaml` or `.yml` file, along with
    /// every sibling file reachable through its references.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Load`] if the document or any referenced
    /// sibling cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let root = load_file(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let mut doc = Self {
            name,
            base_dir: path.parent().map(Path::to_path_buf),
            root,
            externals: HashMap::new(),
        };
        doc.load_externals()?;
        tracing::debug!(
            path = %path.display(),
            externals = doc.externals.len(),
            "loaded schema document"
        );
        Ok(doc)
    }

    /// Wrap an already-parsed document. Only same-document references
    /// resolve; references into other files fail at resolution time.
    pub fn from_value(root: Value) -> Self {
        Self {
            name: "<inline>".to_string(),
            base_dir: None,
            root,
            externals: HashMap::new(),
        }
    }

    /// Wrap an already-parsed document whose sibling references resolve
    /// relative to `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Load`] if a referenced sibling cannot be loaded.
    pub fn from_value_in(root: Value, base_dir: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let mut doc = Self {
            name: "<inline>".to_string(),
            base_dir: Some(base_dir.as_ref().to_path_buf()),
            root,
            externals: HashMap::new(),
        };
        doc.load_externals()?;
        Ok(doc)
    }

    /// The document's file name, or `<inline>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The root schema.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Look up `definitions/<key>` in the root document, unresolved.
    pub fn definition(&self, key: &str) -> Option<&Value> {
        self.root.get("definitions").and_then(|defs| defs.get(key))
    }

    /// Names of the sibling files that were loaded, sorted.
    pub fn external_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.externals.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn load_externals(&mut self) -> Result<(), SchemaError> {
        let Some(base_dir) = self.base_dir.clone() else {
            return Ok(());
        };
        let mut pending = Vec::new();
        collect_external_refs(&self.root, &mut pending);
        while let Some(file) = pending.pop() {
            if file == self.name || self.externals.contains_key(&file) {
                continue;
            }
            let value = load_file(&base_dir.join(&file))?;
            collect_external_refs(&value, &mut pending);
            self.externals.insert(file, value);
        }
        Ok(())
    }

    fn locate(&self, reference: &str, from: Option<&str>) -> Location {
        let (file, fragment) = reference.split_once('#').unwrap_or((reference, ""));
        let document = if file.is_empty() {
            from.map(str::to_string)
        } else if file == self.name {
            None
        } else {
            Some(file.to_string())
        };
        let pointer = if fragment.is_empty() || fragment.starts_with('/') {
            fragment.to_string()
        } else {
            format!("/{fragment}")
        };
        Location { document, pointer }
    }

    fn lookup(&self, location: &Location) -> Result<&Value, SchemaError> {
        let doc = match &location.document {
            None => &self.root,
            Some(file) => self
                .externals
                .get(file)
                .ok_or_else(|| SchemaError::UnresolvableDocument {
                    reference: file.clone(),
                })?,
        };
        if location.pointer.is_empty() {
            return Ok(doc);
        }
        doc.pointer(&location.pointer)
            .ok_or_else(|| SchemaError::UnresolvablePointer {
                pointer: location.pointer.trim_start_matches('/').to_string(),
            })
    }

    /// Resolve a reference from the root document, following chained
    /// references until a non-reference schema is reached.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnresolvablePointer`] or
    /// [`SchemaError::UnresolvableDocument`] for dangling references and
    /// [`SchemaError::CyclicReference`] for chains that loop.
    pub fn resolve(&self, reference: &str) -> Result<Value, SchemaError> {
        self.resolve_from(reference, None).map(|(value, _)| value)
    }

    /// Resolve `schema` if it is a reference, returning it unchanged otherwise.
    pub fn resolve_schema(&self, schema: &Value) -> Result<Value, SchemaError> {
        match schema.get("$ref").and_then(Value::as_str) {
            Some(reference) => self.resolve(reference),
            None => Ok(schema.clone()),
        }
    }

    fn resolve_from(
        &self,
        reference: &str,
        from: Option<&str>,
    ) -> Result<(Value, Option<String>), SchemaError> {
        let mut location = self.locate(reference, from);
        let mut seen: Vec<Location> = Vec::new();
        loop {
            if seen.contains(&location) {
                let mut chain: Vec<String> = seen.iter().map(Location::to_string).collect();
                chain.push(location.to_string());
                return Err(SchemaError::CyclicReference { chain });
            }
            let target = self.lookup(&location)?;
            match target.get("$ref").and_then(Value::as_str) {
                Some(next) => {
                    let next = self.locate(next, location.document.as_deref());
                    seen.push(location);
                    location = next;
                }
                None => return Ok((target.clone(), location.document)),
            }
        }
    }

    /// Produce a self-contained copy of `schema` with every reference
    /// replaced by its target and `definitions` tables dropped.
    ///
    /// # Errors
    ///
    /// Fails on dangling references and on schemas that reference
    /// themselves, directly or through other definitions.
    pub fn resolve_deep(&self, schema: &Value) -> Result<Value, SchemaError> {
        self.inline(schema, None, &mut Vec::new())
    }

    fn inline(
        &self,
        schema: &Value,
        from: Option<&str>,
        stack: &mut Vec<Location>,
    ) -> Result<Value, SchemaError> {
        match schema {
            Value::Object(map) => {
                if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                    let location = self.locate(reference, from);
                    if stack.contains(&location) {
                        let mut chain: Vec<String> =
                            stack.iter().map(Location::to_string).collect();
                        chain.push(location.to_string());
                        return Err(SchemaError::CyclicReference { chain });
                    }
                    let target = self.lookup(&location)?.clone();
                    let document = location.document.clone();
                    stack.push(location);
                    let inlined = self.inline(&target, document.as_deref(), stack);
                    stack.pop();
                    return inlined;
                }

                let mut out = Map::new();
                for (key, value) in map {
                    if key == "definitions" {
                        continue;
                    }
                    let inlined = if DATA_KEYWORDS.contains(&key.as_str()) {
                        value.clone()
                    } else if SCHEMA_MAP_KEYWORDS.contains(&key.as_str()) {
                        self.inline_named(value, from, stack)?
                    } else {
                        self.inline(value, from, stack)?
                    };
                    out.insert(key.clone(), inlined);
                }
                Ok(Value::Object(out))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.inline(item, from, stack))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    /// Inline each value of a name → schema map, leaving the names alone.
    fn inline_named(
        &self,
        schemas: &Value,
        from: Option<&str>,
        stack: &mut Vec<Location>,
    ) -> Result<Value, SchemaError> {
        match schemas {
            Value::Object(map) => {
                let mut out = Map::new();
                for (name, schema) in map {
                    out.insert(name.clone(), self.inline(schema, from, stack)?);
                }
                Ok(Value::Object(out))
            }
            other => self.inline(other, from, stack),
        }
    }
}

/// Collect the file part of every cross-file `$ref` under `value`.
fn collect_external_refs(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                let file = reference.split('#').next().unwrap_or_default();
                // Remote documents are never fetched.
                if !file.is_empty() && !file.contains("://") {
                    out.push(file.to_string());
                }
            }
            for (key, child) in map {
                if !DATA_KEYWORDS.contains(&key.as_str()) {
                    collect_external_refs(child, out);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_external_refs(item, out)),
        _ => {}
    }
}

/// Read a JSON or YAML file, choosing the format by extension.
fn load_file(path: &Path) -> Result<Value, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::Load {
        path: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(&content).map_err(|e| SchemaError::Load {
                    path: path.display().to_string(),
                    reason: format!("invalid YAML: {e}"),
                })?;
            yaml_to_json_value(&yaml).map_err(|reason| SchemaError::Load {
                path: path.display().to_string(),
                reason: format!("YAML-to-JSON conversion failed: {reason}"),
            })
        }
        _ => serde_json::from_str(&content).map_err(|e| SchemaError::Load {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {e}"),
        }),
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Schema documents use the JSON-compatible subset of YAML; scalar map keys
/// are stringified and tags are dropped.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
