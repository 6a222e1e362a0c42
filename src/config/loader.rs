//! YAML configuration loading with `!include` resolution.
//!
//! ```yaml
//! # /home/frodo/one-ring.yml
//! Name: The One Ring
//! Effects:
//!   - !include path/to/invisibility.yml
//! ```
//!
//! An included file F may carry its own `!include` directives; their paths are
//! relative to F's directory, not to the root document.

use crate::error::{BspyError, Result};
use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

const INCLUDE_TAG: &str = "!include";

/// Load a YAML document and resolve every `!include` it reaches.
pub fn load_configs<P: AsRef<Path>>(path: P) -> Result<Value> {
    IncludeLoader::new().load_file(path)
}

pub struct IncludeLoader {
    /// Directory the next `!include` is resolved against.
    root: PathBuf,
    /// Files currently being resolved, outermost first.
    chain: Vec<PathBuf>,
}

impl Default for IncludeLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl IncludeLoader {
    /// Loader whose includes resolve against the current working directory
    /// until a file is entered.
    pub fn new() -> Self {
        Self::with_root(".")
    }

    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            chain: Vec::new(),
        }
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Value> {
        let path = path.as_ref();
        let file = fs::canonicalize(path).map_err(|e| {
            BspyError::Configuration(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        self.enter(file)
    }

    /// Resolve a document that was not read from disk. Includes are relative
    /// to this loader's root.
    pub fn load_str(&mut self, contents: &str) -> Result<Value> {
        let document: Value = serde_yaml::from_str(contents)?;
        self.resolve(document)
    }

    fn enter(&mut self, file: PathBuf) -> Result<Value> {
        if self.chain.contains(&file) {
            let mut chain = self.chain.clone();
            chain.push(file);
            return Err(BspyError::IncludeCycle { chain });
        }

        let contents = fs::read_to_string(&file)?;
        let document: Value = serde_yaml::from_str(&contents).map_err(|e| {
            BspyError::Configuration(format!("Failed to parse {}: {}", file.display(), e))
        })?;

        let base = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let outer_root = std::mem::replace(&mut self.root, base);
        self.chain.push(file);

        let resolved = self.resolve(document);

        self.chain.pop();
        self.root = outer_root;
        resolved
    }

    fn resolve(&mut self, value: Value) -> Result<Value> {
        match value {
            Value::Tagged(tagged) if tagged.tag == INCLUDE_TAG => {
                let TaggedValue { value, .. } = *tagged;
                match value {
                    Value::String(relative) => self.include(&relative),
                    other => Err(BspyError::Configuration(format!(
                        "{} expects a file path, got {:?}",
                        INCLUDE_TAG, other
                    ))),
                }
            }
            Value::Tagged(mut tagged) => {
                let inner = std::mem::replace(&mut tagged.value, Value::Null);
                tagged.value = self.resolve(inner)?;
                Ok(Value::Tagged(tagged))
            }
            Value::Mapping(mapping) => {
                let mut resolved = Mapping::with_capacity(mapping.len());
                for (key, value) in mapping {
                    resolved.insert(key, self.resolve(value)?);
                }
                Ok(Value::Mapping(resolved))
            }
            Value::Sequence(sequence) => sequence
                .into_iter()
                .map(|item| self.resolve(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Sequence),
            scalar => Ok(scalar),
        }
    }

    fn include(&mut self, relative: &str) -> Result<Value> {
        let filename = self.root.join(relative);
        let file = fs::canonicalize(&filename).map_err(|_| BspyError::IncludeNotFound {
            path: filename.clone(),
            included_from: self
                .chain
                .last()
                .cloned()
                .unwrap_or_else(|| self.root.clone()),
        })?;
        log::debug!("Including {}", file.display());
        self.enter(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_document_passes_through() {
        let value = IncludeLoader::new()
            .load_str("Name: The One Ring\nSpecials: [resize-to-wearer]\n")
            .unwrap();
        assert_eq!(value["Name"], Value::from("The One Ring"));
        assert_eq!(value["Specials"][0], Value::from("resize-to-wearer"));
    }

    #[test]
    fn test_include_requires_string_path() {
        let err = IncludeLoader::new().load_str("a: !include [1, 2]\n").unwrap_err();
        assert!(matches!(err, BspyError::Configuration(_)));
    }

    #[test]
    fn test_other_tags_are_preserved() {
        let value = IncludeLoader::new().load_str("a: !custom 3\n").unwrap();
        match &value["a"] {
            Value::Tagged(tagged) => {
                assert_eq!(tagged.tag, "!custom");
                assert_eq!(tagged.value, Value::from(3));
            }
            other => panic!("expected a tagged value, got {other:?}"),
        }
    }

    #[test]
    fn test_include_from_string_uses_loader_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sub.yml"), "Name: invisibility\n").unwrap();

        let value = IncludeLoader::with_root(dir.path())
            .load_str("Effects:\n  - !include sub.yml\n")
            .unwrap();
        assert_eq!(value["Effects"][0]["Name"], Value::from("invisibility"));
    }

    #[test]
    fn test_missing_include_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = IncludeLoader::with_root(dir.path())
            .load_str("a: !include nowhere.yml\n")
            .unwrap_err();
        match err {
            BspyError::IncludeNotFound { path, .. } => assert!(path.ends_with("nowhere.yml")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
