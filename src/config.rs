//! @ai:module:intent Load parser and checker settings from a TOML file
//! @ai:module:layer infrastructure
//! @ai:module:public_api Config
//! @ai:module:depends_on annotation, builtin, error

use crate::annotation::AnnotationRegistry;
use crate::builtin::default_registry;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the configuration file looked up next to the checked path.
pub const CONFIG_FILE_NAME: &str = ".scssdoc.toml";

/// @ai:intent Settings shared by the parse and check commands
///
/// ```toml
/// strict = true
/// extensions = ["scss", "sass"]
///
/// [aliases]
/// prop = "param"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report unknown annotations as errors instead of warnings.
    pub strict: bool,
    /// Extra alias -> annotation mappings on top of the built-in ones.
    pub aliases: BTreeMap<String, String>,
    /// File extensions scanned when checking a directory.
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict: false,
            aliases: BTreeMap::new(),
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["scss".to_string()]
}

impl Config {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());

        Ok(config)
    }

    /// @ai:intent Load `.scssdoc.toml` from `dir` if present, defaults otherwise
    /// @ai:effects fs:read
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// @ai:intent Build the annotation registry: built-in handlers plus configured aliases
    /// @ai:effects pure
    pub fn registry(&self) -> AnnotationRegistry {
        self.aliases
            .iter()
            .fold(default_registry(), |registry, (alias, target)| {
                registry.with_alias(alias.as_str(), target.as_str())
            })
    }

    /// @ai:intent Check whether a path has one of the configured extensions
    /// @ai:effects pure
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"strict = true

[aliases]
prop = "param""#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert!(config.strict);
        assert_eq!(config.extensions, vec!["scss".to_string()]);
        assert_eq!(config.registry().resolve("prop").map(|(n, _)| n), Some("param"));
    }

    #[test]
    fn test_invalid_config() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "strict = \"maybe\"").unwrap();

        assert!(matches!(Config::load(file.path()), Err(Error::Config { .. })));
    }

    #[test]
    fn test_discover_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::discover(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_is_source_file() {
        let config = Config::default();
        assert!(config.is_source_file(Path::new("a/_buttons.scss")));
        assert!(!config.is_source_file(Path::new("a/buttons.css")));
        assert!(!config.is_source_file(Path::new("Makefile")));
    }
}
