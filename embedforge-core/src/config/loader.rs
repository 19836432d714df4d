//! Loading embedding configurations from files.
//!
//! Supports JSON and TOML files. Before parsing, `${VAR_NAME}` and
//! `${VAR_NAME:default_value}` placeholders are replaced with environment
//! variable values so credentials can stay out of the file.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use super::EmbeddingConfig;
use crate::{EmbedForgeError, Result};

/// Reads an [`EmbeddingConfig`] from a file.
///
/// # Examples
///
/// ```rust,no_run
/// use embedforge_core::config::ConfigLoader;
///
/// # async fn example() -> embedforge_core::Result<()> {
/// // Reads the `[embedding]` table of a larger application config.
/// let config = ConfigLoader::new("app.toml")
///     .with_section("embedding")
///     .load()
///     .await?;
/// println!("provider: {}", config.provider());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
    section: Option<String>,
}

impl ConfigLoader {
    /// Create a loader for the given file.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            section: None,
        }
    }

    /// Read the configuration from a nested section instead of the document
    /// root. Dots separate nesting levels.
    #[must_use]
    pub fn with_section<S: Into<String>>(mut self, section: S) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Load and parse the configuration.
    pub async fn load(&self) -> Result<EmbeddingConfig> {
        debug!("Loading embedding configuration: {}", self.path.display());

        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            EmbedForgeError::configuration(format!(
                "Failed to read configuration file {}: {e}",
                self.path.display()
            ))
        })?;

        let content = substitute_env_variables(&content)?;
        let format = ConfigFormat::from_path(&self.path)?;
        let document = format.parse(&content, &self.path)?;

        let value = match &self.section {
            Some(section) => select_section(document, section)?,
            None => document,
        };

        EmbeddingConfig::from_value(value)
    }
}

/// Load an embedding configuration from a JSON or TOML file.
pub async fn load_embedding_config<P: AsRef<Path>>(path: P) -> Result<EmbeddingConfig> {
    ConfigLoader::new(path.as_ref()).load().await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(EmbedForgeError::configuration(format!(
                "Unsupported configuration file extension {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    fn parse(self, content: &str, path: &Path) -> Result<serde_json::Value> {
        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| {
                EmbedForgeError::configuration(format!(
                    "Invalid JSON in configuration file {}: {e}",
                    path.display()
                ))
            }),
            Self::Toml => {
                let table: toml::Table = toml::from_str(content).map_err(|e| {
                    EmbedForgeError::configuration(format!(
                        "Invalid TOML in configuration file {}: {e}",
                        path.display()
                    ))
                })?;
                Ok(serde_json::to_value(table)?)
            }
        }
    }
}

fn select_section(document: serde_json::Value, section: &str) -> Result<serde_json::Value> {
    let mut current = document;
    for key in section.split('.') {
        current = match current {
            serde_json::Value::Object(mut fields) => fields.remove(key).ok_or_else(|| {
                EmbedForgeError::configuration(format!(
                    "Configuration section '{section}' not found"
                ))
            })?,
            _ => {
                return Err(EmbedForgeError::configuration(format!(
                    "Configuration section '{section}' is not a table"
                )));
            }
        };
    }
    Ok(current)
}

/// Substitute environment variables in configuration content.
///
/// Supports the format `${VAR_NAME}` and `${VAR_NAME:default_value}`. Unset
/// variables without a default become empty strings.
pub fn substitute_env_variables(content: &str) -> Result<String> {
    let env_var_regex = Regex::new(r"\$\{([^}:]+)(?::([^}]*))?\}")
        .map_err(|e| EmbedForgeError::configuration(format!("Invalid placeholder pattern: {e}")))?;

    let result = env_var_regex.replace_all(content, |captures: &regex::Captures<'_>| {
        let default_value = captures.get(2).map_or("", |m| m.as_str());
        std::env::var(&captures[1]).unwrap_or_else(|_| default_value.to_string())
    });

    Ok(result.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_substitute_with_default() {
        let out = substitute_env_variables(
            r#"{"model": "${EMBEDFORGE_TEST_SURELY_UNSET_VAR:fallback}"}"#,
        )
        .unwrap();
        assert_eq!(out, r#"{"model": "fallback"}"#);
    }

    #[test]
    fn test_substitute_unset_without_default() {
        let out = substitute_env_variables("key=${EMBEDFORGE_TEST_SURELY_UNSET_VAR}").unwrap();
        assert_eq!(out, "key=");
    }

    #[test]
    fn test_substitute_leaves_plain_text() {
        let out = substitute_env_variables("no placeholders $HOME here").unwrap();
        assert_eq!(out, "no placeholders $HOME here");
    }

    #[test]
    fn test_select_nested_section() {
        let doc = json!({"app": {"embedding": {"provider": "openai", "model": "m"}}});
        let value = select_section(doc, "app.embedding").unwrap();
        assert_eq!(value, json!({"provider": "openai", "model": "m"}));
    }

    #[test]
    fn test_select_missing_section() {
        let err = select_section(json!({"app": {}}), "app.embedding").unwrap_err();
        assert!(matches!(err, EmbedForgeError::Configuration { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/b.json")).unwrap(),
            ConfigFormat::Json
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("b.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(ConfigFormat::from_path(Path::new("b.yaml")).is_err());
    }
}
