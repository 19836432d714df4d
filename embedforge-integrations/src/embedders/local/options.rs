//! Keyword options understood by the local runtime.

use std::path::PathBuf;

use embedforge_core::config::Kwargs;
use serde_json::Value;
use tracing::debug;

use super::error::{LocalEmbedderError, Result};

const DEFAULT_MAX_LENGTH: usize = 512;

/// Options applied when loading model weights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Maximum sequence length for tokenization.
    pub max_length: usize,
    /// Directory model files are cached in (`None` = runtime default).
    pub cache_dir: Option<PathBuf>,
    /// Whether to show a progress bar while downloading.
    pub show_download_progress: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            cache_dir: None,
            show_download_progress: false,
        }
    }
}

impl LoadOptions {
    /// Read load options from a `model_kwargs` mapping.
    ///
    /// `cache_folder` is accepted as an alias of `cache_dir`. Keys the runtime
    /// has no use for are left alone.
    pub fn from_kwargs(kwargs: &Kwargs) -> Result<Self> {
        let mut options = Self::default();
        if let Some(max_length) = get_usize(kwargs, "max_length")? {
            options.max_length = max_length;
        }
        options.cache_dir = get_str(kwargs, "cache_dir")?
            .or(get_str(kwargs, "cache_folder")?)
            .map(PathBuf::from);
        if let Some(show) = get_bool(kwargs, "show_download_progress")? {
            options.show_download_progress = show;
        }

        log_ignored(
            "model_kwargs",
            kwargs,
            &["max_length", "cache_dir", "cache_folder", "show_download_progress"],
        );
        Ok(options)
    }

    /// Use `cache_dir` unless one was already set.
    #[must_use]
    pub fn with_default_cache_dir(mut self, cache_dir: Option<&str>) -> Self {
        if self.cache_dir.is_none() {
            self.cache_dir = cache_dir.map(PathBuf::from);
        }
        self
    }
}

/// Options applied when encoding text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// L2-normalize every output vector.
    pub normalize_embeddings: bool,
    /// Inference batch size (`None` = runtime default).
    pub batch_size: Option<usize>,
}

impl EncodeOptions {
    /// Read encode options from an `encode_kwargs` mapping.
    pub fn from_kwargs(kwargs: &Kwargs) -> Result<Self> {
        let options = Self {
            normalize_embeddings: get_bool(kwargs, "normalize_embeddings")?.unwrap_or(false),
            batch_size: get_usize(kwargs, "batch_size")?,
        };
        log_ignored("encode_kwargs", kwargs, &["normalize_embeddings", "batch_size"]);
        Ok(options)
    }
}

fn get_bool(kwargs: &Kwargs, key: &str) -> Result<Option<bool>> {
    match kwargs.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(other) => Err(LocalEmbedderError::invalid_option(
            key,
            format!("expected a boolean, got {other}"),
        )),
    }
}

fn get_usize(kwargs: &Kwargs, key: &str) -> Result<Option<usize>> {
    match kwargs.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| *n > 0)
            .map(Some)
            .ok_or_else(|| {
                LocalEmbedderError::invalid_option(
                    key,
                    format!("expected a positive integer, got {value}"),
                )
            }),
    }
}

fn get_str<'a>(kwargs: &'a Kwargs, key: &str) -> Result<Option<&'a str>> {
    match kwargs.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) if value.is_empty() => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(other) => Err(LocalEmbedderError::invalid_option(
            key,
            format!("expected a string, got {other}"),
        )),
    }
}

fn log_ignored(mapping: &str, kwargs: &Kwargs, known: &[&str]) {
    for key in kwargs.keys().filter(|key| !known.contains(&key.as_str())) {
        debug!(mapping, key = %key, "Option not used by the local runtime");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    fn kwargs(value: Value) -> Kwargs {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_load_defaults() {
        let options = LoadOptions::from_kwargs(&Kwargs::new()).unwrap();
        assert_eq!(options, LoadOptions::default());
    }

    #[test]
    fn test_load_options_read() {
        let options = LoadOptions::from_kwargs(&kwargs(json!({
            "max_length": 256,
            "cache_folder": "/tmp/models",
            "show_download_progress": true,
            "api_key": "secret",
        })))
        .unwrap();

        assert_eq!(
            options,
            LoadOptions {
                max_length: 256,
                cache_dir: Some(PathBuf::from("/tmp/models")),
                show_download_progress: true,
            }
        );
    }

    #[test]
    fn test_explicit_cache_dir_beats_default() {
        let options = LoadOptions::from_kwargs(&kwargs(json!({"cache_dir": "/a"})))
            .unwrap()
            .with_default_cache_dir(Some("/b"));
        assert_eq!(options.cache_dir, Some(PathBuf::from("/a")));

        let options = LoadOptions::default().with_default_cache_dir(Some("/b"));
        assert_eq!(options.cache_dir, Some(PathBuf::from("/b")));
    }

    #[test]
    fn test_encode_options_read() {
        let options = EncodeOptions::from_kwargs(&kwargs(json!({
            "normalize_embeddings": true,
            "batch_size": 8,
            "convert_to_numpy": true,
        })))
        .unwrap();

        assert!(options.normalize_embeddings);
        assert_eq!(options.batch_size, Some(8));
    }

    #[test_case(json!({"normalize_embeddings": "yes"}) ; "non-bool normalize")]
    #[test_case(json!({"batch_size": 0}) ; "zero batch size")]
    #[test_case(json!({"batch_size": -4}) ; "negative batch size")]
    fn test_invalid_encode_options(value: Value) {
        let err = EncodeOptions::from_kwargs(&kwargs(value)).unwrap_err();
        assert!(matches!(err, LocalEmbedderError::InvalidOption { .. }));
    }

    #[test]
    fn test_null_is_absent() {
        let options = EncodeOptions::from_kwargs(&kwargs(json!({"batch_size": null}))).unwrap();
        assert_eq!(options.batch_size, None);
    }
}
