use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::similarity::{validate_threshold, DEFAULT_SIMILARITY_THRESHOLD};

/// Which embedding backend to use.
#[derive(Debug, Clone, PartialEq)]
pub enum EncoderBackend {
    /// Local ONNX sentence transformer (default) — needs the downloaded model
    Onnx,
    /// Deterministic hash-based vectors — no model files, no semantics;
    /// only exact duplicate texts cluster
    Hashed,
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug)]
pub struct Config {
    /// Directory containing the ONNX model files
    pub model_dir: PathBuf,
    /// Which embedding backend to use (default: Onnx)
    pub encoder_backend: EncoderBackend,
    /// Inner-product similarity threshold for near-duplicate grouping
    pub threshold: f64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; a threshold outside [-1, 1] is a hard error
    /// rather than a silent clamp.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. `load` passes the process environment;
    /// tests pass closures, keeping them free of process-global state.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let encoder_backend = match get("NEWSFOLD_ENCODER").as_deref() {
            Some("hashed") => EncoderBackend::Hashed,
            // "onnx" or unset both default to ONNX
            _ => EncoderBackend::Onnx,
        };

        let model_dir = get("NEWSFOLD_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(crate::encoder::download::default_model_dir);

        let threshold = match get("NEWSFOLD_THRESHOLD") {
            Some(raw) => {
                let t: f64 = raw
                    .parse()
                    .map_err(|_| anyhow::anyhow!("NEWSFOLD_THRESHOLD is not a number: '{raw}'"))?;
                validate_threshold(t)?;
                t
            }
            None => DEFAULT_SIMILARITY_THRESHOLD,
        };

        Ok(Self {
            model_dir,
            encoder_backend,
            threshold,
        })
    }

    /// Check that the chosen encoder backend has what it needs.
    /// For ONNX: model files must exist (or user should run download-model).
    pub fn require_encoder(&self) -> Result<()> {
        match self.encoder_backend {
            EncoderBackend::Onnx => {
                if !crate::encoder::download::embedding_files_present(&self.model_dir) {
                    anyhow::bail!(
                        "Embedding model files not found in {}\n\
                         Run `newsfold download-model` to download them.\n\
                         Or set NEWSFOLD_ENCODER=hashed for a model-free run\n\
                         (only exact duplicate texts will cluster).",
                        self.model_dir.display()
                    );
                }
                Ok(())
            }
            EncoderBackend::Hashed => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.encoder_backend, EncoderBackend::Onnx);
        assert_eq!(config.threshold, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(
            config.model_dir,
            crate::encoder::download::default_model_dir()
        );
    }

    #[test]
    fn hashed_backend_is_selectable() {
        let config = Config::from_lookup(lookup(&[("NEWSFOLD_ENCODER", "hashed")])).unwrap();
        assert_eq!(config.encoder_backend, EncoderBackend::Hashed);
    }

    #[test]
    fn explicit_onnx_and_unknown_values_both_mean_onnx() {
        let onnx = Config::from_lookup(lookup(&[("NEWSFOLD_ENCODER", "onnx")])).unwrap();
        assert_eq!(onnx.encoder_backend, EncoderBackend::Onnx);

        let typo = Config::from_lookup(lookup(&[("NEWSFOLD_ENCODER", "tfidf")])).unwrap();
        assert_eq!(typo.encoder_backend, EncoderBackend::Onnx);
    }

    #[test]
    fn model_dir_override_is_honored() {
        let config =
            Config::from_lookup(lookup(&[("NEWSFOLD_MODEL_DIR", "/opt/models")])).unwrap();
        assert_eq!(config.model_dir, PathBuf::from("/opt/models"));
    }

    #[test]
    fn threshold_override_is_parsed() {
        let config = Config::from_lookup(lookup(&[("NEWSFOLD_THRESHOLD", "0.9")])).unwrap();
        assert_eq!(config.threshold, 0.9);
    }

    #[test]
    fn non_numeric_threshold_is_an_error() {
        let err = Config::from_lookup(lookup(&[("NEWSFOLD_THRESHOLD", "high")])).unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn out_of_range_threshold_is_an_error() {
        let err = Config::from_lookup(lookup(&[("NEWSFOLD_THRESHOLD", "1.5")])).unwrap_err();
        assert!(err.to_string().contains("[-1, 1]"));
    }
}
