mod hashed_tfidf;
#[cfg(feature = "onnx")]
mod onnx_provider;

pub use hashed_tfidf::HashedTfIdfProvider;
#[cfg(feature = "onnx")]
pub use onnx_provider::OnnxProvider;

use raptor_core::config::EmbeddingConfig;
use raptor_core::errors::{EmbeddingError, RaptorResult};
use raptor_core::traits::IEmbeddingProvider;

/// Build the provider named in `config`. There is no silent fallback: an
/// unknown name or an unloadable model is an error.
pub fn create_provider(config: &EmbeddingConfig) -> RaptorResult<Box<dyn IEmbeddingProvider>> {
    match config.provider.as_str() {
        "hashed-tfidf" | "tfidf" => Ok(Box::new(HashedTfIdfProvider::new(config.dimensions))),
        "onnx" => load_onnx(config),
        other => Err(EmbeddingError::UnknownProvider {
            name: other.to_string(),
        }
        .into()),
    }
}

#[cfg(feature = "onnx")]
fn load_onnx(config: &EmbeddingConfig) -> RaptorResult<Box<dyn IEmbeddingProvider>> {
    let model_path = config.model_path.as_deref().unwrap_or_default();
    let tokenizer_path = config.tokenizer_path.as_deref().unwrap_or_default();
    let provider = OnnxProvider::load(
        model_path,
        tokenizer_path,
        &config.model_id,
        config.dimensions,
    )?;
    Ok(Box::new(provider))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(config: &EmbeddingConfig) -> RaptorResult<Box<dyn IEmbeddingProvider>> {
    Err(EmbeddingError::ModelLoadFailed {
        path: config.model_path.clone().unwrap_or_default(),
        reason: "built without the `onnx` feature".to_string(),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_is_rejected() {
        let config = EmbeddingConfig {
            provider: "word2vec".into(),
            ..Default::default()
        };
        let err = create_provider(&config).err().expect("should fail");
        assert!(err.to_string().contains("word2vec"));
    }

    #[test]
    fn hashed_provider_uses_configured_dimensions() {
        let config = EmbeddingConfig {
            dimensions: 64,
            ..Default::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.dimensions(), 64);
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn onnx_without_feature_fails_to_load() {
        let config = EmbeddingConfig {
            provider: "onnx".into(),
            ..Default::default()
        };
        assert!(create_provider(&config).is_err());
    }
}
