//! ONNX Runtime sentence-embedding provider.
//!
//! Loads a sentence-transformer export (e.g. all-MiniLM-L6-v2) via `ort`
//! and its `tokenizer.json` via `tokenizers`. Output token vectors are
//! mean-pooled over the attention mask and L2-normalized.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

use raptor_core::errors::{EmbeddingError, RaptorResult};
use raptor_core::traits::IEmbeddingProvider;

/// Longest token sequence fed to the model.
const MAX_SEQUENCE_TOKENS: usize = 256;

pub struct OnnxProvider {
    /// `Session::run` needs `&mut self`.
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    dimensions: usize,
    model_id: String,
}

impl OnnxProvider {
    /// Load model and tokenizer. Any failure is fatal for the caller.
    pub fn load(
        model_path: &str,
        tokenizer_path: &str,
        model_id: &str,
        dimensions: usize,
    ) -> RaptorResult<Self> {
        let load_failed = |path: &str, reason: String| EmbeddingError::ModelLoadFailed {
            path: path.to_string(),
            reason,
        };

        if !Path::new(model_path).exists() {
            return Err(load_failed(model_path, "model file not found".into()).into());
        }

        let session = Session::builder()
            .map_err(|e| load_failed(model_path, e.to_string()))?
            .with_intra_threads(2)
            .map_err(|e| load_failed(model_path, e.to_string()))?
            .commit_from_file(model_path)
            .map_err(|e| load_failed(model_path, e.to_string()))?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| load_failed(tokenizer_path, e.to_string()))?;

        debug!(model = %model_id, dims = dimensions, "ONNX model loaded");

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            dimensions,
            model_id: model_id.to_string(),
        })
    }

    fn infer(&self, text: &str) -> RaptorResult<Vec<f32>> {
        let inference_failed = |reason: String| EmbeddingError::InferenceFailed { reason };

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| inference_failed(format!("tokenization failed: {e}")))?;

        let seq_len = encoding.get_ids().len().min(MAX_SEQUENCE_TOKENS);
        let to_i64 = |xs: &[u32]| -> Vec<i64> { xs[..seq_len].iter().map(|&x| x as i64).collect() };
        let input_ids = to_i64(encoding.get_ids());
        let attention_mask = to_i64(encoding.get_attention_mask());
        let type_ids = to_i64(encoding.get_type_ids());
        let shape = vec![1i64, seq_len as i64];

        let ids_tensor = Tensor::from_array((shape.clone(), input_ids))
            .map_err(|e| inference_failed(format!("tensor creation error: {e}")))?;
        let mask_tensor = Tensor::from_array((shape.clone(), attention_mask.clone()))
            .map_err(|e| inference_failed(format!("tensor creation error: {e}")))?;
        let type_tensor = Tensor::from_array((shape, type_ids))
            .map_err(|e| inference_failed(format!("tensor creation error: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| inference_failed(format!("session lock poisoned: {e}")))?;

        let outputs = session
            .run(ort::inputs![ids_tensor, mask_tensor, type_tensor])
            .map_err(|e| inference_failed(e.to_string()))?;

        let (_name, output) = outputs
            .iter()
            .next()
            .ok_or_else(|| inference_failed("no output tensor".into()))?;

        let (out_shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| inference_failed(format!("tensor extraction failed: {e}")))?;

        let mut pooled = match out_shape.len() {
            // [batch=1, seq, dims]
            3 => {
                let seq = out_shape[1] as usize;
                let dims = out_shape[2] as usize;
                let mut pooled = vec![0.0f32; dims];
                let mut weight = 0.0f32;
                for s in 0..seq.min(attention_mask.len()) {
                    if attention_mask[s] == 0 {
                        continue;
                    }
                    weight += 1.0;
                    for d in 0..dims {
                        pooled[d] += data[s * dims + d];
                    }
                }
                if weight > 0.0 {
                    for v in &mut pooled {
                        *v /= weight;
                    }
                }
                pooled
            }
            // [batch=1, dims], already pooled.
            2 => data[..out_shape[1] as usize].to_vec(),
            _ => {
                return Err(inference_failed(format!(
                    "unexpected output shape: {out_shape:?}"
                ))
                .into())
            }
        };

        let norm: f32 = pooled.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut pooled {
                *v /= norm;
            }
        }

        if pooled.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: pooled.len(),
            }
            .into());
        }
        Ok(pooled)
    }
}

impl IEmbeddingProvider for OnnxProvider {
    fn embed(&self, text: &str) -> RaptorResult<Vec<f32>> {
        self.infer(text)
    }

    fn embed_batch(&self, texts: &[String]) -> RaptorResult<Vec<Vec<f32>>> {
        // The session is behind a mutex; batching gives no parallelism here.
        texts.iter().map(|t| self.infer(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model_id
    }

    fn is_available(&self) -> bool {
        true
    }
}
