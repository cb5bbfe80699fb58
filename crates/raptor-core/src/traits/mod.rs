mod embedding;
mod summarizer;

pub use embedding::IEmbeddingProvider;
pub use summarizer::ISummarizer;
