//! Clustering and summarization algorithms: k-means, cluster quality
//! metrics, TextRank, TF-IDF key phrases, sentence splitting.

pub mod kmeans;
pub mod quality;
pub mod sentence_splitter;
pub mod textrank;
pub mod tfidf;
