// Vector index - stores chunk embeddings and returns the closest chunks for a query

use async_trait::async_trait;

use crate::llm_client::ProviderError;

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Add `texts` with their vectors. Both slices must line up one to one.
    async fn index(&mut self, texts: Vec<String>, vectors: Vec<Vec<f32>>) -> Result<(), ProviderError>;

    /// Most relevant texts first
    async fn retrieve(&self, query: &[f32], k: usize) -> Result<Vec<String>, ProviderError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

/// Brute-force cosine similarity over everything in memory
#[derive(Debug, Default)]
pub struct MemoryIndex {
    texts: Vec<String>,
    vectors: Vec<Vec<f32>>,
    dim: Option<usize>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scored search, highest score first. Ties keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, ProviderError> {
        if let Some(dim) = self.dim {
            if query.len() != dim {
                return Err(ProviderError::Index(format!(
                    "query has {} dimensions, index has {}",
                    query.len(),
                    dim
                )));
            }
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(query, v)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        Ok(scored)
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn index(&mut self, texts: Vec<String>, vectors: Vec<Vec<f32>>) -> Result<(), ProviderError> {
        if texts.len() != vectors.len() {
            return Err(ProviderError::Index(format!(
                "{} texts but {} vectors",
                texts.len(),
                vectors.len()
            )));
        }

        let mut dim = self.dim;
        for v in &vectors {
            match dim {
                Some(d) if d != v.len() => {
                    return Err(ProviderError::Index(format!(
                        "vector has {} dimensions, expected {}",
                        v.len(),
                        d
                    )))
                }
                Some(_) => {}
                None => dim = Some(v.len()),
            }
        }

        self.dim = dim;
        self.texts.extend(texts);
        self.vectors.extend(vectors);
        Ok(())
    }

    async fn retrieve(&self, query: &[f32], k: usize) -> Result<Vec<String>, ProviderError> {
        Ok(self
            .search(query, k)?
            .into_iter()
            .map(|(i, _)| self.texts[i].clone())
            .collect())
    }

    fn len(&self) -> usize {
        self.texts.len()
    }

    fn clear(&mut self) {
        self.texts.clear();
        self.vectors.clear();
        self.dim = None;
    }
}

/// Cosine similarity, 0.0 when either side has zero length
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cosine() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_retrieve_orders_by_similarity() {
        let mut index = MemoryIndex::new();
        index
            .index(
                texts(&["db timeout", "login failed", "disk full"]),
                vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.1], vec![0.0, 0.2, 1.0]],
            )
            .await
            .unwrap();

        let hits = index.retrieve(&[0.0, 1.0, 0.0], 2).await.unwrap();
        assert_eq!(hits, vec!["login failed", "disk full"]);
        assert_eq!(index.len(), 3);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let mut index = MemoryIndex::new();
        index
            .index(texts(&["first", "second"]), vec![vec![1.0, 1.0], vec![1.0, 1.0]])
            .await
            .unwrap();

        assert_eq!(index.retrieve(&[1.0, 1.0], 5).await.unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_rejects_mismatches() {
        let mut index = MemoryIndex::new();
        assert!(index.index(texts(&["a"]), vec![]).await.is_err());
        assert!(index
            .index(texts(&["a", "b"]), vec![vec![1.0, 0.0], vec![1.0]])
            .await
            .is_err());

        index.index(texts(&["a"]), vec![vec![1.0, 0.0]]).await.unwrap();
        assert!(index.retrieve(&[1.0, 0.0, 0.0], 1).await.is_err());
    }

    #[tokio::test]
    async fn test_clear_and_empty() {
        let mut index = MemoryIndex::new();
        assert!(index.retrieve(&[1.0], 3).await.unwrap().is_empty());

        index.index(texts(&["a"]), vec![vec![1.0]]).await.unwrap();
        assert!(!index.is_empty());

        index.clear();
        assert!(index.is_empty());
        index.index(texts(&["b"]), vec![vec![1.0, 2.0]]).await.unwrap();
        assert_eq!(index.len(), 1);
    }
}
