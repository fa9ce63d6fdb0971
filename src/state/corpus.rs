use super::AppState;
use crate::loader::{load_corpus, Corpus, LoadError};
use std::sync::Arc;

impl AppState {
    /// Get a streamer's corpus, loading it on first use
    pub async fn get_corpus(&self, streamer: &str) -> Result<Arc<Corpus>, LoadError> {
        if let Some(corpus) = self.corpora.read().await.get(streamer) {
            return Ok(corpus.clone());
        }

        let corpus = Arc::new(load_corpus(self.source.as_ref(), streamer).await?);

        // Another connection may have loaded it meanwhile; keep whichever landed first
        let mut corpora = self.corpora.write().await;
        let corpus = corpora
            .entry(streamer.to_string())
            .or_insert(corpus)
            .clone();
        Ok(corpus)
    }

    /// Names of streamers with a loaded corpus
    pub async fn loaded_streamers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.corpora.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}
