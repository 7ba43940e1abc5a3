use crate::models::Candidate;
use std::sync::Arc;
use std::time::Duration;

const ALL_CANDIDATES: &str = "candidates:all";

/// In-memory TTL cache for repository reads
///
/// Holds whole candidate snapshots so one upstream read serves many requests.
#[derive(Clone)]
pub struct CandidateCache {
    inner: moka::future::Cache<String, Arc<Vec<Candidate>>>,
    ttl_secs: u64,
}

impl CandidateCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let inner = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, ttl_secs }
    }

    pub async fn get_all(&self) -> Option<Arc<Vec<Candidate>>> {
        let hit = self.inner.get(ALL_CANDIDATES).await;
        if hit.is_some() {
            tracing::trace!("Cache hit: {}", ALL_CANDIDATES);
        }
        hit
    }

    pub async fn set_all(&self, candidates: Arc<Vec<Candidate>>) {
        self.inner.insert(ALL_CANDIDATES.to_string(), candidates).await;
        tracing::trace!("Cache set: {} (ttl {}s)", ALL_CANDIDATES, self.ttl_secs);
    }
}
