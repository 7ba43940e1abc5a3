use crate::models::Candidate;
use crate::services::{CandidateCache, SnapshotError, SupabaseClient, SupabaseError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Supabase(#[from] SupabaseError),
}

/// Read-only source of candidate suppliers
///
/// Each call hands back an immutable snapshot; the engine never mutates it.
#[derive(Clone)]
pub enum CandidateRepository {
    Snapshot(Arc<Vec<Candidate>>),
    Supabase {
        client: Arc<SupabaseClient>,
        cache: CandidateCache,
    },
}

impl CandidateRepository {
    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        CandidateRepository::Snapshot(Arc::new(candidates))
    }

    pub fn source_name(&self) -> &'static str {
        match self {
            CandidateRepository::Snapshot(_) => "snapshot",
            CandidateRepository::Supabase { .. } => "supabase",
        }
    }

    pub async fn get_all_candidates(&self) -> Result<Arc<Vec<Candidate>>, RepositoryError> {
        match self {
            CandidateRepository::Snapshot(candidates) => Ok(Arc::clone(candidates)),
            CandidateRepository::Supabase { client, cache } => {
                if let Some(cached) = cache.get_all().await {
                    return Ok(cached);
                }

                let candidates = Arc::new(client.get_all_candidates().await?);
                cache.set_all(Arc::clone(&candidates)).await;
                Ok(candidates)
            }
        }
    }
}
