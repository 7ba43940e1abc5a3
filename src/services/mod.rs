// Service exports
pub mod cache;
pub mod repository;
pub mod snapshot;
pub mod supabase;

pub use cache::CandidateCache;
pub use repository::{CandidateRepository, RepositoryError};
pub use snapshot::{load_candidates_file, SnapshotError};
pub use supabase::{SupabaseClient, SupabaseError};
