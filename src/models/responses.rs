use serde::{Deserialize, Serialize};
use crate::models::domain::{Candidate, TeamRecommendation};

/// Response for the team recommendation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendTeamResponse {
    pub success: bool,
    pub recommendation: TeamRecommendation,
    pub request_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Candidate listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatesResponse {
    pub candidates: Vec<Candidate>,
    pub total: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub candidate_source: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
