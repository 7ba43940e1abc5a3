use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{CandidatesResponse, ErrorResponse, HealthResponse, RecommendTeamRequest, RecommendTeamResponse};
use crate::services::CandidateRepository;
use crate::core::{source_for, FormationError, TeamMatcher};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: CandidateRepository,
    pub matcher: Arc<TeamMatcher>,
}

/// Configure all team-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/candidates", web::get().to(list_candidates))
        .route("/teams/recommend", web::post().to(recommend_team));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        candidate_source: state.repository.source_name().to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// List candidates
///
/// GET /api/v1/candidates
async fn list_candidates(state: web::Data<AppState>) -> impl Responder {
    match state.repository.get_all_candidates().await {
        Ok(candidates) => {
            let candidates = candidates.as_ref().clone();
            HttpResponse::Ok().json(CandidatesResponse {
                total: candidates.len(),
                candidates,
            })
        }
        Err(e) => {
            tracing::error!("Failed to fetch candidates: {}", e);
            repository_unavailable(e.to_string())
        }
    }
}

/// Recommend a team endpoint
///
/// POST /api/v1/teams/recommend
///
/// Request body:
/// ```json
/// {
///   "location": "Kibera, Nairobi",
///   "capacity_needed": 10,
///   "budget": 50000,
///   "skills_required": ["Egg Supply", "Logistics"],
///   "seed": 42,
///   "excluded_pairs": [["user_001", "user_004"]]
/// }
/// ```
async fn recommend_team(
    state: web::Data<AppState>,
    req: web::Json<RecommendTeamRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommend_team request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        "Recommending team {} for {} at {} (capacity {}, budget {})",
        request_id,
        req.title.as_deref().unwrap_or("untitled project"),
        req.location,
        req.capacity_needed,
        req.budget
    );

    let candidates = match state.repository.get_all_candidates().await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to fetch candidates for {}: {}", request_id, e);
            return repository_unavailable(e.to_string());
        }
    };

    let requirement = req.requirement();
    let conflicts = req.conflicts();
    let mut rng = source_for(req.seed);

    match state.matcher.recommend(&requirement, &candidates, &conflicts, &mut rng) {
        Ok(recommendation) => {
            tracing::info!(
                "Recommended {} members for {} ({} of {} units/day, strategy {:?})",
                recommendation.recommended_team.len(),
                request_id,
                recommendation.total_capacity,
                recommendation.capacity_needed,
                recommendation.strategy
            );

            HttpResponse::Ok().json(RecommendTeamResponse {
                success: true,
                recommendation,
                request_id,
                timestamp: chrono::Utc::now(),
            })
        }
        Err(e @ FormationError::InvalidRequest(_)) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid request".to_string(),
            message: e.to_string(),
            status_code: 400,
        }),
        Err(e @ FormationError::NoCandidatesAvailable) => {
            tracing::info!("No candidates for {}: {:?}", request_id, req.skills_required);
            HttpResponse::NotFound().json(ErrorResponse {
                error: "No candidates available".to_string(),
                message: e.to_string(),
                status_code: 404,
            })
        }
    }
}

fn repository_unavailable(message: String) -> HttpResponse {
    HttpResponse::BadGateway().json(ErrorResponse {
        error: "Candidate repository unavailable".to_string(),
        message,
        status_code: 502,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Candidate, Specialization};
    use crate::services::{CandidateCache, SupabaseClient};
    use actix_web::{http::StatusCode, test, App};

    fn candidate(id: &str, location: &str, capacity: u32, specialization: Specialization, skills: &[&str]) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: format!("Supplier {}", id),
            location: location.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            capacity_numeric: capacity,
            reputation_score: 8.5,
            projects_completed: 7,
            specialization,
            total_earnings: 0.0,
        }
    }

    fn state() -> AppState {
        AppState {
            repository: CandidateRepository::from_candidates(vec![
                candidate("a", "Kibera", 6, Specialization::EggSupply, &["Egg Supply"]),
                candidate("b", "Westlands", 5, Specialization::EggSupply, &["Egg Supply"]),
                candidate("c", "Kibera", 9, Specialization::Logistics, &["Logistics"]),
            ]),
            matcher: Arc::new(TeamMatcher::default()),
        }
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .configure(crate::routes::configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = app!(state());
        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.status, "healthy");
        assert_eq!(body.candidate_source, "snapshot");
    }

    #[actix_web::test]
    async fn test_list_candidates() {
        let app = app!(state());
        let req = test::TestRequest::get().uri("/api/v1/candidates").to_request();
        let body: CandidatesResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.total, 3);
    }

    #[actix_web::test]
    async fn test_recommend_team() {
        let app = app!(state());
        let req = test::TestRequest::post()
            .uri("/api/v1/teams/recommend")
            .set_json(serde_json::json!({
                "title": "Egg Supply for 10 Schools",
                "location": "Kibera, Nairobi",
                "capacity_needed": 10,
                "budget": 30000,
                "seed": 7
            }))
            .to_request();
        let body: RecommendTeamResponse = test::call_and_read_body_json(&app, req).await;

        assert!(body.success);
        assert!(body.recommendation.total_capacity >= 10);
        let total: i64 = body.recommendation.estimated_cost.iter().map(|c| c.share).sum();
        assert_eq!(total, 30000);
    }

    #[actix_web::test]
    async fn test_recommend_rejects_zero_capacity() {
        let app = app!(state());
        let req = test::TestRequest::post()
            .uri("/api/v1/teams/recommend")
            .set_json(serde_json::json!({
                "location": "Kibera",
                "capacity_needed": 0,
                "budget": 100
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_recommend_unmatched_skills() {
        let app = app!(state());
        let req = test::TestRequest::post()
            .uri("/api/v1/teams/recommend")
            .set_json(serde_json::json!({
                "location": "Kibera",
                "capacity_needed": 5,
                "budget": 100,
                "skills_required": ["Welding"]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_repository_failure_maps_to_bad_gateway() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/users?select=*")
            .with_status(503)
            .create_async()
            .await;

        let client = SupabaseClient::new(server.url(), "key".to_string(), "users".to_string(), 5).unwrap();
        let state = AppState {
            repository: CandidateRepository::Supabase {
                client: Arc::new(client),
                cache: CandidateCache::new(4, 60),
            },
            matcher: Arc::new(TeamMatcher::default()),
        };

        let app = app!(state);
        let req = test::TestRequest::get().uri("/api/v1/candidates").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
