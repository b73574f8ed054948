use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::config::MatchingSettings;
use crate::core::{MatchError, Matcher};
use crate::models::{
    ErrorResponse, FindLegacyRequest, HealthResponse, LeadListQuery, LeadListResponse,
    LegacyMatch, LegacyMatchResponse, NewLead, SimilarPlayersRequest, SimilarPlayersResponse,
    ScoredCandidate,
};
use crate::services::{CacheError, CacheKey, CacheManager, CandidateCatalog, CartStore, PostgresClient};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CandidateCatalog>,
    pub matcher: Matcher,
    pub cache: Arc<CacheManager>,
    pub leads: Option<Arc<PostgresClient>>,
    pub carts: Arc<dyn CartStore>,
    pub matching: MatchingSettings,
}

/// Configure all legacy match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/legacy/find", web::post().to(find_legacy))
        .route("/legacy/similar", web::post().to(similar_players))
        .route("/legacy/candidates/{id}", web::get().to(get_candidate))
        .route("/leads", web::get().to(list_leads))
        .route("/leads/by-candidate", web::get().to(leads_by_candidate));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let database = match &state.leads {
        Some(leads) => Some(leads.health_check().await.unwrap_or(false)),
        None => None,
    };

    let status = if state.catalog.is_empty() || database == Some(false) {
        "degraded"
    } else {
        "healthy"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        candidates: state.catalog.len(),
        database,
        timestamp: chrono::Utc::now(),
    })
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(
        "Validation failed",
        errors.to_string(),
        400,
    ))
}

fn match_failed(err: MatchError) -> HttpResponse {
    match err {
        MatchError::EmptyCandidateSet => HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
            "No candidates available",
            err.to_string(),
            503,
        )),
    }
}

/// Find legacy endpoint
///
/// POST /api/v1/legacy/find
///
/// Request body:
/// ```json
/// {
///   "age": 25,
///   "heightCm": 175,
///   "weightKg": 70,
///   "lead": { "name": "string", "email": "string", "phone": "string" }
/// }
/// ```
async fn find_legacy(
    state: web::Data<AppState>,
    req: web::Json<FindLegacyRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_legacy request: {:?}", errors);
        return validation_failed(errors);
    }
    if let Some(Err(errors)) = req.lead.as_ref().map(|lead| lead.validate()) {
        tracing::info!("Validation failed for lead contact: {:?}", errors);
        return validation_failed(errors);
    }

    let query = req.query();
    let normalized = query.normalized();
    let cache_key = CacheKey::legacy(&normalized);

    // Cached entries carry the normalized query; the raw one is restored per request
    let (result, cached) = match state.cache.get::<LegacyMatch>(&cache_key).await {
        Ok(mut hit) => {
            hit.query = query;
            (hit, true)
        }
        Err(e) => {
            if !matches!(e, CacheError::CacheMiss(_)) {
                tracing::warn!("Cache lookup failed for {}, recomputing: {}", cache_key, e);
            }
            let result = match state.matcher.find_legacy(&query, state.catalog.candidates()) {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("Legacy match failed for {:?}: {}", query, e);
                    return match_failed(e);
                }
            };
            if let Err(e) = state.cache.set(&cache_key, &result).await {
                tracing::warn!("Failed to cache legacy match: {}", e);
            }
            (result, false)
        }
    };

    let lead_id = match &req.lead {
        Some(contact) => record_lead(&state, contact, &query, &result.candidate.id).await,
        None => None,
    };

    tracing::info!(
        "Matched {:?} to {} (cached: {})",
        normalized,
        result.candidate.id,
        cached
    );

    HttpResponse::Ok().json(LegacyMatchResponse {
        result,
        lead_id,
        cached,
    })
}

/// Store the lead; failures are logged and never fail the match
async fn record_lead(
    state: &AppState,
    contact: &crate::models::LeadContact,
    query: &crate::models::PhysiqueQuery,
    candidate_id: &str,
) -> Option<uuid::Uuid> {
    let Some(leads) = &state.leads else {
        tracing::debug!("Lead store not configured, skipping lead for {}", contact.email);
        return None;
    };

    let lead = NewLead {
        name: contact.name.clone(),
        email: contact.email.clone(),
        phone: contact.phone.clone(),
        age: query.age,
        height_cm: query.height_cm,
        weight_kg: query.weight_kg,
        candidate_id: candidate_id.to_string(),
    };

    match leads.record_lead(&lead).await {
        Ok(stored) => Some(stored.id),
        Err(e) => {
            tracing::warn!("Legacy matched but lead recording failed: {}", e);
            None
        }
    }
}

/// Similar players endpoint
///
/// POST /api/v1/legacy/similar
async fn similar_players(
    state: web::Data<AppState>,
    req: web::Json<SimilarPlayersRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let query = req.query();
    let limit = req
        .limit
        .unwrap_or(state.matching.default_limit)
        .min(state.matching.max_limit) as usize;
    let cache_key = CacheKey::similar(&query.normalized(), limit);

    let players = match state.cache.get::<Vec<ScoredCandidate>>(&cache_key).await {
        Ok(players) => players,
        Err(e) => {
            if !matches!(e, CacheError::CacheMiss(_)) {
                tracing::warn!("Cache lookup failed for {}, recomputing: {}", cache_key, e);
            }
            let players = match state.matcher.rank(&query, state.catalog.candidates(), limit) {
                Ok(players) => players,
                Err(e) => return match_failed(e),
            };
            if let Err(e) = state.cache.set(&cache_key, &players).await {
                tracing::warn!("Failed to cache similar players: {}", e);
            }
            players
        }
    };

    tracing::debug!("Returning {} similar players for {:?}", players.len(), query);

    HttpResponse::Ok().json(SimilarPlayersResponse {
        players,
        total_candidates: state.catalog.len(),
    })
}

/// Get a single candidate by id
///
/// GET /api/v1/legacy/candidates/{id}
async fn get_candidate(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match state.catalog.get(&id) {
        Some(candidate) => HttpResponse::Ok().json(candidate),
        None => HttpResponse::NotFound().json(ErrorResponse::new(
            "Candidate not found",
            format!("No candidate with id {}", id),
            404,
        )),
    }
}

fn leads_unavailable() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
        "Lead store unavailable",
        "No database is configured for lead capture",
        503,
    ))
}

/// List recently captured leads
///
/// GET /api/v1/leads?limit={limit}
async fn list_leads(
    state: web::Data<AppState>,
    query: web::Query<LeadListQuery>,
) -> impl Responder {
    let Some(leads) = &state.leads else {
        return leads_unavailable();
    };

    let limit = query.limit.clamp(1, 500) as usize;
    match leads.recent_leads(limit).await {
        Ok(leads) => HttpResponse::Ok().json(LeadListResponse {
            count: leads.len(),
            leads,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch leads: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to fetch leads",
                e.to_string(),
                500,
            ))
        }
    }
}

/// Lead counts per matched legend
///
/// GET /api/v1/leads/by-candidate
async fn leads_by_candidate(state: web::Data<AppState>) -> impl Responder {
    let Some(leads) = &state.leads else {
        return leads_unavailable();
    };

    match leads.leads_per_candidate().await {
        Ok(counts) => HttpResponse::Ok().json(counts),
        Err(e) => {
            tracing::error!("Failed to count leads per candidate: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to count leads",
                e.to_string(),
                500,
            ))
        }
    }
}
