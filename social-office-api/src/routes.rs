use crate::client_ip::ClientIp;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::voter::{current_voter, known_voter};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use social_office_app::domain::{
    ItemQuery, ItemStatus, ItemView, NewItem, VotableItem, VoteDirection, VoteResult,
};
use social_office_app::{AppConfig, AppContext};
use social_office_errors::AppError;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};
use uuid::Uuid;

#[derive(Deserialize)]
struct VoteRequest {
    direction: VoteDirection,
}

#[derive(Deserialize)]
struct StatusRequest {
    status: ItemStatus,
}

pub fn router(ctx: AppContext, config: &AppConfig) -> Router {
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(
            config.session_idle_hours_clamped(),
        )));

    Router::new()
        .route("/health", get(health))
        .route("/api/me", get(me))
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/{id}", get(get_item).delete(delete_item))
        .route("/api/items/{id}/vote", post(toggle_vote))
        .route("/api/items/{id}/status", put(set_status))
        .layer(sessions)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health() -> &'static str {
    "ok"
}

async fn me(
    State(ctx): State<AppContext>,
    ClientIp(client_ip): ClientIp,
    session: Session,
) -> Result<Json<serde_json::Value>, AppError> {
    let voter_id = current_voter(&session, &ctx.new_voter_limiter, client_ip).await?;
    Ok(Json(serde_json::json!({ "voter_id": voter_id })))
}

async fn list_items(
    State(ctx): State<AppContext>,
    session: Session,
    AppQuery(query): AppQuery<ItemQuery>,
) -> Result<Json<Vec<ItemView>>, AppError> {
    let voter_id = known_voter(&session).await?;
    Ok(Json(ctx.votes.list(voter_id, &query).await?))
}

async fn create_item(
    State(ctx): State<AppContext>,
    AppJson(submission): AppJson<NewItem>,
) -> Result<impl IntoResponse, AppError> {
    let item: VotableItem = ctx.votes.submit(submission).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_item(
    State(ctx): State<AppContext>,
    session: Session,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ItemView>, AppError> {
    let voter_id = known_voter(&session).await?;
    Ok(Json(ctx.votes.get(voter_id, id).await?))
}

async fn delete_item(
    State(ctx): State<AppContext>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    ctx.votes.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_vote(
    State(ctx): State<AppContext>,
    ClientIp(client_ip): ClientIp,
    session: Session,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<VoteRequest>,
) -> Result<Json<VoteResult>, AppError> {
    let voter_id = current_voter(&session, &ctx.new_voter_limiter, client_ip).await?;

    if let Err(e) = ctx.rate_limiter.check(voter_id) {
        tracing::warn!(%voter_id, "Vote rate limited: {}", e);
        return Err(e.into());
    }

    Ok(Json(ctx.votes.toggle(voter_id, id, request.direction).await?))
}

async fn set_status(
    State(ctx): State<AppContext>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<StatusRequest>,
) -> Result<Json<VotableItem>, AppError> {
    Ok(Json(ctx.votes.set_status(id, request.status).await?))
}
