use social_office_app::infrastructure::security::RateLimiter;
use social_office_errors::AppError;
use std::net::IpAddr;
use tower_sessions::Session;
use uuid::Uuid;

const VOTER_KEY: &str = "voter_id";

/// The voter behind this session, minting one on first use.
///
/// Minting is throttled per client address, so clients that drop the
/// session cookie cannot get a fresh voter on every request.
pub async fn current_voter(
    session: &Session,
    new_voters: &RateLimiter<IpAddr>,
    client_ip: IpAddr,
) -> Result<Uuid, AppError> {
    if let Some(id) = known_voter(session).await? {
        return Ok(id);
    }

    if let Err(e) = new_voters.check(client_ip) {
        tracing::warn!(%client_ip, "New voter session refused: {}", e);
        return Err(e.into());
    }

    let id = Uuid::new_v4();
    session
        .insert(VOTER_KEY, id)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
    tracing::debug!(voter_id = %id, %client_ip, "New voter session");
    Ok(id)
}

/// The voter behind this session, if it has one yet.
pub async fn known_voter(session: &Session) -> Result<Option<Uuid>, AppError> {
    session
        .get::<Uuid>(VOTER_KEY)
        .await
        .map_err(|e| AppError::Internal(format!("session read failed: {e}")))
}
