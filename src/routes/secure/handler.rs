use axum::extract::{Json, State};
use chrono::{DateTime, Utc};

use crate::{
    AppState,
    error::AppError,
    infrastructure::link_token::unix_now,
    utils::{ApiResponse, success_to_api_response, week::current_week_string},
};

use super::model::{
    GenerateTokenRequest, GenerateTokenResponse, VerifyTokenRequest, VerifyTokenResponse,
};

/// Issue a link token for an organization and week.
#[axum::debug_handler]
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateTokenRequest>,
) -> Result<Json<ApiResponse<GenerateTokenResponse>>, AppError> {
    let organization_id = req
        .organization_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("Missing required field: organizationId".into()))?;
    if organization_id.contains('\0') {
        return Err(AppError::Validation(
            "organizationId must not contain NUL characters".into(),
        ));
    }

    let week_string = match req.week_string.filter(|week| !week.is_empty()) {
        Some(week) => week,
        None => current_week_string(
            Utc::now(),
            state.config.timezone(),
            req.week_offset.unwrap_or(0),
        )
        .ok_or_else(|| AppError::Validation("weekOffset is out of range".into()))?,
    };

    let max_validity = state.config.link_token_validity().as_secs();
    let validity = req.validity_seconds.unwrap_or(max_validity);
    if validity > max_validity {
        return Err(AppError::Validation(format!(
            "validitySeconds must not exceed {max_validity}"
        )));
    }

    let now = unix_now();
    let token = state
        .link_tokens
        .encode_at(&organization_id, &week_string, validity, now)?;
    tracing::info!(
        "Issued link token for organization {} week {}",
        organization_id,
        week_string
    );

    Ok(success_to_api_response(GenerateTokenResponse {
        token,
        expires_at: rfc3339(now.saturating_add(validity))?,
    }))
}

/// Check a link token and return the identifiers it carries.
#[axum::debug_handler]
pub async fn verify(
    State(state): State<AppState>,
    Json(req): Json<VerifyTokenRequest>,
) -> Result<Json<ApiResponse<VerifyTokenResponse>>, AppError> {
    let token = req
        .token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Validation("Missing token".into()))?;

    let claims = state.link_tokens.decode(&token)?;
    tracing::debug!(
        "Verified link token for organization {} week {}",
        claims.primary,
        claims.secondary
    );

    Ok(success_to_api_response(VerifyTokenResponse {
        exp: rfc3339(u64::from(claims.expires_at))?,
        organization_id: claims.primary,
        week_string: claims.secondary,
    }))
}

fn rfc3339(unix_secs: u64) -> Result<String, AppError> {
    i64::try_from(unix_secs)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|at| at.to_rfc3339())
        .ok_or(AppError::Internal)
}
