use axum::{
    extract::{Json, Path, Query, State},
    http::{HeaderMap, header},
};
use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    AppState,
    error::AppError,
    utils::{ApiResponse, success_to_api_response},
};

use super::model::{ContentQuery, ContentResponse, GenerateUrlQuery, SignedUrlResponse};

#[axum::debug_handler]
pub async fn generate_url(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<GenerateUrlQuery>,
) -> Result<Json<ApiResponse<SignedUrlResponse>>, AppError> {
    let path = query
        .path
        .filter(|path| !path.is_empty())
        .ok_or_else(|| AppError::Validation("Missing required parameter: path".into()))?;
    if !is_link_path(&path) {
        return Err(AppError::Validation(
            "path must start with '/' and use only letters, digits, '-', '.', '_', '~' and '/'"
                .into(),
        ));
    }

    let minutes = match query.validity {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| AppError::Validation("validity must be a number of minutes".into()))?,
        None => state.config.signed_url_validity_mins,
    };

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .filter(|host| !host.is_empty())
        .ok_or_else(|| AppError::Validation("Missing Host header".into()))?;

    let expires_at = i64::try_from(minutes)
        .ok()
        .and_then(TimeDelta::try_minutes)
        .and_then(|validity| Utc::now().checked_add_signed(validity))
        .ok_or_else(|| AppError::Validation("validity is out of range".into()))?;

    let signature = state.url_signer.sign(&path, expires_at.timestamp())?;
    let signed_url = format!(
        "https://{}{}/content{}?exp={}&sig={}",
        host,
        state.config.api_base_uri,
        path,
        expires_at.timestamp(),
        signature
    );
    tracing::info!("Generated signed URL for {} valid {} minutes", path, minutes);

    let tz = state.config.timezone();
    Ok(success_to_api_response(SignedUrlResponse {
        signed_url,
        expiration_time: expires_at.with_timezone(&tz).to_rfc3339(),
        timezone: tz.to_string(),
    }))
}

/// Serve a path only when its `exp`/`sig` query parameters check out.
#[axum::debug_handler]
pub async fn content(
    State(state): State<AppState>,
    Path(rest): Path<String>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<ApiResponse<ContentResponse>>, AppError> {
    let (Some(exp), Some(sig)) = (query.exp, query.sig) else {
        return Err(AppError::Validation("Missing required parameters".into()));
    };

    let path = format!("/{rest}");
    let expires_at = state
        .url_signer
        .verify(&path, &exp, &sig, Utc::now().timestamp())?;

    let expires_at = DateTime::<Utc>::from_timestamp(expires_at, 0)
        .ok_or(AppError::Internal)?
        .with_timezone(&state.config.timezone());

    Ok(success_to_api_response(ContentResponse {
        path,
        expires_at: expires_at.to_rfc3339(),
    }))
}

/// Paths made only of unreserved characters read the same before and after
/// percent-decoding, so the signed text is exactly what `content` rebuilds.
fn is_link_path(path: &str) -> bool {
    path.starts_with('/')
        && path
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~' | b'/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_path_alphabet() {
        assert!(is_link_path("/reports/acme/2024-W43"));
        assert!(is_link_path("/a.b_c~d"));
        assert!(!is_link_path("relative"));
        assert!(!is_link_path("/a%41"));
        assert!(!is_link_path("/a b"));
        assert!(!is_link_path("/a?b"));
        assert!(!is_link_path("/caf\u{e9}"));
    }
}
