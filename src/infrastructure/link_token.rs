//! Compact signed link tokens.
//!
//! A token binds two short identifiers to an expiry so that an emailed link
//! can be checked without a database lookup:
//!
//! ```text
//! payload = expires_at (u32, big-endian) || primary || 0x00 || secondary
//! token   = base64url(payload) "." first 16 chars of HS256(secret, base64url(payload))
//! ```
//!
//! Verification is stateless. Expiry is the only lifetime bound, and rotating
//! the secret invalidates every outstanding token.

use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use jsonwebtoken::{Algorithm, EncodingKey, crypto};
use subtle::ConstantTimeEq;

/// Number of signature characters kept in a token.
///
/// 16 base64url characters carry 96 bits of the HMAC. Tokens are short-lived
/// and only unlock read actions, so this is the forgery margin we accept for
/// shorter URLs.
pub const SHORT_SIGNATURE_LEN: usize = 16;

const EXPIRY_LEN: usize = 4;
const SEPARATOR: char = '.';
const SUBJECT_DELIMITER: u8 = 0;

/// Unpadded on encode, accepts either form on decode.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Identifiers recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkClaims {
    /// First subject (an organization id in practice).
    pub primary: String,
    /// Second subject (a week string in practice).
    pub secondary: String,
    /// Seconds since the Unix epoch.
    pub expires_at: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    MalformedToken,
    #[error("token has expired")]
    Expired,
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("primary subject must not contain a NUL byte")]
    SubjectContainsNul,
    #[error("expiry {0} does not fit in a 32-bit timestamp")]
    ExpiryOutOfRange(u64),
    #[error("failed to compute signature: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl TokenError {
    /// True for the failures a link holder can cause; these are reported to
    /// the client as a single "invalid or expired" outcome.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TokenError::MalformedToken | TokenError::Expired | TokenError::InvalidSignature
        )
    }
}

/// Issues and verifies [`LinkClaims`] tokens with one symmetric secret.
#[derive(Clone)]
pub struct LinkTokenCodec {
    key: EncodingKey,
}

impl std::fmt::Debug for LinkTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkTokenCodec").finish_non_exhaustive()
    }
}

impl LinkTokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
        }
    }

    /// Issue a token valid for `validity_secs` from the current time.
    pub fn encode(
        &self,
        primary: &str,
        secondary: &str,
        validity_secs: u64,
    ) -> Result<String, TokenError> {
        self.encode_at(primary, secondary, validity_secs, unix_now())
    }

    /// Issue a token valid for `validity_secs` from `now`.
    pub fn encode_at(
        &self,
        primary: &str,
        secondary: &str,
        validity_secs: u64,
        now: u64,
    ) -> Result<String, TokenError> {
        if primary.as_bytes().contains(&SUBJECT_DELIMITER) {
            return Err(TokenError::SubjectContainsNul);
        }

        let expires_at = now.saturating_add(validity_secs);
        let expires_at =
            u32::try_from(expires_at).map_err(|_| TokenError::ExpiryOutOfRange(expires_at))?;

        let mut payload =
            Vec::with_capacity(EXPIRY_LEN + primary.len() + 1 + secondary.len());
        payload.extend_from_slice(&expires_at.to_be_bytes());
        payload.extend_from_slice(primary.as_bytes());
        payload.push(SUBJECT_DELIMITER);
        payload.extend_from_slice(secondary.as_bytes());

        let payload_b64 = PAYLOAD_ENGINE.encode(&payload);
        let signature = self.short_signature(&payload_b64)?;

        Ok(format!("{payload_b64}{SEPARATOR}{signature}"))
    }

    /// Verify a token against the current time.
    pub fn decode(&self, token: &str) -> Result<LinkClaims, TokenError> {
        self.decode_at(token, unix_now())
    }

    /// Verify a token as of `now`.
    ///
    /// The signature is checked before the expiry, so a tampered token fails
    /// with [`TokenError::MalformedToken`] or [`TokenError::InvalidSignature`]
    /// and never reports anything about its embedded expiry.
    pub fn decode_at(&self, token: &str, now: u64) -> Result<LinkClaims, TokenError> {
        let (payload_b64, signature) = token
            .split_once(SEPARATOR)
            .ok_or(TokenError::MalformedToken)?;

        let payload = PAYLOAD_ENGINE
            .decode(payload_b64)
            .map_err(|_| TokenError::MalformedToken)?;
        let claims = parse_payload(&payload)?;

        let expected = self.short_signature(payload_b64)?;
        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            return Err(TokenError::InvalidSignature);
        }

        if u64::from(claims.expires_at) < now {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn short_signature(&self, payload_b64: &str) -> Result<String, TokenError> {
        let mut signature = crypto::sign(payload_b64.as_bytes(), &self.key, Algorithm::HS256)?;
        // base64url output is ASCII, so any byte index is a char boundary
        signature.truncate(SHORT_SIGNATURE_LEN);
        Ok(signature)
    }
}

fn parse_payload(payload: &[u8]) -> Result<LinkClaims, TokenError> {
    if payload.len() < EXPIRY_LEN {
        return Err(TokenError::MalformedToken);
    }
    let (expiry, subjects) = payload.split_at(EXPIRY_LEN);
    let expires_at = u32::from_be_bytes([expiry[0], expiry[1], expiry[2], expiry[3]]);

    let delimiter = subjects
        .iter()
        .position(|b| *b == SUBJECT_DELIMITER)
        .ok_or(TokenError::MalformedToken)?;
    let primary = std::str::from_utf8(&subjects[..delimiter])
        .map_err(|_| TokenError::MalformedToken)?;
    let secondary = std::str::from_utf8(&subjects[delimiter + 1..])
        .map_err(|_| TokenError::MalformedToken)?;

    Ok(LinkClaims {
        primary: primary.to_owned(),
        secondary: secondary.to_owned(),
        expires_at,
    })
}

pub(crate) fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}
