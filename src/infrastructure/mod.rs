pub mod link_token;
pub mod signed_url;

pub use link_token::{LinkClaims, LinkTokenCodec, SHORT_SIGNATURE_LEN, TokenError};
pub use signed_url::{SignedUrlError, UrlSigner};
