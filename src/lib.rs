use crate::config::Config;
use std::sync::Arc;

use infrastructure::{LinkTokenCodec, UrlSigner};

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub link_tokens: Arc<LinkTokenCodec>,
    pub url_signer: Arc<UrlSigner>,
}

impl AppState {
    /// Build the signers once from the configured secrets.
    pub fn new(config: Config) -> Self {
        let link_tokens = Arc::new(LinkTokenCodec::new(config.link_token_secret.as_bytes()));
        let url_signer = Arc::new(UrlSigner::new(config.url_signing_secret.as_bytes()));
        Self {
            config,
            link_tokens,
            url_signer,
        }
    }
}
