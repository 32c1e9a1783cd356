use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct GenerateUrlQuery {
    pub path: Option<String>,
    /// Minutes.
    pub validity: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlResponse {
    pub signed_url: String,
    pub expiration_time: String,
    pub timezone: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentQuery {
    pub exp: Option<String>,
    pub sig: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub path: String,
    pub expires_at: String,
}
