mod handler;
mod model;

pub use handler::{generate, verify};
pub use model::{GenerateTokenRequest, GenerateTokenResponse, VerifyTokenRequest, VerifyTokenResponse};
