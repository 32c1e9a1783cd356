mod handler;
mod model;

pub use handler::{content, generate_url};
pub use model::{ContentQuery, ContentResponse, GenerateUrlQuery, SignedUrlResponse};
