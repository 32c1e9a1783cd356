pub mod secure;
pub mod signed_url;
