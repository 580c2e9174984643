//! REST API module.
//!
//! Contains the suggestion routes and the shared response plumbing.

mod suggestions;

pub use suggestions::*;

use axum::{
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::store::StoreSource;

/// Response header naming the provider that served the request. Kept out of
/// the body so a fallback-served body is identical to the fallback's own
/// output.
pub const STORE_SOURCE_HEADER: &str = "x-store-source";

/// Body for mutation acknowledgements.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessBody {
    pub success: bool,
}

impl SuccessBody {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Serialize `value` as JSON and tag the response with the serving provider.
pub fn with_source<T: Serialize>(value: T, source: StoreSource) -> Response {
    let mut response = Json(value).into_response();
    response.headers_mut().insert(
        STORE_SOURCE_HEADER,
        HeaderValue::from_static(source.as_str()),
    );
    response
}
