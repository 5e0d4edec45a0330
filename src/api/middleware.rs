//! API Middleware (Cache Suppression, Request Logging)

use axum::{
    extract::Request,
    http::{
        header::{CACHE_CONTROL, EXPIRES, PRAGMA},
        HeaderName, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::utils::constants::{EXPIRES_NOW, NO_CACHE_DIRECTIVE, PRAGMA_NO_CACHE};

/// Correlation header set on every response
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Marks every response, success or error, as non-cacheable
pub async fn no_store_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE_DIRECTIVE));
    headers.insert(PRAGMA, HeaderValue::from_static(PRAGMA_NO_CACHE));
    headers.insert(EXPIRES, HeaderValue::from_static(EXPIRES_NOW));

    response
}

/// Request logging middleware
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    // Path only: the query may carry cache busters
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = %status.as_u16(),
        latency_ms = %latency.as_millis(),
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}
