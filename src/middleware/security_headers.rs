//! Security headers middleware
//!
//! Adds standard security headers to every response. The policy is written
//! for a JSON API with no browser-rendered pages.

use axum::{body::Body, http::Request, middleware::Next, response::Response};

/// Middleware that adds security headers to all responses
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    // Strict-Transport-Security: one year, subdomains included
    headers.insert(
        "Strict-Transport-Security",
        "max-age=31536000; includeSubDomains".parse().unwrap(),
    );

    // Browsers must not MIME-sniff API responses
    headers.insert("X-Content-Type-Options", "nosniff".parse().unwrap());

    // A JSON API has no business being framed
    headers.insert("X-Frame-Options", "DENY".parse().unwrap());

    headers.insert("X-XSS-Protection", "1; mode=block".parse().unwrap());

    headers.insert(
        "Referrer-Policy",
        "strict-origin-when-cross-origin".parse().unwrap(),
    );

    headers.insert(
        "Permissions-Policy",
        "accelerometer=(), camera=(), geolocation=(), gyroscope=(), magnetometer=(), microphone=(), payment=(), usb=()"
            .parse()
            .unwrap(),
    );

    // Nothing served here is a document, so lock the CSP down completely
    headers.insert(
        "Content-Security-Policy",
        "default-src 'none'; frame-ancestors 'none'; base-uri 'none'"
            .parse()
            .unwrap(),
    );

    response
}

/// Middleware for API routes that adds cache control headers
pub async fn api_cache_control_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    // Inventory and movement data must never come from a cache
    headers.insert(
        "Cache-Control",
        "no-store, no-cache, must-revalidate, private".parse().unwrap(),
    );
    headers.insert("Pragma", "no-cache".parse().unwrap());
    headers.insert("Expires", "0".parse().unwrap());

    response
}
