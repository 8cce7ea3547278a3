use std::net::SocketAddr;
use std::time::Instant;

use axum::body::{Body, HttpBody};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{CONTENT_LENGTH, USER_AGENT};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::state::AppState;

/// Error bodies larger than this are not echoed into the log.
const LOGGED_BODY_LIMIT: usize = 64 * 1024;

pub async fn limit_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Err(limited) = state.limits.global.check() {
        return AppError::from(limited).into_response();
    }
    next.run(request).await
}

/// Logs everything except successful GETs. Server errors are logged at error
/// level together with the response body when it is small enough to buffer;
/// larger or unsized bodies pass through untouched.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client_ip = client_ip(request.headers(), peer);
    let user_agent = header_str(request.headers(), USER_AGENT.as_str()).to_string();
    let content_length = header_str(request.headers(), CONTENT_LENGTH.as_str())
        .parse::<u64>()
        .unwrap_or(0);

    let start = Instant::now();
    let response = next.run(request).await;
    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    if method == Method::GET && status == StatusCode::OK {
        return response;
    }

    if status.is_server_error() {
        let (parts, body) = response.into_parts();
        let fits = body
            .size_hint()
            .upper()
            .is_some_and(|upper| upper <= LOGGED_BODY_LIMIT as u64);
        if !fits {
            tracing::error!(
                %method,
                %path,
                status = status.as_u16(),
                %client_ip,
                %user_agent,
                content_length,
                duration_ms,
                "[{}] {} {} (response body too large to log)",
                status.as_u16(),
                method,
                path
            );
            return Response::from_parts(parts, body);
        }
        let bytes = match axum::body::to_bytes(body, LOGGED_BODY_LIMIT).await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::error!(%method, %path, %error, "failed to read error response body");
                return Response::from_parts(parts, Body::empty());
            }
        };
        tracing::error!(
            %method,
            %path,
            status = status.as_u16(),
            %client_ip,
            %user_agent,
            content_length,
            duration_ms,
            bytes_written = bytes.len(),
            response = %String::from_utf8_lossy(&bytes),
            "[{}] {} {}",
            status.as_u16(),
            method,
            path
        );
        return Response::from_parts(parts, Body::from(bytes));
    }

    tracing::info!(
        %method,
        %path,
        status = status.as_u16(),
        %client_ip,
        %user_agent,
        content_length,
        duration_ms,
        "[{}] {} {}",
        status.as_u16(),
        method,
        path
    );
    response
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Proxy headers first, then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let real_ip = header_str(headers, "x-real-ip");
    if !real_ip.is_empty() {
        return real_ip.to_string();
    }
    let forwarded = header_str(headers, "x-forwarded-for");
    if !forwarded.is_empty() {
        return forwarded.to_string();
    }
    peer.map(|addr| addr.to_string()).unwrap_or_default()
}
