//! Per-client request limiting
//!
//! One keyed limiter per policy: a general one over every route and a
//! stricter one on `POST /api/login`. Clients are keyed by peer IP. A
//! rejection is an operational 429, so it is rendered by the error responder
//! like any other failure.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use super::error::ApiError;

pub const GENERAL_LIMIT_MESSAGE: &str =
    "Demasiadas solicitudes desde esta IP, intenta nuevamente más tarde.";
pub const LOGIN_LIMIT_MESSAGE: &str =
    "Demasiados intentos de inicio de sesión. Intenta nuevamente más tarde.";

// Stale keys are dropped once the table grows past this
const RETAIN_THRESHOLD: usize = 10_000;

/// Keyed limiter allowing `max` requests per window and client.
///
/// `max == 0` disables it.
#[derive(Clone)]
pub struct ClientLimiter {
    inner: Option<Arc<DefaultKeyedRateLimiter<IpAddr>>>,
    message: &'static str,
}

impl ClientLimiter {
    pub fn new(max: u32, window: Duration, message: &'static str) -> Self {
        let inner = NonZeroU32::new(max)
            .and_then(|burst| quota(burst, window))
            .map(|quota| Arc::new(RateLimiter::keyed(quota)));
        Self { inner, message }
    }

    pub fn general(max: u32, window: Duration) -> Self {
        Self::new(max, window, GENERAL_LIMIT_MESSAGE)
    }

    pub fn login(max: u32, window: Duration) -> Self {
        Self::new(max, window, LOGIN_LIMIT_MESSAGE)
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Count one request from `client`.
    pub fn check(&self, client: IpAddr) -> Result<(), ApiError> {
        let Some(limiter) = &self.inner else {
            return Ok(());
        };

        if limiter.len() > RETAIN_THRESHOLD {
            limiter.retain_recent();
        }

        limiter.check_key(&client).map_err(|_| {
            tracing::warn!(client = %client, "rate limit exceeded");
            ApiError::operational(StatusCode::TOO_MANY_REQUESTS, self.message)
        })
    }
}

/// `burst` requests up front, refilled evenly over `window`
fn quota(burst: NonZeroU32, window: Duration) -> Option<Quota> {
    let period = window.checked_div(burst.get())?;
    Quota::with_period(period).map(|q| q.allow_burst(burst))
}

/// Peer address of the connection; unspecified when the router runs without
/// connect info (in-process tests).
fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Middleware rejecting requests over the limiter's quota.
pub async fn limit_requests(
    State(limiter): State<ClientLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    limiter.check(client_ip(&request))?;
    Ok(next.run(request).await)
}
