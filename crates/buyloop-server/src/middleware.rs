use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{MatchedPath, Request, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// Request id carried in extensions for handlers and error envelopes.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    fn of(req: &Request) -> String {
        req.extensions()
            .get::<RequestId>()
            .map_or_else(String::new, |id| id.0.clone())
    }
}

/// Who may register businesses and post messages.
///
/// `keys == None` means writes are open, which is only allowed in
/// development.
#[derive(Debug, Clone)]
pub struct AuthState {
    keys: Option<Arc<HashSet<String>>>,
}

impl AuthState {
    /// Builds write access from the configured `BUYLOOP_API_KEYS`.
    ///
    /// # Errors
    ///
    /// Fails when no usable key is configured outside development.
    pub fn from_keys(keys: &[String], is_development: bool) -> anyhow::Result<Self> {
        let keys: HashSet<String> = keys
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        match (keys.is_empty(), is_development) {
            (false, _) => Ok(Self {
                keys: Some(Arc::new(keys)),
            }),
            (true, true) => {
                tracing::warn!("BUYLOOP_API_KEYS not set; business writes are open");
                Ok(Self::disabled())
            }
            (true, false) => anyhow::bail!(
                "BUYLOOP_API_KEYS is required outside development; provide comma-separated bearer tokens"
            ),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self { keys: None }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.keys.is_some()
    }

    fn admits(&self, authorization: Option<&HeaderValue>) -> bool {
        let Some(keys) = &self.keys else {
            return true;
        };
        bearer_token(authorization).is_some_and(|token| keys.contains(token))
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: usize,
}

/// Fixed-window write quota, counted separately for each matched route.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn admit(&self, route: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().await;
        let slot = windows.entry(route.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(slot.started_at) >= self.window {
            *slot = Window {
                started_at: now,
                count: 0,
            };
        }
        if slot.count >= self.max_requests {
            return false;
        }
        slot.count += 1;
        true
    }
}

/// Reuses a sane incoming `x-request-id`, otherwise mints a `UUIDv4`, and
/// echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = incoming_request_id(req.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if auth.admits(req.headers().get(AUTHORIZATION)) {
        return next.run(req).await;
    }

    tracing::warn!(path = %req.uri().path(), "write rejected: missing or unknown bearer token");
    ApiError::new(
        RequestId::of(&req),
        "unauthorized",
        "missing or invalid bearer token",
    )
    .into_response()
}

pub async fn enforce_rate_limit(
    State(limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let route = req.extensions().get::<MatchedPath>().map_or_else(
        || req.uri().path().to_string(),
        |matched| matched.as_str().to_string(),
    );

    if limit.admit(&route, Instant::now()).await {
        return next.run(req).await;
    }

    tracing::warn!(%route, "write rate limit reached");
    ApiError::new(
        RequestId::of(&req),
        "rate_limited",
        format!("too many writes to {route}; retry later"),
    )
    .into_response()
}

fn incoming_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_REQUEST_ID_LEN
                && id.bytes().all(|b| b.is_ascii_graphic())
        })
        .map(ToOwned::to_owned)
}

/// Token from `Authorization: Bearer <token>`; the scheme is case-insensitive.
fn bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    let (scheme, token) = value?.to_str().ok()?.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
