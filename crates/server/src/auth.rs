use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use service::media::MediaStore;
use service::{Caller, Services};

use crate::errors::JsonApiError;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerState {
    pub services: Services,
    pub media: Arc<dyn MediaStore>,
    pub uploads: configs::UploadConfig,
}

/// Token from `Authorization: Bearer <token>`, else from the `auth_token` cookie.
/// A malformed Authorization header is rejected rather than ignored.
fn presented_token(headers: &HeaderMap) -> Result<Option<String>, JsonApiError> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        let raw = value.to_str().map_err(|_| JsonApiError::unauthenticated())?;
        return match raw.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
            _ => {
                tracing::warn!("invalid Authorization format (expect Bearer)");
                Err(JsonApiError::unauthenticated())
            }
        };
    }
    let jar = CookieJar::from_headers(headers);
    Ok(jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|t| !t.is_empty()))
}

/// Global middleware: resolves the presented token into a [`Caller`] request
/// extension. No credentials means an anonymous request; bad credentials are a 401.
pub async fn resolve_caller(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_owned();
    if path == "/auth/login" || path == "/auth/register" || req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if let Some(token) = presented_token(req.headers())? {
        match state.services.auth.resolve(&token) {
            Ok(caller) => {
                req.extensions_mut().insert(caller);
            }
            Err(e) => {
                tracing::warn!(path = %path, err = %e, "token validation failed");
                return Err(e.into());
            }
        }
    }
    Ok(next.run(req).await)
}

/// Handler argument for routes that need an authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct RequireCaller(pub Caller);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequireCaller {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Caller>().copied().map(RequireCaller).ok_or_else(JsonApiError::unauthenticated)
    }
}

/// Handler argument for routes open to anonymous callers.
#[derive(Debug, Clone, Copy)]
pub struct OptionalCaller(pub Option<Caller>);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for OptionalCaller {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalCaller(parts.extensions.get::<Caller>().copied()))
    }
}
