use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::convert::Infallible;

use crate::error::ApiError;

/// Name of the cookie whose presence marks an admin session.
pub const ADMIN_COOKIE: &str = "admin-authenticated";
/// Lifetime of the cookie set by a successful login.
pub const ADMIN_COOKIE_MAX_AGE: u32 = 60 * 60 * 24;

pub const CONSOLE_PREFIX: &str = "/intellsys";
pub const CONSOLE_LOGIN_PATH: &str = "/intellsys/login";
pub const API_PREFIX: &str = "/api/intellsys";
pub const API_LOGIN_PATH: &str = "/api/intellsys/login";

/// AdminSession
///
/// The gate's two states, derived from nothing but the presence of [`ADMIN_COOKIE`].
/// The cookie carries no signature or expiry, so this is a navigation gate rather
/// than a security boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSession {
    Authenticated,
    Unauthenticated,
}

impl AdminSession {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        if has_cookie(headers, ADMIN_COOKIE) {
            AdminSession::Authenticated
        } else {
            AdminSession::Unauthenticated
        }
    }
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(AdminSession::from_headers(&parts.headers))
    }
}

/// True when any `Cookie` header carries a pair named `name`.
pub fn has_cookie(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('=').map(|(key, _)| key.trim()))
        .any(|key| key == name)
}

/// GateDecision
///
/// What the gate does with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    RedirectToLogin,
    Reject,
}

/// gate_decision
///
/// Console pages under `/intellsys` redirect to the login page when unauthenticated;
/// the admin API under `/api/intellsys` answers 401 instead, since its callers are
/// `fetch` calls that cannot follow a login page. Both login paths always pass.
pub fn gate_decision(path: &str, session: AdminSession) -> GateDecision {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    if path == CONSOLE_LOGIN_PATH || path == API_LOGIN_PATH {
        return GateDecision::Proceed;
    }

    if session == AdminSession::Authenticated {
        return GateDecision::Proceed;
    }

    if under(path, API_PREFIX) {
        GateDecision::Reject
    } else if under(path, CONSOLE_PREFIX) {
        GateDecision::RedirectToLogin
    } else {
        GateDecision::Proceed
    }
}

fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// admin_gate
///
/// Router-wide middleware. It runs before routing so it sees the full request path,
/// the same way the gate covers every console page regardless of which router
/// serves it.
pub async fn admin_gate(session: AdminSession, request: Request, next: Next) -> Response {
    match gate_decision(request.uri().path(), session) {
        GateDecision::Proceed => next.run(request).await,
        GateDecision::RedirectToLogin => {
            tracing::debug!(path = %request.uri().path(), "no admin cookie, redirecting to login");
            Redirect::temporary(CONSOLE_LOGIN_PATH).into_response()
        }
        GateDecision::Reject => ApiError::Unauthorized.into_response(),
    }
}

/// Set-Cookie value issued after a successful login.
pub fn session_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{ADMIN_COOKIE}=true; Path=/; HttpOnly; SameSite=Lax; Max-Age={ADMIN_COOKIE_MAX_AGE}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set-Cookie value that makes the browser drop the session cookie.
pub fn cleared_cookie() -> String {
    format!("{ADMIN_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
