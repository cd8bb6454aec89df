//! Authentication middleware

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use lattice_auth::{AuthManager, Outcome, User};

/// The principal attached to an authenticated request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Arc<dyn User>);

impl AuthenticatedUser {
    pub fn name(&self) -> &str {
        self.0.name()
    }
}

/// Runs the configured authenticators and decides whether the request may
/// continue.
///
/// Rejection reasons go to the log only; clients get a generic body.
pub async fn authenticate(
    State(manager): State<Arc<AuthManager>>,
    mut request: Request,
    next: Next,
) -> Response {
    match manager.authenticate(request.headers_mut()) {
        Outcome::Authenticated(user) => {
            request.extensions_mut().insert(AuthenticatedUser(user));
            next.run(request).await
        }
        Outcome::Rejected(reason) => {
            warn!(
                %reason,
                kind = ?reason.kind(),
                path = %request.uri().path(),
                "Rejecting request with invalid credentials"
            );
            forbidden()
        }
        Outcome::Anonymous if manager.allow_anonymous() => next.run(request).await,
        Outcome::Anonymous => unauthorized(),
    }
}

fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, Json(json!({ "error": "forbidden" }))).into_response()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        Json(json!({ "error": "unauthorized" })),
    )
        .into_response()
}
