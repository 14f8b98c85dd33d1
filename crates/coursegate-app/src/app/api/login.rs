use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use coursegate_core::constants::{LOGIN_ROUTE_COMPONENT, messages};
use coursegate_service::error::ServiceError;
use coursegate_service::session::{authenticate, is_logged_in};

use crate::allow_list_handler::get_allow_list_from_depot;

/// ## Summary
/// Login request payload. A missing `student_id` decodes as empty and fails
/// the allow-list lookup.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub student_id: String,
}

/// ## Summary
/// Login response payload. `err` is empty on success.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub err: String,
}

impl LoginResponse {
    fn with_err(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            err: message.into(),
        })
    }
}

/// ## Summary
/// Login status payload.
#[derive(Debug, Serialize)]
pub struct LoginStatusResponse {
    #[serde(rename = "is")]
    pub is_login: bool,
}

/// ## Summary
/// Decodes the first JSON value of `body`. Anything after it is ignored and a
/// `null` body decodes as an empty request.
///
/// ## Errors
/// Returns the decoder's message for an empty body or a malformed first value.
pub fn decode_login_request(body: &[u8]) -> Result<LoginRequest, String> {
    match serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<LoginRequest>>()
        .next()
    {
        Some(Ok(login_req)) => Ok(login_req.unwrap_or_default()),
        Some(Err(e)) => Err(e.to_string()),
        None => Err("EOF".to_string()),
    }
}

/// ## Summary
/// POST /api/login - Marks the session as logged in if `student_id` is on the
/// allow-list.
///
/// Decode and lookup failures are reported in `err` with HTTP 200 and leave
/// the session untouched. The body is decoded as JSON whatever its
/// Content-Type.
#[handler]
async fn login(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing login request");

    let login_req = match req.payload().await {
        Ok(body) => decode_login_request(body),
        Err(e) => Err(e.to_string()),
    };
    let login_req = match login_req {
        Ok(r) => r,
        Err(message) => {
            tracing::debug!(error = %message, "Failed to decode login request");
            res.render(LoginResponse::with_err(message));
            return;
        }
    };

    let allow_list = match get_allow_list_from_depot(depot) {
        Ok(list) => list,
        Err(e) => {
            error!(error = ?e, "Failed to get allow-list");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(LoginResponse::with_err(messages::INTERNAL_SERVER_ERROR));
            return;
        }
    };

    match authenticate(&allow_list, depot, &login_req.student_id) {
        Ok(()) => res.render(LoginResponse::with_err(String::new())),
        Err(ServiceError::AuthenticationFailed) => {
            res.render(LoginResponse::with_err(messages::AUTHENTICATION_FAIL));
        }
        Err(e) => {
            error!(error = ?e, "Failed to update session");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(LoginResponse::with_err(messages::INTERNAL_SERVER_ERROR));
        }
    }
}

/// ## Summary
/// GET /api/login - Reports whether the session is logged in.
#[handler]
async fn status(depot: &Depot) -> Json<LoginStatusResponse> {
    Json(LoginStatusResponse {
        is_login: is_logged_in(depot),
    })
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(LOGIN_ROUTE_COMPONENT)
        .get(status)
        .post(login)
}
