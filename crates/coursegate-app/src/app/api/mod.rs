mod file;
mod login;
mod refresh;

use salvo::Router;

pub use coursegate_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, FILE_LIST_ROUTE_PREFIX, LOGIN_ROUTE_PREFIX,
    REFRESH_ROUTE_PREFIX,
};
pub use file::FileListResponse;
pub use login::{LoginRequest, LoginResponse, LoginStatusResponse};
pub use refresh::RefreshResponse;

/// ## Summary
/// Constructs the JSON API router.
///
/// Expects the session, config and allow-list hoops to run first.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(login::routes())
        .push(file::routes())
        .push(refresh::routes())
}
