use salvo::{Depot, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Serialize;
use tracing::error;

use coursegate_core::constants::REFRESH_ROUTE_COMPONENT;

use crate::allow_list_handler::get_allow_list_from_depot;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub count: usize,
}

/// ## Summary
/// GET /api/refresh - Re-reads the allow-list file.
#[handler]
async fn refresh(depot: &mut Depot, res: &mut Response) {
    let allow_list = match get_allow_list_from_depot(depot) {
        Ok(list) => list,
        Err(e) => {
            error!(error = ?e, "Failed to get allow-list");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            return;
        }
    };

    let count = allow_list.reload().await;
    res.render(Json(RefreshResponse { count }));
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(REFRESH_ROUTE_COMPONENT).get(refresh)
}
