use salvo::async_trait;
use std::sync::Arc;

use crate::error::AppResult;
use coursegate_core::error::CoreError;
use coursegate_service::allow_list::AllowList;

pub struct AllowListHandler {
    pub allow_list: Arc<AllowList>,
}

#[async_trait]
impl salvo::Handler for AllowListHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.allow_list));
    }
}

/// ## Summary
/// Retrieves the shared allow-list from the depot.
///
/// ## Errors
/// Returns an error if the allow-list is not found in the depot.
pub fn get_allow_list_from_depot(depot: &salvo::Depot) -> AppResult<Arc<AllowList>> {
    depot
        .obtain::<Arc<AllowList>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Allow-list not found in depot").into())
}
