use salvo::Depot;
use salvo::http::StatusCode;
use salvo::writing::Text;

use coursegate_core::constants::messages;
use coursegate_core::error::CoreError;
use coursegate_service::session::is_logged_in;

use crate::error::AppResult;

/// ## Summary
/// Lets a request through only if its session is logged in. Other requests get
/// a plain-text denial with the configured status.
///
/// Must run after the session hoop so the session is already in the depot.
pub struct SessionGate {
    denial_status: StatusCode,
}

impl SessionGate {
    /// ## Errors
    /// Returns `ConfigError` if `denial_status` is not a valid status code.
    pub fn new(denial_status: u16) -> AppResult<Self> {
        let denial_status = StatusCode::from_u16(denial_status).map_err(|e| {
            CoreError::ConfigError(format!("invalid denial status {denial_status}: {e}"))
        })?;
        Ok(Self { denial_status })
    }
}

#[salvo::async_trait]
impl salvo::Handler for SessionGate {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        if is_logged_in(depot) {
            tracing::trace!("Session logged in, serving file");
            return;
        }

        tracing::debug!("File request without login denied");
        res.status_code(self.denial_status);
        res.render(Text::Plain(messages::ACCESS_DENY));
        ctrl.skip_rest();
    }
}
