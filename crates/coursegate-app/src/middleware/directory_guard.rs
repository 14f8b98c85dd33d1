//! Routing guard that keeps directory-style requests away from the static
//! file handler.

use salvo::Depot;
use salvo::http::uri::Uri;
use salvo::writing::Redirect;

use coursegate_core::error::CoreError;

use crate::error::AppResult;

/// ## Summary
/// Redirects any request whose path ends in `/` to a fixed error page instead
/// of letting the static handler answer it. Runs before authentication, so the
/// outcome does not depend on the session.
pub struct DirectoryRequestGuard {
    error_page: String,
}

impl DirectoryRequestGuard {
    /// ## Errors
    /// Returns `ConfigError` if `error_page` is not a valid URI reference.
    pub fn new(error_page: impl Into<String>) -> AppResult<Self> {
        let error_page = error_page.into();
        error_page.parse::<Uri>().map_err(|e| {
            CoreError::ConfigError(format!("files.error_page {error_page:?} is invalid: {e}"))
        })?;
        Ok(Self { error_page })
    }
}

#[must_use]
pub fn is_directory_request(path: &str) -> bool {
    path.ends_with('/')
}

#[salvo::async_trait]
impl salvo::Handler for DirectoryRequestGuard {
    #[tracing::instrument(skip(self, req, _depot, res, ctrl), fields(path = %req.uri().path()))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        _depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        if is_directory_request(req.uri().path()) {
            tracing::debug!(error_page = %self.error_page, "Directory request redirected");
            res.render(Redirect::found(self.error_page.as_str()));
            ctrl.skip_rest();
        }
    }
}
