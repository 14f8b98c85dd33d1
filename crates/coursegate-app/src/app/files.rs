use salvo::Router;
use salvo::serve_static::StaticDir;

use coursegate_core::config::Settings;
use coursegate_core::constants::FILES_ROUTE_COMPONENT;

use crate::error::AppResult;
use crate::middleware::{directory_guard::DirectoryRequestGuard, session_gate::SessionGate};

/// ## Summary
/// Protected download tree. Directory-style requests are redirected before the
/// session is checked; everything else needs a logged-in session. The file
/// handler is the goal for every method so no request leaves this router.
///
/// ## Errors
/// Returns an error if the error page or denial status in `settings` is invalid.
pub fn routes(settings: &Settings) -> AppResult<Router> {
    Ok(Router::with_path(FILES_ROUTE_COMPONENT)
        .hoop(DirectoryRequestGuard::new(settings.files.error_page.clone())?)
        .hoop(SessionGate::new(settings.files.denial_status)?)
        .push(
            Router::with_path("{**path}")
                .goal(StaticDir::new(vec![settings.files.root.clone()]).auto_list(false)),
        ))
}
