pub mod api;
pub mod files;
pub mod frontend;

use std::sync::Arc;

use salvo::Router;
use salvo::logging::Logger;
use salvo::session::{MemoryStore, SessionHandler};
use salvo::timeout::Timeout;

use coursegate_core::config::Settings;
use coursegate_service::allow_list::AllowList;

use crate::allow_list_handler::AllowListHandler;
use crate::config::ConfigHandler;
use crate::error::{AppError, AppResult};

/// ## Summary
/// Assembles the full router: shared state injection, the session hoop, the
/// API, the protected file tree and the frontend assets.
///
/// Sessions live in `sessions`; keep a clone to sweep expired entries with
/// [`crate::session_store::spawn_session_cleanup`].
///
/// ## Errors
/// Returns an error if the session handler or the file gates cannot be built
/// from `settings`.
pub fn router(
    settings: Arc<Settings>,
    allow_list: Arc<AllowList>,
    sessions: MemoryStore,
) -> AppResult<Router> {
    let secret = settings.auth.session_secret_bytes()?;
    let session_handler = SessionHandler::builder(sessions, &secret)
        .cookie_name(settings.auth.session_cookie_name.clone())
        .session_ttl(Some(settings.auth.session_ttl()))
        .build()
        .map_err(|e| AppError::SessionSetup(e.to_string()))?;

    let files = files::routes(&settings)?;
    let frontend = frontend::routes(&settings);

    Ok(Router::new()
        .hoop(Logger::new())
        .hoop(Timeout::new(settings.server.request_timeout()))
        .hoop(ConfigHandler { settings })
        .hoop(AllowListHandler { allow_list })
        .push(
            Router::new()
                .hoop(session_handler)
                .push(api::routes())
                .push(files),
        )
        .push(frontend))
}
