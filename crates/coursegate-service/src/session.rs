//! Depot helpers for the `isLogin` session flag.
//!
//! The session itself is loaded and persisted by the `SessionHandler` hoop;
//! these helpers only read and write the flag on the session in the depot.

use salvo::Depot;
use salvo::session::{Session, SessionDepotExt};

use coursegate_core::constants::SESSION_IS_LOGIN_KEY;

use crate::allow_list::AllowList;
use crate::error::{ServiceError, ServiceResult};

/// Whether the request's session carries `isLogin = true`.
///
/// A missing session, a missing flag or a flag of the wrong type all count as
/// not logged in.
#[must_use]
pub fn is_logged_in(depot: &Depot) -> bool {
    depot
        .session()
        .and_then(|session| session.get::<bool>(SESSION_IS_LOGIN_KEY))
        .unwrap_or(false)
}

/// ## Summary
/// Sets `isLogin = true` on the request's session, starting one if the depot
/// has none.
///
/// ## Errors
/// Returns `SessionError` if the flag cannot be serialized into the session.
pub fn mark_logged_in(depot: &mut Depot) -> ServiceResult<()> {
    if depot.session().is_none() {
        depot.set_session(Session::new());
    }

    let session = depot.session_mut().ok_or(ServiceError::NoSession)?;
    session
        .insert(SESSION_IS_LOGIN_KEY, true)
        .map_err(|e| ServiceError::SessionError(e.to_string()))
}

/// ## Summary
/// Logs the session in if `student_id` is on the allow-list.
///
/// ## Errors
/// Returns `AuthenticationFailed` without touching the session if the
/// identifier is not allowed, or a session error from [`mark_logged_in`].
#[tracing::instrument(skip(allow_list, depot))]
pub fn authenticate(allow_list: &AllowList, depot: &mut Depot, student_id: &str) -> ServiceResult<()> {
    if !allow_list.is_allowed(student_id) {
        tracing::debug!("Identifier not on allow-list");
        return Err(ServiceError::AuthenticationFailed);
    }

    mark_logged_in(depot)?;
    tracing::info!("Session logged in");
    Ok(())
}
