/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const LOGIN_ROUTE_COMPONENT: &str = "login";
pub const LOGIN_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", LOGIN_ROUTE_COMPONENT);

pub const FILE_LIST_ROUTE_COMPONENT: &str = "file";
pub const FILE_LIST_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", FILE_LIST_ROUTE_COMPONENT);

pub const REFRESH_ROUTE_COMPONENT: &str = "refresh";
pub const REFRESH_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", REFRESH_ROUTE_COMPONENT);

pub const FILES_ROUTE_COMPONENT: &str = "files";
pub const FILES_ROUTE_PREFIX: &str = const_str::concat!("/", FILES_ROUTE_COMPONENT);

/// Session attribute flipped by a successful login.
pub const SESSION_IS_LOGIN_KEY: &str = "isLogin";

/// Soft error messages returned in JSON bodies. Clients match on these strings.
pub mod messages {
    pub const PARAMS_ERROR: &str = "params error";
    pub const ACCESS_DENIED: &str = "access denied";
    pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";
    pub const AUTHENTICATION_FAIL: &str = "Authentication Fail";

    /// Plain-text body sent by the file gate to unauthenticated sessions.
    pub const ACCESS_DENY: &str = "Access deny";
}
