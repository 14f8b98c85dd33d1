//! Request-independent logic behind the HTTP endpoints.
//!
//! ## Module Organization
//!
//! - `allow_list`: identifiers permitted to log in, reloadable from a text file
//! - `session`: reading and flipping the `isLogin` session flag
//! - `listing`: top-level directory checks and file enumeration under the file root

pub mod allow_list;
pub mod error;
pub mod listing;
pub mod session;
