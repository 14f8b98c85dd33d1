//! coursegate - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can use
//! `coursegate_test::` paths.

pub mod component {
    pub use coursegate_core::{config, constants};
    pub use coursegate_service::{allow_list, listing, session};

    pub mod error {
        pub use coursegate_core::error::*;
        pub use coursegate_service::error::*;
    }
}

pub mod app {
    pub use coursegate_app::*;

    pub mod api {
        pub use coursegate_app::app::api::*;
    }
}
