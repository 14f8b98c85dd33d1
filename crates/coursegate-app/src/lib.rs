pub mod allow_list_handler;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod server;
pub mod session_store;

#[cfg(test)]
mod test_support;
