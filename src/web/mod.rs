//! Web module - HTTP front end

mod server;

pub use server::{router, serve, AppState};
