//! Lectern Server library

pub mod handlers;
pub mod routes;
pub mod session;
pub mod state;
