// handlers/mod.rs - HTTP handlers, one module per resource
//
// Handlers only translate between HTTP and the services: extract, call,
// wrap. Status mapping lives in `crate::error::ApiError`.

pub mod auth;
pub mod categories;
pub mod listings;
pub mod related;
pub mod system;
pub mod users;
