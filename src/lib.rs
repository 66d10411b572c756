#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Owner-scoped task CRUD with filtering, sorting and pagination, account"]
#![doc = "registration with JWT authentication, and fire-and-forget lifecycle email."]
#![doc = "The binary (`main.rs`) wires these together into an actix-web server."]

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod tasks;

pub use error::AppError;
pub use state::AppState;
