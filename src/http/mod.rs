//! JSON HTTP API.
//!
//! Routes:
//! - `GET /tasks` - list every task
//! - `POST /tasks` - create a task (201)
//! - `PUT /tasks/{id}` - update a task
//! - `DELETE /tasks/{id}` - delete a task (204)
//! - `GET /health` - liveness probe

mod error;
mod server;

pub use error::ErrorBody;
pub use server::{ApiState, build_router, serve, start_server};
