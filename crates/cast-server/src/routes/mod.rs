//! Route groups. Each module exposes `routes()` returning a router over
//! [`crate::state::AppState`].

pub mod stats;
pub mod tasks;
pub mod ui;
pub mod upload;
