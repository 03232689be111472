//! Entity structs persisted by tgcast.
//!
//! The task map is stored as one JSON object (id → [`Task`]). All structs
//! derive `Serialize`, `Deserialize`, and `JsonSchema` so the snapshot file
//! can be validated against the exported schema.

mod task;

pub use task::{Payload, Task};
