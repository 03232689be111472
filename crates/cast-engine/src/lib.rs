//! # cast-engine
//!
//! Runs tgcast tasks. [`TaskManager`] validates and stores new tasks and owns
//! one cancellable dispatch worker per running task; [`dispatch`] is the
//! worker loop itself.
//!
//! The engine is generic over [`cast_telegram::Messenger`], so tests drive it
//! with a scripted backend instead of the Bot API.

pub mod dispatch;
pub mod error;
pub mod manager;

#[cfg(test)]
mod test_support;

pub use error::CreateError;
pub use manager::TaskManager;
