pub mod dispatch;
pub mod serve;
pub mod stats;
pub mod task;
pub mod validate;
