//! # cast-core
//!
//! Core types, ID generation, and error types for tgcast.
//!
//! This crate provides the foundational types shared across all tgcast crates:
//! - The persisted [`entities::Task`] record and its payload
//! - Creation input ([`input::NewTask`]) with comma-list parsing
//! - Read-side projections returned by the API and CLI
//! - Photo source classification
//! - Task ID generation
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod input;
pub mod responses;
