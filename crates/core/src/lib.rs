//! `tasktrack-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** types (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod task;
pub mod user;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{OwnerId, TaskId};
pub use task::Task;
pub use user::User;
