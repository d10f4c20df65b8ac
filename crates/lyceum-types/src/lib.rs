//! Lyceum Types - Shared domain types
//!
//! This crate contains domain types used across lyceum crates:
//! - User identity and roles
//! - Course, lesson and subscription types
//! - Payment types

pub mod course;
pub mod payment;
pub mod role;
pub mod subscription;
pub mod user;

pub use course::*;
pub use payment::*;
pub use role::*;
pub use subscription::*;
pub use user::*;
