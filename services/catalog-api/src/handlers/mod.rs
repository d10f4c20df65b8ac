//! REST API handlers

pub mod courses;
pub mod health;
pub mod lessons;
pub mod payments;
pub mod shared;
pub mod subscriptions;
pub mod users;

pub use courses::*;
pub use health::*;
pub use lessons::*;
pub use payments::*;
pub use subscriptions::*;
pub use users::*;
