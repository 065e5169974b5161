//! Engagement store models split into domain-specific modules.

pub mod client;
pub mod common;
pub mod follow_up;
pub mod interaction;
pub mod note;
pub mod user;

pub use client::*;
pub use follow_up::*;
pub use interaction::*;
pub use note::*;
pub use user::*;
