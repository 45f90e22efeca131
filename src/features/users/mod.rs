//! Signed-in user profile, linked users and password changes.

pub mod client;
pub mod types;

pub use client::UserService;
pub use types::{UserProfile, role_label};
