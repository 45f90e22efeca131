//! Authentication flows: account lifecycle, login and the stored token pair.

pub mod client;
pub mod types;

pub use client::AuthService;
pub use types::{Credentials, Registration};
