pub mod client;

pub use client::{ContactMessage, ContactService};
