pub mod client;

pub use client::OrganizationService;
