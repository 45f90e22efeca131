//! API-backed features. Each service wraps the shared [`crate::api::ApiClient`]
//! and the session store, and answers with a flow outcome so callers never see
//! a raw transport error.

pub mod auth;
pub mod contact;
pub mod orgs;
pub mod outcome;
pub mod users;

pub use outcome::{FlowFailure, FlowResult, FlowSuccess};
