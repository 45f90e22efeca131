//! # Geminis (API client)
//!
//! `geminis` is the client side of the Geminis Labs REST API: authentication
//! flows, a persisted session, the reactive state the views render from, and a
//! command-line front end over all of it.
//!
//! ## Layers
//!
//! - **Transport** (`api`): one `reqwest` client with a fixed timeout. Every
//!   failure is an [`api::ApiError`] variant picked from the response status.
//!   A 401 runs the injected session-expiry reaction before the error returns.
//! - **Session** (`session`): access/id token pair, optional refresh token and
//!   the cached user, kept in a key-value store. The authenticated flag is
//!   always derived from storage, never cached.
//! - **Feature services** (`features`): auth, users, organizations and contact.
//!   Flows turn transport errors into Spanish user-facing messages and never
//!   return a bare transport error.
//! - **State** (`state`, `theme`): observable containers for auth, profile,
//!   toasts, page transitions and the active theme.
//!
//! [`app::App`] wires the layers once; services and stores are cheap handles
//! cloned from it.

pub mod api;
pub mod app;
pub mod cli;
pub mod features;
pub mod session;
pub mod state;
pub mod theme;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
