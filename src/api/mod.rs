//! # API Module
//!
//! HTTP endpoints of the local server that receives the OAuth redirect during
//! `spotlist auth`.
//!
//! - `GET /callback` - receives the authorization code, exchanges it for a
//!   token using the PKCE verifier and stores the token in shared state
//! - `GET /health` - liveness probe returning the crate version
//!
//! The server only runs while an authorization flow is in progress.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
