//! Mock server
//!
//! Replays recorded examples over HTTP.

pub mod responder;
pub mod server;

pub use responder::{not_found, score, MockResponder, NOT_FOUND_REASON};
pub use server::{router, serve};
