//! # infuzu-rs
//!
//! Rust client for the Infuzu chat completions API.
//!
//! The library builds a validated request payload from a list of
//! conversational messages plus an optional model-selection directive, issues
//! a single blocking HTTPS POST to the Infuzu endpoint, and parses the
//! response into strongly-typed records, filling a small set of optional
//! metadata fields with deterministic defaults when the server omits them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use infuzu_rs::{create_chat_completion, Message};
//!
//! fn main() -> infuzu_rs::Result<()> {
//!     let messages = vec![
//!         Message::system("You are a helpful assistant."),
//!         Message::user("What is the capital of France?"),
//!     ];
//!
//!     // API key is read from the INFUZU_API_KEY environment variable.
//!     let completion = create_chat_completion(&messages, None, None)?;
//!     if let Some(content) = completion.first_content() {
//!         println!("{content}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! For repeated calls, build a [`Client`] once and share it freely; it is
//! immutable after construction and safe to use from multiple threads.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client construction and the chat-completion entry point |
//! | [`types`] | Request and response record types with validation |
//! | [`transport`] | Blocking HTTP transport |
//! | [`error`] | Unified error type |
//! | [`utils`] | Version-file reader |
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result`]. The [`Error`] kinds map
//! directly to failure causes: [`Error::Configuration`] (missing API key or
//! version file), [`Error::Validation`] (schema invariant violated),
//! [`Error::Api`] (non-success HTTP status, with status code and raw body),
//! and [`Error::Transport`] (the request never completed). There is no
//! catch-all variant; callers can match on the cause they care about.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use client::{create_chat_completion, Client, ClientBuilder, API_BASE_URL, API_KEY_ENV};
pub use error::Error;
pub use types::{
    request::{
        ContentPart, Message, MessageContent, ModelParams, ModelSelector, ModelWeights, Role,
    },
    response::{ChatCompletion, Choice, ChoiceMessage},
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
