//! Core record types for the chat completions endpoint.
//!
//! The type system ensures:
//! - Type-safe message construction: invalid roles and invalid content-part
//!   shapes are rejected before a request is ever built
//! - Wire-format compatibility: field aliases are applied uniformly at the
//!   serde boundary
//! - Forward compatibility: every record retains unrecognized fields in an
//!   auxiliary map and round-trips them on serialization
//!
//! ## Submodules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`request`] | Outbound message, content-part, and model-selection records |
//! | [`response`] | Inbound completion, choice, and diagnostic records |

pub mod request;
pub mod response;

pub use request::{ContentPart, Message, MessageContent, ModelParams, ModelSelector, ModelWeights, Role};
pub use response::{ChatCompletion, Choice, ChoiceMessage};
