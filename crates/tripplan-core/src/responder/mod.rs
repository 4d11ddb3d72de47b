//! Language-model responder interface.
//!
//! The generation service never talks to a model provider directly; it asks
//! a [`Responder`] for a completion. [`OpenAiResponder`] is the production
//! implementation. Tests substitute a scripted responder.
//!
//! ```text
//! PlanGenerator --complete(CompletionRequest)--> &dyn Responder
//!                                                    |
//!                                                    v
//!                                        Option<String> (raw text)
//! ```

pub mod openai;
pub mod trait_def;
pub mod types;

pub use openai::{DEFAULT_BASE_URL, OpenAiResponder};
pub use trait_def::Responder;
pub use types::{CompletionRequest, ResponderError};
