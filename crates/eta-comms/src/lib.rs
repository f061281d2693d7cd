//! `eta-comms`: human-facing delay messages.
//!
//! | Module           | Contents                                                  |
//! |------------------|-----------------------------------------------------------|
//! | [`request`]      | `MessageRequest` and the prompt text for each kind        |
//! | [`generator`]    | `CommunicationGenerator` trait, `TemplateGenerator`       |
//! | [`live`]         | `LiveGenerator` (chat-completion HTTP service)            |
//! | [`communicator`] | `Communicator`, `Communications`, `SupervisorReport`, …   |
//!
//! # Degradation
//!
//! Which generator runs is decided by configuration, not by catching
//! failures.  A failure of the configured generator on a single message is
//! still recovered: the communicator logs a warning and renders that message
//! with [`TemplateGenerator`], so a run never fails because a network call
//! did.

pub mod communicator;
pub mod error;
pub mod generator;
pub mod live;
pub mod request;

#[cfg(test)]
mod tests;

pub use communicator::{
    ALL_CLEAR, Communications, Communicator, CustomerMessage, ReportDelay, SupervisorReport,
    build_generator,
};
pub use error::{CommsError, CommsResult};
pub use generator::{CommunicationGenerator, TemplateGenerator};
pub use live::LiveGenerator;
pub use request::{MessageKind, MessageRequest};
