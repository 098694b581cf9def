//! Bot module - resolves slash commands into Wikipedia lookups and replies.

pub mod commands;
pub mod openai;
pub mod router;
pub mod wikipedia;

pub use commands::register_commands;
pub use openai::OpenAiClient;
pub use router::{CommandName, Invocation};
pub use wikipedia::WikipediaClient;
