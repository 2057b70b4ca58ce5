//! CQRS Commands

pub mod handlers;

mod task_commands;
mod voice_commands;

pub use task_commands::{DeleteTask, SubmitTask};
pub use voice_commands::{DeleteVoice, RegisterVoice};
