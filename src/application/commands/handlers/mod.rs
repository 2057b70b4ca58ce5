//! Command Handlers

mod task_handlers;
mod voice_handlers;

pub use task_handlers::{DeleteTaskHandler, SubmitTaskHandler, SubmitTaskResponse};
pub use voice_handlers::{DeleteVoiceHandler, RegisterVoiceHandler, RegisterVoiceResponse};
