//! CQRS Queries

pub mod handlers;

mod audio_queries;
mod presentation_queries;
mod task_queries;
mod voice_queries;

pub use audio_queries::GetArtifact;
pub use presentation_queries::ExtractSlides;
pub use task_queries::{GetTask, ListTasks};
pub use voice_queries::ListVoices;
