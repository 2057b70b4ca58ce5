//! Query Handlers

mod audio_handlers;
mod presentation_handlers;
mod task_handlers;
mod voice_handlers;

pub use audio_handlers::{ArtifactFile, GetArtifactHandler};
pub use presentation_handlers::{ExtractSlidesHandler, ExtractSlidesResponse};
pub use task_handlers::{GetTaskHandler, ListTasksHandler, TaskSummary};
pub use voice_handlers::{ListVoicesHandler, VoiceSummary};
