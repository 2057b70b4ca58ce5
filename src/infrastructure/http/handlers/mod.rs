//! HTTP Handlers

mod audio;
mod ping;
mod presentation;
mod task;
mod voice;

pub use audio::*;
pub use ping::*;
pub use presentation::*;
pub use task::*;
pub use voice::*;
