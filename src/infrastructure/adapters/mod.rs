//! Infrastructure Adapters

pub mod audio;
pub mod pptx;
pub mod storage;
pub mod tts;

pub use audio::SymphoniaAudioProbe;
pub use pptx::PptxSlideExtractor;
pub use storage::FileAudioStorage;
pub use tts::{FakeTtsClient, FakeTtsClientConfig, HttpTtsClient, HttpTtsClientConfig};
