//! Voice Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{VoiceRecord, VoiceRepositoryPort};
use crate::application::queries::ListVoices;

/// 样本摘要，用于填充选择列表
#[derive(Debug, Clone)]
pub struct VoiceSummary {
    pub id: String,
    pub duration_seconds: f64,
    pub created_at: String,
}

impl From<VoiceRecord> for VoiceSummary {
    fn from(record: VoiceRecord) -> Self {
        Self {
            id: record.id,
            duration_seconds: record.duration_seconds,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// ListVoices Handler
///
/// 只读查询，按创建时间升序
pub struct ListVoicesHandler {
    voice_repo: Arc<dyn VoiceRepositoryPort>,
}

impl ListVoicesHandler {
    pub fn new(voice_repo: Arc<dyn VoiceRepositoryPort>) -> Self {
        Self { voice_repo }
    }

    pub async fn handle(&self, _query: ListVoices) -> Result<Vec<VoiceSummary>, ApplicationError> {
        let voices = self.voice_repo.find_all().await?;
        Ok(voices.into_iter().map(VoiceSummary::from).collect())
    }
}
