//! Presentation Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::SlideExtractorPort;
use crate::application::queries::ExtractSlides;

/// 提取结果
#[derive(Debug, Clone)]
pub struct ExtractSlidesResponse {
    pub slide_count: usize,
    pub slides: Vec<String>,
}

/// ExtractSlides Handler
///
/// 纯转发：空文稿返回空序列（不是错误），
/// 调用方需将其视为"无可提交内容"
pub struct ExtractSlidesHandler {
    extractor: Arc<dyn SlideExtractorPort>,
}

impl ExtractSlidesHandler {
    pub fn new(extractor: Arc<dyn SlideExtractorPort>) -> Self {
        Self { extractor }
    }

    pub async fn handle(
        &self,
        query: ExtractSlides,
    ) -> Result<ExtractSlidesResponse, ApplicationError> {
        if query.file_bytes.is_empty() {
            return Err(ApplicationError::EmptyPayload);
        }

        let slides = self.extractor.extract(&query.file_bytes)?;

        tracing::info!(slide_count = slides.len(), "Presentation extracted");

        Ok(ExtractSlidesResponse {
            slide_count: slides.len(),
            slides,
        })
    }
}
