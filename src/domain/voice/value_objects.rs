//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::VoiceError;

/// 样本唯一标识
///
/// 不变量:
/// - 创建后不可变
/// - 自定义 ID 限定为 1..=64 个 `[A-Za-z0-9_-]` 字符
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleId(String);

impl SampleId {
    /// 生成新的随机样本 ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// 使用调用方提供的自定义 ID
    pub fn custom(id: impl Into<String>) -> Result<Self, VoiceError> {
        let id = id.into();
        if id.is_empty() {
            return Err(VoiceError::InvalidId("样本 ID 不能为空"));
        }
        if id.len() > 64 {
            return Err(VoiceError::InvalidId("样本 ID 长度不能超过64字符"));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(VoiceError::InvalidId(
                "样本 ID 只能包含字母、数字、下划线和连字符",
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SampleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 参考音频格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
    Ogg,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "flac" => Some(Self::Flac),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::Flac => "audio/flac",
            Self::Ogg => "audio/ogg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = SampleId::generate();
        let b = SampleId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_custom_id_accepts_valid_charset() {
        let id = SampleId::custom("teacher_wang-01").unwrap();
        assert_eq!(id.as_str(), "teacher_wang-01");
    }

    #[test]
    fn test_custom_id_rejects_empty() {
        assert!(SampleId::custom("").is_err());
    }

    #[test]
    fn test_custom_id_rejects_invalid_chars() {
        assert!(matches!(
            SampleId::custom("老师声音"),
            Err(VoiceError::InvalidId(_))
        ));
        assert!(matches!(
            SampleId::custom("voice 01"),
            Err(VoiceError::InvalidId(_))
        ));
        assert!(matches!(SampleId::custom("a/b"), Err(VoiceError::InvalidId(_))));
    }

    #[test]
    fn test_custom_id_rejects_overlong() {
        assert!(SampleId::custom("x".repeat(65)).is_err());
        assert!(SampleId::custom("x".repeat(64)).is_ok());
    }

    #[test]
    fn test_audio_format_roundtrip() {
        assert_eq!(AudioFormat::from_extension("WAV"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_extension("webm"), None);
        assert_eq!(AudioFormat::Mp3.content_type(), "audio/mpeg");
    }
}
