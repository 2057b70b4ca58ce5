//! Voice Commands

use crate::domain::voice::AudioFormat;

/// 注册声音样本命令
#[derive(Debug, Clone)]
pub struct RegisterVoice {
    /// 上传的原始音频字节
    pub audio_bytes: Vec<u8>,
    /// 调用方提供的格式提示（来自上传文件扩展名）
    pub format: AudioFormat,
    /// 调用方自定义的样本 ID，缺省则由系统生成
    pub custom_id: Option<String>,
}

/// 删除声音样本命令
#[derive(Debug, Clone)]
pub struct DeleteVoice {
    pub voice_id: String,
}
