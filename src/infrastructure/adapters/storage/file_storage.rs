//! File Storage - 文件系统音频存储实现
//!
//! 实现 AudioStoragePort trait。两个独立目录:
//! - voices: 参考音频，注册表独占持有
//! - artifacts: 合成产物

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{AudioStorageError, AudioStoragePort};
use crate::domain::voice::AudioFormat;

/// 文件系统音频存储
pub struct FileAudioStorage {
    voices_dir: PathBuf,
    artifacts_dir: PathBuf,
}

impl FileAudioStorage {
    /// 创建新的文件存储，目录不存在时自动创建
    pub async fn new(
        voices_dir: impl AsRef<Path>,
        artifacts_dir: impl AsRef<Path>,
    ) -> Result<Self, AudioStorageError> {
        let voices_dir = voices_dir.as_ref().to_path_buf();
        let artifacts_dir = artifacts_dir.as_ref().to_path_buf();

        fs::create_dir_all(&voices_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;
        fs::create_dir_all(&artifacts_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        Ok(Self {
            voices_dir,
            artifacts_dir,
        })
    }

    pub fn voices_dir(&self) -> &Path {
        &self.voices_dir
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }
}

#[async_trait]
impl AudioStoragePort for FileAudioStorage {
    async fn save_voice_sample(
        &self,
        sample_id: &str,
        format: AudioFormat,
        data: &[u8],
    ) -> Result<PathBuf, AudioStorageError> {
        let path = self
            .voices_dir
            .join(format!("{}.{}", sample_id, format.extension()));

        fs::write(&path, data)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        tracing::debug!(
            "Saved voice sample: id={}, size={} bytes",
            sample_id,
            data.len()
        );

        Ok(path)
    }

    async fn delete_voice_sample(&self, path: &PathBuf) -> Result<(), AudioStorageError> {
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(path)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))
    }

    async fn save_artifact(
        &self,
        task_id: &str,
        data: &[u8],
    ) -> Result<String, AudioStorageError> {
        let filename = format!("{}.wav", task_id);
        let final_path = self.artifacts_dir.join(&filename);
        let tmp_path = self.artifacts_dir.join(format!("{}.tmp", filename));

        // 临时文件 + rename，产物要么完整可见要么不可见
        fs::write(&tmp_path, data)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;
        fs::rename(&tmp_path, &final_path)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        tracing::debug!(
            "Saved artifact: task={}, size={} bytes",
            task_id,
            data.len()
        );

        Ok(filename)
    }

    fn artifact_path(&self, filename: &str) -> PathBuf {
        self.artifacts_dir.join(filename)
    }

    async fn read_artifact(&self, filename: &str) -> Result<Vec<u8>, AudioStorageError> {
        let path = self.artifact_path(filename);
        if !path.exists() {
            return Err(AudioStorageError::FileNotFound(
                path.to_string_lossy().to_string(),
            ));
        }
        fs::read(&path)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))
    }

    async fn delete_artifact(&self, filename: &str) -> Result<(), AudioStorageError> {
        let path = self.artifact_path(filename);
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))
    }
}
