//! Symphonia Audio Probe - 参考音频校验与时长探测
//!
//! 实现 AudioProbePort trait。注册路径上同步调用，
//! 只读取容器/编码元数据，不做完整解码

use std::io::Cursor;

use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioInfo, AudioProbePort, ProbeError};

/// 基于 symphonia 的音频探测器
pub struct SymphoniaAudioProbe;

impl SymphoniaAudioProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SymphoniaAudioProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioProbePort for SymphoniaAudioProbe {
    fn probe(&self, data: &[u8]) -> Result<AudioInfo, ProbeError> {
        let mss = MediaSourceStream::new(
            Box::new(Cursor::new(data.to_vec())),
            Default::default(),
        );

        let probed = symphonia::default::get_probe()
            .format(
                &Hint::new(),
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| ProbeError::Undecodable(e.to_string()))?;

        let format = probed.format;
        let track = format
            .default_track()
            .ok_or_else(|| ProbeError::Undecodable("no audio track".to_string()))?;

        let params = &track.codec_params;
        let sample_rate = params.sample_rate;
        let channels = params.channels.map(|c| c.count() as u16);

        // 优先 n_frames / sample_rate，退回 time_base 换算
        let duration_seconds = match (params.n_frames, sample_rate, params.time_base) {
            (Some(frames), Some(rate), _) if rate > 0 => frames as f64 / rate as f64,
            (Some(frames), _, Some(tb)) => {
                let time = tb.calc_time(frames);
                time.seconds as f64 + time.frac
            }
            _ => {
                return Err(ProbeError::UnsupportedCodec(
                    "stream does not report duration".to_string(),
                ))
            }
        };

        Ok(AudioInfo {
            duration_seconds,
            sample_rate,
            channels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 生成 PCM16 单声道 WAV 测试数据
    pub(crate) fn make_wav(sample_rate: u32, seconds: f64) -> Vec<u8> {
        let num_samples = (sample_rate as f64 * seconds) as u32;
        let data_size = num_samples * 2;
        let mut wav = Vec::with_capacity(44 + data_size as usize);

        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_size).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&(sample_rate * 2).to_le_bytes()); // byte rate
        wav.extend_from_slice(&2u16.to_le_bytes()); // block align
        wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_size.to_le_bytes());
        wav.resize(44 + data_size as usize, 0);
        wav
    }

    #[test]
    fn test_probe_wav_duration() {
        let probe = SymphoniaAudioProbe::new();
        let info = probe.probe(&make_wav(16000, 10.0)).unwrap();
        assert!((info.duration_seconds - 10.0).abs() < 0.05);
        assert_eq!(info.sample_rate, Some(16000));
        assert_eq!(info.channels, Some(1));
    }

    #[test]
    fn test_probe_rejects_garbage() {
        let probe = SymphoniaAudioProbe::new();
        assert!(probe.probe(b"this is definitely not audio data").is_err());
    }

    #[test]
    fn test_probe_rejects_truncated_header() {
        let probe = SymphoniaAudioProbe::new();
        let wav = make_wav(16000, 1.0);
        assert!(probe.probe(&wav[..20]).is_err());
    }
}
