//! WAV Transcoder - PCM 封装器
//!
//! 支持：
//! - 单声道 16 位 PCM → WAV 容器（44 字节标准头）
//! - 原始 PCM pass-through
//! - WAV 头解析和信息提取

use crate::application::ports::{
    AudioFormat, AudioInfo, AudioTranscoderPort, EncodedAudio, TranscodeError,
};

const PCM_FORMAT_TAG: u16 = 1;
const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// 标准头长度
pub const WAV_HEADER_LEN: usize = 44;

/// WAV 转码器
///
/// 输入假定已经是单声道 16 位小端 PCM，不做重采样和混音
#[derive(Debug, Clone, Copy, Default)]
pub struct WavTranscoder;

impl WavTranscoder {
    pub fn new() -> Self {
        Self
    }

    /// 将 PCM 编码为 WAV
    ///
    /// 奇数长度的数据后补一个填充字节，data chunk 声明的仍是真实长度
    pub fn encode_wav(&self, pcm: &[u8], sample_rate: u32) -> Result<Vec<u8>, TranscodeError> {
        if sample_rate == 0 {
            return Err(TranscodeError::InvalidSampleRate(sample_rate));
        }

        let block_align = CHANNELS * (BITS_PER_SAMPLE / 8);
        let byte_rate = sample_rate
            .checked_mul(u32::from(block_align))
            .ok_or(TranscodeError::InvalidSampleRate(sample_rate))?;
        let (data_size, riff_size) = chunk_sizes(pcm.len())?;
        let pad = pcm.len() % 2;

        let mut wav = Vec::with_capacity(WAV_HEADER_LEN + pcm.len() + pad);

        // RIFF header
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&riff_size.to_le_bytes());
        wav.extend_from_slice(b"WAVE");

        // fmt chunk
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        wav.extend_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
        wav.extend_from_slice(&CHANNELS.to_le_bytes());
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&byte_rate.to_le_bytes());
        wav.extend_from_slice(&block_align.to_le_bytes());
        wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

        // data chunk
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_size.to_le_bytes());
        wav.extend_from_slice(pcm);
        if pad == 1 {
            wav.push(0);
        }

        Ok(wav)
    }

    /// 取出 data chunk 中的 PCM 数据
    pub fn pcm_payload<'a>(&self, wav_data: &'a [u8]) -> Result<&'a [u8], TranscodeError> {
        let header = parse_wav_header(wav_data)?;
        Ok(&wav_data[header.data_start..header.data_start + header.data_size])
    }
}

/// data chunk 长度和 RIFF 长度（含填充字节），超出 u32 时报错
fn chunk_sizes(pcm_len: usize) -> Result<(u32, u32), TranscodeError> {
    let too_large = || TranscodeError::InvalidInput("PCM data too large for WAV".to_string());
    let data_size = u32::try_from(pcm_len).map_err(|_| too_large())?;
    let pad = (pcm_len % 2) as u32;
    let riff_size = data_size
        .checked_add(36 + pad)
        .ok_or_else(too_large)?;
    Ok((data_size, riff_size))
}

/// 解析 WAV 文件头
fn parse_wav_header(data: &[u8]) -> Result<WavHeader, TranscodeError> {
    if data.len() < WAV_HEADER_LEN {
        return Err(TranscodeError::InvalidInput(
            "WAV data too short".to_string(),
        ));
    }

    // 验证 RIFF 头
    if &data[0..4] != b"RIFF" {
        return Err(TranscodeError::InvalidInput(
            "Invalid WAV: missing RIFF header".to_string(),
        ));
    }

    // 验证 WAVE 标识
    if &data[8..12] != b"WAVE" {
        return Err(TranscodeError::InvalidInput(
            "Invalid WAV: missing WAVE identifier".to_string(),
        ));
    }

    let mut pos = 12;
    let mut fmt_chunk: Option<FmtChunk> = None;

    while pos + 8 <= data.len() {
        let chunk_id = &data[pos..pos + 4];
        let chunk_size = read_u32(data, pos + 4) as usize;
        let body = pos + 8;

        match chunk_id {
            b"fmt " => {
                if chunk_size < 16 || body + 16 > data.len() {
                    return Err(TranscodeError::InvalidInput(
                        "Invalid fmt chunk size".to_string(),
                    ));
                }
                fmt_chunk = Some(FmtChunk {
                    num_channels: read_u16(data, body + 2),
                    sample_rate: read_u32(data, body + 4),
                    bits_per_sample: read_u16(data, body + 14),
                });
            }
            b"data" => {
                let fmt = fmt_chunk.ok_or_else(|| {
                    TranscodeError::InvalidInput("Invalid WAV: missing fmt chunk".to_string())
                })?;
                if body + chunk_size > data.len() {
                    return Err(TranscodeError::InvalidInput(
                        "Invalid WAV: truncated data chunk".to_string(),
                    ));
                }
                return Ok(WavHeader {
                    fmt,
                    data_start: body,
                    data_size: chunk_size,
                });
            }
            _ => {}
        }

        pos = body + chunk_size;
        // 对齐到偶数字节
        if chunk_size % 2 != 0 {
            pos += 1;
        }
    }

    Err(TranscodeError::InvalidInput(
        "Invalid WAV: missing data chunk".to_string(),
    ))
}

fn read_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn read_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn duration_ms(data_size: usize, sample_rate: u32, channels: u16, bits_per_sample: u16) -> u64 {
    let frame_bytes = channels as u64 * (bits_per_sample as u64 / 8);
    if sample_rate == 0 || frame_bytes == 0 {
        return 0;
    }
    (data_size as u64 / frame_bytes) * 1000 / sample_rate as u64
}

#[derive(Debug, Clone, Copy)]
struct WavHeader {
    fmt: FmtChunk,
    data_start: usize,
    data_size: usize,
}

#[derive(Debug, Clone, Copy)]
struct FmtChunk {
    num_channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

impl AudioTranscoderPort for WavTranscoder {
    fn encode(
        &self,
        pcm: &[u8],
        sample_rate: u32,
        format: AudioFormat,
    ) -> Result<EncodedAudio, TranscodeError> {
        if sample_rate == 0 {
            return Err(TranscodeError::InvalidSampleRate(sample_rate));
        }

        let audio_data = match format {
            AudioFormat::Wav => self.encode_wav(pcm, sample_rate)?,
            AudioFormat::Pcm => pcm.to_vec(),
        };

        Ok(EncodedAudio {
            audio_data,
            format,
            duration_ms: duration_ms(pcm.len(), sample_rate, CHANNELS, BITS_PER_SAMPLE),
        })
    }

    fn get_audio_info(&self, wav_data: &[u8]) -> Result<AudioInfo, TranscodeError> {
        let header = parse_wav_header(wav_data)?;

        Ok(AudioInfo {
            duration_ms: duration_ms(
                header.data_size,
                header.fmt.sample_rate,
                header.fmt.num_channels,
                header.fmt.bits_per_sample,
            ),
            sample_rate: header.fmt.sample_rate,
            channels: header.fmt.num_channels,
            bits_per_sample: header.fmt.bits_per_sample,
            data_size: header.data_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_header_fields() {
        let transcoder = WavTranscoder::new();
        for rate in [16000u32, 24000, 48000] {
            let pcm = vec![0u8; 4800];
            let wav = transcoder.encode_wav(&pcm, rate).unwrap();

            let info = transcoder.get_audio_info(&wav).unwrap();
            assert_eq!(
                (info.sample_rate, info.channels, info.bits_per_sample),
                (rate, 1, 16)
            );
            assert_eq!(info.data_size, pcm.len());
            assert_eq!(transcoder.pcm_payload(&wav).unwrap(), pcm.as_slice());
        }
    }

    #[test]
    fn test_canonical_header_layout() {
        let wav = WavTranscoder::new().encode_wav(&[1, 2, 3, 4], 24000).unwrap();

        assert_eq!(wav.len(), WAV_HEADER_LEN + 4);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(read_u32(&wav, 4), 40);
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(read_u16(&wav, 20), 1); // PCM
        assert_eq!(read_u32(&wav, 28), 48000); // byte rate
        assert_eq!(read_u16(&wav, 32), 2); // block align
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(read_u32(&wav, 40), 4);
    }

    #[test]
    fn test_odd_length_is_padded() {
        let transcoder = WavTranscoder::new();
        let wav = transcoder.encode_wav(&[9, 9, 9], 24000).unwrap();

        assert_eq!(wav.len(), WAV_HEADER_LEN + 4);
        assert_eq!(read_u32(&wav, 4), 36 + 4);
        assert_eq!(read_u32(&wav, 40), 3);
        assert_eq!(transcoder.pcm_payload(&wav).unwrap(), &[9, 9, 9]);
    }

    #[test]
    fn test_zero_sample_rate_is_rejected() {
        let transcoder = WavTranscoder::new();
        assert!(matches!(
            transcoder.encode_wav(&[0, 0], 0),
            Err(TranscodeError::InvalidSampleRate(0))
        ));
        assert!(matches!(
            transcoder.encode(&[0, 0], 0, AudioFormat::Pcm),
            Err(TranscodeError::InvalidSampleRate(0))
        ));
    }

    #[test]
    fn test_oversized_sample_rate_is_rejected() {
        let transcoder = WavTranscoder::new();
        assert!(matches!(
            transcoder.encode_wav(&[0, 0], u32::MAX),
            Err(TranscodeError::InvalidSampleRate(u32::MAX))
        ));
        assert!(transcoder.encode_wav(&[0, 0], u32::MAX / 2).is_ok());
    }

    #[test]
    fn test_chunk_sizes_near_u32_limit() {
        assert_eq!(chunk_sizes(3).unwrap(), (3, 40));
        assert_eq!(chunk_sizes(4).unwrap(), (4, 40));

        let largest = (u32::MAX - 36) as usize;
        assert_eq!(chunk_sizes(largest - 1).unwrap().1, u32::MAX - 1);
        assert!(chunk_sizes(largest + 1).is_err());
        assert!(chunk_sizes(u32::MAX as usize).is_err());
    }

    #[test]
    fn test_encode_formats() {
        let transcoder = WavTranscoder::new();
        let pcm = vec![0u8; 48000]; // 1 秒 @ 24kHz

        let wav = transcoder.encode(&pcm, 24000, AudioFormat::Wav).unwrap();
        assert_eq!(wav.mime_type(), "audio/wav");
        assert_eq!(wav.audio_data.len(), WAV_HEADER_LEN + pcm.len());
        assert_eq!(wav.duration_ms, 1000);

        let raw = transcoder.encode(&pcm, 24000, AudioFormat::Pcm).unwrap();
        assert_eq!(raw.mime_type(), "audio/pcm");
        assert_eq!(raw.audio_data, pcm);
        assert_eq!(raw.duration_ms, 1000);
    }

    #[test]
    fn test_invalid_input() {
        let transcoder = WavTranscoder::new();
        assert!(transcoder.get_audio_info(b"RIFF").is_err());

        let mut wav = transcoder.encode_wav(&[0; 8], 24000).unwrap();
        wav[8..12].copy_from_slice(b"AVI ");
        assert!(transcoder.get_audio_info(&wav).is_err());

        let mut truncated = transcoder.encode_wav(&[0; 8], 24000).unwrap();
        truncated.truncate(WAV_HEADER_LEN + 2);
        assert!(transcoder.pcm_payload(&truncated).is_err());
    }
}
