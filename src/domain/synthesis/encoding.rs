//! Synthesis Context - 采样率 → 音频编码映射表
//!
//! 实时合成服务只接受有限的几种输出编码。这里维护一张显式的映射表，
//! 每个采样率对应一个编码描述符（声道数、位深、线路格式标签）。
//! 扩展新编码只需要在 [`BUILTIN_ENCODINGS`] 中追加一项，调用方无需改动。

use std::collections::BTreeMap;

use super::SynthesisError;

/// 音频编码描述符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingDescriptor {
    /// 采样率（Hz）
    pub sample_rate: u32,
    /// 声道数
    pub channels: u16,
    /// 位深度
    pub bits_per_sample: u16,
    /// 线路上的 response_format 取值
    pub wire_format: &'static str,
    /// 编码标签（日志和追踪用）
    pub tag: &'static str,
}

impl EncodingDescriptor {
    /// 每秒字节数
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.channels as u32 * (self.bits_per_sample / 8) as u32
    }

    /// 根据 PCM 字节数计算时长（毫秒）
    pub fn duration_ms(&self, pcm_len: usize) -> u64 {
        let byte_rate = self.byte_rate() as u64;
        if byte_rate == 0 {
            return 0;
        }
        pcm_len as u64 * 1000 / byte_rate
    }
}

/// 内置编码表
///
/// 目前服务端只确认支持 24kHz 单声道 16 位 PCM。
pub const BUILTIN_ENCODINGS: &[EncodingDescriptor] = &[EncodingDescriptor {
    sample_rate: 24000,
    channels: 1,
    bits_per_sample: 16,
    wire_format: "pcm",
    tag: "PCM_24000HZ_MONO_16BIT",
}];

/// 采样率 → 编码描述符映射表
#[derive(Debug, Clone)]
pub struct EncodingTable {
    entries: BTreeMap<u32, EncodingDescriptor>,
}

impl EncodingTable {
    /// 空表
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// 追加（或替换）一个编码
    pub fn with_encoding(mut self, descriptor: EncodingDescriptor) -> Self {
        self.entries.insert(descriptor.sample_rate, descriptor);
        self
    }

    /// 查找采样率对应的编码
    pub fn lookup(&self, sample_rate: u32) -> Result<EncodingDescriptor, SynthesisError> {
        self.entries
            .get(&sample_rate)
            .copied()
            .ok_or(SynthesisError::UnsupportedSampleRate(sample_rate))
    }

    pub fn supports(&self, sample_rate: u32) -> bool {
        self.entries.contains_key(&sample_rate)
    }

    /// 已支持的采样率（升序）
    pub fn sample_rates(&self) -> Vec<u32> {
        self.entries.keys().copied().collect()
    }
}

impl Default for EncodingTable {
    fn default() -> Self {
        BUILTIN_ENCODINGS
            .iter()
            .fold(Self::empty(), |table, descriptor| table.with_encoding(*descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rate_is_supported() {
        let table = EncodingTable::default();
        let encoding = table.lookup(24000).unwrap();
        assert_eq!(encoding.channels, 1);
        assert_eq!(encoding.bits_per_sample, 16);
        assert_eq!(encoding.wire_format, "pcm");
    }

    #[test]
    fn test_unknown_rate_is_rejected() {
        let table = EncodingTable::default();
        assert!(matches!(
            table.lookup(12345),
            Err(SynthesisError::UnsupportedSampleRate(12345))
        ));
        assert!(!table.supports(16000));
    }

    #[test]
    fn test_table_extension() {
        let table = EncodingTable::default().with_encoding(EncodingDescriptor {
            sample_rate: 16000,
            channels: 1,
            bits_per_sample: 16,
            wire_format: "pcm",
            tag: "PCM_16000HZ_MONO_16BIT",
        });
        assert_eq!(table.sample_rates(), vec![16000, 24000]);
        assert_eq!(table.lookup(16000).unwrap().tag, "PCM_16000HZ_MONO_16BIT");
    }

    #[test]
    fn test_duration() {
        let encoding = EncodingTable::default().lookup(24000).unwrap();
        assert_eq!(encoding.byte_rate(), 48000);
        assert_eq!(encoding.duration_ms(48000), 1000);
        assert_eq!(encoding.duration_ms(0), 0);
    }
}
