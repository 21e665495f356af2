//! Transcoder Adapter - 输出音频封装

mod wav_transcoder;

pub use wav_transcoder::{WavTranscoder, WAV_HEADER_LEN};
