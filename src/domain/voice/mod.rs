//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 访问凭证
//! - 音色创建所需的样本音频表示

mod value_objects;

pub use value_objects::{ApiKey, AudioSample};
