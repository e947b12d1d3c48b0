use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// 同一位置出现多个时间标签时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DuplicateTimeTagStrategy {
    /// [默认] 保留最先解析到的时间，后面的直接丢弃。
    #[default]
    KeepFirst,
    /// 后解析到的时间覆盖之前的。
    KeepLast,
}

/// KAR 解析选项
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KarParsingOptions {
    /// 同一位置有多个时间标签时的处理策略。
    #[serde(default)]
    pub duplicate_time_tag_strategy: DuplicateTimeTagStrategy,
}

/// LRC 解析选项
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LrcParsingOptions {
    /// 同一位置有多个时间标签时的处理策略。
    #[serde(default)]
    pub duplicate_time_tag_strategy: DuplicateTimeTagStrategy,
}

/// 统一管理所有格式的转换选项
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// KAR 解析选项
    #[serde(default)]
    pub kar_parsing: KarParsingOptions,
    /// LRC 解析选项
    #[serde(default)]
    pub lrc_parsing: LrcParsingOptions,
}

impl ConversionOptions {
    /// 从 TOML 文本读取选项，缺失的字段使用默认值。
    pub fn from_toml_str(content: &str) -> Result<Self, ConvertError> {
        Ok(toml::from_str(content)?)
    }
}
