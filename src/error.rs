use thiserror::Error;

/// 定义歌词编解码过程中可能发生的各种错误。
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 无效的时间格式字符串，或无法编码的时间值。
    #[error("无效的时间格式: {0}")]
    InvalidTime(String),
    /// 无效的歌词格式。
    #[error("无效的歌词格式: {0}")]
    InvalidLyricFormat(String),
    /// 行解析器收到了它不负责的行类型，说明解析器注册有误。
    #[error("行解析器 {parser} 无法处理 {line} 类型的行")]
    LineKindMismatch {
        /// 出错的行解析器名称
        parser: &'static str,
        /// 实际收到的行类型
        line: &'static str,
    },
    /// 配置解析错误，来自 `toml` 库。
    #[error("解析配置失败: {0}")]
    Config(#[from] toml::de::Error),
}

impl ConvertError {
    /// 创建一个 `LineKindMismatch` 错误。
    #[must_use]
    pub const fn line_kind_mismatch(parser: &'static str, line: &'static str) -> Self {
        Self::LineKindMismatch { parser, line }
    }
}
