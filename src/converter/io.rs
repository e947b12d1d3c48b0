//! 按格式选择解析器的入口。

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};
use tracing::debug;

use crate::converter::{
    config::ConversionOptions,
    parsers::{KarParser, LrcParser, LyricParser},
};
use crate::error::ConvertError;
use crate::model::song::Song;

/// 枚举：表示支持的歌词格式。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Serialize, Deserialize, EnumIter, Default,
)]
#[strum(ascii_case_insensitive)]
pub enum LyricFormat {
    /// 逐字时间标签使用方括号的卡拉 OK 歌词，不带行首时间。
    #[default]
    Kar,
    /// 带行首时间的 LRC，逐字时间标签使用尖括号。
    Lrc,
}

impl LyricFormat {
    /// 将歌词格式枚举转换为对应的文件扩展名字符串。
    #[must_use]
    pub const fn to_extension_str(self) -> &'static str {
        match self {
            Self::Kar => "kar",
            Self::Lrc => "lrc",
        }
    }

    /// 从字符串（通常是文件扩展名或用户输入）解析歌词格式枚举。
    /// 此方法不区分大小写，并会移除输入字符串中的空格和点。
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        let normalized_s = s.to_uppercase().replace([' ', '.'], "");
        match normalized_s.as_str() {
            "KAR" | "KARAOKE" => Some(Self::Kar),
            "LRC" | "ENHANCEDLRC" | "ELRC" => Some(Self::Lrc),
            _ => None,
        }
    }

    fn parser(self, options: &ConversionOptions) -> Box<dyn LyricParser> {
        match self {
            Self::Kar => Box::new(KarParser::new(&options.kar_parsing)),
            Self::Lrc => Box::new(LrcParser::new(&options.lrc_parsing)),
        }
    }
}

impl fmt::Display for LyricFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kar => write!(f, "KAR"),
            Self::Lrc => write!(f, "LRC"),
        }
    }
}

/// 把指定格式的歌词文本解析为歌曲。
pub fn parse_lyrics(
    content: &str,
    format: LyricFormat,
    options: &ConversionOptions,
) -> Result<Song, ConvertError> {
    let song = format.parser(options).decode(content)?;
    debug!("[Converter] 以 {format} 格式解析出 {} 行歌词", song.lyrics.len());
    Ok(song)
}

/// 把歌曲生成为指定格式的歌词文本。
pub fn generate_lyrics(
    song: &Song,
    format: LyricFormat,
    options: &ConversionOptions,
) -> Result<String, ConvertError> {
    debug!("[Converter] 以 {format} 格式生成 {} 行歌词", song.lyrics.len());
    format.parser(options).encode(song)
}
