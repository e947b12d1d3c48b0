//! 单行解析器产出的中间结构。
//!
//! 它们只在解码时从一行文本生成、随即组装进 [`Song`](crate::Song)，编码时则反过来由歌曲生成。
//! 刚解码出来的行总是有确定的时间，所以这里的时间标签不可为空。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::text_index::TextIndex;

/// 行层面的时间标签，值为毫秒。
pub type RawTimeTags = BTreeMap<TextIndex, i64>;

/// 一行歌词。
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LrcLyric {
    /// 歌词文本
    pub text: String,
    /// 行首时间。LRC 允许一行带多个开始时间，所以是数组；KAR 格式下总为空。
    pub start_times: Vec<i64>,
    /// 逐字时间标签，绝对时间。
    pub time_tags: RawTimeTags,
}

/// 一条注音声明。
///
/// ```text
/// @Ruby1=帰,かえ
/// @Ruby25=時,じか,,[00:38.45]
/// @Ruby49=時,とき,[00:38.45],[01:04.49]
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LrcRuby {
    /// 被注音的文本
    pub parent: String,
    /// 注音文本
    pub ruby: String,
    /// 注音文本的时间标签，相对于被注音区间的开始时间。
    pub time_tags: RawTimeTags,
    /// 生效时间窗口的开始，`None` 表示不限。
    pub start_time: Option<i64>,
    /// 生效时间窗口的结束，`None` 表示不限。
    pub end_time: Option<i64>,
}

/// 所有单行解析器共用的行类型。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LrcLine {
    /// 歌词行
    Lyric(LrcLyric),
    /// 注音声明行
    Ruby(LrcRuby),
    /// 空行，编码时用来分隔歌词与注音声明。
    Blank,
}

impl LrcLine {
    /// 行类型的名称，用于日志和错误信息。
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Lyric(_) => "lyric",
            Self::Ruby(_) => "ruby",
            Self::Blank => "blank",
        }
    }
}
