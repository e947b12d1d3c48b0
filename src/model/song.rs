use std::collections::BTreeMap;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::model::text_index::TextIndex;

/// 歌曲层面的时间标签。值为 `None` 表示该位置没有确定的时间，编码时会被跳过。
pub type TimeTags = BTreeMap<TextIndex, Option<i64>>;

/// 一首歌，由按顺序排列的歌词行组成。
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// 歌词行
    pub lyrics: Vec<Lyric>,
}

/// 一行歌词。
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(default)]
pub struct Lyric {
    /// 不含时间标签的歌词文本
    #[builder(setter(into))]
    pub text: String,
    /// 行的开始时间（毫秒），只有带行首时间的格式会设置它。
    #[builder(setter(strip_option))]
    pub start_time: Option<i64>,
    /// 逐字时间标签，绝对时间（毫秒）。
    pub time_tags: TimeTags,
    /// 注音标签
    #[builder(setter(each = "ruby_tag"))]
    pub ruby_tags: Vec<RubyTag>,
}

impl Lyric {
    /// 按字符数计的文本长度。
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// 取出 `[start_index, end_index)` 范围内的文本。区间无效时返回 `None`。
    #[must_use]
    pub fn substring(&self, start_index: usize, end_index: usize) -> Option<String> {
        if start_index >= end_index || end_index > self.char_len() {
            return None;
        }
        Some(
            self.text
                .chars()
                .skip(start_index)
                .take(end_index - start_index)
                .collect(),
        )
    }
}

/// 注音（ruby）标签，附着在所属歌词的一段字符上。
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubyTag {
    /// 注音文本，例如假名读音
    pub text: String,
    /// 所属歌词中的起始字符索引（包含）
    pub start_index: usize,
    /// 所属歌词中的结束字符索引（不包含）
    pub end_index: usize,
    /// 注音文本自身的时间标签，键指向注音文本，值为绝对时间（毫秒）。
    pub time_tags: TimeTags,
}
