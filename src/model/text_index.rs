//! # 文本位置模型
//!
//! 一个 `TextIndex` 指向某个字符的开始或结束边界。
//!
//! ```text
//! [0]カ[1]ラ[2]オ[3]ケ[4]
//! ```
//!
//! 上图中的数字是"间隙索引"。`TextIndex::start(1)` 与 `TextIndex::end(0)`
//! 落在同一个间隙上，但前者表示"ラ"的开始，后者表示"カ"的结束。

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// 位置所指的边界类型。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum IndexState {
    /// 字符的开始边界
    #[default]
    Start,
    /// 字符的结束边界
    End,
}

/// 文本中的一个位置。
///
/// 排序规则：先比较 `index`，相同时 `Start` 排在 `End` 之前。
/// 这样在同一个间隙上插入多个时间标签时，前一个字符的结束标签总是先于后一个字符的开始标签。
///
/// `index` 是有符号的：行首时间标签后紧跟空格时，解码会得到 `(-1, End)`，其间隙索引为 0。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct TextIndex {
    /// 字符索引（按 `char` 计）
    pub index: isize,
    /// 边界类型
    pub state: IndexState,
}

impl TextIndex {
    #[must_use]
    pub const fn new(index: isize, state: IndexState) -> Self {
        Self { index, state }
    }

    /// 指向第 `index` 个字符开始边界的位置。
    #[must_use]
    pub const fn start(index: isize) -> Self {
        Self::new(index, IndexState::Start)
    }

    /// 指向第 `index` 个字符结束边界的位置。
    #[must_use]
    pub const fn end(index: isize) -> Self {
        Self::new(index, IndexState::End)
    }

    /// 用于引用字符本身的索引。
    #[must_use]
    pub const fn char_index(self) -> isize {
        self.index
    }

    /// 用于插入时间标签和比较区间边界的间隙索引。
    #[must_use]
    pub const fn gap_index(self) -> isize {
        self.pick(self.index, self.index + 1)
    }

    /// 根据边界类型在两个值中选择一个。
    #[must_use]
    pub const fn pick<T: Copy>(self, start_value: T, end_value: T) -> T {
        match self.state {
            IndexState::Start => start_value,
            IndexState::End => end_value,
        }
    }
}

impl fmt::Display for TextIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.index, self.state)
    }
}
