//! # 带时间标签的文本
//!
//! 在 "纯文本 + 位置到时间的映射" 与 "插入了时间标签的文本" 之间互相转换。
//! 两种格式只在时间标签的括号上有区别，算法是同一个。

use crate::converter::{
    config::DuplicateTimeTagStrategy,
    time_tag::{TimeTagBracket, millisecond_to_time_tag, time_tag_to_millisecond},
    types::RawTimeTags,
};
use crate::model::text_index::{IndexState, TextIndex};

/// 将带时间标签的文本拆分为纯文本和时间标签。
///
/// ```text
/// [00:17:97]帰[00:18:37]り[00:18:55]道[00:18:94]は[00:19:22]
/// ```
///
/// 拆分为 `帰り道は` 以及 `[0,start]:17970 ... [3,end]:19220`。
///
/// 时间标签后面还有文本且不是空格时，它指向下一个字符的开始；否则指向上一个字符的结束。
pub fn timed_text_to_object(
    timed_text: &str,
    bracket: TimeTagBracket,
    strategy: DuplicateTimeTagStrategy,
) -> (String, RawTimeTags) {
    let mut text = String::new();
    let mut text_len: isize = 0;
    let mut time_tags = RawTimeTags::new();

    if timed_text.is_empty() {
        return (text, time_tags);
    }

    let mut last_end = 0;
    for m in bracket.regex().find_iter(timed_text) {
        let between = &timed_text[last_end..m.start()];
        text.push_str(between);
        text_len += between.chars().count() as isize;

        last_end = m.end();

        let rest = &timed_text[last_end..];
        let has_text = !rest.is_empty();
        let is_space_next = rest.starts_with(' ');

        let state = if has_text && !is_space_next {
            IndexState::Start
        } else {
            IndexState::End
        };
        let text_index = TextIndex::new(text_len - state_offset(state), state);
        let time = time_tag_to_millisecond(m.as_str(), bracket);

        match strategy {
            // 同一位置可能出现重复的时间标签
            DuplicateTimeTagStrategy::KeepFirst => {
                time_tags.entry(text_index).or_insert(time);
            }
            DuplicateTimeTagStrategy::KeepLast => {
                time_tags.insert(text_index, time);
            }
        }
    }

    text.push_str(&timed_text[last_end..]);

    (text, time_tags)
}

const fn state_offset(state: IndexState) -> isize {
    match state {
        IndexState::Start => 0,
        IndexState::End => 1,
    }
}

/// 将纯文本和时间标签合并为带时间标签的文本。
///
/// 时间标签按位置顺序插入到各自的间隙索引处；超出文本范围的位置会被限制在文本两端。
#[must_use]
pub fn to_timed_text(text: &str, time_tags: &RawTimeTags, bracket: TimeTagBracket) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut timed_text = String::with_capacity(text.len() + time_tags.len() * 10);
    let mut cursor = 0;

    for (text_index, &time) in time_tags {
        let gap_index = text_index.gap_index().clamp(0, chars.len() as isize) as usize;
        if gap_index > cursor {
            timed_text.extend(&chars[cursor..gap_index]);
            cursor = gap_index;
        }
        timed_text.push_str(&millisecond_to_time_tag(time, bracket));
    }

    timed_text.extend(&chars[cursor..]);
    timed_text
}
