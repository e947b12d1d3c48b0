//! # 注音对齐
//!
//! 把与位置无关的注音声明（`@Ruby1=島,しま,,[00:02.00]`）落实到某一行歌词的具体字符区间上。
//!
//! 同一个被注音文本可能在一行、乃至整首歌中反复出现，而读音不一定相同。
//! 声明可以带一个时间窗口，只有处于窗口内的出现位置才会被采用。

use tracing::trace;

use crate::converter::types::LrcRuby;
use crate::model::{
    song::{Lyric, RubyTag, TimeTags},
    text_index::TextIndex,
};

/// 一个时间标签：位置与时间。
pub type TimeTagEntry = (TextIndex, i64);

/// 找到区间 `[start, end)` 两侧最近的时间标签。
///
/// 开始标签是间隙索引不大于 `start` 的最后一个标签，结束标签是间隙索引不小于 `end` 的第一个标签。
/// 时间为空的标签不参与查找。
#[must_use]
pub fn find_boundary_time_tags(
    time_tags: &TimeTags,
    start: usize,
    end: usize,
) -> (Option<TimeTagEntry>, Option<TimeTagEntry>) {
    let start = start as isize;
    let end = end as isize;

    let start_time_tag = time_tags
        .iter()
        .rev()
        .filter_map(|(index, time)| time.map(|t| (*index, t)))
        .find(|(index, _)| index.gap_index() <= start);

    let end_time_tag = time_tags
        .iter()
        .filter_map(|(index, time)| time.map(|t| (*index, t)))
        .find(|(index, _)| index.gap_index() >= end);

    (start_time_tag, end_time_tag)
}

/// 把注音声明解析为这一行歌词上的注音标签，结果按区间排序。
#[must_use]
pub fn resolve_ruby_tags(lyric: &Lyric, rubies: &[LrcRuby]) -> Vec<RubyTag> {
    let mut ruby_tags: Vec<RubyTag> = rubies
        .iter()
        .filter(|ruby| is_valid_declaration(ruby))
        .flat_map(|ruby| resolve_single_ruby(lyric, ruby))
        .collect();

    ruby_tags.sort_by_key(|tag| (tag.start_index, tag.end_index));
    ruby_tags
}

/// 注音或被注音文本为空，或两者相同的声明没有意义。
fn is_valid_declaration(ruby: &LrcRuby) -> bool {
    if ruby.ruby.is_empty() || ruby.parent.is_empty() || ruby.ruby == ruby.parent {
        trace!(
            "[RubyAlign] 忽略无效的注音声明: {},{}",
            ruby.parent,
            ruby.ruby
        );
        return false;
    }
    true
}

fn resolve_single_ruby(lyric: &Lyric, ruby: &LrcRuby) -> Vec<RubyTag> {
    find_occurrences(&lyric.text, &ruby.parent)
        .into_iter()
        .filter_map(|(start, end)| {
            let (start_time_tag, end_time_tag) =
                find_boundary_time_tags(&lyric.time_tags, start, end);

            if !is_in_time_window(ruby, start_time_tag, end_time_tag) {
                trace!(
                    "[RubyAlign] '{}' 在 [{start}, {end}) 处不在时间窗口内，跳过",
                    ruby.parent
                );
                return None;
            }

            let offset = start_time_tag.map_or(0, |(_, time)| time);
            Some(RubyTag {
                text: ruby.ruby.clone(),
                start_index: start,
                end_index: end,
                time_tags: ruby
                    .time_tags
                    .iter()
                    .map(|(index, time)| (*index, Some(time + offset)))
                    .collect(),
            })
        })
        .collect()
}

/// 窗口的两端分别检查，没有给出的一端视为不限。
///
/// 区间缺少某一侧的时间标签时，用另一侧的时间代替。
fn is_in_time_window(
    ruby: &LrcRuby,
    start_time_tag: Option<TimeTagEntry>,
    end_time_tag: Option<TimeTagEntry>,
) -> bool {
    let start_time = start_time_tag.or(end_time_tag).map(|(_, time)| time);
    let end_time = end_time_tag.or(start_time_tag).map(|(_, time)| time);

    let start_ok = ruby
        .start_time
        .is_none_or(|window_start| start_time.is_some_and(|time| window_start <= time));
    let end_ok = ruby
        .end_time
        .is_none_or(|window_end| end_time.is_some_and(|time| window_end >= time));

    start_ok && end_ok
}

/// 查找 `parent` 在 `text` 中所有不重叠的出现位置，返回字符区间。
fn find_occurrences(text: &str, parent: &str) -> Vec<(usize, usize)> {
    let parent_len = parent.chars().count();
    let mut occurrences = Vec::new();
    let mut char_cursor = 0;
    let mut byte_cursor = 0;

    for (byte_index, _) in text.match_indices(parent) {
        char_cursor += text[byte_cursor..byte_index].chars().count();
        byte_cursor = byte_index;
        occurrences.push((char_cursor, char_cursor + parent_len));
    }

    occurrences
}
