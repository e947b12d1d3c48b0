//! # 注音合并
//!
//! 注音对齐的逆过程：从整首歌的注音标签中还原出最少的注音声明。
//!
//! 同一个被注音文本的相邻出现位置通常读音相同，可以合并为一条声明。
//! 第一条声明的开始和最后一条声明的结束不写时间，中间的声明用时间窗口区分。

use tracing::warn;

use crate::converter::{
    ruby::align::find_boundary_time_tags,
    types::{LrcRuby, RawTimeTags},
    utils::group_by_continuous,
};
use crate::model::song::{Lyric, RubyTag, Song};

/// 从歌曲中提取出的一条注音记录，时间标签已转换为相对时间。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RubyRecord {
    /// 被注音文本
    pub parent: String,
    /// 注音文本
    pub ruby: String,
    /// 相对于被注音区间开始时间的时间标签
    pub time_tags: RawTimeTags,
    /// 被注音区间的开始时间（绝对）
    pub start_time: Option<i64>,
    /// 被注音区间的结束时间（绝对）
    pub end_time: Option<i64>,
}

/// 将歌曲中的注音标签合并为注音声明。
#[must_use]
pub fn merge_rubies(song: &Song) -> Vec<LrcRuby> {
    merge_ruby_records(extract_ruby_records(song))
}

/// 提取整首歌的注音记录。
#[must_use]
pub fn extract_ruby_records(song: &Song) -> Vec<RubyRecord> {
    song.lyrics
        .iter()
        .flat_map(|lyric| {
            lyric
                .ruby_tags
                .iter()
                .filter_map(move |ruby_tag| extract_ruby_record(lyric, ruby_tag))
        })
        .collect()
}

fn extract_ruby_record(lyric: &Lyric, ruby_tag: &RubyTag) -> Option<RubyRecord> {
    let Some(parent) = lyric.substring(ruby_tag.start_index, ruby_tag.end_index) else {
        warn!(
            "[RubyMerge] 注音 '{}' 的区间 [{}, {}) 超出歌词 '{}' 的范围，已跳过",
            ruby_tag.text, ruby_tag.start_index, ruby_tag.end_index, lyric.text
        );
        return None;
    };

    if ruby_tag.text.is_empty() || ruby_tag.text == parent {
        warn!(
            "[RubyMerge] 注音 '{}' 对 '{}' 没有意义，已跳过",
            ruby_tag.text, parent
        );
        return None;
    }

    let (start_time_tag, end_time_tag) =
        find_boundary_time_tags(&lyric.time_tags, ruby_tag.start_index, ruby_tag.end_index);
    let offset = start_time_tag.map_or(0, |(_, time)| time);

    // 早于区间开始的注音时间无法写成相对时间，按 0 处理
    let time_tags = ruby_tag
        .time_tags
        .iter()
        .filter_map(|(index, time)| time.map(|t| (*index, t - offset)))
        .map(|(index, time)| {
            if time < 0 {
                warn!(
                    "[RubyMerge] 注音 '{}' 在 {index} 处的时间早于 '{parent}' 的开始时间，已调整为区间开始",
                    ruby_tag.text
                );
            }
            (index, time.max(0))
        })
        .collect();

    let start_time = start_time_tag.map(|(_, time)| time);
    let end_time = end_time_tag.map(|(_, time)| time);
    if start_time.is_some_and(|t| t < 0) || end_time.is_some_and(|t| t < 0) {
        warn!(
            "[RubyMerge] '{parent}' 的时间标签为负数，生成的注音声明无法限定时间窗口"
        );
    }

    Some(RubyRecord {
        parent,
        ruby: ruby_tag.text.clone(),
        time_tags,
        start_time,
        end_time,
    })
}

/// 将注音记录合并为注音声明。
///
/// 记录先按被注音文本分组（按首次出现的顺序），组内按时间排序后，
/// 相邻且注音文本与时间标签都相同的记录合并为一条声明。
#[must_use]
pub fn merge_ruby_records(records: Vec<RubyRecord>) -> Vec<LrcRuby> {
    let mut parent_groups: Vec<(String, Vec<RubyRecord>)> = Vec::new();
    for record in records {
        match parent_groups
            .iter_mut()
            .find(|(parent, _)| *parent == record.parent)
        {
            Some((_, members)) => members.push(record),
            None => parent_groups.push((record.parent.clone(), vec![record])),
        }
    }

    parent_groups
        .into_iter()
        .flat_map(|(parent, mut members)| {
            members.sort_by_key(|r| (r.start_time, r.end_time));
            merge_parent_group(&parent, members)
        })
        .collect()
}

fn merge_parent_group(parent: &str, members: Vec<RubyRecord>) -> Vec<LrcRuby> {
    let runs = group_by_continuous(members, |r: &RubyRecord| (r.ruby.clone(), r.time_tags.clone()));
    let last_run = runs.len().saturating_sub(1);

    runs.into_iter()
        .enumerate()
        .map(|(i, ((ruby, time_tags), run))| {
            // 缺少一侧时间的记录用另一侧的时间代替
            let start_time = if i == 0 {
                None
            } else {
                run.iter().filter_map(|r| r.start_time.or(r.end_time)).min()
            };
            let end_time = if i == last_run {
                None
            } else {
                run.iter().filter_map(|r| r.end_time.or(r.start_time)).max()
            };

            LrcRuby {
                parent: parent.to_string(),
                ruby,
                time_tags,
                start_time,
                end_time,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{song::LyricBuilder, text_index::TextIndex};

    fn record(ruby: &str, start_time: i64, end_time: i64) -> RubyRecord {
        RubyRecord {
            parent: "島".to_string(),
            ruby: ruby.to_string(),
            time_tags: RawTimeTags::new(),
            start_time: Some(start_time),
            end_time: Some(end_time),
        }
    }

    fn windows(rubies: &[LrcRuby]) -> Vec<(&str, Option<i64>, Option<i64>)> {
        rubies
            .iter()
            .map(|r| (r.ruby.as_str(), r.start_time, r.end_time))
            .collect()
    }

    #[test]
    fn test_single_run_is_unbounded() {
        let merged = merge_ruby_records(vec![record("しま", 1000, 2000), record("しま", 3000, 4000)]);
        assert_eq!(windows(&merged), vec![("しま", None, None)]);
    }

    #[test]
    fn test_runs_get_windows() {
        let merged = merge_ruby_records(vec![
            record("とう", 5000, 6000),
            record("しま", 1000, 2000),
            record("じま", 3000, 4000),
            record("じま", 3500, 4500),
        ]);
        assert_eq!(
            windows(&merged),
            vec![
                ("しま", None, Some(2000)),
                ("じま", Some(3000), Some(4500)),
                ("とう", Some(5000), None),
            ]
        );
    }

    #[test]
    fn test_equal_but_not_adjacent_runs_stay_separate() {
        let merged = merge_ruby_records(vec![
            record("しま", 1000, 2000),
            record("じま", 3000, 4000),
            record("しま", 5000, 6000),
        ]);
        assert_eq!(
            windows(&merged),
            vec![
                ("しま", None, Some(2000)),
                ("じま", Some(3000), Some(4000)),
                ("しま", Some(5000), None),
            ]
        );
    }

    #[test]
    fn test_different_time_tags_split_run() {
        let mut timed = record("しま", 3000, 4000);
        timed.time_tags.insert(TextIndex::start(1), 500);

        let merged = merge_ruby_records(vec![record("しま", 1000, 2000), timed]);
        assert_eq!(merged.len(), 2);
        assert!(merged[0].time_tags.is_empty());
        assert_eq!(merged[1].time_tags.get(&TextIndex::start(1)), Some(&500));
    }

    #[test]
    fn test_different_parents_do_not_merge() {
        let mut other = record("かえ", 500, 800);
        other.parent = "帰".to_string();

        let merged = merge_ruby_records(vec![record("しま", 1000, 2000), other]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].parent, "島");
        assert_eq!(merged[1].parent, "帰");
        assert!(merged.iter().all(|r| r.start_time.is_none() && r.end_time.is_none()));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let records = vec![
            record("しま", 1000, 2000),
            record("じま", 2000, 3000),
            record("とう", 3000, 4000),
        ];
        assert_eq!(
            merge_ruby_records(records.clone()),
            merge_ruby_records(records)
        );
    }

    #[test]
    fn test_extract_rebases_time_tags() {
        let lyric = LyricBuilder::default()
            .text("帰り")
            .time_tags(
                [
                    (TextIndex::start(0), Some(17970)),
                    (TextIndex::start(1), Some(18370)),
                ]
                .into(),
            )
            .ruby_tag(RubyTag {
                text: "かえ".to_string(),
                start_index: 0,
                end_index: 1,
                time_tags: [(TextIndex::start(1), Some(18170)), (TextIndex::end(1), None)].into(),
            })
            .build()
            .unwrap();
        let song = Song {
            lyrics: vec![lyric],
        };

        let records = extract_ruby_records(&song);
        assert_eq!(
            records,
            vec![RubyRecord {
                parent: "帰".to_string(),
                ruby: "かえ".to_string(),
                time_tags: [(TextIndex::start(1), 200)].into(),
                start_time: Some(17970),
                end_time: Some(18370),
            }]
        );
    }

    #[test]
    fn test_extract_clamps_time_before_span_start() {
        let lyric = LyricBuilder::default()
            .text("帰り")
            .time_tags([(TextIndex::start(0), Some(17970))].into())
            .ruby_tag(RubyTag {
                text: "かえ".to_string(),
                start_index: 0,
                end_index: 1,
                time_tags: [
                    (TextIndex::start(0), Some(17000)),
                    (TextIndex::start(1), Some(18170)),
                ]
                .into(),
            })
            .build()
            .unwrap();
        let song = Song {
            lyrics: vec![lyric],
        };

        let records = extract_ruby_records(&song);
        assert_eq!(
            records[0].time_tags,
            RawTimeTags::from([(TextIndex::start(0), 0), (TextIndex::start(1), 200)])
        );
    }

    #[test]
    fn test_untimed_end_still_bounds_earlier_run() {
        let untimed_end = |ruby: &str, start_time: i64| RubyRecord {
            end_time: None,
            ..record(ruby, start_time, 0)
        };
        let merged =
            merge_ruby_records(vec![untimed_end("しま", 1000), untimed_end("じま", 3000)]);
        assert_eq!(
            windows(&merged),
            vec![("しま", None, Some(1000)), ("じま", Some(3000), None)]
        );
    }

    #[test]
    fn test_extract_skips_invalid_tags() {
        let lyric = LyricBuilder::default()
            .text("島")
            .ruby_tag(RubyTag {
                text: "島".to_string(),
                start_index: 0,
                end_index: 1,
                ..Default::default()
            })
            .ruby_tag(RubyTag {
                text: "しま".to_string(),
                start_index: 0,
                end_index: 2,
                ..Default::default()
            })
            .build()
            .unwrap();

        let song = Song {
            lyrics: vec![lyric],
        };
        assert!(extract_ruby_records(&song).is_empty());
    }
}
