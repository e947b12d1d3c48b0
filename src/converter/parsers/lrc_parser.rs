//! # LRC 格式解析器
//!
//! ```text
//! [00:01.00][00:05.00] 帰<00:01.50>り<00:02.00>
//!
//! @Ruby1=帰,か<00:00.20>え
//! ```
//!
//! 行首时间使用 `[mm:ss.cc]`，一行可以有多个；行内逐字时间标签使用 `<mm:ss.cc>`。
//! 注音声明的时间窗口仍然使用方括号。

use crate::converter::{
    config::{DuplicateTimeTagStrategy, LrcParsingOptions},
    parsers::{
        LineParser, LyricParser,
        ruby_line::{decode_ruby_line, encode_ruby_line, is_ruby_line},
        to_raw_time_tags, to_song_time_tags,
    },
    ruby::{merge_rubies, resolve_ruby_tags},
    start_time::{join_lyric_and_start_times, split_lyric_and_start_times},
    time_tag::TimeTagBracket,
    timed_text::{timed_text_to_object, to_timed_text},
    types::{LrcLine, LrcLyric, LrcRuby},
    utils::group_by_continuous,
};
use crate::error::ConvertError;
use crate::model::song::{Lyric, Song};

/// LRC 歌词行解析器，接受任何非空行，所以应该最后注册。
#[derive(Debug, Default)]
pub struct LrcLyricParser {
    strategy: DuplicateTimeTagStrategy,
}

impl LrcLyricParser {
    #[must_use]
    pub const fn new(strategy: DuplicateTimeTagStrategy) -> Self {
        Self { strategy }
    }
}

impl LineParser for LrcLyricParser {
    fn name(&self) -> &'static str {
        "LrcLyricParser"
    }

    fn can_decode(&self, text: &str) -> bool {
        !text.trim().is_empty()
    }

    fn can_encode(&self, line: &LrcLine) -> bool {
        matches!(line, LrcLine::Lyric(_))
    }

    fn decode(&self, text: &str) -> Result<LrcLine, ConvertError> {
        let (start_times, lyric) = split_lyric_and_start_times(text)?;
        let (text, time_tags) = timed_text_to_object(&lyric, TimeTagBracket::Angle, self.strategy);
        Ok(LrcLine::Lyric(LrcLyric {
            text,
            start_times,
            time_tags,
        }))
    }

    fn encode(&self, line: &LrcLine, _index: usize) -> Result<String, ConvertError> {
        let LrcLine::Lyric(lyric) = line else {
            return Err(ConvertError::line_kind_mismatch(self.name(), line.kind()));
        };
        let timed_text = to_timed_text(&lyric.text, &lyric.time_tags, TimeTagBracket::Angle);
        join_lyric_and_start_times(&lyric.start_times, &timed_text)
    }
}

/// LRC 注音声明解析器，注音文本内的时间标签使用尖括号。
#[derive(Debug, Default)]
pub struct LrcRubyParser {
    strategy: DuplicateTimeTagStrategy,
}

impl LrcRubyParser {
    #[must_use]
    pub const fn new(strategy: DuplicateTimeTagStrategy) -> Self {
        Self { strategy }
    }
}

impl LineParser for LrcRubyParser {
    fn name(&self) -> &'static str {
        "LrcRubyParser"
    }

    fn can_decode(&self, text: &str) -> bool {
        is_ruby_line(text)
    }

    fn can_encode(&self, line: &LrcLine) -> bool {
        matches!(line, LrcLine::Ruby(_))
    }

    fn decode(&self, text: &str) -> Result<LrcLine, ConvertError> {
        decode_ruby_line(text, TimeTagBracket::Angle, self.strategy).map(LrcLine::Ruby)
    }

    fn encode(&self, line: &LrcLine, index: usize) -> Result<String, ConvertError> {
        let LrcLine::Ruby(ruby) = line else {
            return Err(ConvertError::line_kind_mismatch(self.name(), line.kind()));
        };
        Ok(encode_ruby_line(ruby, index, TimeTagBracket::Angle))
    }
}

/// LRC 格式。
pub struct LrcParser {
    line_parsers: Vec<Box<dyn LineParser>>,
}

impl LrcParser {
    #[must_use]
    pub fn new(options: &LrcParsingOptions) -> Self {
        let strategy = options.duplicate_time_tag_strategy;
        Self {
            line_parsers: vec![
                Box::new(LrcRubyParser::new(strategy)),
                Box::new(LrcLyricParser::new(strategy)),
            ],
        }
    }
}

impl Default for LrcParser {
    fn default() -> Self {
        Self::new(&LrcParsingOptions::default())
    }
}

impl LyricParser for LrcParser {
    fn line_parsers(&self) -> &[Box<dyn LineParser>] {
        &self.line_parsers
    }

    /// 带多个行首时间的行会展开为多行歌词。
    fn post_process(&self, lines: Vec<LrcLine>) -> Result<Song, ConvertError> {
        let mut lrc_lyrics: Vec<LrcLyric> = Vec::new();
        let mut rubies: Vec<LrcRuby> = Vec::new();
        for line in lines {
            match line {
                LrcLine::Lyric(lyric) => lrc_lyrics.push(lyric),
                LrcLine::Ruby(ruby) => rubies.push(ruby),
                LrcLine::Blank => {}
            }
        }

        let mut lyrics = Vec::with_capacity(lrc_lyrics.len());
        for lrc_lyric in lrc_lyrics {
            let mut template = Lyric {
                text: lrc_lyric.text,
                time_tags: to_song_time_tags(lrc_lyric.time_tags),
                ..Default::default()
            };
            template.ruby_tags = resolve_ruby_tags(&template, &rubies);

            if lrc_lyric.start_times.is_empty() {
                lyrics.push(template);
                continue;
            }

            lyrics.extend(lrc_lyric.start_times.into_iter().map(|start_time| Lyric {
                start_time: Some(start_time),
                ..template.clone()
            }));
        }

        Ok(Song { lyrics })
    }

    /// 相邻且内容完全相同的歌词合并为一行，行首时间依次排列。
    fn pre_process(&self, song: &Song) -> Result<Vec<LrcLine>, ConvertError> {
        let runs = group_by_continuous(&song.lyrics, |lyric: &&Lyric| {
            (
                lyric.text.clone(),
                lyric.time_tags.clone(),
                lyric.ruby_tags.clone(),
            )
        });

        let mut lines = Vec::with_capacity(runs.len());
        for ((text, time_tags, _), run) in runs {
            let start_times = run
                .iter()
                .map(|lyric| {
                    lyric.start_time.ok_or_else(|| {
                        ConvertError::InvalidTime(format!("歌词缺少行首时间: {}", lyric.text))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            lines.push(LrcLine::Lyric(LrcLyric {
                text,
                start_times,
                time_tags: to_raw_time_tags(&time_tags),
            }));
        }

        let rubies = merge_rubies(song);
        if !rubies.is_empty() {
            lines.push(LrcLine::Blank);
            lines.extend(rubies.into_iter().map(LrcLine::Ruby));
        }

        Ok(lines)
    }
}
