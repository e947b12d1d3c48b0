//! # KAR 格式解析器
//!
//! ```text
//! [00:01.00]島[00:02.00]
//! [00:03.00]島[00:04.00]
//!
//! @Ruby1=島,しま,,[00:02.00]
//! @Ruby2=島,じま,[00:03.00]
//! ```
//!
//! 歌词行中的逐字时间标签使用 `[mm:ss.cc]`，注音声明中的时间标签也使用同样的方括号。

use crate::converter::{
    config::{DuplicateTimeTagStrategy, KarParsingOptions},
    parsers::{
        LineParser, LyricParser,
        ruby_line::{decode_ruby_line, encode_ruby_line, is_ruby_line},
        to_raw_time_tags, to_song_time_tags,
    },
    ruby::{merge_rubies, resolve_ruby_tags},
    time_tag::TimeTagBracket,
    timed_text::{timed_text_to_object, to_timed_text},
    types::{LrcLine, LrcLyric, LrcRuby},
};
use crate::error::ConvertError;
use crate::model::song::{Lyric, Song};

/// KAR 歌词行解析器，接受任何非空行，所以应该最后注册。
#[derive(Debug, Default)]
pub struct KarLyricParser {
    strategy: DuplicateTimeTagStrategy,
}

impl KarLyricParser {
    #[must_use]
    pub const fn new(strategy: DuplicateTimeTagStrategy) -> Self {
        Self { strategy }
    }
}

impl LineParser for KarLyricParser {
    fn name(&self) -> &'static str {
        "KarLyricParser"
    }

    fn can_decode(&self, text: &str) -> bool {
        !text.trim().is_empty()
    }

    fn can_encode(&self, line: &LrcLine) -> bool {
        matches!(line, LrcLine::Lyric(_))
    }

    fn decode(&self, text: &str) -> Result<LrcLine, ConvertError> {
        let (text, time_tags) = timed_text_to_object(text, TimeTagBracket::Square, self.strategy);
        Ok(LrcLine::Lyric(LrcLyric {
            text,
            time_tags,
            ..Default::default()
        }))
    }

    fn encode(&self, line: &LrcLine, _index: usize) -> Result<String, ConvertError> {
        let LrcLine::Lyric(lyric) = line else {
            return Err(ConvertError::line_kind_mismatch(self.name(), line.kind()));
        };
        Ok(to_timed_text(
            &lyric.text,
            &lyric.time_tags,
            TimeTagBracket::Square,
        ))
    }
}

/// KAR 注音声明解析器。
#[derive(Debug, Default)]
pub struct KarRubyParser {
    strategy: DuplicateTimeTagStrategy,
}

impl KarRubyParser {
    #[must_use]
    pub const fn new(strategy: DuplicateTimeTagStrategy) -> Self {
        Self { strategy }
    }
}

impl LineParser for KarRubyParser {
    fn name(&self) -> &'static str {
        "KarRubyParser"
    }

    fn can_decode(&self, text: &str) -> bool {
        is_ruby_line(text)
    }

    fn can_encode(&self, line: &LrcLine) -> bool {
        matches!(line, LrcLine::Ruby(_))
    }

    fn decode(&self, text: &str) -> Result<LrcLine, ConvertError> {
        decode_ruby_line(text, TimeTagBracket::Square, self.strategy).map(LrcLine::Ruby)
    }

    fn encode(&self, line: &LrcLine, index: usize) -> Result<String, ConvertError> {
        let LrcLine::Ruby(ruby) = line else {
            return Err(ConvertError::line_kind_mismatch(self.name(), line.kind()));
        };
        Ok(encode_ruby_line(ruby, index, TimeTagBracket::Square))
    }
}

/// KAR 格式。
pub struct KarParser {
    line_parsers: Vec<Box<dyn LineParser>>,
}

impl KarParser {
    #[must_use]
    pub fn new(options: &KarParsingOptions) -> Self {
        let strategy = options.duplicate_time_tag_strategy;
        Self {
            line_parsers: vec![
                Box::new(KarRubyParser::new(strategy)),
                Box::new(KarLyricParser::new(strategy)),
            ],
        }
    }
}

impl Default for KarParser {
    fn default() -> Self {
        Self::new(&KarParsingOptions::default())
    }
}

impl LyricParser for KarParser {
    fn line_parsers(&self) -> &[Box<dyn LineParser>] {
        &self.line_parsers
    }

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

        let lyrics = lrc_lyrics
            .into_iter()
            .map(|lrc_lyric| {
                let mut lyric = Lyric {
                    text: lrc_lyric.text,
                    time_tags: to_song_time_tags(lrc_lyric.time_tags),
                    ..Default::default()
                };
                lyric.ruby_tags = resolve_ruby_tags(&lyric, &rubies);
                lyric
            })
            .collect();

        Ok(Song { lyrics })
    }

    fn pre_process(&self, song: &Song) -> Result<Vec<LrcLine>, ConvertError> {
        let mut lines: Vec<LrcLine> = song
            .lyrics
            .iter()
            .map(|lyric| {
                LrcLine::Lyric(LrcLyric {
                    text: lyric.text.clone(),
                    time_tags: to_raw_time_tags(&lyric.time_tags),
                    ..Default::default()
                })
            })
            .collect();

        let rubies = merge_rubies(song);
        if !rubies.is_empty() {
            lines.push(LrcLine::Blank);
            lines.extend(rubies.into_iter().map(LrcLine::Ruby));
        }

        Ok(lines)
    }
}
