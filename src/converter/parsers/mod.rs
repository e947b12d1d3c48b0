//! # 行解析器注册与调度
//!
//! 一个格式由若干单行解析器组成。解码时每一行交给第一个 `can_decode` 返回 `true` 的解析器，
//! 编码时每个中间结构交给第一个 `can_encode` 返回 `true` 的解析器。

pub mod kar_parser;
pub mod lrc_parser;
mod ruby_line;

use tracing::debug;

use crate::converter::{
    types::{LrcLine, RawTimeTags},
    utils::{group_by_continuous, split_lines},
};
use crate::error::ConvertError;
use crate::model::song::{Song, TimeTags};

pub use kar_parser::{KarLyricParser, KarParser, KarRubyParser};
pub use lrc_parser::{LrcLyricParser, LrcParser, LrcRubyParser};

/// 负责一种行的解析器。
pub trait LineParser: Send + Sync {
    /// 解析器名称，用于日志和错误信息。
    fn name(&self) -> &'static str;

    /// 这一行是否由该解析器处理。
    fn can_decode(&self, text: &str) -> bool;

    /// 这个中间结构是否由该解析器编码。
    fn can_encode(&self, line: &LrcLine) -> bool;

    fn decode(&self, text: &str) -> Result<LrcLine, ConvertError>;

    /// 编码一行。`index` 是该行在同类型连续行中的序号，从 0 开始。
    fn encode(&self, line: &LrcLine, index: usize) -> Result<String, ConvertError>;
}

/// 一种完整的歌词格式。
pub trait LyricParser {
    /// 按优先级排列的单行解析器。
    fn line_parsers(&self) -> &[Box<dyn LineParser>];

    /// 把解码出的行组装为歌曲。
    fn post_process(&self, lines: Vec<LrcLine>) -> Result<Song, ConvertError>;

    /// 把歌曲展开为待编码的行。
    fn pre_process(&self, song: &Song) -> Result<Vec<LrcLine>, ConvertError>;

    /// 解码整段文本。空行会被忽略，没有解析器接受的行会被丢弃。
    fn decode(&self, content: &str) -> Result<Song, ConvertError> {
        let mut lines = Vec::new();

        for line in split_lines(content) {
            if line.trim().is_empty() {
                continue;
            }

            match self.line_parsers().iter().find(|p| p.can_decode(line)) {
                Some(parser) => lines.push(parser.decode(line)?),
                None => debug!("[LyricParser] 没有解析器可以处理该行，已丢弃: {line}"),
            }
        }

        self.post_process(lines)
    }

    /// 编码整首歌。没有解析器可以编码的行输出为空行，行之间以 `\n` 连接。
    fn encode(&self, song: &Song) -> Result<String, ConvertError> {
        let lines = self.pre_process(song)?;
        let mut encoded_lines = Vec::with_capacity(lines.len());

        for (_, run) in group_by_continuous(lines, LrcLine::kind) {
            for (index, line) in run.iter().enumerate() {
                let encoded = match self.line_parsers().iter().find(|p| p.can_encode(line)) {
                    Some(parser) => parser.encode(line, index)?,
                    None => {
                        debug!("[LyricParser] 没有解析器可以编码 {} 行", line.kind());
                        String::new()
                    }
                };
                encoded_lines.push(encoded);
            }
        }

        Ok(encoded_lines.join("\n"))
    }
}

/// 行层面的时间标签转换为歌曲层面的时间标签。
pub(crate) fn to_song_time_tags(time_tags: RawTimeTags) -> TimeTags {
    time_tags
        .into_iter()
        .map(|(index, time)| (index, Some(time)))
        .collect()
}

/// 歌曲层面的时间标签转换为行层面的时间标签，没有时间的位置会被丢弃。
pub(crate) fn to_raw_time_tags(time_tags: &TimeTags) -> RawTimeTags {
    time_tags
        .iter()
        .filter_map(|(index, time)| time.map(|t| (*index, t)))
        .collect()
}
