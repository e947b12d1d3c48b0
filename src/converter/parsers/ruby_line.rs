//! `@Ruby` 注音声明行的编解码，KAR 与 LRC 共用，只有注音内时间标签的括号不同。

use std::sync::LazyLock;

use regex::Regex;

use crate::converter::{
    config::DuplicateTimeTagStrategy,
    time_tag::{TimeTagBracket, millisecond_to_time_tag, time_tag_to_millisecond},
    timed_text::{timed_text_to_object, to_timed_text},
    types::LrcRuby,
};
use crate::error::ConvertError;

static RUBY_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^@ruby(?P<index>\d+)=(?P<parent>.*)$").expect("未能编译 RUBY_HEADER_REGEX")
});

/// 注音声明行以 `@ruby` 开头，不区分大小写。
pub(super) fn is_ruby_line(text: &str) -> bool {
    text.get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("@ruby"))
}

/// 解析 `@Ruby1=帰,か[00:00.50]え,[00:53.19],[01:24.77]`。
pub(super) fn decode_ruby_line(
    text: &str,
    ruby_bracket: TimeTagBracket,
    strategy: DuplicateTimeTagStrategy,
) -> Result<LrcRuby, ConvertError> {
    let fields: Vec<&str> = text.split(',').collect();

    let parent = RUBY_HEADER_REGEX
        .captures(fields[0])
        .and_then(|caps| caps.name("parent"))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ConvertError::InvalidLyricFormat(format!("无效的注音声明: {text}")))?;

    let (ruby, time_tags) =
        timed_text_to_object(fields.get(1).copied().unwrap_or_default(), ruby_bracket, strategy);

    Ok(LrcRuby {
        parent,
        ruby,
        time_tags,
        start_time: parse_window_time(fields.get(2).copied(), text)?,
        end_time: parse_window_time(fields.get(3).copied(), text)?,
    })
}

/// 时间窗口的两端都是可选的，空字段表示不限。
fn parse_window_time(field: Option<&str>, line: &str) -> Result<Option<i64>, ConvertError> {
    let Some(field) = field.map(str::trim).filter(|f| !f.is_empty()) else {
        return Ok(None);
    };

    match time_tag_to_millisecond(field, TimeTagBracket::Square) {
        time if time < 0 => Err(ConvertError::InvalidLyricFormat(format!(
            "注音声明中的时间 {field} 无效: {line}"
        ))),
        time => Ok(Some(time)),
    }
}

/// 编码为 `@Ruby<index + 1>=...`，末尾的空字段会被去掉。
pub(super) fn encode_ruby_line(
    ruby: &LrcRuby,
    index: usize,
    ruby_bracket: TimeTagBracket,
) -> String {
    let timed_ruby = to_timed_text(&ruby.ruby, &ruby.time_tags, ruby_bracket);
    let start_time = ruby
        .start_time
        .map(|t| millisecond_to_time_tag(t, TimeTagBracket::Square))
        .unwrap_or_default();
    let end_time = ruby
        .end_time
        .map(|t| millisecond_to_time_tag(t, TimeTagBracket::Square))
        .unwrap_or_default();

    let line = format!(
        "@Ruby{}={},{timed_ruby},{start_time},{end_time}",
        index + 1,
        ruby.parent
    );
    line.trim_end_matches(',').to_string()
}
