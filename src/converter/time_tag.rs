//! # 行内时间标签
//!
//! `[mm:ss.cc]` 与 `<mm:ss.cc>` 和毫秒之间的转换。
//!
//! 这里的转换是宽松的：负数编码为空字符串，无法解析的标签返回 `-1`，由调用方自行判断。

use std::sync::LazyLock;

use regex::Regex;

/// 用于匹配 `[mm:ss.cc]` 形式的时间标签，解码时也接受 `[mm:ss:cc]`。
static SQUARE_TIME_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\d\d:\d\d[:.]\d\d]").expect("未能编译 SQUARE_TIME_TAG_REGEX")
});

/// 用于匹配 `<mm:ss.cc>` 形式的时间标签。LRC 文件里常有位数不规范的标签，
/// 所以解码时每个字段接受任意位数，也接受 `<mm:ss:cc>`。
static ANGLE_TIME_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<\d+:\d+[:.]\d+>").expect("未能编译 ANGLE_TIME_TAG_REGEX")
});

static ANGLE_TIME_TAG_FIELDS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(\d+):(\d+)[:.](\d+)>$").expect("未能编译 ANGLE_TIME_TAG_FIELDS_REGEX")
});

const DECIMAL_POINT: char = '.';

/// 时间标签所用的括号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeTagBracket {
    /// `[00:17.97]`
    Square,
    /// `<00:17.97>`
    Angle,
}

impl TimeTagBracket {
    #[must_use]
    pub const fn open(self) -> char {
        match self {
            Self::Square => '[',
            Self::Angle => '<',
        }
    }

    #[must_use]
    pub const fn close(self) -> char {
        match self {
            Self::Square => ']',
            Self::Angle => '>',
        }
    }

    /// 匹配该括号形式的时间标签的正则表达式。
    #[must_use]
    pub fn regex(self) -> &'static Regex {
        match self {
            Self::Square => &*SQUARE_TIME_TAG_REGEX,
            Self::Angle => &*ANGLE_TIME_TAG_REGEX,
        }
    }
}

/// 将毫秒转换为时间标签。
///
/// 例如 `17970` 转换为 `[00:17.97]`。负数返回空字符串。
#[must_use]
pub fn millisecond_to_time_tag(millisecond: i64, bracket: TimeTagBracket) -> String {
    if millisecond < 0 {
        return String::new();
    }

    format!(
        "{}{:02}:{:02}{DECIMAL_POINT}{:02}{}",
        bracket.open(),
        millisecond / 1000 / 60,
        millisecond / 1000 % 60,
        millisecond / 10 % 100,
        bracket.close()
    )
}

/// 将时间标签转换为毫秒。
///
/// 例如 `[00:17:97]` 转换为 `17970`。格式无效时返回 `-1`。
#[must_use]
pub fn time_tag_to_millisecond(time_tag: &str, bracket: TimeTagBracket) -> i64 {
    let fields = match bracket {
        TimeTagBracket::Square => fixed_width_fields(time_tag),
        TimeTagBracket::Angle => variable_width_fields(time_tag),
    };

    fields
        .and_then(|(minute, second, hundredth)| {
            minute
                .checked_mul(60)?
                .checked_add(second)?
                .checked_mul(1000)?
                .checked_add(hundredth.checked_mul(10)?)
        })
        .unwrap_or(-1)
}

fn fixed_width_fields(time_tag: &str) -> Option<(i64, i64, i64)> {
    let chars: Vec<char> = time_tag.chars().collect();
    if chars.len() < 10 || chars[0] != TimeTagBracket::Square.open() || !chars[1].is_ascii_digit()
    {
        return None;
    }

    let field = |start: usize| -> Option<i64> {
        let text: String = chars[start..start + 2].iter().collect();
        text.parse().ok()
    };

    Some((field(1)?, field(4)?, field(7)?))
}

fn variable_width_fields(time_tag: &str) -> Option<(i64, i64, i64)> {
    let caps = ANGLE_TIME_TAG_FIELDS_REGEX.captures(time_tag)?;
    let field = |group: usize| caps[group].parse::<i64>().ok();
    Some((field(1)?, field(2)?, field(3)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_tag_to_millisecond() {
        assert_eq!(
            time_tag_to_millisecond("[00:01:00]", TimeTagBracket::Square),
            1000
        );
        assert_eq!(
            time_tag_to_millisecond("[00:17.97]", TimeTagBracket::Square),
            17970
        );
        assert_eq!(
            time_tag_to_millisecond("[01:24:77]", TimeTagBracket::Square),
            84770
        );
        assert_eq!(
            time_tag_to_millisecond("<00:00.50>", TimeTagBracket::Angle),
            500
        );
    }

    #[test]
    fn test_invalid_time_tag_returns_sentinel() {
        assert_eq!(time_tag_to_millisecond("", TimeTagBracket::Square), -1);
        assert_eq!(
            time_tag_to_millisecond("[00:01]", TimeTagBracket::Square),
            -1
        );
        assert_eq!(
            time_tag_to_millisecond("<00:01.00>", TimeTagBracket::Square),
            -1
        );
        assert_eq!(
            time_tag_to_millisecond("[--:--.--]", TimeTagBracket::Square),
            -1
        );
        assert_eq!(
            time_tag_to_millisecond("[00:ab.cd]", TimeTagBracket::Square),
            -1
        );
    }

    #[test]
    fn test_millisecond_to_time_tag() {
        assert_eq!(
            millisecond_to_time_tag(1000, TimeTagBracket::Square),
            "[00:01.00]"
        );
        assert_eq!(
            millisecond_to_time_tag(17970, TimeTagBracket::Square),
            "[00:17.97]"
        );
        assert_eq!(
            millisecond_to_time_tag(84770, TimeTagBracket::Angle),
            "<01:24.77>"
        );
        assert_eq!(millisecond_to_time_tag(-1, TimeTagBracket::Square), "");
    }

    #[test]
    fn test_regex_accepts_both_delimiters() {
        let regex = TimeTagBracket::Square.regex();
        assert!(regex.is_match("[00:17:97]"));
        assert!(regex.is_match("[00:17.97]"));
        assert!(!regex.is_match("[0:17.97]"));
        assert!(!regex.is_match("<00:17.97>"));
    }

    #[test]
    fn test_angle_tag_accepts_variable_width_fields() {
        let regex = TimeTagBracket::Angle.regex();
        assert!(regex.is_match("<1:00.00>"));
        assert!(regex.is_match("<100:2.5>"));

        assert_eq!(time_tag_to_millisecond("<1:00.00>", TimeTagBracket::Angle), 60000);
        assert_eq!(time_tag_to_millisecond("<100:2.5>", TimeTagBracket::Angle), 6_002_050);
        assert_eq!(time_tag_to_millisecond("<0:0:1>", TimeTagBracket::Angle), 10);
        assert_eq!(time_tag_to_millisecond("<1:00.00", TimeTagBracket::Angle), -1);
        assert_eq!(
            time_tag_to_millisecond("<9999999999999999:00.00>", TimeTagBracket::Angle),
            -1
        );
    }
}
