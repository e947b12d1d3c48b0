//! # LRC 行首时间
//!
//! 负责把 `[1:00.00][1:02.00] Lyric` 拆分为开始时间和歌词，以及反向拼接。
//! 与行内时间标签不同，这里遇到无效输入会直接返回错误。

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConvertError;

/// 严格来说应该是 `\[(\d{2,}):(\d{2})\.(\d{2})]`，但实际文件中偶尔会出现位数不规范的行首时间。
static START_TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+):(\d+)\.(\d+)]").expect("未能编译 START_TIME_REGEX"));

/// 将一行拆分为行首时间和歌词。
///
/// ```text
/// [100:00.00][100:02.00] When the truth is found to be lies
/// ```
///
/// 拆分为 `[6000000, 6002000]` 和 `When the truth is found to be lies`。
/// 没有行首时间时返回空数组，由调用方决定如何处理。
pub fn split_lyric_and_start_times(line: &str) -> Result<(Vec<i64>, String), ConvertError> {
    if line.trim().is_empty() {
        return Ok((Vec::new(), String::new()));
    }

    let start_times = START_TIME_REGEX
        .find_iter(line)
        .map(|m| start_time_to_millisecond(m.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let lyric = START_TIME_REGEX.replace_all(line, "").trim().to_string();

    Ok((start_times, lyric))
}

/// 将 `[1:00.00]` 转换为 `60000`。
///
/// 包含多个行首时间时只取第一个。
pub fn start_time_to_millisecond(time_tag: &str) -> Result<i64, ConvertError> {
    let caps = START_TIME_REGEX
        .captures(time_tag)
        .ok_or_else(|| ConvertError::InvalidTime(format!("无效的行首时间: {time_tag}")))?;

    let parse = |group: usize| -> Result<i64, ConvertError> {
        caps[group]
            .parse::<i64>()
            .map_err(|e| ConvertError::InvalidTime(format!("无效的行首时间 {time_tag}: {e}")))
    };

    let minutes = parse(1)?;
    let seconds = parse(2)?;
    let hundredths = parse(3)?;

    minutes
        .checked_mul(60 * 1000)
        .and_then(|ms| ms.checked_add(seconds.checked_mul(1000)?))
        .and_then(|ms| ms.checked_add(hundredths.checked_mul(10)?))
        .ok_or_else(|| ConvertError::InvalidTime(format!("行首时间超出范围: {time_tag}")))
}

/// 将开始时间和歌词拼接为一行。
///
/// `[60000, 66000]` 和 `When the truth is found to be lies` 拼接为
/// `[01:00.00][01:06.00] When the truth is found to be lies`。
pub fn join_lyric_and_start_times(
    start_times: &[i64],
    lyric: &str,
) -> Result<String, ConvertError> {
    if start_times.is_empty() {
        return Err(ConvertError::InvalidTime(format!(
            "歌词至少需要一个行首时间: {lyric}"
        )));
    }

    if START_TIME_REGEX.is_match(lyric) {
        return Err(ConvertError::InvalidLyricFormat(format!(
            "歌词中不应包含行首时间: {lyric}"
        )));
    }

    let mut line = String::new();
    for &start_time in start_times {
        line.push_str(&millisecond_to_start_time(start_time)?);
    }
    line.push(' ');
    line.push_str(lyric.trim());

    Ok(line)
}

/// 将 `60000` 转换为 `[01:00.00]`。
pub fn millisecond_to_start_time(millisecond: i64) -> Result<String, ConvertError> {
    if millisecond < 0 {
        return Err(ConvertError::InvalidTime(format!(
            "行首时间不能为负数: {millisecond}"
        )));
    }

    let total_seconds = millisecond / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let hundredths = (millisecond % 1000) / 10;

    Ok(format!("[{minutes:02}:{seconds:02}.{hundredths:02}]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_valid_lines() {
        let cases: &[(&str, &[i64], &str)] = &[
            ("[1:00.00] ", &[60000], ""),
            ("[1:00.00][1:02.00] Lyric", &[60000, 62000], "Lyric"),
            ("[1:00.00]Lyric", &[60000], "Lyric"),
            ("[1:00.00]   Lyric", &[60000], "Lyric"),
            (
                "[1:00.00] <00:00.04> Lyric <00:00.16>",
                &[60000],
                "<00:00.04> Lyric <00:00.16>",
            ),
            ("[1:00.00] <00:00.04> Lyric  ", &[60000], "<00:00.04> Lyric"),
        ];

        for (line, expected_times, expected_lyric) in cases {
            let (start_times, lyric) = split_lyric_and_start_times(line).unwrap();
            assert_eq!(&start_times, expected_times, "行: {line}");
            assert_eq!(&lyric, expected_lyric, "行: {line}");
        }
    }

    #[test]
    fn test_split_lines_without_start_time() {
        let cases = [
            ("Lyric", "Lyric"),
            ("   Lyric", "Lyric"),
            ("<00:00.04> Lyric <00:00.16>", "<00:00.04> Lyric <00:00.16>"),
        ];

        for (line, expected_lyric) in cases {
            let (start_times, lyric) = split_lyric_and_start_times(line).unwrap();
            assert!(start_times.is_empty());
            assert_eq!(lyric, expected_lyric);
        }
    }

    #[test]
    fn test_start_time_to_millisecond() {
        let cases = [
            ("[00:00.00]", 0),
            ("[00:06.00]", 6000),
            ("[01:00.00]", 60000),
            ("[10:00.00]", 600_000),
            ("[100:00.00]", 6_000_000),
            ("[0:00.00]", 0),
            ("[0:0.0]", 0),
            ("[1:00.00][1:02.00]", 60000),
        ];

        for (time_tag, expected) in cases {
            assert_eq!(start_time_to_millisecond(time_tag).unwrap(), expected);
        }
    }

    #[test]
    fn test_start_time_to_millisecond_with_invalid_value() {
        for time_tag in [
            "[--:--.--]",
            "[]",
            "<1:00.00>",
            "[9999999999999999:00.00]",
            "[0:999999999999999999.00]",
        ] {
            assert!(matches!(
                start_time_to_millisecond(time_tag),
                Err(ConvertError::InvalidTime(_))
            ));
        }
    }

    #[test]
    fn test_join() {
        assert_eq!(
            join_lyric_and_start_times(&[60000], "Lyric").unwrap(),
            "[01:00.00] Lyric"
        );
        assert_eq!(
            join_lyric_and_start_times(&[60000, 62000], "Lyric").unwrap(),
            "[01:00.00][01:02.00] Lyric"
        );
        assert_eq!(
            join_lyric_and_start_times(&[60000], "<00:00.04> Lyric <00:00.16>").unwrap(),
            "[01:00.00] <00:00.04> Lyric <00:00.16>"
        );
        assert_eq!(
            join_lyric_and_start_times(&[60000], "  Lyric").unwrap(),
            "[01:00.00] Lyric"
        );
    }

    #[test]
    fn test_join_with_invalid_value() {
        assert!(matches!(
            join_lyric_and_start_times(&[], "Lyric"),
            Err(ConvertError::InvalidTime(_))
        ));
        assert!(matches!(
            join_lyric_and_start_times(&[60000], "[00:00.00] Lyric"),
            Err(ConvertError::InvalidLyricFormat(_))
        ));
    }

    #[test]
    fn test_millisecond_to_start_time() {
        let cases = [
            (0, "[00:00.00]"),
            (6000, "[00:06.00]"),
            (60000, "[01:00.00]"),
            (600_000, "[10:00.00]"),
            (6_000_000, "[100:00.00]"),
        ];

        for (millisecond, expected) in cases {
            assert_eq!(millisecond_to_start_time(millisecond).unwrap(), expected);
        }

        assert!(millisecond_to_start_time(-1).is_err());
    }
}
