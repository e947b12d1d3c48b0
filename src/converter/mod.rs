//! 歌词格式的解析与生成。

pub mod config;
pub mod io;
pub mod parsers;
pub mod ruby;
pub mod start_time;
pub mod time_tag;
pub mod timed_text;
pub mod types;
pub mod utils;
