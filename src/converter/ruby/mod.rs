//! 注音（ruby）声明与歌词字符区间之间的双向转换。

pub mod align;
pub mod merge;

pub use align::{find_boundary_time_tags, resolve_ruby_tags};
pub use merge::{RubyRecord, extract_ruby_records, merge_rubies, merge_ruby_records};
