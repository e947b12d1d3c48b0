pub mod song;
pub mod text_index;
