pub mod sessions;
pub mod word_lists;
