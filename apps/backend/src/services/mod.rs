pub mod store;
pub mod word_lists;
