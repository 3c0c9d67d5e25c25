pub mod ask;
pub mod summarize;
