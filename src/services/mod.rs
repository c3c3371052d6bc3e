pub mod ai;
pub mod prompt;
pub mod screen;
