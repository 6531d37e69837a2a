pub mod board;
pub mod favourite;
pub mod section;
pub mod task;
