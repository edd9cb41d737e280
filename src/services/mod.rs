pub mod chapterizer;
pub mod escape;
pub mod fb2;
pub mod natural;
pub mod stamp;
pub mod storage;
