pub mod course;
pub mod normalized;
