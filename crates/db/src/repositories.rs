pub mod slot;
pub mod student;
pub mod teacher;
pub mod violation;
pub mod warning;
