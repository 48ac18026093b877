pub mod analytics;
pub mod attendance;
pub mod portal;
pub mod slots;
pub mod students;
pub mod teachers;
pub mod violations;
