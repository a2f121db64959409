pub mod cohort;
pub mod enrollment;
pub mod resource;
pub mod student;
pub mod training_program;
