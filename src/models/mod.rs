pub mod announcement;
pub mod query;
pub mod settings;
