pub mod context;
pub mod project;
