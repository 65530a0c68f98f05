pub mod entities;
pub mod error;
pub mod templates;
pub mod types;
