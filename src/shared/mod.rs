pub mod constants;
pub mod query;
pub mod types;
pub mod validation;
