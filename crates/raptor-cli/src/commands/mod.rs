pub mod build;
pub mod compare;
pub mod fetch;
pub mod query;
