pub mod catalog;
pub mod compose;
pub mod config;
