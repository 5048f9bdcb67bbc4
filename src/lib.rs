pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod mortgage;
pub mod report;
