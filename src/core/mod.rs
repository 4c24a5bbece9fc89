pub mod charset;
pub mod config;
