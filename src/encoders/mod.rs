pub mod algorithms;
pub mod coding;
pub mod streaming;
