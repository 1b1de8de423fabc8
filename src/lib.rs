// src/lib.rs
pub mod cli;
pub mod combiner;
pub mod error;

pub use combiner::{CombineOptions, CombineReport, HeadingMode, OnError};
pub use error::CombineError;
