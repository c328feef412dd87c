pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod master;
pub mod progress;
pub mod reader;
pub mod runner;
