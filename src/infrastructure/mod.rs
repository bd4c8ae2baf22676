// src/infrastructure/mod.rs
pub mod apkg;
pub mod config;
pub mod file_reader;

pub use apkg::ApkgPackager;
pub use config::Config;
