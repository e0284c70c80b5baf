//! Core functionality for configuration, file handling and the document toolkit

pub mod config;
pub mod document;
pub mod file_system;
