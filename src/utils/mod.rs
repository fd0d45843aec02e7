//! File system and output utilities
//!
//! - [`fs`] - atomic writes, directory creation, JSON document helpers
//! - [`table`] - aligned plain-text tables for listings

pub mod fs;
pub mod table;

pub use fs::{atomic_write, ensure_dir, read_json_file, write_json_file};
pub use table::write_table;
