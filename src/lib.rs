//! sortdir - sort a directory's files into category folders
//!
//! This library classifies files by extension against an ordered category
//! table, creates one folder per category, and moves each top-level file into
//! its folder, renaming on name collisions and counting what happened.

pub mod category;
pub mod cli;
pub mod config;
pub mod organizer;
pub mod output;
pub mod relocate;
pub mod report;

pub use category::{Category, CategoryTable, FALLBACK_CATEGORY};
pub use config::{Config, ConfigError, OrganizerOptions};
pub use organizer::{ConfigurationError, FileEntry, OrganizeResult, Organizer, Progress};
pub use relocate::{FsRelocator, Relocate};
pub use report::{CategoryCount, MoveFailure, MoveFailureKind, RunAccounting, Summary};
