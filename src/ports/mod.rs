//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the evaluation core and an
//! external system (git, the filesystem, the structural comparator).
//! Implementations live in `src/adapters/`.

pub mod comparator;
pub mod filesystem;
pub mod git;

pub use comparator::Comparator;
pub use filesystem::FileSystem;
pub use git::{GitClient, HistoryPolicy, TreeChange};
