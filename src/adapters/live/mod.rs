//! Live adapters for real external interactions.

pub mod comparator;
pub mod filesystem;
pub mod git;

pub use comparator::CommandComparator;
pub use filesystem::LiveFileSystem;
pub use git::LiveGitClient;
