//! Run configuration.
//!
//! Values come from `REFLABEL_*` environment variables (after `dotenvy` has
//! loaded an optional `.env`), then command-line flags override them.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::ConfigError;
use crate::ports::git::HistoryPolicy;

/// Workspace root (`<root>/<repoFolder>`, `<root>/v0`, `<root>/v1`).
pub const ENV_ROOT: &str = "REFLABEL_ROOT";
/// Cutoff date for `--shallow-since`, `YYYY-MM-DD`.
pub const ENV_SHALLOW_SINCE: &str = "REFLABEL_SHALLOW_SINCE";
/// Depth for depth-bounded mirrors; takes precedence over the cutoff date.
pub const ENV_DEPTH: &str = "REFLABEL_DEPTH";
/// Shell command of the structural comparator.
pub const ENV_COMPARATOR: &str = "REFLABEL_COMPARATOR";
/// Comma-separated source file extensions.
pub const ENV_EXTENSIONS: &str = "REFLABEL_EXTENSIONS";
/// Concurrent pairs in a batch run.
pub const ENV_JOBS: &str = "REFLABEL_JOBS";
/// Directory to record cassettes into.
pub const ENV_RECORD: &str = "REFLABEL_RECORD";

/// Decides which changed paths belong to the analyzed source set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFilter {
    extensions: Vec<String>,
}

impl SourceFilter {
    /// Accepts paths ending in one of the extensions (with or without the dot).
    /// An empty list accepts everything.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().to_ascii_lowercase())
            .map(|e| e.trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        Self { extensions }
    }

    /// Filter accepting every path.
    #[must_use]
    pub fn any() -> Self {
        Self {
            extensions: Vec::new(),
        }
    }

    /// `true` if `path` is part of the source set.
    #[must_use]
    pub fn accepts(&self, path: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let file = path.rsplit('/').next().unwrap_or(path);
        match file.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
            }
            _ => false,
        }
    }
}

impl Default for SourceFilter {
    fn default() -> Self {
        Self::new(["java"])
    }
}

/// Everything a run needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalConfig {
    /// Workspace root for mirrors and checkouts.
    pub root: PathBuf,
    /// History truncation for clone and fetch.
    pub history: HistoryPolicy,
    /// Comparator shell command, if any.
    pub comparator: Option<String>,
    /// Which changed paths are handed to the comparator.
    pub source_filter: SourceFilter,
    /// Concurrent pairs in a batch run.
    pub jobs: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            root: std::env::temp_dir().join("reflabel"),
            history: HistoryPolicy::default(),
            comparator: None,
            source_filter: SourceFilter::default(),
            jobs: 4,
        }
    }
}

impl EvalConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("REFLABEL_"))
            .collect();
        Self::from_vars(&vars)
    }

    /// Builds a config from an explicit variable map; unset keys keep defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unparsable value.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let get = |name: &str| vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        if let Some(root) = get(ENV_ROOT) {
            config.root = PathBuf::from(root);
        }
        if let Some(date) = get(ENV_SHALLOW_SINCE) {
            config.history = HistoryPolicy::Since(parse_date(ENV_SHALLOW_SINCE, date)?);
        }
        if let Some(depth) = get(ENV_DEPTH) {
            config.history = HistoryPolicy::Depth(parse_positive(ENV_DEPTH, depth)?);
        }
        if let Some(command) = get(ENV_COMPARATOR) {
            config.comparator = Some(command.to_string());
        }
        if let Some(extensions) = get(ENV_EXTENSIONS) {
            config.source_filter = SourceFilter::new(extensions.split(','));
        }
        if let Some(jobs) = get(ENV_JOBS) {
            config.jobs = parse_positive(ENV_JOBS, jobs)?;
        }
        Ok(config)
    }
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] naming `name` on bad input.
pub fn parse_date(name: &str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Parses a number greater than zero.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] naming `name` on bad input.
pub fn parse_positive<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let invalid = |reason: String| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        reason,
    };
    let parsed: T = value.parse().map_err(|e: T::Err| invalid(e.to_string()))?;
    if parsed <= T::default() {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(parsed)
}
