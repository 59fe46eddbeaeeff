//! CLI configuration and runtime settings for resource minification.

use clap::Parser;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::error::PipelineError;
use crate::pattern::{FilenamePattern, DEFAULT_FILENAME_PATTERN};

/// Minify web resources and rewrite HTML references to hashed filenames
#[derive(Parser, Debug)]
#[command(name = "webapp-minify")]
#[command(version)]
#[command(about = "Minify web resources and rewrite HTML references to hashed filenames")]
pub struct Cli {
    /// Source directory containing HTML, CSS and JS resources
    #[arg(default_value = "src/main/webapp")]
    pub source: PathBuf,

    /// Target directory for minified output
    #[arg(default_value = "target/webapp")]
    pub target: PathBuf,

    /// Output filename pattern ([name], [ext], [hash], [hash:N])
    #[arg(short, long, default_value = DEFAULT_FILENAME_PATTERN)]
    pub pattern: String,

    /// Resource basenames to skip (comma-separated)
    #[arg(short = 'x', long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Number of parallel workers
    #[arg(short, long, default_value_t = num_cpus::get())]
    pub jobs: usize,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Immutable pipeline configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute source directory
    pub source_dir: PathBuf,
    /// Absolute target directory
    pub target_dir: PathBuf,
    /// Output filename pattern for CSS and JS
    pub filename_pattern: FilenamePattern,
    /// Basenames to skip, matched in any directory
    pub exclude_resources: HashSet<String>,
    /// Number of parallel workers
    pub jobs: usize,
    /// Enable verbose output
    pub verbose: bool,
}

impl Config {
    /// Configuration with the default pattern and no exclusions
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            filename_pattern: FilenamePattern::default(),
            exclude_resources: HashSet::new(),
            jobs: 1,
            verbose: false,
        }
    }

    pub fn with_pattern(mut self, pattern: FilenamePattern) -> Self {
        self.filename_pattern = pattern;
        self
    }

    pub fn with_excludes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_resources = names.into_iter().map(Into::into).collect();
        self
    }

    /// Create Config from CLI arguments
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        if !cli.source.is_dir() {
            return Err(PipelineError::SourceNotFound { path: cli.source }.into());
        }
        let source_dir = cli.source.canonicalize()?;
        let target_dir = resolve_target(&cli.target)?;

        let filename_pattern = FilenamePattern::parse(&cli.pattern)?;

        let exclude_resources = cli
            .exclude
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            source_dir,
            target_dir,
            filename_pattern,
            exclude_resources,
            jobs: cli.jobs.max(1),
            verbose: cli.verbose,
        })
    }
}

/// Resolve `path` to an absolute path comparable with a canonical source.
///
/// `.` and `..` are folded lexically, then the deepest existing ancestor is
/// canonicalized and the part that does not exist yet is joined back on.
fn resolve_target(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    let Some(existing) = normalized
        .ancestors()
        .find(|ancestor| ancestor.exists())
        .map(Path::to_path_buf)
    else {
        return Ok(normalized);
    };

    let mut resolved = existing.canonicalize()?;
    if let Ok(missing) = normalized.strip_prefix(&existing) {
        if !missing.as_os_str().is_empty() {
            resolved.push(missing);
        }
    }
    Ok(resolved)
}
