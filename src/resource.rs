//! Resource and classification types for the minification pipeline.
//!
//! A [`Resource`] is a single file found under the source directory. Its
//! [`Classification`] decides which phase (if any) handles it.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// How the pipeline treats a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Minified in phase two, references rewritten
    Html,
    /// Minified and renamed in phase one
    Css,
    /// Minified and renamed in phase one
    Js,
    /// Not handled, produces no output
    Other,
    /// Listed in the exclusion set, produces no output
    Excluded,
}

impl Classification {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Html => "HTML",
            Classification::Css => "CSS",
            Classification::Js => "JS",
            Classification::Other => "OTHER",
            Classification::Excluded => "EXCLUDED",
        }
    }

    /// Classify by extension, case-insensitively
    #[inline]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "html" => Classification::Html,
            "css" => Classification::Css,
            "js" => Classification::Js,
            _ => Classification::Other,
        }
    }

    /// True for kinds that are renamed and registered in phase one
    #[inline]
    pub fn is_leaf_asset(&self) -> bool {
        matches!(self, Classification::Css | Classification::Js)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file under the source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Absolute path of the source file
    pub source_path: PathBuf,
    /// Path relative to the source directory
    pub relative_path: PathBuf,
    /// File name without directories
    pub basename: String,
    /// Lowercased extension, empty if none
    pub extension: String,
    pub classification: Classification,
}

impl Resource {
    /// Build a resource for `source_path`, which must live under `source_dir`.
    ///
    /// Returns `None` when the path is not under `source_dir` or has no
    /// file name.
    pub fn new(
        source_dir: &Path,
        source_path: &Path,
        exclude_resources: &HashSet<String>,
    ) -> Option<Self> {
        let relative_path = source_path.strip_prefix(source_dir).ok()?.to_path_buf();
        let basename = source_path.file_name()?.to_string_lossy().into_owned();
        let extension = source_path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let classification = if exclude_resources.contains(&basename) {
            Classification::Excluded
        } else {
            Classification::from_extension(&extension)
        };

        Some(Self {
            source_path: source_path.to_path_buf(),
            relative_path,
            basename,
            extension,
            classification,
        })
    }

    /// Directory of this resource relative to the source directory
    #[inline]
    pub fn relative_dir(&self) -> &Path {
        self.relative_path.parent().unwrap_or_else(|| Path::new(""))
    }
}
