use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::resource::Resource;

/// ENOSPC on Unix
const NO_SPACE_LEFT: i32 = 28;

/// Output location for `resource` under `target_dir` with the given basename.
///
/// Mirrors the resource's directory relative to the source directory.
pub fn output_path(target_dir: &Path, resource: &Resource, basename: &str) -> PathBuf {
    target_dir.join(resource.relative_dir()).join(basename)
}

/// Write `content` to `path`, creating parent directories as needed.
///
/// Existing files are overwritten. Returns the number of bytes written.
pub fn write_output(path: &Path, content: &str) -> Result<u64, PipelineError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                if is_disk_full(&e) {
                    return PipelineError::DiskFull {
                        path: parent.to_path_buf(),
                    };
                }
                PipelineError::CreateDirFailed {
                    path: parent.to_path_buf(),
                    source: e,
                }
            })?;
        }
    }

    fs::write(path, content).map_err(|e| {
        if is_disk_full(&e) {
            return PipelineError::DiskFull {
                path: path.to_path_buf(),
            };
        }
        PipelineError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    Ok(content.len() as u64)
}

/// Emit `content` for `resource` as `basename`, returning (path, bytes written)
pub fn emit(
    target_dir: &Path,
    resource: &Resource,
    basename: &str,
    content: &str,
) -> Result<(PathBuf, u64), PipelineError> {
    let path = output_path(target_dir, resource, basename);
    let bytes = write_output(&path, content)?;
    Ok((path, bytes))
}

#[inline]
fn is_disk_full(e: &io::Error) -> bool {
    e.raw_os_error() == Some(NO_SPACE_LEFT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn resource(source_dir: &Path, relative: &str) -> Resource {
        Resource::new(source_dir, &source_dir.join(relative), &HashSet::new()).unwrap()
    }

    // ==================== output_path tests ====================

    #[test]
    fn test_output_path_mirrors_nested_dirs() {
        let res = resource(Path::new("/src"), "sub/dir/style.css");
        let path = output_path(Path::new("/out"), &res, "style-abc123.min.css");
        assert_eq!(path, PathBuf::from("/out/sub/dir/style-abc123.min.css"));
    }

    #[test]
    fn test_output_path_at_root() {
        let res = resource(Path::new("/src"), "index.html");
        let path = output_path(Path::new("/out"), &res, "index.html");
        assert_eq!(path, PathBuf::from("/out/index.html"));
    }

    #[test]
    fn test_output_path_source_name_repeated_in_tree() {
        // A directory named like the source root must not confuse path arithmetic
        let res = resource(Path::new("/webapp"), "webapp/app.js");
        let path = output_path(Path::new("/out"), &res, "app.min.js");
        assert_eq!(path, PathBuf::from("/out/webapp/app.min.js"));
    }

    // ==================== write_output tests ====================

    #[test]
    fn test_write_output_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("c.css");

        let bytes = write_output(&path, "body{}").unwrap();

        assert_eq!(bytes, 6);
        assert_eq!(fs::read_to_string(&path).unwrap(), "body{}");
    }

    #[test]
    fn test_write_output_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.html");
        fs::write(&path, "old content that is longer").unwrap();

        write_output(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_output_parent_is_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let result = write_output(&blocker.join("a.css"), "x");

        assert!(matches!(
            result,
            Err(PipelineError::WriteFailed { .. }) | Err(PipelineError::CreateDirFailed { .. })
        ));
    }

    #[test]
    fn test_emit_returns_path_and_size() {
        let temp = TempDir::new().unwrap();
        let res = resource(Path::new("/src"), "css/app.css");

        let (path, bytes) = emit(temp.path(), &res, "app-000000.min.css", "a{}").unwrap();

        assert_eq!(path, temp.path().join("css").join("app-000000.min.css"));
        assert_eq!(bytes, 3);
        assert!(path.exists());
    }
}
