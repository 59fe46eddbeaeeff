use std::collections::HashSet;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::PipelineError;
use crate::resource::{Classification, Resource};
use crate::sink::LogSink;

/// Enumerate and classify every regular file under `source_dir`.
///
/// Entries are visited in file-name order so repeated runs see the same
/// sequence. Symbolic links are followed. When `skip_dir` lies inside
/// `source_dir` its subtree is not visited, so a target directory nested in
/// the sources never feeds previous outputs back in.
///
/// Excluded resources are logged and returned with
/// [`Classification::Excluded`].
///
/// An entry that cannot be inspected, such as a dangling symlink, only fails
/// the scan when it is a directory or would classify as HTML, CSS or JS.
/// Anything else is reported through `sink.warn` and returned as is.
#[must_use = "this returns the resources which should be processed"]
pub fn scan_resources(
    source_dir: &Path,
    skip_dir: Option<&Path>,
    exclude_resources: &HashSet<String>,
    sink: &dyn LogSink,
) -> Result<Vec<Resource>, PipelineError> {
    if !source_dir.is_dir() {
        return Err(PipelineError::SourceNotFound {
            path: source_dir.to_path_buf(),
        });
    }

    let skip_dir = skip_dir.filter(|dir| *dir != source_dir && dir.starts_with(source_dir));
    let mut resources = Vec::new();

    let walker = WalkDir::new(source_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| skip_dir.map_or(true, |dir| entry.path() != dir));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let resource = e
                    .path()
                    .filter(|path| !path.is_dir())
                    .and_then(|path| Resource::new(source_dir, path, exclude_resources))
                    .filter(|resource| {
                        matches!(
                            resource.classification,
                            Classification::Other | Classification::Excluded
                        )
                    });

                match resource {
                    Some(resource) => {
                        sink.warn(&format!("Unreadable resource {}: {}", resource.basename, e));
                        if resource.classification == Classification::Excluded {
                            sink.info(&format!("Skip resource: {}", resource.basename));
                        }
                        resources.push(resource);
                        continue;
                    }
                    None => {
                        return Err(PipelineError::ScanFailed {
                            path: e
                                .path()
                                .map(Path::to_path_buf)
                                .unwrap_or_else(|| source_dir.to_path_buf()),
                            source: e,
                        })
                    }
                }
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(resource) = Resource::new(source_dir, entry.path(), exclude_resources) else {
            continue;
        };

        if resource.classification == Classification::Excluded {
            sink.info(&format!("Skip resource: {}", resource.basename));
        }

        resources.push(resource);
    }

    Ok(resources)
}
