//! File picker adapter
//!
//! The picker is the seam between the uploader and whatever supplies files:
//! a GUI dialog, a watched directory, a test fixture. The uploader captures
//! one picker at construction time, configured from the instance's
//! `accept`/`multiple` settings, and triggers it via
//! [`crate::Uploader::open_file_selector`].

use crate::error::Result;
use crate::file::FileHandle;
use std::path::PathBuf;

/// A source of selected files
pub trait FilePicker: Send + Sync {
    /// Produce a selection.
    ///
    /// `accept` holds the allowed lowercase extensions (empty means all);
    /// when `multiple` is false the selection holds at most one file.
    fn pick(&self, accept: &[String], multiple: bool) -> Result<Vec<FileHandle>>;
}

/// A picker that selects from a fixed list of filesystem paths.
///
/// The native stand-in for a browser file dialog: each call loads the
/// configured paths, applies the extension filter, and honours the
/// multiplicity flag.
#[derive(Debug, Clone, Default)]
pub struct FsFilePicker {
    paths: Vec<PathBuf>,
}

impl FsFilePicker {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(|p| p.into()).collect(),
        }
    }
}

impl FilePicker for FsFilePicker {
    fn pick(&self, accept: &[String], multiple: bool) -> Result<Vec<FileHandle>> {
        let mut files = Vec::new();

        for path in &self.paths {
            let file = FileHandle::from_path(path)?;

            if !accept.is_empty() {
                match file.extension() {
                    Some(ext) if accept.contains(&ext) => {}
                    _ => {
                        log::debug!("picker skipped {} (extension not accepted)", file.name());
                        continue;
                    }
                }
            }

            files.push(file);

            if !multiple {
                break;
            }
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &std::path::Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content).unwrap();
        f.sync_all().unwrap();
        path
    }

    #[test]
    fn test_pick_respects_multiple_flag() {
        let dir = tempdir().unwrap();
        let a = write_file(dir.path(), "a.txt", b"a");
        let b = write_file(dir.path(), "b.txt", b"b");

        let picker = FsFilePicker::new([&a, &b]);
        let single = picker.pick(&[], false).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].name(), "a.txt");

        let all = picker.pick(&[], true).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_pick_filters_by_extension() {
        let dir = tempdir().unwrap();
        let png = write_file(dir.path(), "image.png", b"png");
        let txt = write_file(dir.path(), "notes.txt", b"txt");

        let picker = FsFilePicker::new([&png, &txt]);
        let picked = picker.pick(&["png".to_string()], true).unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name(), "image.png");
    }

    #[test]
    fn test_pick_missing_path_is_an_error() {
        let picker = FsFilePicker::new(["/nonexistent/missing.bin"]);
        assert!(picker.pick(&[], true).is_err());
    }
}
