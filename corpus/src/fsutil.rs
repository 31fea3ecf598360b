//! Filesystem helpers shared by the pipeline stages.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Recursively collects every file under `dir`, sorted by path.
///
/// Symlinked directories are not descended into. Symlinks to files, and
/// dangling symlinks, are listed like regular files.
pub(crate) fn walk_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    fn walk(dir: &Path, paths: &mut Vec<PathBuf>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let path = entry.path();
            if file_type.is_dir() {
                walk(&path, paths)?;
            } else if file_type.is_symlink() && path.is_dir() {
                continue;
            } else {
                paths.push(path);
            }
        }
        Ok(())
    }

    let mut paths = Vec::new();
    walk(dir, &mut paths)?;
    paths.sort();
    Ok(paths)
}

/// Copies `src` to `dst`, creating parent directories.
///
/// Permissions are copied by `fs::copy`; the modification time is carried
/// over afterwards through a read-only handle, since the copy may itself be
/// read-only.
pub(crate) fn copy_with_metadata(src: &Path, dst: &Path) -> io::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;

    let modified = fs::metadata(src)?.modified()?;
    File::open(dst)?.set_modified(modified)?;
    Ok(())
}

/// Removes `dir` and everything below it, then recreates it empty.
pub(crate) fn reset_dir(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::create_dir_all(dir)
}
