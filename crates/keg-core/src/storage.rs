//! File lifecycle for downloads and installed binaries.
//!
//! Everything is written under a temporary name first and atomically renamed
//! into place, so a bin directory never holds a half-copied executable.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.tar.gz` -> `a.tar.gz.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Hidden sibling used while copying into a shared directory: `<dir>/.<name>.part`.
fn hidden_temp_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!(".{name}{TEMP_SUFFIX}"))
}

/// Copy `src` to `<dest_dir>/<name>` as an executable, replacing any existing file.
///
/// Creates `dest_dir` if needed. The copy is synced and made executable
/// before the rename.
pub fn install_executable(src: &Path, dest_dir: &Path, name: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dest_dir)?;
    let final_path = dest_dir.join(name);
    let tmp = hidden_temp_path(dest_dir, name);

    let result = (|| {
        fs::copy(src, &tmp)?;
        set_executable(&tmp)?;
        File::open(&tmp)?.sync_all()?;
        fs::rename(&tmp, &final_path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result?;
    Ok(final_path)
}

/// Mark `path` executable (0755). No-op off unix.
#[cfg(unix)]
pub fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
pub fn set_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
