//! Lookup of helper executables on `PATH`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Returns the full path of `program` if it exists on `PATH`.
///
/// Absolute paths are checked directly. On Windows a `.exe` candidate is
/// tried as well.
pub fn find_program<S: AsRef<OsStr>>(program: S) -> Option<PathBuf> {
    let program = program.as_ref();

    let path = Path::new(program);
    if path.is_absolute() {
        return path.is_file().then(|| path.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&paths) {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Some(candidate);
        }
        #[cfg(windows)]
        {
            let with_exe = candidate.with_extension("exe");
            if with_exe.is_file() {
                return Some(with_exe);
            }
        }
    }

    None
}
