//! Search-path executable lookup

use std::env;
use std::ffi::OsString;
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Report whether `name` resolves to an executable on the current `PATH`.
///
/// Pure query with no side effects: absence is a normal `false`, never an
/// error. On Windows the platform executable suffix is tried as well; on Unix
/// a candidate must carry an executable permission bit.
pub fn has_executable(name: &str) -> bool {
    let path_value = env::var_os("PATH").unwrap_or_default();

    let mut candidates = vec![OsString::from(name)];
    let exe_suffix = env::consts::EXE_SUFFIX;
    if !exe_suffix.is_empty() && !name.ends_with(exe_suffix) {
        candidates.push(OsString::from(format!("{name}{exe_suffix}")));
    }

    for directory in env::split_paths(&path_value) {
        if directory.as_os_str().is_empty() {
            continue;
        }
        for candidate in &candidates {
            let path = directory.join(candidate);
            let Ok(metadata) = fs::metadata(&path) else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            #[cfg(unix)]
            {
                if metadata.permissions().mode() & 0o111 == 0 {
                    continue;
                }
            }
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_a_shell() {
        #[cfg(unix)]
        assert!(has_executable("sh"));
        #[cfg(windows)]
        assert!(has_executable("cmd"));
    }

    #[test]
    fn test_missing_executable_is_false() {
        assert!(!has_executable("no-such-executable-5c2f9a"));
    }
}
