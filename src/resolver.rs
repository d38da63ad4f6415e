//! Resolving a program identifier to something the kernel will execute.

use nix::unistd::{AccessFlags, access};
use std::ffi::OsStr;
use std::path::Path;

/// Whether `program` must be located through the search path.
///
/// Anything that does not start with the path separator is treated as a
/// bare name to be searched for; an absolute identifier is tested directly.
pub fn search_required(program: &str) -> bool {
    !program.starts_with('/')
}

/// Check that `program` exists and is executable by the current user.
///
/// Behavior:
/// - Path-qualified identifier: tested directly with `access(2)` X_OK.
/// - Bare name: each directory of `search_paths` is tried in listed order
///   and the first match wins. If the search path is absent or nothing
///   matches, the identifier itself gets a final direct check.
///
/// The check is inherently racy against the filesystem: the file can change
/// between this check and the exec. Such a change surfaces later as an
/// exec-time failure in the child, not here.
pub fn is_executable(search_paths: Option<&OsStr>, program: &str) -> bool {
    // Joining an empty name onto a directory yields the directory itself,
    // which would pass the X_OK probe below.
    if program.is_empty() {
        return false;
    }
    if search_required(program) {
        if let Some(paths) = search_paths {
            for dir in std::env::split_paths(paths) {
                if access(&dir.join(program), AccessFlags::X_OK).is_ok() {
                    return true;
                }
            }
        }
    }
    access(Path::new(program), AccessFlags::X_OK).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs::{File, set_permissions};
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn touch_executable(dir: &Path, name: &str) {
        let path = dir.join(name);
        File::create(&path).expect("create fixture");
        set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod fixture");
    }

    fn touch_plain(dir: &Path, name: &str) {
        let path = dir.join(name);
        File::create(&path).expect("create fixture");
        set_permissions(&path, std::fs::Permissions::from_mode(0o644)).expect("chmod fixture");
    }

    #[test]
    fn absolute_identifier_skips_the_search() {
        assert!(!search_required("/bin/ls"));
        // Deliberately empty search path: a path-qualified identifier must
        // still resolve on its own.
        assert!(is_executable(Some(OsStr::new("")), "/bin/sh"));
        assert!(!is_executable(Some(OsStr::new("/bin")), "/bin/no-such-file"));
    }

    #[test]
    fn bare_name_requires_search() {
        assert!(search_required("ls"));
        assert!(search_required("bin/ls"));
        assert!(search_required(""));
    }

    #[test]
    fn bare_name_found_in_any_listed_directory() {
        let first = tempfile::tempdir().expect("tempdir");
        let second = tempfile::tempdir().expect("tempdir");
        touch_executable(second.path(), "tool");

        let paths: OsString =
            std::env::join_paths([first.path(), second.path()]).expect("join_paths");
        assert!(is_executable(Some(&paths), "tool"));
    }

    #[test]
    fn non_executable_entry_does_not_stop_the_search() {
        let first = tempfile::tempdir().expect("tempdir");
        let second = tempfile::tempdir().expect("tempdir");
        touch_plain(first.path(), "tool");
        touch_executable(second.path(), "tool");

        let paths: OsString =
            std::env::join_paths([first.path(), second.path()]).expect("join_paths");
        assert!(is_executable(Some(&paths), "tool"));
    }

    #[test]
    fn missing_execute_bit_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch_plain(dir.path(), "tool");
        assert!(!is_executable(Some(dir.path().as_os_str()), "tool"));
    }

    #[test]
    fn unset_search_path_falls_back_to_direct_check() {
        assert!(is_executable(None, "/bin/sh"));
        assert!(!is_executable(None, "no-such-bare-name"));
    }

    #[test]
    fn empty_identifier_never_resolves() {
        assert!(!is_executable(Some(OsStr::new("/bin:/usr/bin")), ""));
    }
}
