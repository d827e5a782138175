use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};

use crate::types::HarnessResult;

/// Environment variable to override the path to the `docker` binary used to manage the node.
pub const DOCKER_PATH_ENV: &str = "CROSSCHECK_DOCKER_PATH";

/// Environment variable that `cargo` sets to its own path for the processes it runs.
pub const CARGO_PATH_ENV: &str = "CARGO";

/// Get the path to the `docker` binary, see [binary_path].
pub fn docker_path() -> HarnessResult<PathBuf> {
    binary_path(DOCKER_PATH_ENV, "docker")
}

/// Get the path to the `cargo` binary, see [binary_path].
pub fn cargo_path() -> HarnessResult<PathBuf> {
    binary_path(CARGO_PATH_ENV, "cargo")
}

/// Resolve the path to an external binary.
///
/// If `env_var` is set to a path, that path is used and must exist. If it is unset, or set to the
/// bare `name`, the binary is looked up in the user's `PATH`.
pub fn binary_path(env_var: &str, name: &str) -> HarnessResult<PathBuf> {
    match env::var(env_var).ok().as_deref() {
        Some("") => {
            bail!("'{env_var}' set to empty string");
        }
        Some(value) if value == name => lookup_in_path(env_var, name),
        None => lookup_in_path(env_var, name),
        Some(path) => {
            let path = PathBuf::from(path);
            if !path.exists() {
                bail!(
                    "Path to {name} binary overwritten with '{env_var}={path}' but that path doesn't exist",
                    path = path.display()
                );
            }
            Ok(path)
        }
    }
}

fn lookup_in_path(env_var: &str, name: &str) -> HarnessResult<PathBuf> {
    log::debug!("'{env_var}' is not a path so looking for '{name}' in user's 'PATH'");
    which::which(name).with_context(|| {
        format!("{name} binary not found in PATH. Please install it or set '{env_var}' to the correct path.")
    })
}

#[cfg(test)]
mod tests {
    #[cfg(unix)]
    use std::os::unix::fs::PermissionsExt as _;

    use serial_test::serial;
    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    const TEST_ENV: &str = "CROSSCHECK_TEST_BINARY_PATH";

    #[test]
    #[serial]
    fn should_not_get_path_if_not_exist() {
        env::set_var(TEST_ENV, "/non/existent/path/to/tool");
        let result = binary_path(TEST_ENV, "tool");
        env::remove_var(TEST_ENV);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn should_reject_empty_override() {
        env::set_var(TEST_ENV, "");
        let result = binary_path(TEST_ENV, "tool");
        env::remove_var(TEST_ENV);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn should_get_path_from_env() {
        let temp = NamedTempFile::new().expect("failed to create temp file");
        let test_path = temp.path().to_str().expect("failed to get temp file path");
        env::set_var(TEST_ENV, test_path);
        let result = binary_path(TEST_ENV, "tool").expect("failed to get path");
        env::remove_var(TEST_ENV);
        assert_eq!(result, PathBuf::from(test_path));
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn should_find_binary_in_path() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let tool_path = temp.path().join("crosscheck-fake-tool");
        std::fs::write(&tool_path, "#!/bin/sh\n").expect("failed to create tool file");
        let mut perms = std::fs::metadata(&tool_path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&tool_path, perms).unwrap();

        let old_path = env::var_os("PATH");
        env::set_var("PATH", temp.path());
        env::remove_var(TEST_ENV);

        let result = binary_path(TEST_ENV, "crosscheck-fake-tool");

        if let Some(old_path) = old_path {
            env::set_var("PATH", old_path);
        }
        assert_eq!(result.expect("failed to find tool"), tool_path);
    }

    #[test]
    #[serial]
    fn should_not_find_missing_binary() {
        env::remove_var(TEST_ENV);
        let result = binary_path(TEST_ENV, "crosscheck-binary-that-does-not-exist");
        assert!(result.is_err());
    }
}
