//! Installed-package inventory from the host package manager.

use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::process::Command;

use crate::config::{DEFAULT_PACKAGE_QUERY_TIMEOUT, PACKAGE_MANAGER, PACKAGE_MANAGER_ARGS};
use crate::error::{AnalysisError, Result};

/// One entry of `pip list --format=json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
}

/// Snapshot of the installed packages at query time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageList {
    pub packages: Vec<InstalledPackage>,
}

impl PackageList {
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Version of a package, matched case-insensitively.
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.packages
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.version.as_str())
    }
}

/// How to ask the package manager for its inventory.
#[derive(Debug, Clone)]
pub struct PackageQuery {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Default for PackageQuery {
    fn default() -> Self {
        Self::with_command(PACKAGE_MANAGER, PACKAGE_MANAGER_ARGS.iter().copied())
    }
}

impl PackageQuery {
    /// The standard `pip list --format=json` query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a different command; it must print the same JSON shape.
    pub fn with_command<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout: DEFAULT_PACKAGE_QUERY_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        self.timeout
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the query. The child is killed if the timeout elapses.
    pub async fn run(&self) -> Result<PackageList> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AnalysisError::subprocess(format!("failed to run {}: {}", self.program, e))
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(AnalysisError::subprocess(format!(
                    "{} did not complete: {}",
                    self.program, e
                )))
            }
            Err(_) => {
                return Err(AnalysisError::subprocess(format!(
                    "{} timed out after {}ms",
                    self.program,
                    self.timeout.as_millis()
                )))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.lines().next().unwrap_or("").trim();
            return Err(AnalysisError::subprocess(if detail.is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                format!("{} exited with {}: {}", self.program, output.status, detail)
            }));
        }

        let packages: Vec<InstalledPackage> = serde_json::from_slice(&output.stdout)
            .map_err(|e| {
                AnalysisError::subprocess(format!("unreadable {} output: {}", self.program, e))
            })?;

        tracing::debug!(
            program = %self.program,
            packages = packages.len(),
            "package query finished"
        );
        Ok(PackageList { packages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_query_is_pip_list() {
        let query = PackageQuery::new();
        assert_eq!(query.program(), "pip");
        assert_eq!(query.args, vec!["list", "--format=json"]);
        assert_eq!(query.timeout_duration(), DEFAULT_PACKAGE_QUERY_TIMEOUT);
    }

    #[test]
    fn test_version_lookup() {
        let list = PackageList {
            packages: vec![InstalledPackage {
                name: "Requests".to_string(),
                version: "2.31.0".to_string(),
            }],
        };
        assert_eq!(list.version_of("requests"), Some("2.31.0"));
        assert_eq!(list.version_of("flask"), None);
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let query = PackageQuery::with_command("codeprobe-no-such-package-manager", ["list"]);
        let err = query.run().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SubprocessFailure);
        assert!(err.to_string().contains("failed to run"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_parses_json_inventory() {
        let script = r#"echo '[{"name": "requests", "version": "2.31.0"}, {"name": "idna", "version": "3.6", "editable_project_location": "/src"}]'"#;
        let list = PackageQuery::with_command("sh", ["-c", script])
            .run()
            .await
            .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.packages[0].name, "requests");
        assert_eq!(list.version_of("idna"), Some("3.6"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit() {
        let err = PackageQuery::with_command("sh", ["-c", "echo broken >&2; exit 3"])
            .run()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SubprocessFailure);
        assert!(err.to_string().contains("broken"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unparseable_output() {
        let err = PackageQuery::with_command("sh", ["-c", "echo not json"])
            .run()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unreadable"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_query() {
        let err = PackageQuery::with_command("sh", ["-c", "sleep 5"])
            .timeout(Duration::from_millis(100))
            .run()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
