//! Environment scanning: manifest presence and the installed-package snapshot.
//!
//! The scan touches the filesystem and spawns the package manager, so both
//! steps are bounded by a timeout. A failed package query only marks the
//! `installed_packages` section as failed; the manifest list is still
//! returned. Results are never cached between calls.

mod packages;

use std::io::ErrorKind as IoErrorKind;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::config::MANIFEST_FILES;
use crate::error::{AnalysisError, Result};
use crate::report::Section;

pub use packages::{InstalledPackage, PackageList, PackageQuery};

/// Point-in-time view of a project's dependency setup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestScanResult {
    pub project_path: String,
    /// Manifest file names present, in fixed table order.
    pub manifests_found: Vec<String>,
    pub installed_packages: Section<PackageList>,
}

/// Scan a project directory from synchronous code.
///
/// Safe to call from inside a tokio runtime; the scan then runs on a
/// separate thread with its own runtime.
pub fn scan(path: &Path, timeout: Duration) -> Result<ManifestScanResult> {
    scan_blocking(path, &PackageQuery::new().timeout(timeout))
}

/// Synchronous scan with a custom package query.
pub fn scan_blocking(path: &Path, query: &PackageQuery) -> Result<ManifestScanResult> {
    if tokio::runtime::Handle::try_current().is_err() {
        return scan_on_private_runtime(path, query);
    }

    tracing::debug!(path = %path.display(), "scanning on a helper thread");
    std::thread::scope(|scope| {
        scope
            .spawn(|| scan_on_private_runtime(path, query))
            .join()
            .unwrap_or_else(|_| Err(AnalysisError::io(path, "scan thread panicked")))
    })
}

fn scan_on_private_runtime(path: &Path, query: &PackageQuery) -> Result<ManifestScanResult> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AnalysisError::io(path, format!("failed to start runtime: {}", e)))?;
    let result = runtime.block_on(scan_with(path, query));
    // A timed-out filesystem call may still hold a blocking thread.
    runtime.shutdown_background();
    result
}

/// Scan a project directory.
pub async fn scan_async(path: &Path, timeout: Duration) -> Result<ManifestScanResult> {
    scan_with(path, &PackageQuery::new().timeout(timeout)).await
}

/// Scan a project directory with a custom package query.
///
/// The query's timeout also bounds the directory lookup.
pub async fn scan_with(path: &Path, query: &PackageQuery) -> Result<ManifestScanResult> {
    let limit = query.timeout_duration();
    let manifests_found = match tokio::time::timeout(limit, find_manifests(path)).await {
        Ok(found) => found?,
        Err(_) => {
            return Err(AnalysisError::io(
                path,
                format!("directory lookup timed out after {}ms", limit.as_millis()),
            ))
        }
    };

    let installed_packages = match query.run().await {
        Ok(list) => Section::ok(list),
        Err(err) => {
            tracing::warn!(program = query.program(), error = %err, "package query failed");
            Section::failed(err)
        }
    };

    tracing::info!(
        path = %path.display(),
        manifests = manifests_found.len(),
        packages_ok = installed_packages.success,
        "scanned project"
    );

    Ok(ManifestScanResult {
        project_path: path.display().to_string(),
        manifests_found,
        installed_packages,
    })
}

/// Check the directory is readable and list the manifests it holds.
async fn find_manifests(path: &Path) -> Result<Vec<String>> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
        IoErrorKind::NotFound => AnalysisError::NotFound {
            path: path.to_path_buf(),
        },
        _ => AnalysisError::io(path, e),
    })?;
    if !metadata.is_dir() {
        return Err(AnalysisError::io(path, "not a directory"));
    }
    // Fails on unreadable directories.
    let _entries = tokio::fs::read_dir(path)
        .await
        .map_err(|e| AnalysisError::io(path, e))?;

    let mut found = Vec::new();
    for name in MANIFEST_FILES {
        if tokio::fs::try_exists(path.join(name)).await.unwrap_or(false) {
            found.push(name.to_string());
        }
    }
    Ok(found)
}
