// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider package discovery.
//!
//! A provider package is a directory deployed under one of the configured
//! provider directories. Its `META-INF/services` files bind implementations
//! into the registry, and the package root may carry script files alongside
//! a script descriptor.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use warden_core::WardenError;

use crate::services::{is_qualified_name, parse_services_manifest, ServicesManifest};

/// Directory inside a package that holds services manifests.
pub const SERVICES_DIR: &str = "META-INF/services";

/// A discovered provider package.
#[derive(Debug, Clone)]
pub struct ProviderPackage {
    /// Package name, the deployed directory's name.
    pub name: String,
    /// Package root on disk; `None` for synthetic packages.
    pub root: Option<PathBuf>,
    /// Parsed services manifests, sorted by interface name.
    pub manifests: Vec<ServicesManifest>,
}

impl ProviderPackage {
    /// Builds a package that exists only in memory.
    ///
    /// The host binary uses this for built-in providers, so they travel
    /// through the same deployment path as packages found on disk.
    pub fn synthetic(name: impl Into<String>, mut manifests: Vec<ServicesManifest>) -> Self {
        manifests.sort_by(|a, b| a.interface.cmp(&b.interface));
        Self {
            name: name.into(),
            root: None,
            manifests,
        }
    }

    /// Looks up the manifest for one interface, if the package has it.
    pub fn manifest(&self, interface: &str) -> Option<&ServicesManifest> {
        self.manifests.iter().find(|m| m.interface == interface)
    }
}

/// Scans the configured provider directories for packages.
///
/// Every subdirectory of a configured directory is a package named after the
/// directory, sorted by name within each configured directory. Missing
/// directories are skipped, non-directory entries are ignored, and a package
/// name appearing under two directories is an error.
pub fn discover_packages(dirs: &[PathBuf]) -> Result<Vec<ProviderPackage>, WardenError> {
    let mut packages: Vec<ProviderPackage> = Vec::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    for dir in dirs {
        if !dir.is_dir() {
            debug!(directory = %dir.display(), "provider directory not present, skipping");
            continue;
        }
        let mut found: Vec<(String, PathBuf)> = Vec::new();
        for path in read_dir_entries(dir)? {
            if path.is_dir() {
                found.push((package_name(&path)?, path));
            }
        }
        found.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, root) in found {
            if !seen.insert(name.clone()) {
                return Err(WardenError::Deployment {
                    package: name,
                    message: "deployed more than once".to_string(),
                });
            }
            packages.push(load_package(name, root)?);
        }
    }

    Ok(packages)
}

fn read_dir_entries(dir: &Path) -> Result<Vec<PathBuf>, WardenError> {
    let unreadable = |e: std::io::Error| WardenError::Deployment {
        package: dir.display().to_string(),
        message: format!("cannot read directory: {e}"),
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        paths.push(entry.map_err(unreadable)?.path());
    }
    Ok(paths)
}

fn package_name(root: &Path) -> Result<String, WardenError> {
    match root.file_name().and_then(|n| n.to_str()) {
        Some(name) => Ok(name.to_string()),
        None => Err(WardenError::Deployment {
            package: root.display().to_string(),
            message: "package directory name is not valid UTF-8".to_string(),
        }),
    }
}

fn load_package(name: String, root: PathBuf) -> Result<ProviderPackage, WardenError> {
    let services = root.join(SERVICES_DIR);
    let mut manifests: Vec<ServicesManifest> = Vec::new();

    if services.is_dir() {
        for path in read_dir_entries(&services)? {
            if !path.is_file() {
                debug!(package = %name, path = %path.display(), "ignoring non-file services entry");
                continue;
            }
            let Some(interface) = path.file_name().and_then(|n| n.to_str()) else {
                debug!(package = %name, path = %path.display(), "ignoring services entry with non-UTF-8 name");
                continue;
            };
            if !is_qualified_name(interface) {
                debug!(package = %name, file = interface, "ignoring services entry, not an interface name");
                continue;
            }
            let content = fs::read_to_string(&path).map_err(|e| WardenError::Deployment {
                package: name.clone(),
                message: format!("cannot read manifest '{interface}': {e}"),
            })?;
            let implementations =
                parse_services_manifest(&content).map_err(|e| WardenError::Deployment {
                    package: name.clone(),
                    message: format!("manifest '{interface}': {e}"),
                })?;
            manifests.push(ServicesManifest {
                interface: interface.to_string(),
                implementations,
            });
        }
    }

    if manifests.is_empty() {
        warn!(package = %name, "package has no services manifests");
    }
    manifests.sort_by(|a, b| a.interface.cmp(&b.interface));

    Ok(ProviderPackage {
        name,
        root: Some(root),
        manifests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_manifest(root: &Path, interface: &str, body: &str) {
        let dir = root.join(SERVICES_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(interface), body).unwrap();
    }

    #[test]
    fn discovers_packages_sorted_with_manifests() {
        let deploy = TempDir::new().unwrap();
        let zeta = deploy.path().join("zeta-pack");
        let alpha = deploy.path().join("alpha-pack");
        fs::create_dir_all(&zeta).unwrap();
        fs::create_dir_all(&alpha).unwrap();
        write_manifest(&zeta, "warden.events.EventListenerProviderFactory", "acme.Kafka\n");
        write_manifest(&zeta, "warden.provider.Spi", "acme.MetricsSpi\n");
        write_manifest(&alpha, "warden.events.EventListenerProviderFactory", "acme.Stdout\n");

        let packages = discover_packages(&[deploy.path().to_path_buf()]).unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name, "alpha-pack");
        assert_eq!(packages[1].name, "zeta-pack");
        assert!(packages[0].root.is_some());

        let interfaces: Vec<_> = packages[1]
            .manifests
            .iter()
            .map(|m| m.interface.as_str())
            .collect();
        assert_eq!(
            interfaces,
            vec!["warden.events.EventListenerProviderFactory", "warden.provider.Spi"]
        );
        assert_eq!(packages[1].manifests[0].implementations, vec!["acme.Kafka"]);
    }

    #[test]
    fn missing_directory_is_skipped() {
        let deploy = TempDir::new().unwrap();
        let ghost = deploy.path().join("not-there");
        let packages = discover_packages(&[ghost]).unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn non_directory_entries_are_ignored() {
        let deploy = TempDir::new().unwrap();
        fs::write(deploy.path().join("README.md"), "docs").unwrap();
        let pack = deploy.path().join("real");
        fs::create_dir_all(&pack).unwrap();
        write_manifest(&pack, "warden.provider.Spi", "");

        let packages = discover_packages(&[deploy.path().to_path_buf()]).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "real");
    }

    #[test]
    fn duplicate_package_names_across_directories_error() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::create_dir_all(first.path().join("acme")).unwrap();
        fs::create_dir_all(second.path().join("acme")).unwrap();

        let err = discover_packages(&[first.path().to_path_buf(), second.path().to_path_buf()])
            .unwrap_err();
        assert!(matches!(
            err,
            WardenError::Deployment { ref package, .. } if package == "acme"
        ));
        assert!(err.to_string().contains("deployed more than once"));
    }

    #[test]
    fn package_without_manifests_is_kept() {
        let deploy = TempDir::new().unwrap();
        fs::create_dir_all(deploy.path().join("scripts-only")).unwrap();

        let packages = discover_packages(&[deploy.path().to_path_buf()]).unwrap();
        assert_eq!(packages.len(), 1);
        assert!(packages[0].manifests.is_empty());
    }

    #[test]
    fn invalid_manifest_body_names_the_package() {
        let deploy = TempDir::new().unwrap();
        let pack = deploy.path().join("broken");
        fs::create_dir_all(&pack).unwrap();
        write_manifest(&pack, "warden.provider.Spi", "not a name\n");

        let err = discover_packages(&[deploy.path().to_path_buf()]).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("broken"));
        assert!(text.contains("line 1"));
    }

    #[test]
    fn non_interface_file_names_are_ignored() {
        let deploy = TempDir::new().unwrap();
        let pack = deploy.path().join("macos");
        fs::create_dir_all(&pack).unwrap();
        write_manifest(&pack, "warden.provider.Spi", "acme.CustomSpi\n");
        fs::write(pack.join(SERVICES_DIR).join(".DS_Store"), [0u8, 1]).unwrap();

        let packages = discover_packages(&[deploy.path().to_path_buf()]).unwrap();
        assert_eq!(packages[0].manifests.len(), 1);
        assert_eq!(packages[0].manifests[0].interface, "warden.provider.Spi");
    }

    #[test]
    fn synthetic_package_sorts_manifests() {
        let package = ProviderPackage::synthetic(
            "builtin",
            vec![
                ServicesManifest {
                    interface: "z.Factory".to_string(),
                    implementations: vec![],
                },
                ServicesManifest {
                    interface: "a.Factory".to_string(),
                    implementations: vec!["a.Impl".to_string()],
                },
            ],
        );
        assert!(package.root.is_none());
        assert_eq!(package.manifests[0].interface, "a.Factory");
        assert!(package.manifest("z.Factory").is_some());
        assert!(package.manifest("missing.Factory").is_none());
    }
}
