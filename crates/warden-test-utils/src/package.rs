// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Disposable provider packages on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A provider package inside its own disposable deployment directory.
///
/// The deployment directory is what package discovery scans; it holds
/// exactly this one package and disappears on drop. Writer methods
/// return `&Self` so fixtures chain:
///
/// ```
/// use warden_test_utils::TempPackage;
///
/// let pack = TempPackage::new("acme-extensions");
/// pack.service("warden.provider.Spi", &["acme.MetricsSpi"])
///     .file("signer.js", "logout()");
/// ```
pub struct TempPackage {
    dir: TempDir,
    root: PathBuf,
}

impl TempPackage {
    /// Creates an empty package named `name`.
    pub fn new(name: &str) -> Self {
        let dir = TempDir::new().expect("create package temp dir");
        let root = dir.path().join(name);
        fs::create_dir_all(&root).expect("create package root");
        Self { dir, root }
    }

    /// The directory to hand to package discovery.
    pub fn deploy_dir(&self) -> &Path {
        self.dir.path()
    }

    /// The package root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a services manifest listing `implementations`.
    pub fn service(&self, interface: &str, implementations: &[&str]) -> &Self {
        let services = self.root.join("META-INF/services");
        fs::create_dir_all(&services).expect("create services dir");
        let mut body = implementations.join("\n");
        body.push('\n');
        fs::write(services.join(interface), body).expect("write services manifest");
        self
    }

    /// Writes the script descriptor JSON.
    pub fn script_descriptor(&self, json: &str) -> &Self {
        let meta = self.root.join("META-INF");
        fs::create_dir_all(&meta).expect("create META-INF dir");
        fs::write(meta.join("warden-scripts.json"), json).expect("write script descriptor");
        self
    }

    /// Writes an arbitrary file relative to the package root.
    pub fn file(&self, name: &str, contents: &str) -> &Self {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create file parent dir");
        }
        fs::write(&path, contents).expect("write package file");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_manifests_descriptor_and_files() {
        let pack = TempPackage::new("acme");
        pack.service("warden.provider.Spi", &["acme.MetricsSpi", "acme.ThemeSpi"])
            .script_descriptor(r#"{"authenticators": []}"#)
            .file("scripts/logout.js", "logout()");

        assert_eq!(pack.root().file_name().unwrap(), "acme");
        assert_eq!(pack.root().parent().unwrap(), pack.deploy_dir());

        let manifest =
            fs::read_to_string(pack.root().join("META-INF/services/warden.provider.Spi")).unwrap();
        assert_eq!(manifest, "acme.MetricsSpi\nacme.ThemeSpi\n");
        assert!(pack.root().join("META-INF/warden-scripts.json").is_file());
        assert_eq!(
            fs::read_to_string(pack.root().join("scripts/logout.js")).unwrap(),
            "logout()"
        );
    }
}
