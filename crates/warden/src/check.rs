// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `warden check` command implementation.
//!
//! Runs startup diagnostics: configuration parses, the profile resolves,
//! provider packages are discoverable, and a full deployment builds a
//! working registry. A failed check makes the process exit 1 after the
//! report prints.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use warden_config::WardenConfig;
use warden_core::WardenError;
use warden_events::EVENT_LISTENER_SPI;

use crate::bootstrap;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Check status.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
    /// Duration the check took.
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: String, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message,
            duration: start.elapsed(),
        }
    }
}

/// Run the `warden check` command.
///
/// With `--plain`, disables colored output.
pub async fn run_check(
    config: &WardenConfig,
    config_path: Option<&Path>,
    defines: &[String],
    plain: bool,
) -> Result<(), WardenError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let mut results = Vec::new();

    results.push(check_config(config_path));
    results.push(check_profile(config, defines));
    results.push(check_directories(&config.providers.directories));
    results.push(check_deployment(config, defines).await);
    results.push(check_memory());

    println!();
    println!("  warden check");
    println!("  {}", "-".repeat(60));

    let mut fail_count = 0;
    let mut warn_count = 0;

    for result in &results {
        let duration_ms = result.duration.as_millis();
        let line;

        match result.status {
            CheckStatus::Pass => {
                if use_color {
                    use colored::Colorize;
                    line = format!(
                        "    {} {:<22} {} ({duration_ms}ms)",
                        "✓".green(),
                        result.name,
                        result.message
                    );
                } else {
                    line = format!(
                        "    [OK]   {:<22} {} ({duration_ms}ms)",
                        result.name, result.message
                    );
                }
            }
            CheckStatus::Warn => {
                warn_count += 1;
                if use_color {
                    use colored::Colorize;
                    line = format!(
                        "    {} {:<22} {} ({duration_ms}ms)",
                        "!".yellow(),
                        result.name,
                        result.message.yellow()
                    );
                } else {
                    line = format!(
                        "    [WARN] {:<22} {} ({duration_ms}ms)",
                        result.name, result.message
                    );
                }
            }
            CheckStatus::Fail => {
                fail_count += 1;
                if use_color {
                    use colored::Colorize;
                    line = format!(
                        "    {} {:<22} {} ({duration_ms}ms)",
                        "✗".red(),
                        result.name,
                        result.message.red()
                    );
                } else {
                    line = format!(
                        "    [FAIL] {:<22} {} ({duration_ms}ms)",
                        result.name, result.message
                    );
                }
            }
        }

        println!("{line}");
    }

    println!();

    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }

    println!();

    if fail_count > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Check configuration loads without errors.
fn check_config(config_path: Option<&Path>) -> CheckResult {
    let start = Instant::now();
    let loaded = match config_path {
        Some(path) => warden_config::load_and_validate_path(path),
        None => warden_config::load_and_validate(),
    };
    match loaded {
        Ok(_) => CheckResult::new("Configuration", CheckStatus::Pass, "valid".to_string(), start),
        Err(errors) => CheckResult::new(
            "Configuration",
            CheckStatus::Fail,
            format!("{} error(s)", errors.len()),
            start,
        ),
    }
}

/// Check the profile resolves from config and `-D` properties.
fn check_profile(config: &WardenConfig, defines: &[String]) -> CheckResult {
    let start = Instant::now();
    match bootstrap::resolve(config, defines) {
        Ok(profile) => CheckResult::new(
            "Profile",
            CheckStatus::Pass,
            format!(
                "{} ({} features enabled)",
                profile.name(),
                profile.enabled_features().len()
            ),
            start,
        ),
        Err(e) => CheckResult::new("Profile", CheckStatus::Fail, e.to_string(), start),
    }
}

/// Check the configured provider directories are scannable.
fn check_directories(directories: &[String]) -> CheckResult {
    let start = Instant::now();
    let missing: Vec<&str> = directories
        .iter()
        .filter(|dir| !Path::new(dir.as_str()).is_dir())
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return CheckResult::new(
            "Provider directories",
            CheckStatus::Warn,
            format!("not found: {} (no packages load from there)", missing.join(", ")),
            start,
        );
    }

    let paths: Vec<PathBuf> = directories.iter().map(PathBuf::from).collect();
    match warden_deploy::discover_packages(&paths) {
        Ok(packages) => CheckResult::new(
            "Provider directories",
            CheckStatus::Pass,
            format!("{} package(s) found", packages.len()),
            start,
        ),
        Err(e) => CheckResult::new(
            "Provider directories",
            CheckStatus::Fail,
            e.to_string(),
            start,
        ),
    }
}

/// Check a full deployment builds a working registry.
async fn check_deployment(config: &WardenConfig, defines: &[String]) -> CheckResult {
    let start = Instant::now();
    let profile = match bootstrap::resolve(config, defines) {
        Ok(profile) => profile,
        Err(e) => return CheckResult::new("Deployment", CheckStatus::Fail, e.to_string(), start),
    };
    match bootstrap::build_sessions(config, profile) {
        Ok(sessions) => {
            let spis = sessions.registry().len();
            let providers: usize = sessions
                .registry()
                .describe()
                .iter()
                .map(|spi| spi.providers.len())
                .sum();

            let mut session = sessions.create_session();
            let smoke = session.provider(&EVENT_LISTENER_SPI);
            session.close();

            let result = match smoke {
                Ok(_) => CheckResult::new(
                    "Deployment",
                    CheckStatus::Pass,
                    format!("{spis} SPI(s), {providers} provider(s)"),
                    start,
                ),
                Err(e) => CheckResult::new(
                    "Deployment",
                    CheckStatus::Fail,
                    format!("session smoke test: {e}"),
                    start,
                ),
            };
            sessions.shutdown().await;
            result
        }
        Err(e) => CheckResult::new("Deployment", CheckStatus::Fail, e.to_string(), start),
    }
}

/// Check the allocator baseline via jemalloc stats.
fn check_memory() -> CheckResult {
    let start = Instant::now();

    #[cfg(not(target_env = "msvc"))]
    {
        let _ = tikv_jemalloc_ctl::epoch::advance();
        let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
        let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);
        let allocated_mb = allocated as f64 / (1024.0 * 1024.0);
        let resident_mb = resident as f64 / (1024.0 * 1024.0);

        CheckResult::new(
            "Memory baseline",
            CheckStatus::Pass,
            format!("heap: {allocated_mb:.1} MB, resident: {resident_mb:.1} MB"),
            start,
        )
    }

    #[cfg(target_env = "msvc")]
    {
        CheckResult::new(
            "Memory baseline",
            CheckStatus::Warn,
            "jemalloc not available on MSVC".to_string(),
            start,
        )
    }
}

#[cfg(test)]
mod tests {
    use warden_test_utils::TempPackage;

    use super::*;

    #[test]
    fn check_status_equality() {
        assert_eq!(CheckStatus::Pass, CheckStatus::Pass);
        assert_ne!(CheckStatus::Pass, CheckStatus::Fail);
    }

    #[test]
    fn check_profile_reports_the_resolved_preset() {
        let result = check_profile(
            &WardenConfig::default(),
            &["warden.profile=preview".to_string()],
        );
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.message.starts_with("preview"));
    }

    #[test]
    fn check_profile_fails_on_bad_properties() {
        let result = check_profile(
            &WardenConfig::default(),
            &["warden.profile.feature.scripts=on".to_string()],
        );
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("scripts"));
    }

    #[test]
    fn check_directories_warns_when_missing() {
        let result = check_directories(&["/tmp/warden-check-missing-dir".to_string()]);
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(result.message.contains("not found"));
    }

    #[test]
    fn check_directories_counts_packages() {
        let pack = TempPackage::new("acme");
        pack.file("README.txt", "hello");
        let result = check_directories(&[pack.deploy_dir().display().to_string()]);
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.message.starts_with("1 package(s)"));
    }

    #[tokio::test]
    async fn check_deployment_passes_on_the_builtin_registry() {
        let result = check_deployment(&WardenConfig::default(), &[]).await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.message, "2 SPI(s), 1 provider(s)");
    }

    #[test]
    fn check_memory_reports_a_baseline() {
        let result = check_memory();
        // Passes with jemalloc; warns where jemalloc is unavailable.
        assert!(result.status == CheckStatus::Pass || result.status == CheckStatus::Warn);
    }

    #[tokio::test]
    async fn check_deployment_fails_on_broken_packages() {
        let pack = TempPackage::new("acme-broken");
        pack.service("warden.provider.Spi", &["acme.GhostSpi"]);

        let mut config = WardenConfig::default();
        config.providers.directories = vec![pack.deploy_dir().display().to_string()];

        let result = check_deployment(&config, &[]).await;
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("acme.GhostSpi"));
    }
}
