use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::config::{Config, CONFIG_FILE};
use crate::links::is_navigable;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BootReport {
    pub warnings: u32,
    pub errors: u32,
}

/// Run all boot checks. Call this before Rocket launches.
/// Creates the assets directory if missing, warns about optional files, and
/// aborts if the content document is absent.
pub fn run(config: &Config) {
    info!("[boot] Bento boot check starting...");

    let report = check(config);

    if report.errors > 0 {
        error!(
            "[boot] Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            report.errors, report.warnings
        );
        process::exit(1);
    }

    if report.warnings > 0 {
        warn!(
            "[boot] Boot check passed with {} warning(s). Some features may not work correctly.",
            report.warnings
        );
    } else {
        info!("[boot] Boot check passed. All systems go.");
    }
}

pub fn check(config: &Config) -> BootReport {
    let mut report = BootReport::default();

    // ── 1. Config file ─────────────────────────────────
    if !Path::new(CONFIG_FILE).exists() {
        warn!("[boot]   {} not found, using defaults", CONFIG_FILE);
        report.warnings += 1;
    }

    // ── 2. Content document ────────────────────────────
    let content = Path::new(&config.content.path);
    if !content.is_file() {
        error!("[boot]   MISSING content document: {}", content.display());
        report.errors += 1;
    }

    // ── 3. Assets directory ────────────────────────────
    let assets = Path::new(&config.assets.dir);
    if !assets.exists() {
        match fs::create_dir_all(assets) {
            Ok(_) => info!("[boot]   Created directory: {}", assets.display()),
            Err(e) => {
                error!("[boot]   FAILED to create directory {}: {}", assets.display(), e);
                report.errors += 1;
            }
        }
    } else if !assets.is_dir() {
        error!("[boot]   Assets path is not a directory: {}", assets.display());
        report.errors += 1;
    }

    // ── 4. Outbound endpoints ──────────────────────────
    if !is_navigable(&config.feed.proxy_url) {
        warn!(
            "[boot]   Feed proxy {:?} is not an http(s) URL (channel videos will not load)",
            config.feed.proxy_url
        );
        report.warnings += 1;
    }
    if let Some(endpoint) = config.analytics.endpoint.as_deref() {
        if !is_navigable(endpoint) {
            warn!(
                "[boot]   Analytics endpoint {:?} is not an http(s) URL (events will fail)",
                endpoint
            );
            report.warnings += 1;
        }
    }

    // ── 5. Rocket.toml exists ───────────────────────────
    if !Path::new("Rocket.toml").exists() {
        warn!("[boot]   Rocket.toml not found, using default server config");
        report.warnings += 1;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("bento-boot-{}-{}", name, process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_content_is_fatal() {
        let dir = scratch_dir("missing");
        let mut config = Config::default();
        config.content.path = dir.join("nope.json").display().to_string();
        config.assets.dir = dir.join("assets").display().to_string();
        let report = check(&config);
        assert_eq!(report.errors, 1);
        assert!(dir.join("assets").is_dir());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn bad_proxy_is_a_warning() {
        let dir = scratch_dir("proxy");
        let content = dir.join("bento.json");
        fs::write(&content, "{}").unwrap();
        let mut config = Config::default();
        config.content.path = content.display().to_string();
        config.assets.dir = dir.display().to_string();
        let baseline = check(&config).warnings;
        config.feed.proxy_url = "ftp://proxy.example".to_string();
        let report = check(&config);
        assert_eq!(report.errors, 0);
        assert_eq!(report.warnings, baseline + 1);
        let _ = fs::remove_dir_all(&dir);
    }
}
