// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Runtime settings.
//!
//! Every value is resolved in the same order: explicit CLI flag, then
//! environment variable, then built-in default.

use std::path::PathBuf;

/// Browser identity presented to remote hosts.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/91.0.4472.124 Safari/537.36";

/// Referer sent with image downloads so hot-link protected hosts serve them.
pub const DEFAULT_REFERER: &str = "https://www.instagram.com/";

/// Default bound on every remote call.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Photo-sharing hosts probed for a raw media URL.
pub const DEFAULT_PLATFORM_DOMAINS: &[&str] = &["instagram.com"];

/// Suffix appended to a cleaned post URL to reach its full-size media.
pub const DEFAULT_MEDIA_SUFFIX: &str = "/media/?size=l";

/// Default HTTP port of `vitrine serve`.
pub const DEFAULT_PORT: u16 = 5000;

/// Remote access settings.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout_ms: u64,
    pub user_agent: String,
    pub referer: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: BROWSER_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
        }
    }
}

/// Platform probe settings.
#[derive(Debug, Clone)]
pub struct PlatformSettings {
    /// Hosts (and their subdomains) handled by the probe.
    pub domains: Vec<String>,
    pub media_suffix: String,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            domains: DEFAULT_PLATFORM_DOMAINS.iter().map(|d| d.to_string()).collect(),
            media_suffix: DEFAULT_MEDIA_SUFFIX.to_string(),
        }
    }
}

/// Everything the runtime needs to locate its data and reach the network.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root holding `db.json`, `categories.json` and `uploads/`.
    pub data_dir: PathBuf,
    pub http: HttpSettings,
    pub platform: PlatformSettings,
}

impl Settings {
    /// Settings rooted at `data_dir` with default network behaviour.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            http: HttpSettings::default(),
            platform: PlatformSettings::default(),
        }
    }

    /// Resolve settings from CLI overrides and the environment.
    pub fn resolve(data_dir: Option<&str>, timeout_ms: Option<u64>) -> Self {
        let mut settings = Self::with_data_dir(resolve_data_dir(data_dir));

        settings.http.timeout_ms = timeout_ms
            .or_else(|| env_parse("VITRINE_HTTP_TIMEOUT_MS"))
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        if let Ok(referer) = std::env::var("VITRINE_REFERER") {
            if !referer.trim().is_empty() {
                settings.http.referer = referer.trim().to_string();
            }
        }

        if let Ok(domains) = std::env::var("VITRINE_PLATFORM_DOMAINS") {
            settings.platform.domains = parse_domain_list(&domains);
        }

        settings
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("db.json")
    }

    pub fn categories_path(&self) -> PathBuf {
        self.data_dir.join("categories.json")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }
}

/// Resolve the data directory.
pub fn resolve_data_dir(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var("VITRINE_DATA_DIR") {
        if !env_path.trim().is_empty() {
            return PathBuf::from(env_path);
        }
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".vitrine")
}

/// Resolve the listening port: flag, then `PORT`, then the default.
pub fn resolve_port(explicit: Option<u16>) -> u16 {
    explicit
        .or_else(|| env_parse("PORT"))
        .unwrap_or(DEFAULT_PORT)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Split a comma-separated domain list, dropping blanks and leading dots.
pub fn parse_domain_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|d| d.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|d| !d.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::with_data_dir("/tmp/vitrine-test");
        assert_eq!(s.http.timeout_ms, 10_000);
        assert_eq!(s.platform.domains, vec!["instagram.com".to_string()]);
        assert_eq!(s.db_path(), PathBuf::from("/tmp/vitrine-test/db.json"));
        assert_eq!(s.uploads_dir(), PathBuf::from("/tmp/vitrine-test/uploads"));
    }

    #[test]
    fn test_explicit_overrides_win() {
        let s = Settings::resolve(Some("/srv/catalog"), Some(2500));
        assert_eq!(s.data_dir, PathBuf::from("/srv/catalog"));
        assert_eq!(s.http.timeout_ms, 2500);
    }

    #[test]
    fn test_parse_domain_list() {
        assert_eq!(
            parse_domain_list(" instagram.com, .Flickr.com ,,"),
            vec!["instagram.com".to_string(), "flickr.com".to_string()]
        );
    }
}
