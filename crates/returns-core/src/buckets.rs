//! Browser bucket configuration and classification.
//!
//! A bucket names one report line. Most buckets match a single browser name;
//! version-qualified buckets (such as `"safari 12+"`) match a browser whose
//! version starts with one of the configured prefixes. A client may therefore
//! belong to both a generic and a version-qualified bucket.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ReturnsError};
use crate::models::{ClientMetrics, VisitRecord};

// ── BucketDefinition ──────────────────────────────────────────────────────────

/// One configured browser bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketDefinition {
    /// Report name of the bucket.
    pub name: String,
    /// Browser to compare against; defaults to `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_browser: Option<String>,
    /// Accepted browser-version prefixes; empty means any version.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub version_prefixes: Vec<String>,
}

impl BucketDefinition {
    /// A bucket matching every version of the browser called `name`.
    pub fn browser(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            match_browser: None,
            version_prefixes: Vec::new(),
        }
    }

    /// A bucket matching `browser` only for versions starting with one of
    /// `prefixes`.
    pub fn versioned<I, S>(
        name: impl Into<String>,
        browser: impl Into<String>,
        prefixes: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            match_browser: Some(browser.into()),
            version_prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Browser name this bucket compares against.
    pub fn target_browser(&self) -> &str {
        self.match_browser.as_deref().unwrap_or(&self.name)
    }

    /// Upper-cased name used as the report label.
    pub fn label(&self) -> String {
        self.name.to_uppercase()
    }

    /// Core membership rule shared by records and client metrics.
    pub fn matches(&self, browser: &str, browser_version: &str) -> bool {
        if browser.to_lowercase() != self.target_browser().to_lowercase() {
            return false;
        }
        self.version_prefixes.is_empty()
            || self
                .version_prefixes
                .iter()
                .any(|prefix| browser_version.starts_with(prefix.as_str()))
    }

    pub fn matches_metrics(&self, metrics: &ClientMetrics) -> bool {
        self.matches(&metrics.browser, &metrics.browser_version)
    }

    pub fn matches_record(&self, record: &VisitRecord) -> bool {
        self.matches(&record.browser, &record.browser_version)
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// The built-in, ordered bucket list.
pub fn default_buckets() -> Vec<BucketDefinition> {
    vec![
        BucketDefinition::browser("chrome"),
        BucketDefinition::browser("safari"),
        BucketDefinition::versioned("safari 12+", "safari", ["12", "13"]),
        BucketDefinition::browser("internet explorer"),
        BucketDefinition::browser("edge"),
        BucketDefinition::browser("firefox"),
        BucketDefinition::browser("samsung internet"),
        BucketDefinition::browser("opera"),
        BucketDefinition::browser("amazon silk"),
        BucketDefinition::browser("mozilla compatible agent"),
        BucketDefinition::browser("android webview"),
        BucketDefinition::browser("safari (in-app)"),
        BucketDefinition::browser("uc browser"),
        BucketDefinition::browser("e.ventures investment crawler"),
        BucketDefinition::browser("(not set)"),
        BucketDefinition::browser("''"),
    ]
}

/// Load an ordered bucket list from a JSON array file and validate it.
pub fn load_buckets(path: &Path) -> Result<Vec<BucketDefinition>> {
    let content = std::fs::read_to_string(path).map_err(|source| ReturnsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let buckets: Vec<BucketDefinition> = serde_json::from_str(&content)?;
    validate_buckets(&buckets)?;
    debug!(
        "Loaded {} bucket definitions from {}",
        buckets.len(),
        path.display()
    );
    Ok(buckets)
}

/// Resolve the bucket list: the file at `path` when given, else the defaults.
pub fn resolve_buckets(path: Option<&Path>) -> Result<Vec<BucketDefinition>> {
    match path {
        Some(p) => load_buckets(p),
        None => Ok(default_buckets()),
    }
}

/// Reject empty names, duplicate names (case-insensitive) and empty prefixes.
pub fn validate_buckets(buckets: &[BucketDefinition]) -> Result<()> {
    if buckets.is_empty() {
        return Err(ReturnsError::Config("bucket list is empty".to_string()));
    }

    let mut seen: HashSet<String> = HashSet::new();
    for bucket in buckets {
        if bucket.name.trim().is_empty() {
            return Err(ReturnsError::Config("bucket name is empty".to_string()));
        }
        if !seen.insert(bucket.name.to_lowercase()) {
            return Err(ReturnsError::Config(format!(
                "duplicate bucket name: {}",
                bucket.name
            )));
        }
        if bucket.version_prefixes.iter().any(|p| p.is_empty()) {
            return Err(ReturnsError::Config(format!(
                "empty version prefix in bucket: {}",
                bucket.name
            )));
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn metrics(browser: &str, version: &str) -> ClientMetrics {
        ClientMetrics {
            client_id: "c1".to_string(),
            browser: browser.to_string(),
            browser_version: version.to_string(),
            average_days_between_visits: 0,
            total_sessions: 2,
            total_transactions: 0,
            visit_count: 2,
        }
    }

    fn safari_12() -> BucketDefinition {
        BucketDefinition::versioned("safari 12+", "safari", ["12", "13"])
    }

    // ── matches ───────────────────────────────────────────────────────────────

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let chrome = BucketDefinition::browser("chrome");
        assert!(chrome.matches_metrics(&metrics("Chrome", "80.0")));
        assert!(chrome.matches_metrics(&metrics("CHROME", "")));
        assert!(!chrome.matches_metrics(&metrics("Chromium", "80.0")));
    }

    #[test]
    fn test_safari_12_matches_both_buckets() {
        let safari = BucketDefinition::browser("safari");
        let m = metrics("Safari", "12.1");
        assert!(safari.matches_metrics(&m));
        assert!(safari_12().matches_metrics(&m));
    }

    #[test]
    fn test_safari_13_matches_versioned_bucket() {
        assert!(safari_12().matches_metrics(&metrics("Safari", "13.0.4")));
    }

    #[test]
    fn test_safari_11_matches_only_generic_bucket() {
        let safari = BucketDefinition::browser("safari");
        let m = metrics("Safari", "11.0");
        assert!(safari.matches_metrics(&m));
        assert!(!safari_12().matches_metrics(&m));
    }

    #[test]
    fn test_versioned_bucket_requires_browser_match() {
        assert!(!safari_12().matches_metrics(&metrics("Chrome", "12.0")));
    }

    #[test]
    fn test_versioned_bucket_rejects_empty_version() {
        assert!(!safari_12().matches_metrics(&metrics("Safari", "")));
    }

    #[test]
    fn test_bucket_name_itself_is_not_matched_for_versioned() {
        // A browser literally called "safari 12+" is not a Safari 12 client.
        assert!(!safari_12().matches_metrics(&metrics("safari 12+", "12.0")));
    }

    #[test]
    fn test_matches_record_uses_same_rule() {
        let record = VisitRecord {
            index: 0,
            date: chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            client_id: "c1".to_string(),
            device_category: "mobile".to_string(),
            browser: "Safari".to_string(),
            browser_version: "12.0".to_string(),
            sessions: 1,
            transactions: 0,
            transaction_revenue: 0.0,
        };
        assert!(safari_12().matches_record(&record));
        assert!(BucketDefinition::browser("safari").matches_record(&record));
    }

    // ── label / target ────────────────────────────────────────────────────────

    #[test]
    fn test_label_is_upper_case() {
        assert_eq!(safari_12().label(), "SAFARI 12+");
        assert_eq!(BucketDefinition::browser("(not set)").label(), "(NOT SET)");
    }

    #[test]
    fn test_target_browser_defaults_to_name() {
        assert_eq!(BucketDefinition::browser("edge").target_browser(), "edge");
        assert_eq!(safari_12().target_browser(), "safari");
    }

    // ── default_buckets ───────────────────────────────────────────────────────

    #[test]
    fn test_default_buckets_order_and_validity() {
        let buckets = default_buckets();
        assert_eq!(buckets.len(), 16);
        assert_eq!(buckets[0].name, "chrome");
        assert_eq!(buckets[2], safari_12());
        assert_eq!(buckets[15].name, "''");
        validate_buckets(&buckets).expect("defaults must be valid");
    }

    // ── validate_buckets ──────────────────────────────────────────────────────

    #[test]
    fn test_validate_rejects_empty_list() {
        assert!(matches!(
            validate_buckets(&[]),
            Err(ReturnsError::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let buckets = vec![
            BucketDefinition::browser("chrome"),
            BucketDefinition::browser("Chrome"),
        ];
        let err = validate_buckets(&buckets).unwrap_err();
        assert!(err.to_string().contains("duplicate bucket name"));
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let buckets = vec![BucketDefinition::browser("  ")];
        assert!(validate_buckets(&buckets).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_prefix() {
        let buckets = vec![BucketDefinition::versioned("safari x", "safari", [""])];
        assert!(validate_buckets(&buckets).is_err());
    }

    // ── load_buckets ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_buckets_from_json() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("buckets.json");
        std::fs::write(
            &path,
            r#"[
                {"name": "firefox"},
                {"name": "firefox 70+", "match_browser": "firefox", "version_prefixes": ["7", "8"]}
            ]"#,
        )
        .expect("write");

        let buckets = load_buckets(&path).expect("load");
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0], BucketDefinition::browser("firefox"));
        assert_eq!(buckets[1].target_browser(), "firefox");
        assert_eq!(buckets[1].version_prefixes, vec!["7", "8"]);
    }

    #[test]
    fn test_load_buckets_missing_file() {
        let tmp = TempDir::new().expect("tempdir");
        let err = load_buckets(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ReturnsError::FileRead { .. }));
    }

    #[test]
    fn test_load_buckets_invalid_json() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("buckets.json");
        std::fs::write(&path, "{not json").expect("write");
        assert!(matches!(
            load_buckets(&path),
            Err(ReturnsError::JsonParse(_))
        ));
    }

    #[test]
    fn test_resolve_buckets_defaults_without_path() {
        let buckets = resolve_buckets(None).expect("defaults");
        assert_eq!(buckets, default_buckets());
    }
}
