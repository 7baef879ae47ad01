#![forbid(unsafe_code)]

//! Site configuration.
//!
//! Every tunable constant of the map lives in [`KartanConfig`], which can be
//! loaded from TOML or JSON at startup with the `config-file` feature.
//!
//! ```toml
//! # kartan.toml
//! [api]
//! base_url = "https://innanforskapetskarta.se"
//!
//! [mail]
//! to = "redaktion@example.se"
//!
//! [map]
//! mobile_breakpoint = 640
//! ```
//!
//! ```rust,ignore
//! let config = KartanConfig::from_toml_file("kartan.toml")?.validated()?;
//! ```
//!
//! # Defaults
//!
//! Defaults are the values the public site runs with, so
//! `KartanConfig::default()` behaves like the live map. The one exception
//! is `mail.to`, which has no sensible default and is flagged by
//! [`KartanConfig::validate`] until set.

#[cfg(feature = "config-file")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level KartanConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct KartanConfig {
    pub api: ApiConfig,
    pub mail: MailConfig,
    pub map: MapConfig,
    pub panels: PanelConfig,
    pub notify: NotifyConfig,
}

impl KartanConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load by extension: `.json` is JSON, anything else is TOML.
    #[cfg(feature = "config-file")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Check all values. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            errors.push(format!(
                "api.base_url must be an http(s) URL, got {:?}",
                self.api.base_url
            ));
        }
        for (name, path) in [
            ("api.data_path", &self.api.data_path),
            ("api.mail_path", &self.api.mail_path),
        ] {
            if !path.starts_with('/') {
                errors.push(format!("{name} must start with '/', got {path:?}"));
            }
        }

        if kartan_text::sanitize::email(&self.mail.to).is_none() {
            errors.push(format!(
                "mail.to must be an e-mail address, got {:?}",
                self.mail.to
            ));
        }
        if self.mail.subject.trim().is_empty() {
            errors.push("mail.subject must not be empty".into());
        }

        if self.map.mobile_breakpoint == 0 {
            errors.push("map.mobile_breakpoint must be > 0".into());
        }
        if self.map.padding.is_nan() || self.map.padding < 0.0 {
            errors.push(format!("map.padding must be >= 0, got {}", self.map.padding));
        }
        if !positive(self.map.stretch_y) {
            errors.push(format!(
                "map.stretch_y must be > 0, got {}",
                self.map.stretch_y
            ));
        }
        if !positive(self.map.zoom_step - 1.0) {
            errors.push(format!(
                "map.zoom_step must be > 1, got {}",
                self.map.zoom_step
            ));
        }

        if self.panels.dots_in_view == 0 {
            errors.push("panels.dots_in_view must be > 0".into());
        }
        if self.panels.page_limit == 0 {
            errors.push("panels.page_limit must be > 0".into());
        }

        if self.notify.max_visible == 0 {
            errors.push("notify.max_visible must be > 0".into());
        }

        errors
    }

    /// `self` if [`validate`](Self::validate) is clean.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Endpoints of the CMS plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct ApiConfig {
    pub base_url: String,
    pub data_path: String,
    pub mail_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://innanforskapetskarta.se".into(),
            data_path: "/wp-json/smcm/v1/data".into(),
            mail_path: "/wp-json/smcm/v1/send-mail".into(),
        }
    }
}

impl ApiConfig {
    pub fn data_url(&self) -> String {
        join_url(&self.base_url, &self.data_path)
    }

    pub fn mail_url(&self) -> String {
        join_url(&self.base_url, &self.mail_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Fixed parts of the submission mail.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct MailConfig {
    pub to: String,
    pub subject: String,
    pub message: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            to: String::new(),
            subject: "Nytt initiativ".into(),
            message: "Ett nytt initiativ har skickats in.".into(),
        }
    }
}

/// Projection, zoom, and layout breakpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct MapConfig {
    /// Viewports narrower than this use drawers. Default: 768.
    pub mobile_breakpoint: u32,
    /// Fit-extent padding in pixels. Default: 20.
    pub padding: f64,
    /// Vertical stretch applied after fitting. Default: 2.
    pub stretch_y: f64,
    /// Factor of one zoom button press. Default: 2.
    pub zoom_step: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768,
            padding: kartan_geo::FitProjection::DEFAULT_PADDING,
            stretch_y: kartan_geo::FitProjection::DEFAULT_STRETCH_Y,
            zoom_step: 2.0,
        }
    }
}

/// Carousel and list paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct PanelConfig {
    pub dots_in_view: usize,
    pub page_limit: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            dots_in_view: crate::carousel::DEFAULT_DOTS_IN_VIEW,
            page_limit: crate::carousel::DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Toast queue limits and lifetimes, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct NotifyConfig {
    pub max_visible: usize,
    pub max_queued: usize,
    pub dedup_window_ms: u64,
    pub success_ms: u64,
    pub error_ms: u64,
    pub info_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            max_visible: 3,
            max_queued: 10,
            dedup_window_ms: 1_000,
            success_ms: 2_000,
            error_ms: 4_000,
            info_ms: 4_000,
        }
    }
}

impl NotifyConfig {
    #[inline]
    pub fn dedup_window(&self) -> Duration {
        Duration::from_millis(self.dedup_window_ms)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from loading or validating a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-file")]
    Json(serde_json::Error),
    /// Values out of range.
    Invalid(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Invalid(errors) => write!(f, "invalid configuration: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Json(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}
