// File: src/config.rs
// Purpose: Configuration parsing from vitrine.toml

use crate::section::SectionType;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vitrine_cache::config::CacheTomlConfig;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub cache: CacheTomlConfig,

    #[serde(default)]
    pub homepage: HomepageConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `sqlite:vitrine.db`, `sqlite::memory:` or `postgres://...`
    #[serde(default = "default_database_url")]
    pub url: String,
}

/// Where catalog data comes from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Http,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_source")]
    pub source: CatalogSource,

    /// Base URL of the storefront REST API
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,

    /// JSON fixture for the memory source
    #[serde(default)]
    pub fixture: Option<String>,
}

/// How lazy sections get their content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LazyMode {
    /// Placeholders are loaded by the browser when they scroll into view
    Client,
    /// Placeholders are filled server-side by the batch loader
    Inline,
}

/// Homepage composition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomepageConfig {
    /// Non-banner types rendered above the fold
    #[serde(default = "default_critical_types")]
    pub critical_types: Vec<SectionType>,

    /// Banners with `ordering <=` this render immediately
    #[serde(default = "default_critical_banner_max_ordering")]
    pub critical_banner_max_ordering: i64,

    #[serde(default = "default_department_limit")]
    pub department_limit: usize,

    #[serde(default = "default_subcategory_grid_limit")]
    pub subcategory_grid_limit: usize,

    #[serde(default = "default_product_limit")]
    pub default_product_limit: usize,

    /// Cap applied to product tab limits on mobile viewports
    #[serde(default = "default_mobile_product_limit")]
    pub mobile_product_limit: usize,

    #[serde(default = "default_lazy_mode")]
    pub lazy_mode: LazyMode,

    #[serde(default = "default_lazy_batch_size")]
    pub lazy_batch_size: usize,

    /// Also place active records from the legacy banner collection
    #[serde(default = "default_true")]
    pub legacy_banners: bool,

    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,

    /// Show inline error notices for sections that failed to render
    #[serde(default)]
    pub show_errors: bool,
}

// Default values
fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_database_url() -> String {
    "sqlite:vitrine.db".to_string()
}

fn default_catalog_source() -> CatalogSource {
    CatalogSource::Http
}

fn default_catalog_base_url() -> String {
    "http://127.0.0.1:5000/api".to_string()
}

fn default_critical_types() -> Vec<SectionType> {
    vec![SectionType::HeroSlider, SectionType::ScrollingText]
}

fn default_critical_banner_max_ordering() -> i64 {
    2
}

fn default_department_limit() -> usize {
    12
}

fn default_subcategory_grid_limit() -> usize {
    6
}

fn default_product_limit() -> usize {
    8
}

fn default_mobile_product_limit() -> usize {
    6
}

fn default_lazy_mode() -> LazyMode {
    LazyMode::Client
}

fn default_lazy_batch_size() -> usize {
    4
}

fn default_placeholder_image() -> String {
    "/images/placeholder.png".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: default_catalog_source(),
            base_url: default_catalog_base_url(),
            fixture: None,
        }
    }
}

impl Default for HomepageConfig {
    fn default() -> Self {
        Self {
            critical_types: default_critical_types(),
            critical_banner_max_ordering: default_critical_banner_max_ordering(),
            department_limit: default_department_limit(),
            subcategory_grid_limit: default_subcategory_grid_limit(),
            default_product_limit: default_product_limit(),
            mobile_product_limit: default_mobile_product_limit(),
            lazy_mode: default_lazy_mode(),
            lazy_batch_size: default_lazy_batch_size(),
            legacy_banners: true,
            placeholder_image: default_placeholder_image(),
            show_errors: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing or empty file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./vitrine.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("vitrine.toml")
    }

    /// Apply `DATABASE_URL`, `VITRINE_PORT` and `CATALOG_BASE_URL` overrides
    pub fn apply_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(port) = lookup("VITRINE_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(base_url) = lookup("CATALOG_BASE_URL") {
            self.catalog.base_url = base_url;
        }
        self
    }
}
