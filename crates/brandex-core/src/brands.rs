//! Brand roster: canonical brand names and the alias patterns that map
//! free-form page names and tag strings onto them.
//!
//! Canonicalization happens at the ingest boundary only; the pipeline core
//! never matches names itself.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One canonical brand with the alias strings it may appear as.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandEntry {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl BrandEntry {
    /// Generate a URL-safe slug from the brand name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// On-disk roster shape.
#[derive(Debug, Deserialize)]
pub struct RosterFile {
    pub brands: Vec<BrandEntry>,
}

/// Compiled roster: per brand, case-insensitive whole-word matchers for the
/// name and each alias.
#[derive(Debug, Clone)]
pub struct BrandRoster {
    entries: Vec<(String, Vec<Regex>)>,
}

impl BrandRoster {
    /// Compile a validated roster file into matchers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any name/alias produces an
    /// unusable pattern.
    pub fn compile(file: &RosterFile) -> Result<Self, ConfigError> {
        let mut entries = Vec::with_capacity(file.brands.len());
        for brand in &file.brands {
            let mut patterns = Vec::with_capacity(1 + brand.aliases.len());
            for needle in std::iter::once(&brand.name).chain(&brand.aliases) {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(needle.trim()));
                let re = Regex::new(&pattern).map_err(|e| {
                    ConfigError::Validation(format!(
                        "brand '{}': alias '{}' does not compile: {e}",
                        brand.name, needle
                    ))
                })?;
                patterns.push(re);
            }
            entries.push((brand.name.clone(), patterns));
        }
        Ok(Self { entries })
    }

    /// Map a raw page name or tag string to its canonical brand name, if any
    /// roster entry matches. First roster entry wins.
    #[must_use]
    pub fn canonicalize(&self, raw: &str) -> Option<&str> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(raw)))
            .map(|(name, _)| name.as_str())
    }

    /// Canonical names in roster order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load, validate, and compile the brand roster from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_roster(path: &Path) -> Result<BrandRoster, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RosterIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: RosterFile = serde_yaml::from_str(&content)?;
    validate_roster(&file)?;
    BrandRoster::compile(&file)
}

fn validate_roster(file: &RosterFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for brand in &file.brands {
        if brand.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand name must be non-empty".to_string(),
            ));
        }

        if brand.aliases.iter().any(|a| a.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "brand '{}' has an empty alias",
                brand.name
            )));
        }

        let lower_name = brand.name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand name: '{}'",
                brand.name
            )));
        }

        let slug = brand.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand slug: '{}' (from brand '{}')",
                slug, brand.name
            )));
        }
    }

    Ok(())
}
