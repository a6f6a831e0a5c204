//! Pipeline configuration.
//!
//! Everything is typed and has a default; hosts deserialize it from JSON
//! (or build it in code) and hand it to `Pipeline::new`. Where the values
//! come from (files, environment) is the host's business.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extract::default_event_keywords;
use crate::{Error, Result};

/// Default denylist entry: nodes naming a weekday ("Tuesday", "on Sat").
pub const WEEKDAY_PATTERN: &str =
    r"(?i)\b(?:mon|monday|tue|tuesday|wed|wednesday|thu|thursday|fri|friday|sat|saturday|sun|sunday)\b";

/// Default similarity threshold for entity resolution.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Default minimum total degree a node needs to survive pruning.
pub const DEFAULT_MIN_DEGREE: usize = 2;

/// Graph pruning passes, applied in field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneConfig {
    /// Regex patterns; a node whose key matches any of them is removed.
    pub denylist: Vec<String>,
    /// Nodes with total degree below this are removed. `None` disables the pass.
    pub min_degree: Option<usize>,
    /// Keep only the largest weakly connected component.
    pub largest_component: bool,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            denylist: vec![WEEKDAY_PATTERN.to_string()],
            min_degree: Some(DEFAULT_MIN_DEGREE),
            largest_component: false,
        }
    }
}

impl PruneConfig {
    /// A configuration that prunes nothing.
    pub fn disabled() -> Self {
        Self {
            denylist: Vec::new(),
            min_degree: None,
            largest_component: false,
        }
    }

    pub(crate) fn compile_denylist(&self) -> Result<Vec<Regex>> {
        self.denylist
            .iter()
            .map(|p| Regex::new(p).map_err(Error::from))
            .collect()
    }
}

/// Entity resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Minimum case-insensitive similarity ratio for two keys to merge.
    pub threshold: f64,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self { threshold: DEFAULT_SIMILARITY_THRESHOLD }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Language every text is translated into before annotation.
    pub primary_language: String,
    pub prune: PruneConfig,
    /// Entity resolution runs only when set.
    pub resolve: Option<ResolveConfig>,
    /// Keyword → event label table for event detection.
    pub events: BTreeMap<String, String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            primary_language: "en".to_string(),
            prune: PruneConfig::default(),
            resolve: None,
            events: default_event_keywords(),
        }
    }
}

impl PipelineConfig {
    pub fn with_resolution(mut self, threshold: f64) -> Self {
        self.resolve = Some(ResolveConfig { threshold });
        self
    }

    pub fn with_prune(mut self, prune: PruneConfig) -> Self {
        self.prune = prune;
        self
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.primary_language.trim().is_empty() {
            return Err(Error::Config("primary_language must not be empty".into()));
        }
        if let Some(resolve) = &self.resolve {
            if !(0.0..=1.0).contains(&resolve.threshold) {
                return Err(Error::Config(format!(
                    "similarity threshold {} outside [0, 1]", resolve.threshold
                )));
            }
        }
        self.prune.compile_denylist()?;
        Ok(())
    }
}
