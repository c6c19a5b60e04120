// ─────────────────────────────────────────────────────────────────────
// CAR Reasoning Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, KernelResult};
use crate::score::{ConfidenceBand, StrategyKind};

fn check_unit(name: &str, value: f64) -> KernelResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(KernelError::Config(format!(
            "{name} must be in [0, 1], got {value}"
        )));
    }
    Ok(())
}

/// Confidence threshold triple for one advisor domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    /// Ceiling for any confidence the orchestrator reports.
    /// Default: 0.9.
    pub high: f64,
    /// Ceiling applied when an epistemic boundary is touched.
    /// Default: 0.7.
    pub medium: f64,
    /// Confidence reported when the input carries no recognizable structure.
    /// Default: 0.4.
    pub low: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.9,
            medium: 0.7,
            low: 0.4,
        }
    }
}

impl ConfidenceThresholds {
    pub fn validate(&self) -> KernelResult<()> {
        check_unit("thresholds.high", self.high)?;
        check_unit("thresholds.medium", self.medium)?;
        check_unit("thresholds.low", self.low)?;
        if self.high < self.medium {
            return Err(KernelError::Config(format!(
                "thresholds.high ({}) must be >= thresholds.medium ({})",
                self.high, self.medium
            )));
        }
        if self.medium < self.low {
            return Err(KernelError::Config(format!(
                "thresholds.medium ({}) must be >= thresholds.low ({})",
                self.medium, self.low
            )));
        }
        Ok(())
    }

    /// Band a (already clipped) confidence value falls into.
    pub fn band(&self, confidence: f64) -> ConfidenceBand {
        if confidence >= self.high {
            ConfidenceBand::High
        } else if confidence >= self.medium {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

/// Orchestrator configuration, built once per advisor domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarOptions {
    pub domain: String,
    /// Concept identifiers the domain must never claim certainty about.
    #[serde(default)]
    pub epistemic_boundaries: Vec<String>,
    #[serde(default)]
    pub thresholds: ConfidenceThresholds,
}

impl CarOptions {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            epistemic_boundaries: Vec::new(),
            thresholds: ConfidenceThresholds::default(),
        }
    }

    pub fn with_boundary(mut self, topic: impl Into<String>) -> Self {
        self.epistemic_boundaries.push(topic.into());
        self
    }

    pub fn with_thresholds(mut self, thresholds: ConfidenceThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn is_boundary(&self, concept_id: &str) -> bool {
        self.epistemic_boundaries.iter().any(|b| b == concept_id)
    }

    pub fn validate(&self) -> KernelResult<()> {
        if self.domain.trim().is_empty() {
            return Err(KernelError::Config("domain must not be empty".to_string()));
        }
        if let Some(blank) = self.epistemic_boundaries.iter().find(|b| b.trim().is_empty()) {
            return Err(KernelError::Config(format!(
                "epistemic boundary identifiers must not be blank, got {blank:?}"
            )));
        }
        self.thresholds.validate()
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> KernelResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| KernelError::Config(format!("JSON parse error: {e}")))
    }
}

/// Imperative evaluator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImperativeConfig {
    /// Every formulation must score strictly above this to be permissible.
    /// Default: 0.5.
    pub permissibility_floor: f64,
}

impl Default for ImperativeConfig {
    fn default() -> Self {
        Self {
            permissibility_floor: 0.5,
        }
    }
}

impl ImperativeConfig {
    pub fn validate(&self) -> KernelResult<()> {
        if !(self.permissibility_floor > 0.0 && self.permissibility_floor < 1.0) {
            return Err(KernelError::Config(format!(
                "permissibility_floor must be in (0, 1), got {}",
                self.permissibility_floor
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> KernelResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| KernelError::Config(format!("JSON parse error: {e}")))
    }
}

/// Antinomy resolver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Strategy used when the antinomy's domain has no override.
    /// `None` falls back to synthesis.
    #[serde(default)]
    pub default_strategy: Option<StrategyKind>,
    /// Domain name → strategy.
    #[serde(default)]
    pub domain_overrides: BTreeMap<String, StrategyKind>,
    /// Both propositions must be at least this confident to form an antinomy.
    /// Default: 0.5.
    #[serde(default = "default_plausibility_floor")]
    pub plausibility_floor: f64,
}

fn default_plausibility_floor() -> f64 {
    0.5
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_strategy: None,
            domain_overrides: BTreeMap::new(),
            plausibility_floor: default_plausibility_floor(),
        }
    }
}

impl ResolverConfig {
    pub fn with_default_strategy(mut self, strategy: StrategyKind) -> Self {
        self.default_strategy = Some(strategy);
        self
    }

    pub fn with_override(mut self, domain: impl Into<String>, strategy: StrategyKind) -> Self {
        self.domain_overrides.insert(domain.into(), strategy);
        self
    }

    /// Strategy selected for a domain: override, then default, then synthesis.
    pub fn strategy_for(&self, domain: &str) -> StrategyKind {
        self.domain_overrides
            .get(domain)
            .copied()
            .or(self.default_strategy)
            .unwrap_or(StrategyKind::Synthesis)
    }

    pub fn validate(&self) -> KernelResult<()> {
        check_unit("plausibility_floor", self.plausibility_floor)
    }

    pub fn from_json(json: &str) -> KernelResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| KernelError::Config(format!("JSON parse error: {e}")))
    }
}
