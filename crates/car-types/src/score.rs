// ─────────────────────────────────────────────────────────────────────
// CAR Reasoning Kernel — Score Types
// ─────────────────────────────────────────────────────────────────────
//! Outputs produced by the kernel: evaluation verdicts, antinomy
//! resolutions, recognition hits and the orchestrator envelope.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::Concept;

/// Clamp a value to [lo, hi], mapping NaN to lo and Inf to nearest bound.
#[inline]
pub fn clamp_score(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_score: NaN detected, clamping to {lo:.4}");
        return lo;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { hi } else { lo };
        log::warn!("clamp_score: Inf detected, clamping to {boundary:.4}");
        return boundary;
    }
    value.clamp(lo, hi)
}

/// The three formulations of the categorical imperative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formulation {
    /// Would willing the maxim as universal law be self-defeating.
    Universalizability,
    /// Are affected persons treated as ends, not merely means.
    Humanity,
    /// Is rational self-determination respected or promoted.
    Autonomy,
}

impl Formulation {
    pub const ALL: [Formulation; 3] = [
        Formulation::Universalizability,
        Formulation::Humanity,
        Formulation::Autonomy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Universalizability => "universalizability",
            Self::Humanity => "humanity",
            Self::Autonomy => "autonomy",
        }
    }
}

impl fmt::Display for Formulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict of the imperative evaluator for one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub universalizability: f64,
    pub humanity: f64,
    pub autonomy: f64,
    /// True iff every score exceeds the permissibility floor.
    pub permissible: bool,
    pub confidence: f64,
    /// Floor the verdict was computed against.
    pub floor: f64,
}

impl EvaluationResult {
    /// Build a verdict from raw scores. Scores are clamped before the
    /// conjunctive gate is applied.
    pub fn from_scores(universalizability: f64, humanity: f64, autonomy: f64, floor: f64) -> Self {
        let universalizability = clamp_score(universalizability, 0.0, 1.0);
        let humanity = clamp_score(humanity, 0.0, 1.0);
        let autonomy = clamp_score(autonomy, 0.0, 1.0);
        let permissible = universalizability > floor && humanity > floor && autonomy > floor;

        // Distance from the floor, normalized by the wider side of [0, 1].
        let span = floor.max(1.0 - floor).max(f64::EPSILON);
        let distance = |s: f64| ((s - floor).abs() / span).min(1.0);
        let confidence = clamp_score(
            (distance(universalizability) + distance(humanity) + distance(autonomy)) / 3.0,
            0.0,
            1.0,
        );

        Self {
            universalizability,
            humanity,
            autonomy,
            permissible,
            confidence,
            floor,
        }
    }

    pub fn score(&self, formulation: Formulation) -> f64 {
        match formulation {
            Formulation::Universalizability => self.universalizability,
            Formulation::Humanity => self.humanity,
            Formulation::Autonomy => self.autonomy,
        }
    }

    /// Formulations at or below the floor, in canonical order.
    pub fn failing_formulations(&self) -> Vec<Formulation> {
        Formulation::ALL
            .into_iter()
            .filter(|f| self.score(*f) <= self.floor)
            .collect()
    }
}

/// Identifier of an antinomy resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    ContextualPrioritization,
    DomainDistinction,
    RegulativePrinciple,
    Synthesis,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContextualPrioritization => "contextual_prioritization",
            Self::DomainDistinction => "domain_distinction",
            Self::RegulativePrinciple => "regulative_principle",
            Self::Synthesis => "synthesis",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving one antinomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub strategy: StrategyKind,
    pub statement: String,
    pub explanation: String,
    pub confidence: f64,
}

impl Resolution {
    pub fn new(
        strategy: StrategyKind,
        statement: impl Into<String>,
        explanation: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            strategy,
            statement: statement.into(),
            explanation: explanation.into(),
            confidence: clamp_score(confidence, 0.0, 1.0),
        }
    }
}

/// A concept whose schema fired for an input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedConcept {
    pub concept: Arc<Concept>,
    pub relevance: f64,
}

/// Coarse confidence level derived from the domain's thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

/// Structural annotation attached to an orchestrator result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputMarker {
    /// The request touches a topic the domain must not claim certainty about.
    EpistemicBoundary { topic: String, relevance: f64 },
    /// Nothing recognized, evaluated or resolved.
    InsufficientStructure,
}

/// Output envelope of `Orchestrator::process`.
///
/// Deliberately thin: advisors layer their own report structure on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarResult {
    pub domain: String,
    /// Placeholder summary; advisors render the user-facing prose.
    pub output: String,
    pub confidence: f64,
    pub band: ConfidenceBand,
    /// Every declared boundary topic the request touched.
    pub boundary_topics: Vec<String>,
    pub markers: Vec<OutputMarker>,
    pub concepts: Vec<RecognizedConcept>,
    pub evaluations: Vec<EvaluationResult>,
    pub resolutions: Vec<Resolution>,
}

impl CarResult {
    pub fn is_insufficient(&self) -> bool {
        self.markers
            .iter()
            .any(|m| matches!(m, OutputMarker::InsufficientStructure))
    }
}
