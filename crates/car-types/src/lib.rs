// ─────────────────────────────────────────────────────────────────────
// CAR Reasoning Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! CAR reasoning kernel shared by the healthcare, governance and
//! aesthetic advisors.

pub mod config;
pub mod error;
pub mod model;
pub mod score;

pub use config::{CarOptions, ConfidenceThresholds, ImperativeConfig, ResolverConfig};
pub use error::{KernelError, KernelResult};
pub use model::{Action, Antinomy, AntinomyType, CarRequest, Concept, Proposition};
pub use score::{
    CarResult, ConfidenceBand, EvaluationResult, Formulation, OutputMarker, RecognizedConcept,
    Resolution, StrategyKind,
};
