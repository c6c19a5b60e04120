// ─────────────────────────────────────────────────────────────────────
// CAR Reasoning Kernel — Core
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Concept registry, imperative evaluator, antinomy resolver and the
//! orchestrator that composes them for domain advisors.
//!
//! # Invariants
//!
//! 1. **Scores are bounded**: every relevance, formulation score and
//!    confidence leaving this crate lies in `[0, 1]`. Non-finite values
//!    from pluggable rules are clamped, never propagated.
//!
//! 2. **Permissibility is conjunctive**: an action passes only when all
//!    three formulations exceed the floor. No aggregate can compensate
//!    for one failing formulation.
//!
//! 3. **Synthesis never over-claims**: a synthesis resolution reports at
//!    most 0.6 confidence, whichever strategy produced it.
//!
//! 4. **Boundaries cap confidence**: a request touching a declared
//!    epistemic boundary never reports more than the domain's `medium`
//!    threshold.
//!
//! 5. **Registration is copy-on-write**: readers work on an immutable
//!    snapshot, so recognition never observes a half-registered schema.

pub mod antinomy;
pub mod domain;
pub mod imperative;
pub mod orchestrator;
pub mod schematism;
pub mod text;

pub use antinomy::{
    AntinomyResolver, ContextualPrioritization, DomainDistinction, ExternalStrategy,
    LexicalTensionDetector, RegulativePrinciple, ResolutionStrategy, Synthesis, TensionDetector,
};
pub use domain::{DomainCatalog, DomainProfile};
pub use imperative::{
    AutonomyScorer, ExternalScorer, FormulationScorer, HumanityScorer, ImperativeEvaluator,
    SelfDefeatingPattern, UniversalizabilityScorer,
};
pub use orchestrator::Orchestrator;
pub use schematism::{
    ConceptRegistry, ExternalGenerator, ExternalRecognizer, GenerationParams, GenerationRule,
    KeywordRule, PhraseRule, RecognitionRule, RegistrySnapshot, Schema, TemplateRule,
};
