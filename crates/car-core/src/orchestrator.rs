// ─────────────────────────────────────────────────────────────────────
// CAR Reasoning Kernel — Orchestrator
// ─────────────────────────────────────────────────────────────────────
//! Single entry point for advisors.
//!
//! `process` recognizes concepts, marks every touched epistemic boundary,
//! delegates action evaluation and antinomy resolution, then calibrates
//! the overall confidence:
//!
//! 1. The aggregate is the minimum of all sub-confidences (top recognition
//!    relevance, each evaluation, each resolution). One weak component
//!    pulls the whole claim down.
//! 2. The aggregate is capped at the domain's `high` threshold, and at
//!    `medium` whenever a boundary topic is touched.
//! 3. A request with nothing to recognize, evaluate or resolve reports the
//!    `low` threshold and an `InsufficientStructure` marker instead of
//!    failing.
//!
//! The kernel would rather under-claim certainty than over-claim it.

use std::sync::Arc;

use car_types::score::clamp_score;
use car_types::{
    CarOptions, CarRequest, CarResult, ConfidenceBand, EvaluationResult, KernelResult,
    OutputMarker, RecognizedConcept, Resolution,
};

use crate::antinomy::AntinomyResolver;
use crate::domain::{DomainCatalog, DomainProfile};
use crate::imperative::ImperativeEvaluator;
use crate::schematism::ConceptRegistry;

/// Domain-bound orchestrator.
///
/// Holds no per-call state; instances are cheap to clone and may run
/// concurrently over the same registry.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    options: CarOptions,
    profile: DomainProfile,
    registry: Arc<ConceptRegistry>,
    evaluator: Arc<ImperativeEvaluator>,
    resolver: Arc<AntinomyResolver>,
}

impl Orchestrator {
    /// Build against the built-in domain catalog.
    pub fn new(options: CarOptions, registry: Arc<ConceptRegistry>) -> KernelResult<Self> {
        Self::with_catalog(options, &DomainCatalog::builtin(), registry)
    }

    /// Build against an explicit catalog. Fails fast on an unknown domain
    /// or invalid thresholds.
    pub fn with_catalog(
        options: CarOptions,
        catalog: &DomainCatalog,
        registry: Arc<ConceptRegistry>,
    ) -> KernelResult<Self> {
        options.validate()?;
        let profile = catalog.require(&options.domain)?.clone();
        let resolver = AntinomyResolver::new(catalog.resolver_config())?;

        let snapshot = registry.snapshot();
        for topic in &options.epistemic_boundaries {
            if snapshot.concept(topic).is_none() {
                log::debug!("boundary topic '{topic}' has no registered concept yet");
            }
        }

        log::info!(
            "orchestrator ready for domain '{}' ({} boundary topics)",
            options.domain,
            options.epistemic_boundaries.len()
        );
        Ok(Self {
            options,
            profile,
            registry,
            evaluator: Arc::new(ImperativeEvaluator::default()),
            resolver: Arc::new(resolver),
        })
    }

    pub fn with_evaluator(mut self, evaluator: ImperativeEvaluator) -> Self {
        self.evaluator = Arc::new(evaluator);
        self
    }

    pub fn with_resolver(mut self, resolver: AntinomyResolver) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn options(&self) -> &CarOptions {
        &self.options
    }

    pub fn profile(&self) -> &DomainProfile {
        &self.profile
    }

    pub fn registry(&self) -> &Arc<ConceptRegistry> {
        &self.registry
    }

    pub fn evaluator(&self) -> &ImperativeEvaluator {
        &self.evaluator
    }

    pub fn resolver(&self) -> &AntinomyResolver {
        &self.resolver
    }

    /// Process one advisor request.
    ///
    /// Errors only for malformed actions. Unfamiliar input yields a
    /// low-confidence result, never an error.
    pub fn process(&self, request: &CarRequest) -> KernelResult<CarResult> {
        let concepts = self.registry.snapshot().recognize(&request.input);

        let mut boundary_topics: Vec<String> = Vec::new();
        let mut markers = Vec::new();
        for hit in &concepts {
            let topic = &hit.concept.id;
            if self.options.is_boundary(topic) && !boundary_topics.contains(topic) {
                boundary_topics.push(topic.clone());
                markers.push(OutputMarker::EpistemicBoundary {
                    topic: topic.clone(),
                    relevance: hit.relevance,
                });
            }
        }

        let evaluations = request
            .actions
            .iter()
            .map(|action| self.evaluator.evaluate(action))
            .collect::<KernelResult<Vec<_>>>()?;

        let mut antinomies = self.resolver.detect_antinomies(&request.propositions);
        antinomies.extend(request.antinomies.iter().cloned());
        let resolutions = self.resolver.resolve_all(&antinomies);

        let sub_confidences: Vec<f64> = concepts
            .first()
            .map(|top| top.relevance)
            .into_iter()
            .chain(evaluations.iter().map(|e| e.confidence))
            .chain(resolutions.iter().map(|r| r.confidence))
            .collect();

        let thresholds = self.options.thresholds;
        let (confidence, band) = if sub_confidences.is_empty() {
            markers.push(OutputMarker::InsufficientStructure);
            (thresholds.low, ConfidenceBand::Low)
        } else {
            let aggregate = sub_confidences.iter().copied().fold(1.0, f64::min);
            let ceiling = if boundary_topics.is_empty() {
                thresholds.high
            } else {
                thresholds.medium
            };
            let clipped = clamp_score(aggregate.min(ceiling), 0.0, 1.0);
            (clipped, thresholds.band(clipped))
        };

        log::debug!(
            "processed request for '{}': {} concepts, {} evaluations, {} resolutions, confidence {confidence:.4}",
            self.options.domain,
            concepts.len(),
            evaluations.len(),
            resolutions.len()
        );

        let output = self.summarize(&concepts, &boundary_topics, &evaluations, &resolutions);
        Ok(CarResult {
            domain: self.options.domain.clone(),
            output,
            confidence,
            band,
            boundary_topics,
            markers,
            concepts,
            evaluations,
            resolutions,
        })
    }

    fn summarize(
        &self,
        concepts: &[RecognizedConcept],
        boundary_topics: &[String],
        evaluations: &[EvaluationResult],
        resolutions: &[Resolution],
    ) -> String {
        if concepts.is_empty() && evaluations.is_empty() && resolutions.is_empty() {
            return "insufficient structure to assess".to_string();
        }
        let mut parts = Vec::new();
        if !concepts.is_empty() {
            let names: Vec<&str> = concepts.iter().map(|c| c.concept.name.as_str()).collect();
            parts.push(format!("concepts: {}", names.join(", ")));
        }
        if !evaluations.is_empty() {
            let permissible = evaluations.iter().filter(|e| e.permissible).count();
            parts.push(format!(
                "{permissible} of {} action(s) permissible",
                evaluations.len()
            ));
        }
        if !resolutions.is_empty() {
            parts.push(format!("{} antinomy resolution(s)", resolutions.len()));
        }
        if !boundary_topics.is_empty() {
            parts.push(format!(
                "unresolvable with confidence: {}",
                boundary_topics.join(", ")
            ));
        }
        parts.join("; ")
    }
}
