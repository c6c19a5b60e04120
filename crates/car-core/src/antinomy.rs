// ─────────────────────────────────────────────────────────────────────
// CAR Reasoning Kernel — Antinomy Resolver
// ─────────────────────────────────────────────────────────────────────
//! Detection and resolution of thesis/antithesis conflicts.
//!
//! Antinomies are irreducible tensions between legitimate principles,
//! not bugs. Detection is shared; resolution is a pluggable strategy
//! chosen per domain, so each advisor encodes its own normative stance
//! (healthcare separates scopes, governance ranks claims) without
//! touching the detector.
//!
//! The thesis/antithesis text belongs to the advisors. The kernel only
//! sees the propositions handed to it.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use car_types::{
    Antinomy, AntinomyType, KernelResult, Proposition, Resolution, ResolverConfig, StrategyKind,
};

use crate::text::{has_any_stem, has_stem, tokenize};

/// Synthesis results never claim more than this.
pub const SYNTHESIS_CONFIDENCE_CAP: f64 = 0.6;

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "cannot", "dont", "doesnt", "isnt", "arent", "wasnt", "wont", "nor",
    "neither",
];

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "of", "to", "and", "or", "in", "on", "for", "with", "by", "be", "that",
    "this", "it", "its", "their",
];

/// Poles of well-known competing values, as stems.
const COMPETING_VALUES: &[(&str, &str)] = &[
    ("libert", "secur"),
    ("freedom", "secur"),
    ("freedom", "order$"),
    ("libert", "equalit"),
    ("autonom", "benefic"),
    ("autonom", "safety"),
    ("privacy", "transparen"),
    ("privacy", "secur"),
    ("individual", "collective"),
    ("efficien", "equit"),
    ("truth", "comfort"),
    ("tradition", "innovat"),
    ("form$", "express"),
    ("universal", "subjectiv"),
    ("finit", "infinit"),
    ("necessar", "contingen"),
    ("simple$", "composite"),
    ("freedom", "determinism"),
];

/// Words that rank a claim's object ahead of competing objects. Plain
/// modal framing (`must`, `always`) does not make two claims compete.
const EXCLUSIVE_FRAMES: &[&str] = &["priorit", "first$", "only$", "above$", "before$", "over$"];

const NORMATIVE: &[&str] = &[
    "should", "ought", "must", "priorit", "permit", "forbid", "obligat", "duty", "policy", "allow",
    "require",
];

const DESCRIPTIVE_WORDS: &[&str] = &["is", "are", "was", "were", "has", "have", "exists"];
const DESCRIPTIVE_STEMS: &[&str] = &[
    "exist", "caus", "determin", "infinit", "finit", "compos", "necessar", "contingen",
];

const IDEALIZING: &[&str] = &[
    "ideal", "ultimate", "always", "perfect", "universal", "aspir", "strive", "goal",
];

fn content_tokens(text: &str) -> HashSet<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}

fn has_word(tokens: &[String], words: &[&str]) -> bool {
    tokens.iter().any(|t| words.contains(&t.as_str()))
}

/// True if the two statements say the same thing except that exactly one
/// of them is negated. Such pairs are plain errors, not antinomies.
pub fn is_trivial_negation(a: &str, b: &str) -> bool {
    let ta = tokenize(a);
    let tb = tokenize(b);
    let negated_a = has_word(&ta, NEGATIONS);
    let negated_b = has_word(&tb, NEGATIONS);
    if negated_a == negated_b {
        return false;
    }
    let strip = |tokens: Vec<String>| -> HashSet<String> {
        tokens
            .into_iter()
            .filter(|t| !NEGATIONS.contains(&t.as_str()))
            .collect()
    };
    strip(ta) == strip(tb)
}

/// Decides whether two plausible propositions are in genuine tension and
/// classifies the conflict. `None` means no antinomy (or unclassifiable).
pub trait TensionDetector: Send + Sync {
    fn classify(&self, thesis: &Proposition, antithesis: &Proposition) -> Option<AntinomyType>;
}

/// Lexical tension detector.
///
/// Tension is reported when the statements name opposite poles of a known
/// competing-values pair, or when both rank different objects first
/// (`prioritize`, `first`, `only`, `above`) over a shared subject. Normative vocabulary classifies
/// the conflict as practical, descriptive vocabulary as theoretical.
#[derive(Debug, Clone)]
pub struct LexicalTensionDetector {
    /// Minimum Jaccard overlap of content tokens for frame-based tension.
    pub min_overlap: f64,
}

impl Default for LexicalTensionDetector {
    fn default() -> Self {
        Self { min_overlap: 0.5 }
    }
}

impl LexicalTensionDetector {
    fn opposes(a: &[String], b: &[String]) -> bool {
        COMPETING_VALUES.iter().any(|(p, q)| {
            let forward = has_stem(a, p) && has_stem(b, q) && !has_stem(a, q) && !has_stem(b, p);
            let backward = has_stem(a, q) && has_stem(b, p) && !has_stem(a, p) && !has_stem(b, q);
            forward || backward
        })
    }

    fn competing_frames(&self, a: &str, b: &str, ta: &[String], tb: &[String]) -> bool {
        let shared_frame = EXCLUSIVE_FRAMES
            .iter()
            .any(|f| has_stem(ta, f) && has_stem(tb, f));
        if !shared_frame {
            return false;
        }
        let ca = content_tokens(a);
        let cb = content_tokens(b);
        let union = ca.union(&cb).count();
        if union == 0 {
            return false;
        }
        let overlap = ca.intersection(&cb).count() as f64 / union as f64;
        overlap >= self.min_overlap && !ca.is_subset(&cb) && !cb.is_subset(&ca)
    }

    fn kind(ta: &[String], tb: &[String]) -> Option<AntinomyType> {
        if has_any_stem(ta, NORMATIVE) || has_any_stem(tb, NORMATIVE) {
            return Some(AntinomyType::Practical);
        }
        let descriptive = |t: &[String]| has_word(t, DESCRIPTIVE_WORDS) || has_any_stem(t, DESCRIPTIVE_STEMS);
        if descriptive(ta) || descriptive(tb) {
            return Some(AntinomyType::Theoretical);
        }
        None
    }
}

impl TensionDetector for LexicalTensionDetector {
    fn classify(&self, thesis: &Proposition, antithesis: &Proposition) -> Option<AntinomyType> {
        let ta = tokenize(&thesis.statement);
        let tb = tokenize(&antithesis.statement);
        let tension = Self::opposes(&ta, &tb)
            || self.competing_frames(&thesis.statement, &antithesis.statement, &ta, &tb);
        if !tension {
            return None;
        }
        Self::kind(&ta, &tb)
    }
}

/// A pure function from an antinomy to a resolution.
///
/// Returning `None` means the strategy does not cleanly apply; the
/// resolver then falls back to synthesis.
pub trait ResolutionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;
    fn resolve(&self, antinomy: &Antinomy) -> Option<Resolution>;
}

fn quoted(p: &Proposition) -> String {
    format!(
        "\"{}\"",
        p.statement.trim().trim_end_matches(['.', '!', ';'])
    )
}

fn mean_confidence(antinomy: &Antinomy) -> f64 {
    (antinomy.thesis.confidence + antinomy.antithesis.confidence) / 2.0
}

/// Rank by source confidence and domain fit; the winner is the core claim,
/// the loser its boundary condition.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextualPrioritization;

impl ContextualPrioritization {
    const CONFIDENCE_WEIGHT: f64 = 0.7;
    const FIT_WEIGHT: f64 = 0.3;
    const CEILING: f64 = 0.9;

    fn rank(p: &Proposition, domain: &str) -> f64 {
        let fit = if p.domain == domain { 1.0 } else { 0.5 };
        Self::CONFIDENCE_WEIGHT * p.confidence + Self::FIT_WEIGHT * fit
    }
}

impl ResolutionStrategy for ContextualPrioritization {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ContextualPrioritization
    }

    fn resolve(&self, antinomy: &Antinomy) -> Option<Resolution> {
        let domain = antinomy.domain();
        let rank_thesis = Self::rank(&antinomy.thesis, domain);
        let rank_antithesis = Self::rank(&antinomy.antithesis, domain);
        let (primary, secondary, rank_p, rank_s) = if rank_thesis >= rank_antithesis {
            (&antinomy.thesis, &antinomy.antithesis, rank_thesis, rank_antithesis)
        } else {
            (&antinomy.antithesis, &antinomy.thesis, rank_antithesis, rank_thesis)
        };
        let margin = rank_p - rank_s;
        let confidence = (0.55 + 0.25 * mean_confidence(antinomy) + 0.5 * margin).min(Self::CEILING);

        Some(Resolution::new(
            self.kind(),
            format!(
                "{}, qualified by the boundary condition that {}",
                quoted(primary),
                quoted(secondary)
            ),
            format!(
                "In the {domain} domain {} ranks {rank_p:.2} on source confidence and domain fit \
                 against {rank_s:.2}; the lower-ranked claim limits where the higher-ranked one applies.",
                quoted(primary)
            ),
            confidence,
        ))
    }
}

/// Both claims hold, each in its own scope.
#[derive(Debug, Clone, Default)]
pub struct DomainDistinction {
    scopes: Option<(String, String)>,
}

impl DomainDistinction {
    const CEILING: f64 = 0.85;

    /// Use explicit scope labels instead of the per-type defaults.
    pub fn with_scopes(thesis_scope: impl Into<String>, antithesis_scope: impl Into<String>) -> Self {
        Self {
            scopes: Some((thesis_scope.into(), antithesis_scope.into())),
        }
    }

    fn scopes_for(&self, kind: &AntinomyType) -> Option<(String, String)> {
        if let Some(scopes) = &self.scopes {
            return Some(scopes.clone());
        }
        match kind {
            AntinomyType::Practical => Some((
                "cases where the person concerned can decide for themselves".to_string(),
                "cases where they cannot and others must decide on their behalf".to_string(),
            )),
            AntinomyType::Theoretical => Some((
                "the order of possible experience".to_string(),
                "the order of ideas beyond possible experience".to_string(),
            )),
            AntinomyType::Custom(_) => None,
        }
    }
}

impl ResolutionStrategy for DomainDistinction {
    fn kind(&self) -> StrategyKind {
        StrategyKind::DomainDistinction
    }

    fn resolve(&self, antinomy: &Antinomy) -> Option<Resolution> {
        let (thesis_scope, antithesis_scope) = self.scopes_for(&antinomy.kind)?;
        let floor = antinomy.thesis.confidence.min(antinomy.antithesis.confidence);
        Some(Resolution::new(
            self.kind(),
            format!(
                "{} holds for {thesis_scope}; {} holds for {antithesis_scope}",
                quoted(&antinomy.thesis),
                quoted(&antinomy.antithesis)
            ),
            format!(
                "The {} conflict dissolves once each claim is restricted to its own scope, \
                 so both can hold without contradiction.",
                antinomy.kind
            ),
            (0.5 + 0.3 * floor).min(Self::CEILING),
        ))
    }
}

/// One claim orients judgment as an ideal; the other binds as the
/// operative constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegulativePrinciple;

impl RegulativePrinciple {
    const CEILING: f64 = 0.8;
}

impl ResolutionStrategy for RegulativePrinciple {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RegulativePrinciple
    }

    fn resolve(&self, antinomy: &Antinomy) -> Option<Resolution> {
        let thesis_ideal = has_any_stem(&tokenize(&antinomy.thesis.statement), IDEALIZING);
        let antithesis_ideal = has_any_stem(&tokenize(&antinomy.antithesis.statement), IDEALIZING);

        // Idealizing vocabulary decides; otherwise the weaker claim orients.
        let thesis_is_ideal = match (thesis_ideal, antithesis_ideal) {
            (true, false) => true,
            (false, true) => false,
            _ => antinomy.thesis.confidence < antinomy.antithesis.confidence,
        };
        let (ideal, operative) = if thesis_is_ideal {
            (&antinomy.thesis, &antinomy.antithesis)
        } else {
            (&antinomy.antithesis, &antinomy.thesis)
        };

        Some(Resolution::new(
            self.kind(),
            format!(
                "Treat {} as a regulative ideal that orients judgment, while {} remains the operative constraint",
                quoted(ideal),
                quoted(operative)
            ),
            "Reading one claim as a guiding orientation rather than a literal rule avoids a forced either/or."
                .to_string(),
            (0.5 + 0.3 * mean_confidence(antinomy)).min(Self::CEILING),
        ))
    }
}

/// Fallback: name the tension and defer to case-by-case judgment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synthesis;

impl Synthesis {
    pub fn resolution(antinomy: &Antinomy) -> Resolution {
        Resolution::new(
            StrategyKind::Synthesis,
            format!(
                "{} and {} stand in unresolved tension; the balance between them must be struck case by case",
                quoted(&antinomy.thesis),
                quoted(&antinomy.antithesis)
            ),
            "No resolution strategy cleanly applies, so neither claim is allowed to override the other in general."
                .to_string(),
            (0.2 + 0.4 * mean_confidence(antinomy)).min(SYNTHESIS_CONFIDENCE_CAP),
        )
    }
}

impl ResolutionStrategy for Synthesis {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Synthesis
    }

    fn resolve(&self, antinomy: &Antinomy) -> Option<Resolution> {
        Some(Self::resolution(antinomy))
    }
}

type StrategyFn = Box<dyn Fn(&Antinomy) -> Option<Resolution> + Send + Sync>;

/// Strategy backed by a caller-supplied function.
pub struct ExternalStrategy {
    kind: StrategyKind,
    resolve_fn: StrategyFn,
}

impl ExternalStrategy {
    pub fn new(
        kind: StrategyKind,
        resolve_fn: impl Fn(&Antinomy) -> Option<Resolution> + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            resolve_fn: Box::new(resolve_fn),
        }
    }
}

impl ResolutionStrategy for ExternalStrategy {
    fn kind(&self) -> StrategyKind {
        self.kind
    }

    fn resolve(&self, antinomy: &Antinomy) -> Option<Resolution> {
        (self.resolve_fn)(antinomy)
    }
}

/// Antinomy detector and strategy-driven resolver.
#[derive(Clone)]
pub struct AntinomyResolver {
    config: ResolverConfig,
    detector: Arc<dyn TensionDetector>,
    strategies: BTreeMap<StrategyKind, Arc<dyn ResolutionStrategy>>,
}

impl Default for AntinomyResolver {
    fn default() -> Self {
        Self::with_defaults(ResolverConfig::default())
    }
}

impl std::fmt::Debug for AntinomyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AntinomyResolver")
            .field("config", &self.config)
            .field("strategies", &self.strategies.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AntinomyResolver {
    pub fn new(config: ResolverConfig) -> KernelResult<Self> {
        config.validate()?;
        Ok(Self::with_defaults(config))
    }

    fn with_defaults(config: ResolverConfig) -> Self {
        let mut strategies: BTreeMap<StrategyKind, Arc<dyn ResolutionStrategy>> = BTreeMap::new();
        strategies.insert(
            StrategyKind::ContextualPrioritization,
            Arc::new(ContextualPrioritization),
        );
        strategies.insert(
            StrategyKind::DomainDistinction,
            Arc::new(DomainDistinction::default()),
        );
        strategies.insert(StrategyKind::RegulativePrinciple, Arc::new(RegulativePrinciple));
        strategies.insert(StrategyKind::Synthesis, Arc::new(Synthesis));
        Self {
            config,
            detector: Arc::new(LexicalTensionDetector::default()),
            strategies,
        }
    }

    pub fn with_detector(mut self, detector: impl TensionDetector + 'static) -> Self {
        self.detector = Arc::new(detector);
        self
    }

    /// Register (or replace) the implementation for `strategy.kind()`.
    pub fn with_strategy(mut self, strategy: impl ResolutionStrategy + 'static) -> Self {
        self.strategies.insert(strategy.kind(), Arc::new(strategy));
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Strategy that `resolve_antinomy` will try first for `domain`.
    pub fn strategy_for(&self, domain: &str) -> StrategyKind {
        self.config.strategy_for(domain)
    }

    /// Every genuine, classifiable conflict among `propositions`.
    ///
    /// Pairs are visited as (i, j) with i < j; the earlier proposition
    /// becomes the thesis.
    pub fn detect_antinomies(&self, propositions: &[Proposition]) -> Vec<Antinomy> {
        let floor = self.config.plausibility_floor;
        // NaN confidence is never plausible.
        let plausible = |p: &Proposition| p.confidence >= floor;
        let mut found = Vec::new();

        for (i, thesis) in propositions.iter().enumerate() {
            for antithesis in &propositions[i + 1..] {
                if !plausible(thesis) || !plausible(antithesis) {
                    continue;
                }
                if is_trivial_negation(&thesis.statement, &antithesis.statement) {
                    log::debug!(
                        "trivial negation discarded: {:?} / {:?}",
                        thesis.statement,
                        antithesis.statement
                    );
                    continue;
                }
                if let Some(kind) = self.detector.classify(thesis, antithesis) {
                    found.push(Antinomy::new(thesis.clone(), antithesis.clone(), kind));
                }
            }
        }

        log::debug!(
            "detected {} antinomies among {} propositions",
            found.len(),
            propositions.len()
        );
        found
    }

    /// Resolve with the override for the antinomy's domain, else the
    /// default strategy, else synthesis. A strategy that does not apply
    /// falls back to synthesis.
    pub fn resolve_antinomy(&self, antinomy: &Antinomy) -> Resolution {
        let selected = self.strategy_for(antinomy.domain());
        log::debug!("resolving {} antinomy with {selected}", antinomy.kind);

        if selected != StrategyKind::Synthesis {
            match self.strategies.get(&selected).and_then(|s| s.resolve(antinomy)) {
                Some(resolution) => return resolution,
                None => log::warn!("strategy {selected} does not apply, falling back to synthesis"),
            }
        }
        self.synthesize(antinomy)
    }

    pub fn resolve_all(&self, antinomies: &[Antinomy]) -> Vec<Resolution> {
        antinomies.iter().map(|a| self.resolve_antinomy(a)).collect()
    }

    fn synthesize(&self, antinomy: &Antinomy) -> Resolution {
        let mut resolution = self
            .strategies
            .get(&StrategyKind::Synthesis)
            .and_then(|s| s.resolve(antinomy))
            .unwrap_or_else(|| Synthesis::resolution(antinomy));
        resolution.strategy = StrategyKind::Synthesis;
        resolution.confidence = resolution.confidence.min(SYNTHESIS_CONFIDENCE_CAP);
        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(statement: &str, confidence: f64, domain: &str) -> Proposition {
        Proposition::new(statement, confidence, "advisor", domain)
    }

    fn liberty_security() -> Vec<Proposition> {
        vec![
            prop("Policy should prioritize liberty", 0.8, "governance"),
            prop("Policy should prioritize security", 0.8, "governance"),
        ]
    }

    #[test]
    fn test_liberty_security_single_practical_antinomy() {
        let resolver = AntinomyResolver::default();
        let found = resolver.detect_antinomies(&liberty_security());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, AntinomyType::Practical);
        assert_eq!(found[0].thesis.statement, "Policy should prioritize liberty");
    }

    #[test]
    fn test_contextual_prioritization_scenario() {
        let resolver = AntinomyResolver::new(
            ResolverConfig::default()
                .with_override("governance", StrategyKind::ContextualPrioritization),
        )
        .unwrap();
        let antinomy = resolver.detect_antinomies(&liberty_security()).remove(0);
        let r = resolver.resolve_antinomy(&antinomy);
        assert_eq!(r.strategy, StrategyKind::ContextualPrioritization);
        assert!(r.statement.contains("Policy should prioritize liberty"));
        assert!(r.statement.contains("Policy should prioritize security"));
        assert!(r.confidence > 0.5 && r.confidence <= 0.9);
        assert!((r.confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_contextual_prioritization_prefers_confident_in_domain_claim() {
        let antinomy = Antinomy::new(
            prop("Budgets must always fund prevention", 0.6, "governance"),
            prop("Budgets must always fund treatment", 0.9, "governance"),
            AntinomyType::Practical,
        );
        let r = ContextualPrioritization.resolve(&antinomy).unwrap();
        assert!(r.statement.starts_with("\"Budgets must always fund treatment\""));
        assert!(r.confidence <= 0.9);
    }

    #[test]
    fn test_resolution_deterministic() {
        let resolver = AntinomyResolver::new(
            ResolverConfig::default().with_default_strategy(StrategyKind::RegulativePrinciple),
        )
        .unwrap();
        let antinomy = resolver.detect_antinomies(&liberty_security()).remove(0);
        assert_eq!(
            resolver.resolve_antinomy(&antinomy),
            resolver.resolve_antinomy(&antinomy)
        );
    }

    #[test]
    fn test_trivial_negation_filtered() {
        assert!(is_trivial_negation("The door is open", "The door is not open"));
        assert!(!is_trivial_negation("The door is open", "The door is open"));
        let resolver = AntinomyResolver::default();
        let found = resolver.detect_antinomies(&[
            prop("Liberty is not secure", 0.9, "governance"),
            prop("Liberty is secure", 0.9, "governance"),
        ]);
        assert!(found.is_empty());
    }

    #[test]
    fn test_implausible_propositions_ignored() {
        let resolver = AntinomyResolver::default();
        let found = resolver.detect_antinomies(&[
            prop("Policy should prioritize liberty", 0.3, "governance"),
            prop("Policy should prioritize security", 0.8, "governance"),
        ]);
        assert!(found.is_empty());
    }

    #[test]
    fn test_nan_confidence_not_plausible() {
        let resolver = AntinomyResolver::default();
        let unknown = Proposition {
            confidence: f64::NAN,
            ..prop("Policy should prioritize liberty", 0.8, "governance")
        };
        let found = resolver.detect_antinomies(&[
            unknown,
            prop("Policy should prioritize security", 0.8, "governance"),
        ]);
        assert!(found.is_empty());
    }

    #[test]
    fn test_compatible_duties_not_antinomies() {
        let resolver = AntinomyResolver::default();
        let found = resolver.detect_antinomies(&[
            prop("Clinicians must always explain risks", 0.8, "healthcare"),
            prop("Clinicians must always explain benefits", 0.8, "healthcare"),
            prop("Staff should never skip hand hygiene", 0.8, "healthcare"),
            prop("Staff should never skip handovers", 0.8, "healthcare"),
        ]);
        assert!(found.is_empty());
    }

    #[test]
    fn test_value_poles_match_whole_words() {
        let resolver = AntinomyResolver::default();
        let found = resolver.detect_antinomies(&[
            prop("Forms should collect information", 0.8, "governance"),
            prop("Citizens should have freedom of expression", 0.8, "governance"),
            prop("Ordinary citizens deserve freedom", 0.8, "governance"),
            prop("Simpler rules should be composite of few parts", 0.8, "aesthetic"),
        ]);
        assert!(found.is_empty());

        let found = resolver.detect_antinomies(&[
            prop("Art should privilege form", 0.8, "aesthetic"),
            prop("Art should privilege expression", 0.8, "aesthetic"),
        ]);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_unclassifiable_tension_discarded() {
        let resolver = AntinomyResolver::default();
        let found = resolver.detect_antinomies(&[
            prop("Liberty", 0.8, "governance"),
            prop("Security", 0.8, "governance"),
        ]);
        assert!(found.is_empty());
    }

    #[test]
    fn test_theoretical_antinomy() {
        let resolver = AntinomyResolver::default();
        let found = resolver.detect_antinomies(&[
            prop("The world is finite in time", 0.7, "aesthetic"),
            prop("The world is infinite in time", 0.7, "aesthetic"),
        ]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, AntinomyType::Theoretical);
    }

    #[test]
    fn test_exclusive_frame_tension() {
        let resolver = AntinomyResolver::default();
        let found = resolver.detect_antinomies(&[
            prop("Funding must go to schools first", 0.8, "governance"),
            prop("Funding must go to hospitals first", 0.8, "governance"),
            prop("The weather was pleasant", 0.9, "governance"),
        ]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, AntinomyType::Practical);
    }

    #[test]
    fn test_no_configuration_uses_synthesis() {
        let resolver = AntinomyResolver::default();
        let antinomy = resolver.detect_antinomies(&liberty_security()).remove(0);
        let r = resolver.resolve_antinomy(&antinomy);
        assert_eq!(r.strategy, StrategyKind::Synthesis);
        assert!(r.confidence <= SYNTHESIS_CONFIDENCE_CAP);
        assert!(r.statement.contains("liberty") && r.statement.contains("security"));
    }

    #[test]
    fn test_domain_override_beats_default() {
        let resolver = AntinomyResolver::new(
            ResolverConfig::default()
                .with_default_strategy(StrategyKind::RegulativePrinciple)
                .with_override("healthcare", StrategyKind::DomainDistinction),
        )
        .unwrap();
        let health = Antinomy::new(
            prop("Respect patient autonomy", 0.8, "healthcare"),
            prop("Act for patient benefit", 0.8, "healthcare"),
            AntinomyType::Practical,
        );
        let gov = Antinomy::new(
            prop("Policy should prioritize liberty", 0.8, "governance"),
            prop("Policy should prioritize security", 0.8, "governance"),
            AntinomyType::Practical,
        );
        assert_eq!(
            resolver.resolve_antinomy(&health).strategy,
            StrategyKind::DomainDistinction
        );
        assert_eq!(
            resolver.resolve_antinomy(&gov).strategy,
            StrategyKind::RegulativePrinciple
        );
    }

    #[test]
    fn test_domain_distinction_custom_type_falls_back() {
        let resolver = AntinomyResolver::new(
            ResolverConfig::default().with_default_strategy(StrategyKind::DomainDistinction),
        )
        .unwrap();
        let antinomy = Antinomy::new(
            prop("Form should follow function", 0.9, "aesthetic"),
            prop("Form should follow expression", 0.9, "aesthetic"),
            AntinomyType::Custom("TASTE".into()),
        );
        let r = resolver.resolve_antinomy(&antinomy);
        assert_eq!(r.strategy, StrategyKind::Synthesis);
        assert!(r.confidence <= SYNTHESIS_CONFIDENCE_CAP);
    }

    #[test]
    fn test_domain_distinction_custom_scopes() {
        let strategy = DomainDistinction::with_scopes("capable patients", "incapacitated patients");
        let antinomy = Antinomy::new(
            prop("Respect patient autonomy", 0.8, "healthcare"),
            prop("Act for patient benefit", 0.7, "healthcare"),
            AntinomyType::Custom("CLINICAL".into()),
        );
        let r = strategy.resolve(&antinomy).unwrap();
        assert!(r.statement.contains("capable patients"));
        assert!(r.statement.contains("incapacitated patients"));
        assert!((r.confidence - 0.71).abs() < 1e-9);
    }

    #[test]
    fn test_regulative_principle_picks_ideal() {
        let antinomy = Antinomy::new(
            prop("Care should be affordable now", 0.8, "healthcare"),
            prop("Care should ultimately be perfect", 0.8, "healthcare"),
            AntinomyType::Practical,
        );
        let r = RegulativePrinciple.resolve(&antinomy).unwrap();
        assert!(r
            .statement
            .starts_with("Treat \"Care should ultimately be perfect\" as a regulative ideal"));
        assert!(r.confidence <= 0.8);
    }

    #[test]
    fn test_external_strategy_registered() {
        let resolver = AntinomyResolver::new(
            ResolverConfig::default().with_default_strategy(StrategyKind::ContextualPrioritization),
        )
        .unwrap()
        .with_strategy(ExternalStrategy::new(
            StrategyKind::ContextualPrioritization,
            |a| {
                Some(Resolution::new(
                    StrategyKind::ContextualPrioritization,
                    format!("custom: {}", a.thesis.statement),
                    "advisor supplied",
                    0.7,
                ))
            },
        ));
        let antinomy = resolver.detect_antinomies(&liberty_security()).remove(0);
        let r = resolver.resolve_antinomy(&antinomy);
        assert_eq!(r.statement, "custom: Policy should prioritize liberty");
    }

    #[test]
    fn test_synthesis_cap_enforced_for_replacements() {
        let resolver = AntinomyResolver::default().with_strategy(ExternalStrategy::new(
            StrategyKind::Synthesis,
            |_| Some(Resolution::new(StrategyKind::Synthesis, "overconfident", "", 0.95)),
        ));
        let antinomy = resolver.detect_antinomies(&liberty_security()).remove(0);
        let r = resolver.resolve_antinomy(&antinomy);
        assert!((r.confidence - SYNTHESIS_CONFIDENCE_CAP).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_floor_rejected() {
        let config = ResolverConfig {
            plausibility_floor: 1.5,
            ..Default::default()
        };
        assert!(AntinomyResolver::new(config).is_err());
    }
}
