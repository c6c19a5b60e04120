// ─────────────────────────────────────────────────────────────────────
// CAR Reasoning Kernel — Concept Registry (Schematism)
// ─────────────────────────────────────────────────────────────────────
//! Concept catalog plus the schemas that recognize and produce each
//! concept.
//!
//! Schemas decouple what a concept is from how it is detected, so a
//! keyword rule can be swapped for a statistical classifier or an
//! embedding lookup (via `ExternalRecognizer`) without touching the
//! catalog. Activation thresholds are per schema: narrow concepts need
//! a higher bar than broad ones.
//!
//! The registry publishes immutable `RegistrySnapshot`s. Registration
//! copies the current snapshot, mutates the copy and swaps the pointer
//! under a write lock; readers clone the `Arc` and never block each other.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use car_types::score::clamp_score;
use car_types::{Concept, KernelError, KernelResult, RecognizedConcept};

use crate::text::{phrase_matches, tokenize};

/// Parameters handed to generation rules.
pub type GenerationParams = BTreeMap<String, serde_json::Value>;

/// Scores how strongly an input evidences a concept.
///
/// Returns relevance in [0, 1]. Out-of-range values are clamped and
/// non-finite values count as 0.
pub trait RecognitionRule: Send + Sync {
    fn relevance(&self, input: &str) -> f64;
}

/// Produces candidate content for a concept.
///
/// Returns `None` when the rule has nothing to offer for these parameters.
pub trait GenerationRule: Send + Sync {
    fn generate(&self, params: &GenerationParams) -> Option<String>;
}

/// Keyword rule: relevance grows with the number of stems present.
///
/// `relevance = weight * min(1, hits / saturation)`. With the default
/// saturation of 1 a single hit yields the full weight. A keyword with
/// several words (`"informed consent"`) hits only when its stems are
/// adjacent; use `PhraseRule` to allow gaps.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    stems: Vec<String>,
    weight: f64,
    saturation: usize,
}

impl KeywordRule {
    pub fn new(keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            stems: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .filter(|k| !k.trim().is_empty())
                .collect(),
            weight: 1.0,
            saturation: 1,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = clamp_score(weight, 0.0, 1.0);
        self
    }

    /// Number of distinct hits needed to reach the full weight.
    pub fn with_saturation(mut self, saturation: usize) -> Self {
        self.saturation = saturation.max(1);
        self
    }
}

impl RecognitionRule for KeywordRule {
    fn relevance(&self, input: &str) -> f64 {
        let tokens = tokenize(input);
        let hits = self
            .stems
            .iter()
            .filter(|s| phrase_matches(&tokens, s, 0))
            .count();
        let ratio = (hits as f64 / self.saturation as f64).min(1.0);
        self.weight * ratio
    }
}

/// Phrase rule: full weight if any ordered multi-stem phrase matches.
#[derive(Debug, Clone)]
pub struct PhraseRule {
    phrases: Vec<String>,
    weight: f64,
    max_gap: usize,
}

impl PhraseRule {
    pub fn new(phrases: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            phrases: phrases.into_iter().map(|p| p.into().to_lowercase()).collect(),
            weight: 1.0,
            max_gap: 2,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = clamp_score(weight, 0.0, 1.0);
        self
    }

    pub fn with_max_gap(mut self, max_gap: usize) -> Self {
        self.max_gap = max_gap;
        self
    }
}

impl RecognitionRule for PhraseRule {
    fn relevance(&self, input: &str) -> f64 {
        let tokens = tokenize(input);
        if self
            .phrases
            .iter()
            .any(|p| phrase_matches(&tokens, p, self.max_gap))
        {
            self.weight
        } else {
            0.0
        }
    }
}

type RelevanceFn = Box<dyn Fn(&str) -> f64 + Send + Sync>;

/// Recognition rule backed by a caller-supplied function, for classifiers
/// and similarity models living outside the kernel.
pub struct ExternalRecognizer {
    relevance_fn: RelevanceFn,
}

impl ExternalRecognizer {
    pub fn new(relevance_fn: impl Fn(&str) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            relevance_fn: Box::new(relevance_fn),
        }
    }
}

impl RecognitionRule for ExternalRecognizer {
    fn relevance(&self, input: &str) -> f64 {
        (self.relevance_fn)(input)
    }
}

/// Template generation rule with `{key}` placeholders.
///
/// String parameters are inserted verbatim, other JSON values in their
/// compact JSON form. Any unresolved placeholder yields `None`.
#[derive(Debug, Clone)]
pub struct TemplateRule {
    template: String,
}

impl TemplateRule {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl GenerationRule for TemplateRule {
    fn generate(&self, params: &GenerationParams) -> Option<String> {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}')?;
            let key = after[..close].trim();
            match params.get(key)? {
                serde_json::Value::String(s) => out.push_str(s),
                other => out.push_str(&other.to_string()),
            }
            rest = &after[close + 1..];
        }
        out.push_str(rest);

        if out.trim().is_empty() {
            None
        } else {
            Some(out)
        }
    }
}

type GenerateFn = Box<dyn Fn(&GenerationParams) -> Option<String> + Send + Sync>;

/// Generation rule backed by a caller-supplied function.
pub struct ExternalGenerator {
    generate_fn: GenerateFn,
}

impl ExternalGenerator {
    pub fn new(
        generate_fn: impl Fn(&GenerationParams) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            generate_fn: Box::new(generate_fn),
        }
    }
}

impl GenerationRule for ExternalGenerator {
    fn generate(&self, params: &GenerationParams) -> Option<String> {
        (self.generate_fn)(params)
    }
}

/// Recognition and generation logic bound to one concept.
#[derive(Clone)]
pub struct Schema {
    recognition: Vec<Arc<dyn RecognitionRule>>,
    generation: Vec<Arc<dyn GenerationRule>>,
    activation_threshold: f64,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("recognition_rules", &self.recognition.len())
            .field("generation_rules", &self.generation.len())
            .field("activation_threshold", &self.activation_threshold)
            .finish()
    }
}

impl Schema {
    /// Create an empty schema. The threshold must lie in [0, 1].
    pub fn new(activation_threshold: f64) -> KernelResult<Self> {
        if !(0.0..=1.0).contains(&activation_threshold) {
            return Err(KernelError::Config(format!(
                "activation_threshold must be in [0, 1], got {activation_threshold}"
            )));
        }
        Ok(Self {
            recognition: Vec::new(),
            generation: Vec::new(),
            activation_threshold,
        })
    }

    pub fn with_recognition(mut self, rule: impl RecognitionRule + 'static) -> Self {
        self.recognition.push(Arc::new(rule));
        self
    }

    pub fn with_generation(mut self, rule: impl GenerationRule + 'static) -> Self {
        self.generation.push(Arc::new(rule));
        self
    }

    pub fn activation_threshold(&self) -> f64 {
        self.activation_threshold
    }

    /// Best recognition score over all rules; 0 when there are none.
    pub fn best_score(&self, input: &str) -> f64 {
        self.recognition
            .iter()
            .map(|rule| {
                let s = rule.relevance(input);
                if s.is_finite() {
                    s.clamp(0.0, 1.0)
                } else {
                    log::warn!("recognition rule returned non-finite score, treating as 0");
                    0.0
                }
            })
            .fold(0.0, f64::max)
    }

    /// Relevance if the schema is active for `input`, else `None`.
    pub fn activation(&self, input: &str) -> Option<f64> {
        if self.recognition.is_empty() {
            return None;
        }
        let best = self.best_score(input);
        (best >= self.activation_threshold).then_some(best)
    }

    fn generate(&self, params: &GenerationParams) -> Option<String> {
        self.generation
            .iter()
            .filter_map(|rule| rule.generate(params))
            .find(|candidate| !candidate.trim().is_empty())
    }
}

#[derive(Debug, Clone)]
struct BoundSchema {
    concept_id: String,
    schema: Arc<Schema>,
}

/// Immutable view of the registry at one point in time.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    concepts: Vec<Arc<Concept>>,
    index: HashMap<String, usize>,
    schemas: Vec<BoundSchema>,
}

impl RegistrySnapshot {
    pub fn concept(&self, id: &str) -> Option<&Arc<Concept>> {
        self.index.get(id).map(|&i| &self.concepts[i])
    }

    /// All concepts in insertion order.
    pub fn concepts(&self) -> &[Arc<Concept>] {
        &self.concepts
    }

    pub fn concepts_by_domain(&self, domain: &str) -> Vec<Arc<Concept>> {
        self.concepts
            .iter()
            .filter(|c| c.domain == domain)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn schema_count(&self, concept_id: &str) -> usize {
        self.schemas
            .iter()
            .filter(|b| b.concept_id == concept_id)
            .count()
    }

    /// Concepts whose schemas fire for `input`, most relevant first.
    ///
    /// Several active schemas of one concept collapse into one hit with the
    /// highest relevance. Ties keep concept registration order.
    pub fn recognize(&self, input: &str) -> Vec<RecognizedConcept> {
        let mut best: HashMap<usize, f64> = HashMap::new();
        for bound in &self.schemas {
            let Some(relevance) = bound.schema.activation(input) else {
                continue;
            };
            let Some(&idx) = self.index.get(&bound.concept_id) else {
                continue;
            };
            let entry = best.entry(idx).or_insert(relevance);
            if relevance > *entry {
                *entry = relevance;
            }
        }

        let mut hits: Vec<(usize, f64)> = best.into_iter().collect();
        hits.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        log::debug!("recognize: {} concept(s) active", hits.len());
        hits.into_iter()
            .map(|(idx, relevance)| RecognizedConcept {
                concept: Arc::clone(&self.concepts[idx]),
                relevance,
            })
            .collect()
    }

    /// First non-empty candidate from the concept's generation rules.
    pub fn generate(&self, concept_id: &str, params: &GenerationParams) -> KernelResult<String> {
        if !self.index.contains_key(concept_id) {
            return Err(KernelError::UnknownConcept(concept_id.to_string()));
        }
        self.schemas
            .iter()
            .filter(|b| b.concept_id == concept_id)
            .find_map(|b| b.schema.generate(params))
            .ok_or_else(|| KernelError::NoGenerationRule(concept_id.to_string()))
    }

    fn upsert(&mut self, concept: Concept) -> KernelResult<()> {
        match self.index.get(&concept.id) {
            Some(&i) => {
                let existing = &self.concepts[i];
                if existing.domain != concept.domain {
                    return Err(KernelError::DuplicateConcept {
                        id: concept.id,
                        existing: existing.domain.clone(),
                        attempted: concept.domain,
                    });
                }
                self.concepts[i] = Arc::new(concept);
            }
            None => {
                self.index.insert(concept.id.clone(), self.concepts.len());
                self.concepts.push(Arc::new(concept));
            }
        }
        Ok(())
    }

    fn bind(&mut self, concept_id: &str, schema: Schema) -> KernelResult<()> {
        if !self.index.contains_key(concept_id) {
            return Err(KernelError::UnknownConcept(concept_id.to_string()));
        }
        self.schemas.push(BoundSchema {
            concept_id: concept_id.to_string(),
            schema: Arc::new(schema),
        });
        Ok(())
    }
}

/// Shared concept registry.
///
/// Mutated during setup, then read concurrently by any number of
/// orchestrators.
#[derive(Debug, Default)]
pub struct ConceptRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl ConceptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a concept.
    ///
    /// Re-registering an id within the same domain replaces the concept and
    /// keeps its position and schemas. An id owned by another domain is
    /// rejected.
    pub fn register_concept(&self, concept: Concept) -> KernelResult<()> {
        let mut current = self.current.write();
        let mut next = RegistrySnapshot::clone(&current);
        let id = concept.id.clone();
        next.upsert(concept)?;
        *current = Arc::new(next);
        log::info!("registered concept '{id}'");
        Ok(())
    }

    /// Attach a schema to a registered concept.
    pub fn register_schema(&self, concept_id: &str, schema: Schema) -> KernelResult<()> {
        let mut current = self.current.write();
        let mut next = RegistrySnapshot::clone(&current);
        next.bind(concept_id, schema)?;
        *current = Arc::new(next);
        log::info!("registered schema for concept '{concept_id}'");
        Ok(())
    }

    /// Current published snapshot. Later registrations do not affect it.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.current.read().clone()
    }

    pub fn concept(&self, id: &str) -> Option<Arc<Concept>> {
        self.snapshot().concept(id).cloned()
    }

    pub fn concepts_by_domain(&self, domain: &str) -> Vec<Arc<Concept>> {
        self.snapshot().concepts_by_domain(domain)
    }

    pub fn recognize(&self, input: &str) -> Vec<RecognizedConcept> {
        self.snapshot().recognize(input)
    }

    pub fn generate(&self, concept_id: &str, params: &GenerationParams) -> KernelResult<String> {
        self.snapshot().generate(concept_id, params)
    }
}
