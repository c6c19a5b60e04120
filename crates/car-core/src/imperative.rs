// ─────────────────────────────────────────────────────────────────────
// CAR Reasoning Kernel — Imperative Evaluator (Categorical Imperative)
// ─────────────────────────────────────────────────────────────────────
//! Three-axis permissibility test for a proposed action.
//!
//! Each formulation is scored independently by its own
//! `FormulationScorer`:
//! - **Universalizability**: does the maxim survive being willed as
//!   universal law, or does it undermine the conditions it relies on.
//! - **Humanity**: are the recipients treated as ends, not merely means.
//! - **Autonomy**: is their capacity for self-directed choice preserved.
//!
//! The verdict is a conjunctive gate: every score must exceed the
//! permissibility floor. Keeping the axes separate lets callers report
//! *which* formulation an action fails.
//!
//! The default scorers are deterministic lexical rules. They are stand-ins
//! for real domain analyzers and carry no claim of semantic understanding;
//! advisors plug in their own via `ImperativeEvaluator::with_scorer`.

use std::collections::BTreeMap;
use std::sync::Arc;

use car_types::score::clamp_score;
use car_types::{Action, EvaluationResult, Formulation, ImperativeConfig, KernelError, KernelResult};

use crate::text::{any_phrase, tokenize};

/// Maximum number of unrelated tokens between the stems of a marker phrase.
const MARKER_GAP: usize = 3;

/// Scores an action along one formulation. Returns a value in [0, 1].
pub trait FormulationScorer: Send + Sync {
    fn score(&self, action: &Action) -> f64;
}

// Markers shared by several scorers.
const NON_CONSENT: &[&str] = &[
    "against consent",
    "without consent",
    "against will",
    "coerc",
    "compel",
    "force$",
    "forced$",
    "forces$",
    "forcing$",
    "forcibl",
];
const HONESTY: &[&str] = &["truth", "honest", "candid"];
const TRANSPARENCY: &[&str] = &["disclos", "inform", "explain", "transparen"];
const DIGNITY: &[&str] = &["respect", "dignity", "care for", "listen"];
const DECEPTION: &[&str] = &[
    "withhold", "conceal", "hide$", "hides$", "hiding$", "hid$", "hidden$", "deceiv", "decept",
    "lie$ to", "lied$ to", "lying$ to", "mislead", "manipulat",
];
const INSTRUMENTAL_USE: &[&str] = &[
    "against consent",
    "without consent",
    "against will",
    "use as means",
    "exploit",
    "coerc",
];
const DISREGARD: &[&str] = &[
    "ignor",
    "overrid",
    "disregard",
    "dismiss wishes",
    "against wishes",
    "against preference",
];
const VULNERABLE: &[&str] = &[
    "patient", "child", "minor", "infant", "elder", "disab", "incapacit", "vulnerab", "refugee",
    "prisoner",
];
const CONSENT_MECHANISM: &[&str] = &["consent", "permission", "agree", "opt in"];
const CHOICE: &[&str] = &["choice", "choos", "option", "decid", "opt out", "self determin"];
const WITHHOLDING: &[&str] = &[
    "withhold", "conceal", "deny$", "denies$", "denied$", "denying$", "hide$", "hides$", "hiding$",
    "hid$", "hidden$",
];
// Inflections are spelled out where a stem would also match a benign word
// (bandage, preventive, requirement, forceps, blockchain).
const PROHIBITION: &[&str] = &[
    "restrict", "prohibit", "forbid", "ban$", "bans$", "banned$", "banning$", "prevent$",
    "prevents$", "prevented$", "preventing$", "block$", "blocks$", "blocked$", "blocking$",
];
const MANDATE: &[&str] = &[
    "mandat", "oblig", "compel", "coerc", "require$", "requires$", "required$", "requiring$",
    "force$", "forces$", "forced$", "forcing$", "forcibl",
];
const ALTERNATIVE: &[&str] = &["alternativ", "instead", "substitut"];

fn count_categories(tokens: &[String], categories: &[&[&str]]) -> usize {
    categories
        .iter()
        .filter(|phrases| any_phrase(tokens, phrases, MARKER_GAP))
        .count()
}

/// A maxim known to defeat itself when universalized.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfDefeatingPattern {
    pub name: String,
    pub phrases: Vec<String>,
    pub penalty: f64,
}

impl SelfDefeatingPattern {
    pub fn new(name: impl Into<String>, phrases: &[&str], penalty: f64) -> Self {
        Self {
            name: name.into(),
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
            penalty: clamp_score(penalty, 0.0, 1.0),
        }
    }

    fn matches(&self, tokens: &[String]) -> bool {
        let phrases: Vec<&str> = self.phrases.iter().map(String::as_str).collect();
        any_phrase(tokens, &phrases, MARKER_GAP)
    }
}

/// Universalizability: base score minus a penalty per self-defeating
/// pattern the action matches.
#[derive(Debug, Clone)]
pub struct UniversalizabilityScorer {
    base: f64,
    patterns: Vec<SelfDefeatingPattern>,
}

impl Default for UniversalizabilityScorer {
    fn default() -> Self {
        Self {
            base: 0.85,
            patterns: vec![
                SelfDefeatingPattern::new("coercion_without_consent", NON_CONSENT, 0.35),
                SelfDefeatingPattern::new(
                    "exploitation_of_trust",
                    &["deceiv", "decept", "lie to", "mislead", "manipulat", "exploit", "betray", "trick"],
                    0.35,
                ),
                SelfDefeatingPattern::new(
                    "false_promise",
                    &["false promise", "promise never", "break promise", "broken promise"],
                    0.3,
                ),
                SelfDefeatingPattern::new(
                    "free_riding",
                    &["free ride", "freerid", "exempt myself", "except myself", "exception for"],
                    0.25,
                ),
            ],
        }
    }
}

impl UniversalizabilityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the pattern library.
    pub fn with_pattern(mut self, pattern: SelfDefeatingPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Names of the patterns an action matches, in library order.
    pub fn matched_patterns(&self, action: &Action) -> Vec<&str> {
        let tokens = tokenize(&action.description);
        self.patterns
            .iter()
            .filter(|p| p.matches(&tokens))
            .map(|p| p.name.as_str())
            .collect()
    }
}

impl FormulationScorer for UniversalizabilityScorer {
    fn score(&self, action: &Action) -> f64 {
        let tokens = tokenize(&action.description);
        let penalty: f64 = self
            .patterns
            .iter()
            .filter(|p| p.matches(&tokens))
            .map(|p| p.penalty)
            .sum();
        clamp_score(self.base - penalty, 0.0, 1.0)
    }
}

/// Humanity: respect markers raise the score; instrumentalization markers
/// lower it, scaled by how many recipients are affected and whether any of
/// them is vulnerable.
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanityScorer;

impl HumanityScorer {
    const BASE: f64 = 0.7;
    const REWARD: f64 = 0.1;
    const PENALTY: f64 = 0.25;
    const VULNERABILITY: f64 = 1.2;

    fn recipient_factor(action: &Action) -> f64 {
        let n = action.recipients.len().max(1) as f64;
        (1.0 + 0.1 * (n - 1.0)).min(1.5)
    }

    fn vulnerability_factor(action: &Action) -> f64 {
        let vulnerable = action
            .recipients
            .iter()
            .any(|r| any_phrase(&tokenize(r), VULNERABLE, 0));
        if vulnerable {
            Self::VULNERABILITY
        } else {
            1.0
        }
    }
}

impl FormulationScorer for HumanityScorer {
    fn score(&self, action: &Action) -> f64 {
        let tokens = tokenize(&action.description);
        let rewards = count_categories(&tokens, &[HONESTY, TRANSPARENCY, DIGNITY]) as f64;
        let penalties = count_categories(&tokens, &[DECEPTION, INSTRUMENTAL_USE, DISREGARD]) as f64;
        let scale = Self::recipient_factor(action) * Self::vulnerability_factor(action);
        clamp_score(
            Self::BASE + Self::REWARD * rewards - Self::PENALTY * penalties * scale,
            0.0,
            1.0,
        )
    }
}

/// Autonomy: informed-consent mechanisms raise the score; restricting
/// options lowers it, less so when a substitutable alternative is offered.
/// Acting against consent is penalized and voids any consent reward.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutonomyScorer;

impl AutonomyScorer {
    const BASE: f64 = 0.6;
    const REWARD: f64 = 0.15;
    const RESTRICTION: f64 = 0.2;
    const AGAINST_CONSENT: f64 = 0.3;
}

impl FormulationScorer for AutonomyScorer {
    fn score(&self, action: &Action) -> f64 {
        let tokens = tokenize(&action.description);
        let against_consent = any_phrase(&tokens, NON_CONSENT, MARKER_GAP);

        // Disclosure and honesty count once, as the "informed" part of consent.
        let rewards = if against_consent {
            0.0
        } else {
            let informed = any_phrase(&tokens, TRANSPARENCY, MARKER_GAP)
                || any_phrase(&tokens, HONESTY, MARKER_GAP);
            (count_categories(&tokens, &[CONSENT_MECHANISM, CHOICE]) + usize::from(informed)) as f64
        };

        let mut restriction =
            Self::RESTRICTION * count_categories(&tokens, &[WITHHOLDING, PROHIBITION, MANDATE]) as f64;
        if any_phrase(&tokens, ALTERNATIVE, MARKER_GAP) {
            restriction /= 2.0;
        }

        let consent_penalty = if against_consent {
            Self::AGAINST_CONSENT
        } else {
            0.0
        };

        clamp_score(
            Self::BASE + Self::REWARD * rewards - restriction - consent_penalty,
            0.0,
            1.0,
        )
    }
}

type ScoreFn = Box<dyn Fn(&Action) -> f64 + Send + Sync>;

/// Scorer backed by a caller-supplied function, for domain analyzers that
/// live outside the kernel and for injecting fixed scores.
pub struct ExternalScorer {
    score_fn: ScoreFn,
}

impl ExternalScorer {
    pub fn new(score_fn: impl Fn(&Action) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            score_fn: Box::new(score_fn),
        }
    }

    pub fn fixed(score: f64) -> Self {
        Self::new(move |_| score)
    }
}

impl FormulationScorer for ExternalScorer {
    fn score(&self, action: &Action) -> f64 {
        (self.score_fn)(action)
    }
}

/// Categorical imperative evaluator.
///
/// Holds one scorer per formulation, resolved at construction. Stateless
/// across calls and safe to share between threads.
#[derive(Clone)]
pub struct ImperativeEvaluator {
    config: ImperativeConfig,
    scorers: BTreeMap<Formulation, Arc<dyn FormulationScorer>>,
}

impl Default for ImperativeEvaluator {
    fn default() -> Self {
        Self::with_defaults(ImperativeConfig::default())
    }
}

impl std::fmt::Debug for ImperativeEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImperativeEvaluator")
            .field("config", &self.config)
            .field("formulations", &self.scorers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ImperativeEvaluator {
    /// Validate the config and install the rule-based scorers.
    pub fn new(config: ImperativeConfig) -> KernelResult<Self> {
        config.validate()?;
        Ok(Self::with_defaults(config))
    }

    fn with_defaults(config: ImperativeConfig) -> Self {
        let mut scorers: BTreeMap<Formulation, Arc<dyn FormulationScorer>> = BTreeMap::new();
        scorers.insert(
            Formulation::Universalizability,
            Arc::new(UniversalizabilityScorer::default()),
        );
        scorers.insert(Formulation::Humanity, Arc::new(HumanityScorer));
        scorers.insert(Formulation::Autonomy, Arc::new(AutonomyScorer));
        Self { config, scorers }
    }

    /// Replace the scorer for one formulation.
    pub fn with_scorer(
        mut self,
        formulation: Formulation,
        scorer: impl FormulationScorer + 'static,
    ) -> Self {
        self.scorers.insert(formulation, Arc::new(scorer));
        self
    }

    pub fn config(&self) -> &ImperativeConfig {
        &self.config
    }

    fn validate_action(action: &Action) -> KernelResult<()> {
        if action.description.trim().is_empty() {
            return Err(KernelError::InvalidAction(
                "description must not be empty".to_string(),
            ));
        }
        if action.recipients.is_empty() {
            return Err(KernelError::InvalidAction(
                "action must name at least one recipient".to_string(),
            ));
        }
        if action.recipients.iter().any(|r| r.trim().is_empty()) {
            return Err(KernelError::InvalidAction(
                "recipient names must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    fn score(&self, formulation: Formulation, action: &Action) -> f64 {
        match self.scorers.get(&formulation) {
            Some(scorer) => scorer.score(action),
            None => 0.0,
        }
    }

    /// Score an action on all three formulations.
    ///
    /// Errors only for malformed actions; a low-scoring action is a valid
    /// result.
    pub fn evaluate(&self, action: &Action) -> KernelResult<EvaluationResult> {
        Self::validate_action(action)?;

        let result = EvaluationResult::from_scores(
            self.score(Formulation::Universalizability, action),
            self.score(Formulation::Humanity, action),
            self.score(Formulation::Autonomy, action),
            self.config.permissibility_floor,
        );

        if result.permissible {
            log::debug!(
                "action permissible (confidence {:.4}): {}",
                result.confidence,
                action.description
            );
        } else {
            log::debug!(
                "action impermissible, failing {:?}: {}",
                result.failing_formulations(),
                action.description
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disclose() -> Action {
        Action::new("Disclose diagnosis truthfully", "healthcare", ["patient"])
    }

    fn withhold() -> Action {
        Action::new(
            "Withhold diagnosis to protect family's wishes against patient consent",
            "healthcare",
            ["patient"],
        )
    }

    #[test]
    fn test_disclosure_permissible() {
        let evaluator = ImperativeEvaluator::default();
        let r = evaluator.evaluate(&disclose()).unwrap();
        assert!(r.permissible);
        assert!((r.universalizability - 0.85).abs() < 1e-9);
        assert!((r.humanity - 0.9).abs() < 1e-9);
        assert!((r.autonomy - 0.75).abs() < 1e-9);
        assert!(r.humanity > 0.7);
        assert!(r.autonomy > 0.7);
    }

    #[test]
    fn test_withholding_against_consent_impermissible() {
        let evaluator = ImperativeEvaluator::default();
        let r = evaluator.evaluate(&withhold()).unwrap();
        assert!(!r.permissible);
        assert!(r.humanity < 0.3);
        assert!(r.autonomy < 0.3);
        let failing = r.failing_formulations();
        assert!(failing.contains(&Formulation::Humanity));
        assert!(failing.contains(&Formulation::Autonomy));
    }

    #[test]
    fn test_conjunctive_gate_with_injected_scores() {
        let evaluator = ImperativeEvaluator::default()
            .with_scorer(Formulation::Universalizability, ExternalScorer::fixed(0.9))
            .with_scorer(Formulation::Humanity, ExternalScorer::fixed(0.9))
            .with_scorer(Formulation::Autonomy, ExternalScorer::fixed(0.4));
        let r = evaluator.evaluate(&disclose()).unwrap();
        assert!(!r.permissible);
        assert_eq!(r.failing_formulations(), vec![Formulation::Autonomy]);
    }

    #[test]
    fn test_custom_floor() {
        let evaluator = ImperativeEvaluator::new(ImperativeConfig {
            permissibility_floor: 0.8,
        })
        .unwrap();
        // autonomy 0.75 no longer clears the floor
        let r = evaluator.evaluate(&disclose()).unwrap();
        assert!(!r.permissible);
        assert!(ImperativeEvaluator::new(ImperativeConfig {
            permissibility_floor: 1.0
        })
        .is_err());
    }

    #[test]
    fn test_invalid_actions() {
        let evaluator = ImperativeEvaluator::default();
        let empty_desc = Action::new("   ", "healthcare", ["patient"]);
        assert!(matches!(
            evaluator.evaluate(&empty_desc),
            Err(KernelError::InvalidAction(_))
        ));
        let no_recipients = Action::new("Inform", "healthcare", Vec::<String>::new());
        assert!(matches!(
            evaluator.evaluate(&no_recipients),
            Err(KernelError::InvalidAction(_))
        ));
        let blank_recipient = Action::new("Inform", "healthcare", [""]);
        assert!(evaluator.evaluate(&blank_recipient).is_err());
    }

    #[test]
    fn test_low_scores_are_not_errors() {
        let evaluator = ImperativeEvaluator::default();
        let action = Action::new(
            "Deceive and coerce them, override their wishes, ban every alternative",
            "governance",
            ["citizens", "minors", "prisoners"],
        );
        let r = evaluator.evaluate(&action).unwrap();
        assert!(!r.permissible);
        assert_eq!(r.humanity, 0.0);
    }

    #[test]
    fn test_scores_bounded_for_extreme_scorers() {
        let evaluator = ImperativeEvaluator::default()
            .with_scorer(Formulation::Humanity, ExternalScorer::fixed(f64::NAN))
            .with_scorer(Formulation::Autonomy, ExternalScorer::fixed(7.0));
        let r = evaluator.evaluate(&disclose()).unwrap();
        for s in [r.universalizability, r.humanity, r.autonomy, r.confidence] {
            assert!((0.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn test_universalizability_patterns() {
        let scorer = UniversalizabilityScorer::default();
        let action = Action::new(
            "Make a false promise to exploit the lender",
            "governance",
            ["lender"],
        );
        assert_eq!(
            scorer.matched_patterns(&action),
            vec!["exploitation_of_trust", "false_promise"]
        );
        assert!((scorer.score(&action) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_custom_pattern() {
        let scorer = UniversalizabilityScorer::default().with_pattern(SelfDefeatingPattern::new(
            "plagiarism",
            &["plagiar", "copy without credit"],
            0.4,
        ));
        let action = Action::new("Plagiarize the design", "aesthetic", ["artist"]);
        assert!((scorer.score(&action) - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_humanity_scales_with_recipients_and_vulnerability() {
        let scorer = HumanityScorer;
        let one = Action::new("Mislead the client", "governance", ["client"]);
        let many = Action::new(
            "Mislead the client",
            "governance",
            ["a", "b", "c", "d", "e", "f"],
        );
        let vulnerable = Action::new("Mislead the client", "governance", ["elderly client"]);
        assert!((scorer.score(&one) - 0.45).abs() < 1e-9);
        assert!(scorer.score(&many) < scorer.score(&one));
        assert!(scorer.score(&vulnerable) < scorer.score(&one));
    }

    #[test]
    fn test_autonomy_alternative_halves_restriction() {
        let scorer = AutonomyScorer;
        let bare = Action::new("Ban the procedure", "healthcare", ["patient"]);
        let alt = Action::new(
            "Ban the procedure and fund an alternative",
            "healthcare",
            ["patient"],
        );
        assert!((scorer.score(&bare) - 0.4).abs() < 1e-9);
        assert!((scorer.score(&alt) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_autonomy_consent_reward() {
        let scorer = AutonomyScorer;
        let action = Action::new(
            "Ask for consent and let the patient choose",
            "healthcare",
            ["patient"],
        );
        assert!((scorer.score(&action) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_benign_clinical_actions_permissible() {
        let evaluator = ImperativeEvaluator::default();
        for description in [
            "Apply a bandage to the wound",
            "Provide preventive care",
            "Remove the splinter with forceps",
            "Explain the requirements for discharge",
            "Schedule a follow-up appointment",
        ] {
            let r = evaluator
                .evaluate(&Action::new(description, "healthcare", ["patient"]))
                .unwrap();
            assert!(r.permissible, "{description}: {r:?}");
            assert!(r.autonomy >= 0.6 - 1e-9, "{description}: {r:?}");
        }
    }

    #[test]
    fn test_restriction_inflections_still_penalized() {
        let scorer = AutonomyScorer;
        for description in [
            "Banned the procedure",
            "Prevent visitors from entering",
            "Required every resident to comply",
            "Denied the transfer request",
        ] {
            let action = Action::new(description, "healthcare", ["patient"]);
            assert!((scorer.score(&action) - 0.4).abs() < 1e-9, "{description}");
        }
    }

    #[test]
    fn test_evaluation_deterministic() {
        let evaluator = ImperativeEvaluator::default();
        let a = evaluator.evaluate(&withhold()).unwrap();
        let b = evaluator.evaluate(&withhold()).unwrap();
        assert_eq!(a, b);
    }
}
