// ─────────────────────────────────────────────────────────────────────
// CAR Reasoning Kernel — Domain Model
// ─────────────────────────────────────────────────────────────────────
//! Inputs handed to the kernel by advisors: concepts, propositions,
//! antinomies and actions.
//!
//! Concepts live in the registry for the lifetime of the process.
//! Everything else is created per request and dropped afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::score::clamp_score;

/// An abstract concept an advisor wants the kernel to recognize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Owning domain (e.g. `healthcare`).
    pub domain: String,
    /// Open attribute map, e.g. enumerations of sub-types.
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Concept {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            domain: domain.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }
}

/// A statement asserted by some source, with the source's confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposition {
    pub statement: String,
    /// Source confidence in [0, 1].
    pub confidence: f64,
    /// Who asserted it.
    pub origin: String,
    pub domain: String,
}

impl Proposition {
    pub fn new(
        statement: impl Into<String>,
        confidence: f64,
        origin: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            statement: statement.into(),
            confidence: clamp_score(confidence, 0.0, 1.0),
            origin: origin.into(),
            domain: domain.into(),
        }
    }
}

/// Classification of a thesis/antithesis conflict.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AntinomyType {
    /// Conflict between claims about what is the case.
    Theoretical,
    /// Conflict between claims about what ought to be done.
    Practical,
    /// Advisor-defined classification.
    Custom(String),
}

impl fmt::Display for AntinomyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Theoretical => f.write_str("THEORETICAL"),
            Self::Practical => f.write_str("PRACTICAL"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// An ordered (thesis, antithesis) pair in genuine tension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Antinomy {
    pub thesis: Proposition,
    pub antithesis: Proposition,
    pub kind: AntinomyType,
}

impl Antinomy {
    pub fn new(thesis: Proposition, antithesis: Proposition, kind: AntinomyType) -> Self {
        Self {
            thesis,
            antithesis,
            kind,
        }
    }

    /// Domain used for strategy overrides: the thesis' domain.
    pub fn domain(&self) -> &str {
        &self.thesis.domain
    }
}

/// A proposed action submitted for ethical evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub description: String,
    pub domain: String,
    /// Stakeholders affected by the action.
    pub recipients: Vec<String>,
}

impl Action {
    pub fn new(
        description: impl Into<String>,
        domain: impl Into<String>,
        recipients: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            description: description.into(),
            domain: domain.into(),
            recipients: recipients.into_iter().map(Into::into).collect(),
        }
    }
}

/// One advisor request to the orchestrator.
///
/// `input` is matched against the concept registry. Actions are evaluated,
/// propositions are searched for antinomies, and explicitly supplied
/// antinomies are resolved as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarRequest {
    pub input: String,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub propositions: Vec<Proposition>,
    #[serde(default)]
    pub antinomies: Vec<Antinomy>,
}

impl CarRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_proposition(mut self, proposition: Proposition) -> Self {
        self.propositions.push(proposition);
        self
    }

    pub fn with_antinomy(mut self, antinomy: Antinomy) -> Self {
        self.antinomies.push(antinomy);
        self
    }

    /// True if nothing beyond concept recognition is requested.
    pub fn is_recognition_only(&self) -> bool {
        self.actions.is_empty() && self.propositions.is_empty() && self.antinomies.is_empty()
    }
}
