// ─────────────────────────────────────────────────────────────────────
// CAR Reasoning Kernel — Advisor Domain Catalog
// ─────────────────────────────────────────────────────────────────────
//! Domains an orchestrator may be built for, with each domain's
//! preferred antinomy resolution strategy.

use serde::{Deserialize, Serialize};

use car_types::{KernelError, KernelResult, ResolverConfig, StrategyKind};

/// One advisor domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainProfile {
    pub name: String,
    /// Strategy installed as the domain's resolver override, if any.
    #[serde(default)]
    pub preferred_strategy: Option<StrategyKind>,
}

impl DomainProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            preferred_strategy: None,
        }
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.preferred_strategy = Some(strategy);
        self
    }
}

/// Known advisor domains, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainCatalog {
    profiles: Vec<DomainProfile>,
}

impl DomainCatalog {
    /// Healthcare, governance and aesthetic advisors.
    pub fn builtin() -> Self {
        Self::default()
            .with_domain(DomainProfile::new("healthcare").with_strategy(StrategyKind::DomainDistinction))
            .with_domain(
                DomainProfile::new("governance").with_strategy(StrategyKind::ContextualPrioritization),
            )
            .with_domain(DomainProfile::new("aesthetic").with_strategy(StrategyKind::RegulativePrinciple))
    }

    /// Add a domain, replacing any profile with the same name.
    pub fn with_domain(mut self, profile: DomainProfile) -> Self {
        match self.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&DomainProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Profile for `name`, or `KernelError::UnknownDomain`.
    pub fn require(&self, name: &str) -> KernelResult<&DomainProfile> {
        self.get(name)
            .ok_or_else(|| KernelError::UnknownDomain(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }

    /// Resolver config whose domain overrides are the preferred strategies.
    pub fn resolver_config(&self) -> ResolverConfig {
        self.profiles
            .iter()
            .filter_map(|p| p.preferred_strategy.map(|s| (p.name.clone(), s)))
            .fold(ResolverConfig::default(), |cfg, (name, strategy)| {
                cfg.with_override(name, strategy)
            })
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> KernelResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| KernelError::Config(format!("JSON parse error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_domains() {
        let catalog = DomainCatalog::builtin();
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["healthcare", "governance", "aesthetic"]
        );
        assert!(catalog.contains("governance"));
        assert!(!catalog.contains("astrology"));
    }

    #[test]
    fn test_require_unknown() {
        let catalog = DomainCatalog::builtin();
        assert_eq!(
            catalog.require("astrology").unwrap_err(),
            KernelError::UnknownDomain("astrology".into())
        );
    }

    #[test]
    fn test_resolver_config_overrides() {
        let cfg = DomainCatalog::builtin().resolver_config();
        assert_eq!(cfg.strategy_for("healthcare"), StrategyKind::DomainDistinction);
        assert_eq!(
            cfg.strategy_for("governance"),
            StrategyKind::ContextualPrioritization
        );
        assert_eq!(cfg.strategy_for("aesthetic"), StrategyKind::RegulativePrinciple);
        assert_eq!(cfg.strategy_for("other"), StrategyKind::Synthesis);
    }

    #[test]
    fn test_with_domain_replaces() {
        let catalog = DomainCatalog::builtin()
            .with_domain(DomainProfile::new("healthcare").with_strategy(StrategyKind::Synthesis))
            .with_domain(DomainProfile::new("education"));
        assert_eq!(catalog.names().count(), 4);
        assert_eq!(
            catalog.get("healthcare").unwrap().preferred_strategy,
            Some(StrategyKind::Synthesis)
        );
        assert!(catalog.resolver_config().domain_overrides.get("education").is_none());
    }

    #[test]
    fn test_from_json() {
        let catalog = DomainCatalog::from_json(
            r#"{"profiles":[{"name":"education","preferred_strategy":"synthesis"}]}"#,
        )
        .unwrap();
        assert!(catalog.contains("education"));
        assert!(DomainCatalog::from_json("[]").is_err());
    }
}
