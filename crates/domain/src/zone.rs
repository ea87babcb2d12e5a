//! Zone rules: the ordered guards that map a tracker value to a [`Mode`].

use crate::mode::Mode;

/// The tracker state that always means "at home".
pub const HOME_LITERAL: &str = "home";

/// One guarded classification rule. Rules are evaluated in order and the
/// first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneRule<'a> {
    /// Matches when the value equals any of the listed zones.
    AnyOf { zones: &'a [String], mode: Mode },
    /// Matches when the value equals the zone exactly.
    Exact { zone: &'a str, mode: Mode },
    /// Matches when the value starts with a non-empty prefix.
    Prefix { prefix: &'a str, mode: Mode },
}

impl ZoneRule<'_> {
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::AnyOf { zones, .. } => zones.iter().any(|z| z == value),
            Self::Exact { zone, .. } => *zone == value,
            Self::Prefix { prefix, .. } => !prefix.is_empty() && value.starts_with(prefix),
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        match self {
            Self::AnyOf { mode, .. } | Self::Exact { mode, .. } | Self::Prefix { mode, .. } => {
                *mode
            }
        }
    }
}

/// Immutable set of zone preferences.
///
/// Unset optional zones produce no rule at all, so they can never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneRuleSet {
    florida_zones: Vec<String>,
    work_zone: Option<String>,
    airport_zone: Option<String>,
    shopping_prefix: Option<String>,
}

impl ZoneRuleSet {
    /// Create a builder for constructing a [`ZoneRuleSet`].
    #[must_use]
    pub fn builder() -> ZoneRuleSetBuilder {
        ZoneRuleSetBuilder::default()
    }

    #[must_use]
    pub fn florida_zones(&self) -> &[String] {
        &self.florida_zones
    }

    #[must_use]
    pub fn work_zone(&self) -> Option<&str> {
        self.work_zone.as_deref()
    }

    #[must_use]
    pub fn airport_zone(&self) -> Option<&str> {
        self.airport_zone.as_deref()
    }

    #[must_use]
    pub fn shopping_prefix(&self) -> Option<&str> {
        self.shopping_prefix.as_deref()
    }

    /// The active rules in precedence order: Florida, work, home, airport,
    /// shopping. The home rule is always present.
    #[must_use]
    pub fn rules(&self) -> Vec<ZoneRule<'_>> {
        let mut rules = Vec::with_capacity(5);
        if !self.florida_zones.is_empty() {
            rules.push(ZoneRule::AnyOf {
                zones: &self.florida_zones,
                mode: Mode::Florida,
            });
        }
        if let Some(zone) = self.work_zone.as_deref() {
            rules.push(ZoneRule::Exact {
                zone,
                mode: Mode::Work,
            });
        }
        rules.push(ZoneRule::Exact {
            zone: HOME_LITERAL,
            mode: Mode::Home,
        });
        if let Some(zone) = self.airport_zone.as_deref() {
            rules.push(ZoneRule::Exact {
                zone,
                mode: Mode::Traveling,
            });
        }
        if let Some(prefix) = self.shopping_prefix.as_deref() {
            rules.push(ZoneRule::Prefix {
                prefix,
                mode: Mode::Shopping,
            });
        }
        rules
    }
}

/// Step-by-step builder for [`ZoneRuleSet`].
///
/// Values are trimmed; blank values leave the rule unset and duplicate
/// Florida zones are dropped while keeping first-seen order.
#[derive(Debug, Default)]
pub struct ZoneRuleSetBuilder {
    florida_zones: Vec<String>,
    work_zone: Option<String>,
    airport_zone: Option<String>,
    shopping_prefix: Option<String>,
}

fn non_blank(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl ZoneRuleSetBuilder {
    #[must_use]
    pub fn florida_zone(mut self, zone: impl Into<String>) -> Self {
        if let Some(zone) = non_blank(zone) {
            if !self.florida_zones.contains(&zone) {
                self.florida_zones.push(zone);
            }
        }
        self
    }

    #[must_use]
    pub fn florida_zones<I, S>(self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        zones
            .into_iter()
            .fold(self, |builder, zone| builder.florida_zone(zone))
    }

    #[must_use]
    pub fn work_zone(mut self, zone: impl Into<String>) -> Self {
        self.work_zone = non_blank(zone);
        self
    }

    #[must_use]
    pub fn airport_zone(mut self, zone: impl Into<String>) -> Self {
        self.airport_zone = non_blank(zone);
        self
    }

    #[must_use]
    pub fn shopping_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.shopping_prefix = non_blank(prefix);
        self
    }

    #[must_use]
    pub fn build(self) -> ZoneRuleSet {
        ZoneRuleSet {
            florida_zones: self.florida_zones,
            work_zone: self.work_zone,
            airport_zone: self.airport_zone,
            shopping_prefix: self.shopping_prefix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_always_contain_home_rule() {
        let rule_set = ZoneRuleSet::default();
        let rules = rule_set.rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].mode(), Mode::Home);
        assert!(rules[0].matches("home"));
    }

    #[test]
    fn should_order_rules_by_precedence() {
        let set = ZoneRuleSet::builder()
            .shopping_prefix("shopping_")
            .airport_zone("zone.airport")
            .work_zone("zone.office")
            .florida_zone("zone.disney")
            .build();
        let modes: Vec<_> = set.rules().iter().map(ZoneRule::mode).collect();
        assert_eq!(
            modes,
            [
                Mode::Florida,
                Mode::Work,
                Mode::Home,
                Mode::Traveling,
                Mode::Shopping
            ]
        );
    }

    #[test]
    fn should_treat_blank_values_as_unset() {
        let set = ZoneRuleSet::builder()
            .work_zone("  ")
            .airport_zone("")
            .shopping_prefix(" ")
            .florida_zones(["", " "])
            .build();
        assert_eq!(set, ZoneRuleSet::default());
    }

    #[test]
    fn should_dedupe_florida_zones_keeping_first_seen_order() {
        let set = ZoneRuleSet::builder()
            .florida_zones(["zone.b", "zone.a", " zone.b "])
            .build();
        assert_eq!(set.florida_zones(), ["zone.b", "zone.a"]);
    }

    #[test]
    fn should_never_match_empty_prefix() {
        let rule = ZoneRule::Prefix {
            prefix: "",
            mode: Mode::Shopping,
        };
        assert!(!rule.matches("anything"));
    }
}
