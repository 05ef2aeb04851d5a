use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription tiers, ordered from least to most access.
///
/// A course carries the minimum tier required to see it; a plan sees every
/// course whose tier is at or below its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Basic,
    Premium,
}

impl PlanTier {
    /// Resolves a plan name coming from the subscription service.
    ///
    /// Matching ignores case and surrounding whitespace. Absent or unknown
    /// names fall back to `Free`.
    #[must_use]
    pub fn from_plan_name(name: Option<&str>) -> Self {
        let Some(raw) = name else {
            return Self::Free;
        };
        match Self::parse(raw) {
            Some(tier) => tier,
            None => {
                tracing::warn!(plan = raw, "unknown subscription plan, using free tier");
                Self::Free
            }
        }
    }

    /// Strict parse; `None` for names outside the known hierarchy.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "free" => Some(Self::Free),
            "basic" | "standard" => Some(Self::Basic),
            "premium" | "pro" => Some(Self::Premium),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Premium => "premium",
        }
    }

    /// True when a subscriber on `self` may see content gated at `required`.
    #[must_use]
    pub fn permits(self, required: PlanTier) -> bool {
        required <= self
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_plan_is_free() {
        assert_eq!(PlanTier::from_plan_name(None), PlanTier::Free);
    }

    #[test]
    fn plan_names_are_case_insensitive() {
        assert_eq!(PlanTier::from_plan_name(Some(" Premium ")), PlanTier::Premium);
        assert_eq!(PlanTier::from_plan_name(Some("BASIC")), PlanTier::Basic);
        assert_eq!(PlanTier::from_plan_name(Some("pro")), PlanTier::Premium);
    }

    #[test]
    fn unknown_plan_falls_back_to_free() {
        assert_eq!(PlanTier::from_plan_name(Some("platinum")), PlanTier::Free);
        assert_eq!(PlanTier::parse("platinum"), None);
    }

    #[test]
    fn tiers_permit_lower_content() {
        assert!(PlanTier::Premium.permits(PlanTier::Free));
        assert!(PlanTier::Basic.permits(PlanTier::Basic));
        assert!(!PlanTier::Free.permits(PlanTier::Basic));
    }
}
