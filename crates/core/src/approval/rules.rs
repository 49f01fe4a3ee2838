//! Approval rule model and amount-window matching.
//!
//! Rules are company configuration: each selects the approvers required for
//! expenses falling inside its inclusive amount window. Three rule kinds
//! compose the completion semantics evaluated in [`super::engine`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminates how a rule's completion condition is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Complete when one designated approver approves.
    SpecificApprover,
    /// Complete when a percentage of the listed approvers approve.
    Percentage,
    /// Complete when either the specific-approver or the percentage
    /// condition is satisfied.
    Hybrid,
}

impl RuleKind {
    /// Returns the string representation of the rule kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SpecificApprover => "specific_approver",
            Self::Percentage => "percentage",
            Self::Hybrid => "hybrid",
        }
    }

    /// Parses a rule kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "specific_approver" => Some(Self::SpecificApprover),
            "percentage" => Some(Self::Percentage),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }
}

/// One entry in a rule's ordered approver list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleApprover {
    /// The eligible approver.
    pub approver_id: Uuid,
    /// Position within the rule's list.
    pub sequence: i32,
}

/// A company-configured approval rule.
///
/// Rules are matched by the expense's company-currency amount against the
/// inclusive `[min_amount, max_amount]` window; an unset bound is unbounded
/// on that side. Inactive rules never match.
#[derive(Debug, Clone)]
pub struct ApprovalRule {
    /// Unique identifier for the rule.
    pub id: Uuid,
    /// Human-readable name for the rule.
    pub name: String,
    /// How completion is evaluated for this rule.
    pub kind: RuleKind,
    /// Minimum amount for this rule to apply (inclusive, None = no minimum).
    pub min_amount: Option<Decimal>,
    /// Maximum amount for this rule to apply (inclusive, None = no maximum).
    pub max_amount: Option<Decimal>,
    /// Approval percentage threshold in [0, 100]
    /// (required for Percentage and Hybrid).
    pub percentage_required: Option<Decimal>,
    /// Designated approver (required for SpecificApprover and Hybrid).
    pub specific_approver_id: Option<Uuid>,
    /// Ordered approver list used by Percentage/Hybrid evaluation.
    pub approvers: Vec<RuleApprover>,
    /// Inactive rules are never selected.
    pub is_active: bool,
}

impl ApprovalRule {
    /// Returns true if this rule applies to an expense of the given
    /// company-currency amount.
    #[must_use]
    pub fn applies_to(&self, amount: Decimal) -> bool {
        if !self.is_active {
            return false;
        }
        let above_min = self.min_amount.is_none_or(|min| amount >= min);
        let below_max = self.max_amount.is_none_or(|max| amount <= max);
        above_min && below_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn rule(min: Option<Decimal>, max: Option<Decimal>, active: bool) -> ApprovalRule {
        ApprovalRule {
            id: Uuid::new_v4(),
            name: "Travel".to_string(),
            kind: RuleKind::Percentage,
            min_amount: min,
            max_amount: max,
            percentage_required: Some(dec!(50)),
            specific_approver_id: None,
            approvers: vec![],
            is_active: active,
        }
    }

    #[test]
    fn test_rule_kind_round_trip() {
        for kind in [
            RuleKind::SpecificApprover,
            RuleKind::Percentage,
            RuleKind::Hybrid,
        ] {
            assert_eq!(RuleKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(RuleKind::parse("sequential"), None);
    }

    #[rstest]
    #[case(dec!(100), true)] // exactly at min
    #[case(dec!(99.99), false)] // just below min
    #[case(dec!(1000), true)] // exactly at max
    #[case(dec!(1000.01), false)] // just above max
    #[case(dec!(500), true)]
    fn test_bounds_inclusive(#[case] amount: Decimal, #[case] expected: bool) {
        let r = rule(Some(dec!(100)), Some(dec!(1000)), true);
        assert_eq!(r.applies_to(amount), expected);
    }

    #[test]
    fn test_unset_bounds_unbounded() {
        let r = rule(None, None, true);
        assert!(r.applies_to(dec!(0)));
        assert!(r.applies_to(dec!(999999999)));

        let no_min = rule(None, Some(dec!(10)), true);
        assert!(no_min.applies_to(dec!(0.01)));
        assert!(!no_min.applies_to(dec!(10.01)));

        let no_max = rule(Some(dec!(10)), None, true);
        assert!(no_max.applies_to(dec!(999999999)));
        assert!(!no_max.applies_to(dec!(9.99)));
    }

    #[test]
    fn test_inactive_rule_never_applies() {
        let r = rule(None, None, false);
        assert!(!r.applies_to(dec!(500)));
    }
}
