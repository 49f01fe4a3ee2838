//! Workflow planning and completion evaluation.
//!
//! The engine is stateless: callers load the company's active rules and the
//! expense's current steps, and the engine answers two questions:
//!
//! 1. Which approval steps does a new expense need? ([`WorkflowEngine::plan_workflow`])
//! 2. Do the resolved steps satisfy any applicable rule? ([`WorkflowEngine::is_complete`])

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::approval::rules::{ApprovalRule, RuleKind};
use crate::approval::types::{ApprovalStep, ExpenseStatus, PlannedStep};

/// Stateless engine for planning and evaluating approval workflows.
pub struct WorkflowEngine;

impl WorkflowEngine {
    /// Returns the rules applicable to an expense amount, in input order.
    #[must_use]
    pub fn applicable_rules(rules: &[ApprovalRule], amount: Decimal) -> Vec<&ApprovalRule> {
        rules.iter().filter(|r| r.applies_to(amount)).collect()
    }

    /// Plans the approval steps for a newly created expense.
    ///
    /// Each applicable rule is assigned the next sequence number, in the
    /// order the rules were given:
    ///
    /// - `SpecificApprover` produces one step for the designated approver.
    /// - `Percentage` and `Hybrid` produce one step per listed approver,
    ///   all sharing the rule's sequence number.
    ///
    /// When no rule applies, the workflow falls back to a single step for
    /// the submitter's direct manager. A submitter with no manager yields an
    /// empty plan: the expense stays pending with nobody to act on it, which
    /// the caller is expected to log as a configuration gap.
    #[must_use]
    pub fn plan_workflow(
        rules: &[ApprovalRule],
        amount: Decimal,
        manager_id: Option<Uuid>,
    ) -> Vec<PlannedStep> {
        let applicable = Self::applicable_rules(rules, amount);

        if applicable.is_empty() {
            return manager_id
                .map(|approver_id| {
                    vec![PlannedStep {
                        approver_id,
                        sequence: 1,
                    }]
                })
                .unwrap_or_default();
        }

        let mut steps = Vec::new();
        for (idx, rule) in applicable.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let sequence = (idx + 1) as i32;

            match rule.kind {
                RuleKind::SpecificApprover => {
                    if let Some(approver_id) = rule.specific_approver_id {
                        steps.push(PlannedStep {
                            approver_id,
                            sequence,
                        });
                    }
                }
                RuleKind::Percentage | RuleKind::Hybrid => {
                    steps.extend(rule.approvers.iter().map(|ra| PlannedStep {
                        approver_id: ra.approver_id,
                        sequence,
                    }));
                }
            }
        }
        steps
    }

    /// Evaluates whether an expense's approvals are complete.
    ///
    /// The applicable rule set is re-derived from the amount; evaluation is
    /// always rule-driven, independent of which rule originally produced
    /// which step.
    ///
    /// With no applicable rule (default workflow) every step must be
    /// Approved; the empty step list is never complete. With applicable
    /// rules, completion is the OR over each rule's own condition.
    #[must_use]
    pub fn is_complete(rules: &[ApprovalRule], amount: Decimal, steps: &[ApprovalStep]) -> bool {
        let applicable = Self::applicable_rules(rules, amount);

        if applicable.is_empty() {
            return !steps.is_empty()
                && steps.iter().all(|s| s.status == ExpenseStatus::Approved);
        }

        applicable.iter().any(|rule| Self::rule_satisfied(rule, steps))
    }

    /// Evaluates a single rule's completion condition against the steps.
    fn rule_satisfied(rule: &ApprovalRule, steps: &[ApprovalStep]) -> bool {
        match rule.kind {
            RuleKind::SpecificApprover => {
                Self::specific_satisfied(rule.specific_approver_id, steps)
            }
            RuleKind::Percentage => Self::percentage_satisfied(rule, steps),
            RuleKind::Hybrid => {
                Self::specific_satisfied(rule.specific_approver_id, steps)
                    || Self::percentage_satisfied(rule, steps)
            }
        }
    }

    /// Satisfied iff the designated approver's step exists and is Approved.
    fn specific_satisfied(specific_approver_id: Option<Uuid>, steps: &[ApprovalStep]) -> bool {
        let Some(approver_id) = specific_approver_id else {
            return false;
        };
        steps
            .iter()
            .any(|s| s.approver_id == approver_id && s.status == ExpenseStatus::Approved)
    }

    /// Satisfied iff the approved share of the rule's listed approvers meets
    /// the threshold. An empty matching set is never satisfied (no vacuous
    /// pass, no division by zero).
    fn percentage_satisfied(rule: &ApprovalRule, steps: &[ApprovalStep]) -> bool {
        let Some(required) = rule.percentage_required else {
            return false;
        };

        let matching: Vec<&ApprovalStep> = steps
            .iter()
            .filter(|s| rule.approvers.iter().any(|ra| ra.approver_id == s.approver_id))
            .collect();

        if matching.is_empty() {
            return false;
        }

        let approved = matching
            .iter()
            .filter(|s| s.status == ExpenseStatus::Approved)
            .count();

        let approved = Decimal::from(approved as u64);
        let total = Decimal::from(matching.len() as u64);

        approved * Decimal::ONE_HUNDRED / total >= required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approval::rules::RuleApprover;
    use rust_decimal_macros::dec;

    fn specific_rule(approver: Uuid) -> ApprovalRule {
        ApprovalRule {
            id: Uuid::new_v4(),
            name: "CFO sign-off".to_string(),
            kind: RuleKind::SpecificApprover,
            min_amount: None,
            max_amount: None,
            percentage_required: None,
            specific_approver_id: Some(approver),
            approvers: vec![],
            is_active: true,
        }
    }

    fn percentage_rule(required: Decimal, approvers: &[Uuid]) -> ApprovalRule {
        ApprovalRule {
            id: Uuid::new_v4(),
            name: "Finance quorum".to_string(),
            kind: RuleKind::Percentage,
            min_amount: None,
            max_amount: None,
            percentage_required: Some(required),
            specific_approver_id: None,
            approvers: approvers
                .iter()
                .enumerate()
                .map(|(i, id)| RuleApprover {
                    approver_id: *id,
                    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                    sequence: (i + 1) as i32,
                })
                .collect(),
            is_active: true,
        }
    }

    fn hybrid_rule(specific: Uuid, required: Decimal, approvers: &[Uuid]) -> ApprovalRule {
        let mut rule = percentage_rule(required, approvers);
        rule.kind = RuleKind::Hybrid;
        rule.specific_approver_id = Some(specific);
        rule
    }

    // ------------------------------------------------------------------
    // Planning
    // ------------------------------------------------------------------

    #[test]
    fn test_no_rule_with_manager_plans_single_step() {
        let manager = Uuid::new_v4();
        let plan = WorkflowEngine::plan_workflow(&[], dec!(100), Some(manager));

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].approver_id, manager);
        assert_eq!(plan[0].sequence, 1);
    }

    #[test]
    fn test_no_rule_no_manager_plans_nothing() {
        let plan = WorkflowEngine::plan_workflow(&[], dec!(100), None);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_specific_rule_plans_one_step() {
        let approver = Uuid::new_v4();
        let plan = WorkflowEngine::plan_workflow(&[specific_rule(approver)], dec!(100), None);

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].approver_id, approver);
        assert_eq!(plan[0].sequence, 1);
    }

    #[test]
    fn test_percentage_rule_plans_step_per_approver_same_sequence() {
        let approvers = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let plan =
            WorkflowEngine::plan_workflow(&[percentage_rule(dec!(50), &approvers)], dec!(100), None);

        assert_eq!(plan.len(), 3);
        assert!(plan.iter().all(|s| s.sequence == 1));
    }

    #[test]
    fn test_hybrid_rule_plans_like_percentage() {
        let specific = Uuid::new_v4();
        let approvers = [Uuid::new_v4(), Uuid::new_v4()];
        let plan = WorkflowEngine::plan_workflow(
            &[hybrid_rule(specific, dec!(50), &approvers)],
            dec!(100),
            None,
        );

        // No separate step for the specific approver unless also listed.
        assert_eq!(plan.len(), 2);
        assert!(plan.iter().all(|s| s.approver_id != specific));
    }

    #[test]
    fn test_multiple_rules_get_increasing_sequences() {
        let a = Uuid::new_v4();
        let quorum = [Uuid::new_v4(), Uuid::new_v4()];
        let rules = vec![specific_rule(a), percentage_rule(dec!(100), &quorum)];

        let plan = WorkflowEngine::plan_workflow(&rules, dec!(100), None);

        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].sequence, 1);
        assert_eq!(plan[1].sequence, 2);
        assert_eq!(plan[2].sequence, 2);
    }

    #[test]
    fn test_rule_applies_beats_manager_fallback() {
        let manager = Uuid::new_v4();
        let approver = Uuid::new_v4();
        let plan =
            WorkflowEngine::plan_workflow(&[specific_rule(approver)], dec!(100), Some(manager));

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].approver_id, approver);
    }

    #[test]
    fn test_out_of_window_rule_falls_back_to_manager() {
        let manager = Uuid::new_v4();
        let mut rule = specific_rule(Uuid::new_v4());
        rule.min_amount = Some(dec!(1000));

        let plan = WorkflowEngine::plan_workflow(&[rule], dec!(500), Some(manager));

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].approver_id, manager);
    }

    // ------------------------------------------------------------------
    // Completion: default workflow
    // ------------------------------------------------------------------

    #[test]
    fn test_default_workflow_complete_when_all_approved() {
        let manager = Uuid::new_v4();

        let pending = [ApprovalStep::pending(manager)];
        assert!(!WorkflowEngine::is_complete(&[], dec!(100), &pending));

        let approved = [ApprovalStep::approved(manager)];
        assert!(WorkflowEngine::is_complete(&[], dec!(100), &approved));
    }

    #[test]
    fn test_empty_step_list_is_never_complete() {
        assert!(!WorkflowEngine::is_complete(&[], dec!(100), &[]));
    }

    // ------------------------------------------------------------------
    // Completion: specific approver
    // ------------------------------------------------------------------

    #[test]
    fn test_specific_complete_iff_designated_approver_approved() {
        let designated = Uuid::new_v4();
        let other = Uuid::new_v4();
        let rules = vec![specific_rule(designated)];

        // Another approver's decision is irrelevant.
        let steps = [
            ApprovalStep::pending(designated),
            ApprovalStep::approved(other),
        ];
        assert!(!WorkflowEngine::is_complete(&rules, dec!(100), &steps));

        let steps = [
            ApprovalStep::approved(designated),
            ApprovalStep::pending(other),
        ];
        assert!(WorkflowEngine::is_complete(&rules, dec!(100), &steps));
    }

    #[test]
    fn test_specific_rejection_does_not_complete() {
        let designated = Uuid::new_v4();
        let rules = vec![specific_rule(designated)];
        let steps = [ApprovalStep {
            approver_id: designated,
            status: ExpenseStatus::Rejected,
        }];
        assert!(!WorkflowEngine::is_complete(&rules, dec!(100), &steps));
    }

    // ------------------------------------------------------------------
    // Completion: percentage
    // ------------------------------------------------------------------

    #[test]
    fn test_percentage_60_of_5_completes_at_third_approval() {
        let approvers: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let rules = vec![percentage_rule(dec!(60), &approvers)];

        let mut steps: Vec<ApprovalStep> =
            approvers.iter().map(|id| ApprovalStep::pending(*id)).collect();

        // 1/5 = 20%, 2/5 = 40%: not complete.
        steps[0].status = ExpenseStatus::Approved;
        assert!(!WorkflowEngine::is_complete(&rules, dec!(100), &steps));
        steps[1].status = ExpenseStatus::Approved;
        assert!(!WorkflowEngine::is_complete(&rules, dec!(100), &steps));

        // 3/5 = 60% >= 60%: complete.
        steps[2].status = ExpenseStatus::Approved;
        assert!(WorkflowEngine::is_complete(&rules, dec!(100), &steps));
    }

    #[test]
    fn test_percentage_ignores_unlisted_approvers() {
        let listed = [Uuid::new_v4(), Uuid::new_v4()];
        let rules = vec![percentage_rule(dec!(100), &listed)];

        // Outsider approvals never count toward the threshold.
        let steps = [
            ApprovalStep::approved(Uuid::new_v4()),
            ApprovalStep::approved(Uuid::new_v4()),
            ApprovalStep::pending(listed[0]),
            ApprovalStep::pending(listed[1]),
        ];
        assert!(!WorkflowEngine::is_complete(&rules, dec!(100), &steps));
    }

    #[test]
    fn test_percentage_empty_matching_set_not_satisfied() {
        let rules = vec![percentage_rule(dec!(0), &[Uuid::new_v4()])];
        // Steps exist but none belongs to the rule's approver list.
        let steps = [ApprovalStep::approved(Uuid::new_v4())];
        assert!(!WorkflowEngine::is_complete(&rules, dec!(100), &steps));
    }

    // ------------------------------------------------------------------
    // Completion: hybrid
    // ------------------------------------------------------------------

    #[test]
    fn test_hybrid_specific_alone_completes() {
        let x = Uuid::new_v4();
        let y = Uuid::new_v4();
        let z = Uuid::new_v4();
        let rules = vec![hybrid_rule(x, dec!(50), &[x, y, z])];

        // Only X approved: 1/3 = 33% < 50%, but the specific condition holds.
        let steps = [
            ApprovalStep::approved(x),
            ApprovalStep::pending(y),
            ApprovalStep::pending(z),
        ];
        assert!(WorkflowEngine::is_complete(&rules, dec!(100), &steps));
    }

    #[test]
    fn test_hybrid_percentage_alone_completes() {
        let x = Uuid::new_v4();
        let y = Uuid::new_v4();
        let z = Uuid::new_v4();
        let rules = vec![hybrid_rule(x, dec!(50), &[x, y, z])];

        // Y and Z approved without X: 2/3 = 66% >= 50%.
        let steps = [
            ApprovalStep::pending(x),
            ApprovalStep::approved(y),
            ApprovalStep::approved(z),
        ];
        assert!(WorkflowEngine::is_complete(&rules, dec!(100), &steps));
    }

    #[test]
    fn test_hybrid_neither_condition_not_complete() {
        let x = Uuid::new_v4();
        let y = Uuid::new_v4();
        let z = Uuid::new_v4();
        let rules = vec![hybrid_rule(x, dec!(50), &[x, y, z])];

        let steps = [
            ApprovalStep::pending(x),
            ApprovalStep::approved(y),
            ApprovalStep::pending(z),
        ];
        assert!(!WorkflowEngine::is_complete(&rules, dec!(100), &steps));
    }

    // ------------------------------------------------------------------
    // Rule OR-combination
    // ------------------------------------------------------------------

    #[test]
    fn test_any_satisfied_rule_completes() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let rules = vec![specific_rule(a), specific_rule(b)];

        let steps = [ApprovalStep::pending(a), ApprovalStep::approved(b)];
        assert!(WorkflowEngine::is_complete(&rules, dec!(100), &steps));
    }

    #[test]
    fn test_evaluation_reselects_rules_by_amount() {
        let approver = Uuid::new_v4();
        let mut rule = specific_rule(approver);
        rule.max_amount = Some(dec!(100));

        let steps = [ApprovalStep::approved(approver)];

        // In-window: the rule drives completion.
        assert!(WorkflowEngine::is_complete(std::slice::from_ref(&rule), dec!(100), &steps));

        // Out-of-window: default semantics take over (all approved => complete).
        assert!(WorkflowEngine::is_complete(std::slice::from_ref(&rule), dec!(200), &steps));
    }
}
