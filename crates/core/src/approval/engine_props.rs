//! Property-based tests for the workflow engine.
//!
//! These validate the planning and completion invariants over randomized
//! rule configurations and step states.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::approval::engine::WorkflowEngine;
use crate::approval::rules::{ApprovalRule, RuleApprover, RuleKind};
use crate::approval::types::{ApprovalStep, ExpenseStatus, PlannedStep};

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn arb_kind() -> impl Strategy<Value = RuleKind> {
    prop_oneof![
        Just(RuleKind::SpecificApprover),
        Just(RuleKind::Percentage),
        Just(RuleKind::Hybrid),
    ]
}

/// A rule with no amount window (always applicable) and a non-degenerate
/// percentage threshold.
fn arb_rule() -> impl Strategy<Value = ApprovalRule> {
    (arb_kind(), 1i64..=100i64, 1usize..6usize).prop_map(|(kind, required, n_approvers)| {
        let approvers: Vec<RuleApprover> = (0..n_approvers)
            .map(|i| RuleApprover {
                approver_id: Uuid::new_v4(),
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                sequence: (i + 1) as i32,
            })
            .collect();
        ApprovalRule {
            id: Uuid::new_v4(),
            name: "generated".to_string(),
            kind,
            min_amount: None,
            max_amount: None,
            percentage_required: Some(Decimal::from(required)),
            specific_approver_id: Some(Uuid::new_v4()),
            approvers,
            is_active: true,
        }
    })
}

fn pending_steps(plan: &[PlannedStep]) -> Vec<ApprovalStep> {
    plan.iter()
        .map(|p| ApprovalStep::pending(p.approver_id))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Building a workflow and evaluating it with zero actions taken never
    /// reports complete.
    #[test]
    fn prop_fresh_workflow_never_complete(
        rules in prop::collection::vec(arb_rule(), 0..4),
        amount in arb_amount(),
        has_manager in any::<bool>(),
    ) {
        let manager = has_manager.then(Uuid::new_v4);
        let plan = WorkflowEngine::plan_workflow(&rules, amount, manager);
        let steps = pending_steps(&plan);

        prop_assert!(!WorkflowEngine::is_complete(&rules, amount, &steps));
    }

    /// Planned sequences start at 1 and each rule's steps share one
    /// sequence number.
    #[test]
    fn prop_plan_sequences_group_by_rule(
        rules in prop::collection::vec(arb_rule(), 1..4),
        amount in arb_amount(),
    ) {
        let plan = WorkflowEngine::plan_workflow(&rules, amount, None);

        for step in &plan {
            prop_assert!(step.sequence >= 1);
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let max_seq = rules.len() as i32;
            prop_assert!(step.sequence <= max_seq);
        }

        // Within a sequence group, steps are contiguous in the plan.
        let mut seen = Vec::new();
        for step in &plan {
            if seen.last() != Some(&step.sequence) {
                prop_assert!(!seen.contains(&step.sequence));
                seen.push(step.sequence);
            }
        }
    }

    /// Approving more steps never un-completes a percentage workflow.
    #[test]
    fn prop_approvals_monotonic(
        required in 1i64..=100i64,
        n in 1usize..8usize,
    ) {
        let approvers: Vec<Uuid> = (0..n).map(|_| Uuid::new_v4()).collect();
        let rule = ApprovalRule {
            id: Uuid::new_v4(),
            name: "quorum".to_string(),
            kind: RuleKind::Percentage,
            min_amount: None,
            max_amount: None,
            percentage_required: Some(Decimal::from(required)),
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
        };
        let rules = vec![rule];
        let amount = Decimal::new(100, 0);

        let mut steps: Vec<ApprovalStep> =
            approvers.iter().map(|id| ApprovalStep::pending(*id)).collect();

        let mut was_complete = false;
        for i in 0..n {
            steps[i].status = ExpenseStatus::Approved;
            let complete = WorkflowEngine::is_complete(&rules, amount, &steps);

            // Once complete, adding approvals keeps it complete.
            prop_assert!(!was_complete || complete);
            was_complete = complete;

            // The threshold arithmetic is exact: k of n approved completes
            // iff k * 100 >= n * required.
            let k = i + 1;
            let expected = Decimal::from(k as u64) * Decimal::ONE_HUNDRED
                >= Decimal::from(n as u64) * Decimal::from(required);
            prop_assert_eq!(complete, expected);
        }

        // Unanimous approval always satisfies a <=100% threshold.
        prop_assert!(was_complete);
    }

    /// A specific-approver rule is insensitive to every other step's state.
    #[test]
    fn prop_specific_rule_independent_of_other_steps(
        other_statuses in prop::collection::vec(
            prop_oneof![
                Just(ExpenseStatus::Pending),
                Just(ExpenseStatus::Approved),
                Just(ExpenseStatus::Rejected),
            ],
            0..5,
        ),
        designated_approved in any::<bool>(),
    ) {
        let designated = Uuid::new_v4();
        let rule = ApprovalRule {
            id: Uuid::new_v4(),
            name: "sign-off".to_string(),
            kind: RuleKind::SpecificApprover,
            min_amount: None,
            max_amount: None,
            percentage_required: None,
            specific_approver_id: Some(designated),
            approvers: vec![],
            is_active: true,
        };
        let rules = vec![rule];
        let amount = Decimal::new(100, 0);

        let mut steps = vec![ApprovalStep {
            approver_id: designated,
            status: if designated_approved {
                ExpenseStatus::Approved
            } else {
                ExpenseStatus::Pending
            },
        }];
        steps.extend(other_statuses.iter().map(|s| ApprovalStep {
            approver_id: Uuid::new_v4(),
            status: *s,
        }));

        prop_assert_eq!(
            WorkflowEngine::is_complete(&rules, amount, &steps),
            designated_approved
        );
    }
}
