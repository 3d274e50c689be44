//! Per-archetype muscle-group quotas
//!
//! Every archetype has a baseline table used when the user has no (recognized)
//! goal, and one table per goal that replaces the baseline. The number of
//! exercises requested for a template is always the sum of the active table.

use serde::Serialize;

use crate::models::Goal;

/// Catch-all legs group, only kept when no goal refines the legs split
pub const LEGS_CATCH_ALL: &str = "Legs";

/// Fixed workout structures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    FullBody,
    Push,
    Pull,
    Legs,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::FullBody,
        Archetype::Push,
        Archetype::Pull,
        Archetype::Legs,
    ];

    pub fn template_name(&self) -> &'static str {
        match self {
            Archetype::FullBody => "Full Body Workout",
            Archetype::Push => "Push Day",
            Archetype::Pull => "Pull Day",
            Archetype::Legs => "Leg Day",
        }
    }

    pub fn focus(&self) -> &'static str {
        match self {
            Archetype::FullBody => "Full Body",
            Archetype::Push => "Chest, Shoulders & Triceps",
            Archetype::Pull => "Back & Biceps",
            Archetype::Legs => "Legs & Glutes",
        }
    }
}

type QuotaTable = &'static [(&'static str, usize)];

const FULL_BODY_BASELINE: QuotaTable = &[
    ("Chest", 1),
    ("Back", 1),
    ("Shoulders", 1),
    ("Biceps", 1),
    ("Triceps", 1),
    ("Legs", 2),
];
const PUSH_BASELINE: QuotaTable = &[("Chest", 2), ("Shoulders", 2), ("Triceps", 2)];
const PULL_BASELINE: QuotaTable = &[("Back", 3), ("Biceps", 2)];
const LEGS_BASELINE: QuotaTable = &[
    ("Quadriceps", 2),
    ("Hamstrings", 1),
    ("Glutes", 1),
    ("Calves", 1),
    ("Legs", 1),
];

const FULL_BODY_BUILD_MUSCLE: QuotaTable = &[
    ("Chest", 2),
    ("Back", 2),
    ("Shoulders", 1),
    ("Biceps", 1),
    ("Triceps", 1),
    ("Legs", 2),
];
const PUSH_BUILD_MUSCLE: QuotaTable = &[("Chest", 3), ("Shoulders", 2), ("Triceps", 2)];
const PULL_BUILD_MUSCLE: QuotaTable = &[("Back", 4), ("Biceps", 2)];
const LEGS_BUILD_MUSCLE: QuotaTable = &[
    ("Quadriceps", 2),
    ("Hamstrings", 2),
    ("Glutes", 2),
    ("Calves", 1),
    ("Legs", 1),
];

// Lose-weight keeps every group but shifts volume to large muscle groups.
const FULL_BODY_LOSE_WEIGHT: QuotaTable = &[
    ("Legs", 3),
    ("Back", 1),
    ("Chest", 1),
    ("Shoulders", 1),
    ("Biceps", 1),
    ("Triceps", 1),
];
const PUSH_LOSE_WEIGHT: QuotaTable = &[("Chest", 2), ("Shoulders", 1), ("Triceps", 1)];
const PULL_LOSE_WEIGHT: QuotaTable = &[("Back", 3), ("Biceps", 1)];
const LEGS_LOSE_WEIGHT: QuotaTable = &[
    ("Quadriceps", 2),
    ("Glutes", 2),
    ("Hamstrings", 1),
    ("Calves", 1),
    ("Legs", 1),
];

/// Desired exercise count for one muscle group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupQuota {
    pub group: &'static str,
    pub count: usize,
}

/// Ordered muscle-group quotas for one template request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetGroupQuota {
    groups: Vec<GroupQuota>,
}

impl TargetGroupQuota {
    pub fn from_table(table: &[(&'static str, usize)]) -> Self {
        Self {
            groups: table
                .iter()
                .map(|&(group, count)| GroupQuota { group, count })
                .collect(),
        }
    }

    /// Quotas in their defined order
    pub fn iter(&self) -> impl Iterator<Item = &GroupQuota> {
        self.groups.iter()
    }

    /// Number of exercises the quotas ask for
    pub fn total(&self) -> usize {
        self.groups.iter().map(|q| q.count).sum()
    }

    pub fn without(mut self, group: &str) -> Self {
        self.groups.retain(|q| q.group != group);
        self
    }
}

#[cfg(test)]
impl TargetGroupQuota {
    fn count_for(&self, group: &str) -> Option<usize> {
        self.groups.iter().find(|q| q.group == group).map(|q| q.count)
    }
}

fn table_for(archetype: Archetype, goal: Option<Goal>) -> QuotaTable {
    match (archetype, goal) {
        (Archetype::FullBody, Some(Goal::BuildMuscle)) => FULL_BODY_BUILD_MUSCLE,
        (Archetype::FullBody, Some(Goal::LoseWeight)) => FULL_BODY_LOSE_WEIGHT,
        (Archetype::FullBody, Some(Goal::GeneralFitness) | None) => FULL_BODY_BASELINE,

        (Archetype::Push, Some(Goal::BuildMuscle)) => PUSH_BUILD_MUSCLE,
        (Archetype::Push, Some(Goal::LoseWeight)) => PUSH_LOSE_WEIGHT,
        (Archetype::Push, Some(Goal::GeneralFitness) | None) => PUSH_BASELINE,

        (Archetype::Pull, Some(Goal::BuildMuscle)) => PULL_BUILD_MUSCLE,
        (Archetype::Pull, Some(Goal::LoseWeight)) => PULL_LOSE_WEIGHT,
        (Archetype::Pull, Some(Goal::GeneralFitness) | None) => PULL_BASELINE,

        (Archetype::Legs, Some(Goal::BuildMuscle)) => LEGS_BUILD_MUSCLE,
        (Archetype::Legs, Some(Goal::LoseWeight)) => LEGS_LOSE_WEIGHT,
        (Archetype::Legs, Some(Goal::GeneralFitness) | None) => LEGS_BASELINE,
    }
}

/// Quota mapping for an archetype and optional goal
///
/// Deterministic: identical inputs always produce identical mappings. For the
/// legs archetype the catch-all group is dropped whenever a goal is present.
pub fn allocate(archetype: Archetype, goal: Option<Goal>) -> TargetGroupQuota {
    let quota = TargetGroupQuota::from_table(table_for(archetype, goal));

    if archetype == Archetype::Legs && goal.is_some() {
        quota.without(LEGS_CATCH_ALL)
    } else {
        quota
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOALS: [Option<Goal>; 4] = [
        None,
        Some(Goal::BuildMuscle),
        Some(Goal::LoseWeight),
        Some(Goal::GeneralFitness),
    ];

    #[test]
    fn test_full_body_baseline_sums_to_seven() {
        let quota = allocate(Archetype::FullBody, None);
        assert_eq!(quota.total(), 7);
        assert_eq!(quota.count_for("Legs"), Some(2));
        assert_eq!(quota.count_for("Chest"), Some(1));
    }

    #[test]
    fn test_push_baseline_sums_to_six() {
        let quota = allocate(Archetype::Push, None);
        assert_eq!(quota.total(), 6);
        let groups: Vec<&str> = quota.iter().map(|q| q.group).collect();
        assert_eq!(groups, vec!["Chest", "Shoulders", "Triceps"]);
    }

    #[test]
    fn test_build_muscle_push_requests_more_than_baseline() {
        let baseline = allocate(Archetype::Push, None);
        let build = allocate(Archetype::Push, Some(Goal::BuildMuscle));
        assert!(build.total() > baseline.total());
    }

    #[test]
    fn test_legs_catch_all_kept_without_goal() {
        let quota = allocate(Archetype::Legs, None);
        assert_eq!(quota.count_for(LEGS_CATCH_ALL), Some(1));
    }

    #[test]
    fn test_legs_catch_all_dropped_with_any_goal() {
        for goal in [Goal::BuildMuscle, Goal::LoseWeight, Goal::GeneralFitness] {
            let quota = allocate(Archetype::Legs, Some(goal));
            assert_eq!(quota.count_for(LEGS_CATCH_ALL), None, "goal {:?}", goal);
        }
    }

    #[test]
    fn test_catch_all_only_dropped_for_legs() {
        let quota = allocate(Archetype::FullBody, Some(Goal::BuildMuscle));
        assert_eq!(quota.count_for(LEGS_CATCH_ALL), Some(2));
    }

    #[test]
    fn test_total_matches_active_mapping_after_removal() {
        let quota = allocate(Archetype::Legs, Some(Goal::BuildMuscle));
        let summed: usize = quota.iter().map(|q| q.count).sum();
        assert_eq!(quota.total(), summed);
        assert_eq!(quota.total(), 7);
    }

    #[test]
    fn test_allocation_is_deterministic() {
        for archetype in Archetype::ALL {
            for goal in GOALS {
                assert_eq!(allocate(archetype, goal), allocate(archetype, goal));
            }
        }
    }

    #[test]
    fn test_every_table_requests_something() {
        for archetype in Archetype::ALL {
            for goal in GOALS {
                assert!(allocate(archetype, goal).total() > 0);
            }
        }
    }
}
