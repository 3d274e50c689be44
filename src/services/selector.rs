use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::{
    models::{Exercise, ExerciseId},
    services::{matcher::targets, quotas::TargetGroupQuota},
};

/// Picks exercises that satisfy the quotas
///
/// Quotas are served in their defined order, each drawing uniformly without
/// replacement from matching exercises that are not yet selected. Any shortfall
/// against `target_count` is filled at random from the rest of the pool, and the
/// selection is shuffled and truncated to `target_count`.
///
/// Returns `None` when nothing at all could be selected. A pool too small for
/// the target yields a shorter list rather than an error.
pub fn select_exercises<R: Rng + ?Sized>(
    quota: &TargetGroupQuota,
    pool: &[Exercise],
    exclude: &HashSet<ExerciseId>,
    target_count: usize,
    rng: &mut R,
) -> Option<Vec<ExerciseId>> {
    let mut seen = HashSet::new();
    let candidates: Vec<&Exercise> = pool
        .iter()
        .filter(|e| e.has_muscle_annotation() && !exclude.contains(&e.id))
        .filter(|e| seen.insert(e.id))
        .collect();

    let mut selected: Vec<ExerciseId> = Vec::with_capacity(target_count);
    let mut chosen: HashSet<ExerciseId> = HashSet::new();

    for group_quota in quota.iter() {
        let matching: Vec<ExerciseId> = candidates
            .iter()
            .filter(|e| !chosen.contains(&e.id) && targets(e.muscle_group.as_ref(), group_quota.group))
            .map(|e| e.id)
            .collect();

        if matching.is_empty() {
            tracing::debug!(group = group_quota.group, "No candidates for muscle group");
            continue;
        }

        let take = group_quota.count.min(matching.len());
        for id in matching.choose_multiple(rng, take) {
            chosen.insert(*id);
            selected.push(*id);
        }
    }

    if selected.len() < target_count {
        let remaining: Vec<ExerciseId> = candidates
            .iter()
            .map(|e| e.id)
            .filter(|id| !chosen.contains(id))
            .collect();
        let shortfall = target_count - selected.len();

        if remaining.len() < shortfall {
            tracing::debug!(
                shortfall,
                available = remaining.len(),
                "Pool exhausted while filling selection"
            );
        }

        for id in remaining.choose_multiple(rng, shortfall) {
            chosen.insert(*id);
            selected.push(*id);
        }
    }

    if selected.is_empty() {
        return None;
    }

    selected.shuffle(rng);
    selected.truncate(target_count);
    Some(selected)
}
