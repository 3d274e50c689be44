use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    models::{ExerciseId, Goal, TimeWindow, WorkoutExerciseLink},
    services::providers::WorkoutDataProvider,
};

/// Occurrence counts of exercises across a cohort's workouts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerFrequency {
    counts: HashMap<ExerciseId, usize>,
}

impl PeerFrequency {
    /// Tallies links; the same exercise twice in one workout counts twice
    pub fn from_links(links: &[WorkoutExerciseLink]) -> Self {
        let mut counts = HashMap::new();
        for link in links {
            *counts.entry(link.exercise_id).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn retain<F: FnMut(&ExerciseId) -> bool>(&mut self, mut keep: F) {
        self.counts.retain(|id, _| keep(id));
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Exercises by descending count
    ///
    /// Equal counts are ordered by identifier only to keep output stable.
    pub fn ranked(&self) -> Vec<(ExerciseId, usize)> {
        let mut ranked: Vec<(ExerciseId, usize)> =
            self.counts.iter().map(|(id, count)| (*id, *count)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

#[cfg(test)]
impl PeerFrequency {
    fn get(&self, exercise_id: &ExerciseId) -> usize {
        self.counts.get(exercise_id).copied().unwrap_or(0)
    }
}

impl FromIterator<(ExerciseId, usize)> for PeerFrequency {
    fn from_iter<I: IntoIterator<Item = (ExerciseId, usize)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Counts how often each exercise appears in other users' workouts
///
/// The cohort is every user except `exclude_user_id`, narrowed to users
/// sharing `goal` when one is given. `window` restricts workouts to an
/// inclusive time range. Any fetch failure yields an empty map.
pub async fn aggregate(
    provider: &dyn WorkoutDataProvider,
    exclude_user_id: Uuid,
    goal: Option<Goal>,
    window: Option<TimeWindow>,
) -> PeerFrequency {
    let peers = match provider.fetch_peer_profiles(exclude_user_id).await {
        Ok(peers) => peers,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch peer profiles");
            return PeerFrequency::default();
        }
    };

    let cohort: Vec<Uuid> = peers
        .into_iter()
        .filter(|peer| peer.user_id != exclude_user_id)
        .filter(|peer| goal.is_none() || peer.goal == goal)
        .map(|peer| peer.user_id)
        .collect();

    if cohort.is_empty() {
        tracing::info!(goal = ?goal, "Empty peer cohort");
        return PeerFrequency::default();
    }

    let workouts = match provider.fetch_cohort_workouts(&cohort, window).await {
        Ok(workouts) => workouts,
        Err(e) => {
            tracing::warn!(error = %e, cohort = cohort.len(), "Failed to fetch cohort workouts");
            return PeerFrequency::default();
        }
    };

    if workouts.is_empty() {
        tracing::info!(
            cohort = cohort.len(),
            windowed = window.is_some(),
            "No peer workouts found"
        );
        return PeerFrequency::default();
    }

    let links = match provider.fetch_workout_exercise_links(&workouts).await {
        Ok(links) => links,
        Err(e) => {
            tracing::warn!(error = %e, workouts = workouts.len(), "Failed to fetch workout exercises");
            return PeerFrequency::default();
        }
    };

    let frequency = PeerFrequency::from_links(&links);

    tracing::debug!(
        cohort = cohort.len(),
        workouts = workouts.len(),
        exercises = frequency.len(),
        "Peer frequency aggregated"
    );

    frequency
}
