use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use super::{Exercise, ExerciseId, Goal};

/// Identifier of a logged workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(pub i64);

/// One occurrence of an exercise inside a workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutExerciseLink {
    pub exercise_id: ExerciseId,
    pub workout_id: WorkoutId,
}

/// Workout history of a single user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserHistory {
    /// Exercise occurrences across the user's workouts
    pub workout_links: Vec<WorkoutExerciseLink>,
    /// Catalog details of every distinct exercise the user has performed
    pub done_exercises: Vec<Exercise>,
}

impl UserHistory {
    pub fn is_empty(&self) -> bool {
        self.workout_links.is_empty() && self.done_exercises.is_empty()
    }
}

/// Another user considered for collaborative aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerProfile {
    pub user_id: Uuid,
    pub goal: Option<Goal>,
}

/// Inclusive time range used to restrict peer workouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window covering the `days` days that end at `now`
    pub fn last_days(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: now - Duration::days(days),
            end: now,
        }
    }

    /// Both bounds are inclusive
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Request-scoped view of the user being recommended for
#[derive(Debug, Clone, PartialEq)]
pub struct UserContext {
    pub user_id: Uuid,
    pub goal: Option<Goal>,
    pub history: UserHistory,
    /// Exercises the user has already performed
    pub done: HashSet<ExerciseId>,
}

impl UserContext {
    /// Builds the context, deriving the done-set from both the workout links and
    /// the exercise details of the history.
    pub fn new(user_id: Uuid, goal: Option<Goal>, history: UserHistory) -> Self {
        let done = history
            .workout_links
            .iter()
            .map(|link| link.exercise_id)
            .chain(history.done_exercises.iter().map(|exercise| exercise.id))
            .collect();

        Self {
            user_id,
            goal,
            history,
            done,
        }
    }

    pub fn has_done(&self, exercise_id: &ExerciseId) -> bool {
        self.done.contains(exercise_id)
    }
}
