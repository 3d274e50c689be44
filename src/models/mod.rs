mod exercise;
mod goal;
mod template;
mod user;

pub use exercise::{Exercise, ExerciseId, MuscleGroups};
pub use goal::Goal;
pub use template::{RecommendationResult, Template, NO_RECOMMENDATIONS_MESSAGE};
pub use user::{
    PeerProfile, TimeWindow, UserContext, UserHistory, WorkoutExerciseLink, WorkoutId,
};
