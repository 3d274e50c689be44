use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifier of a catalog exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(pub i64);

impl Display for ExerciseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Muscle annotation of an exercise
///
/// Stored either as one label or as an ordered list where the first entry is
/// the primary muscle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MuscleGroups {
    Single(String),
    Many(Vec<String>),
}

impl MuscleGroups {
    /// Primary muscle label, if any
    pub fn primary(&self) -> Option<&str> {
        match self {
            MuscleGroups::Single(label) => Some(label.as_str()),
            MuscleGroups::Many(labels) => labels.first().map(String::as_str),
        }
    }
}

/// Catalog exercise (read-only reference data)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    #[serde(default)]
    pub muscle_group: Option<MuscleGroups>,
    #[serde(default, rename = "equipment_required")]
    pub equipment: Option<String>,
    #[serde(default, rename = "type")]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl Exercise {
    /// Exercises without a muscle annotation never enter a selection pool
    pub fn has_muscle_annotation(&self) -> bool {
        self.muscle_group.is_some()
    }
}
