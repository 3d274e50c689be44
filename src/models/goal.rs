use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Fitness goal stated by a user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    BuildMuscle,
    LoseWeight,
    GeneralFitness,
}

impl Goal {
    /// Parses a stored goal label
    ///
    /// Matching ignores case and treats spaces, hyphens and underscores alike, so
    /// "Build Muscle", "build-muscle" and "build_muscle" are the same goal.
    /// Unrecognized labels yield `None` and behave like an absent goal.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized: String = label
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "build_muscle" => Some(Goal::BuildMuscle),
            "lose_weight" => Some(Goal::LoseWeight),
            "general_fitness" => Some(Goal::GeneralFitness),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::BuildMuscle => "build_muscle",
            Goal::LoseWeight => "lose_weight",
            Goal::GeneralFitness => "general_fitness",
        }
    }
}

impl Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
