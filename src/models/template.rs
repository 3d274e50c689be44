use serde::{Deserialize, Serialize};

use super::ExerciseId;

/// A named, focused workout proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub focus: String,
    pub exercises: Vec<ExerciseId>,
}

impl Template {
    /// Wraps a list of exercises, or `None` when there is nothing to wrap
    pub fn assemble(
        name: impl Into<String>,
        focus: impl Into<String>,
        exercises: Option<Vec<ExerciseId>>,
    ) -> Option<Self> {
        let exercises = exercises.filter(|ids| !ids.is_empty())?;

        Some(Self {
            name: name.into(),
            focus: focus.into(),
            exercises,
        })
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

/// Message returned when no generator produced anything
pub const NO_RECOMMENDATIONS_MESSAGE: &str = "No specific recommendations available at this time.";

/// Templates grouped by how they were produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    /// Content-based templates
    pub for_you: Vec<Template>,
    /// Collaborative templates
    pub community: Vec<Template>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RecommendationResult {
    pub fn new(for_you: Vec<Template>, community: Vec<Template>) -> Self {
        let message = (for_you.is_empty() && community.is_empty())
            .then(|| NO_RECOMMENDATIONS_MESSAGE.to_string());

        Self {
            for_you,
            community,
            message,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.for_you.is_empty() && self.community.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_wraps_ids_verbatim() {
        let template = Template::assemble(
            "Push Day",
            "Chest, Shoulders & Triceps",
            Some(vec![ExerciseId(3), ExerciseId(1)]),
        )
        .unwrap();

        assert_eq!(template.name, "Push Day");
        assert_eq!(template.exercises, vec![ExerciseId(3), ExerciseId(1)]);
    }

    #[test]
    fn test_assemble_rejects_empty_and_missing() {
        assert!(Template::assemble("Push Day", "Push", Some(vec![])).is_none());
        assert!(Template::assemble("Push Day", "Push", None).is_none());
    }

    #[test]
    fn test_empty_result_carries_message() {
        let result = RecommendationResult::new(vec![], vec![]);
        assert!(result.is_empty());
        assert_eq!(result.message.as_deref(), Some(NO_RECOMMENDATIONS_MESSAGE));
    }

    #[test]
    fn test_result_serialization_omits_message_when_present_templates() {
        let template = Template::assemble("Leg Day", "Legs", Some(vec![ExerciseId(9)])).unwrap();
        let result = RecommendationResult::new(vec![template], vec![]);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["for_you"][0]["exercises"][0], 9);
        assert_eq!(json["community"].as_array().unwrap().len(), 0);
        assert!(json.get("message").is_none());
    }
}
