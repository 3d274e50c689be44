use rand::RngCore;
use std::collections::HashMap;

use crate::{
    models::{Exercise, Template, UserContext},
    services::{
        matcher::targets,
        recommendations::{GenerationContext, TemplateGenerator},
    },
};

const FAVORITE_GROUP_LIMIT: usize = 10;
const FALLBACK_LIMIT: usize = 5;

/// Most frequent primary muscle across the user's performed exercises
///
/// Ties go to the label that reached the winning count first in history order.
pub fn favorite_group(done_exercises: &[Exercise]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut best: Option<(&str, usize)> = None;

    for label in done_exercises
        .iter()
        .filter_map(|e| e.muscle_group.as_ref().and_then(|m| m.primary()))
    {
        let count = counts.entry(label).or_insert(0);
        *count += 1;

        if best.map_or(true, |(_, top)| *count > top) {
            best = Some((label, *count));
        }
    }

    best.map(|(label, _)| label.to_string())
}

/// "More of what you train" template
///
/// Recommends unperformed exercises for the user's favourite muscle group in
/// catalog order. When the user has already done all of them, the first few
/// unperformed catalog exercises are suggested instead.
pub fn generate_favorite_template(user: &UserContext, catalog: &[Exercise]) -> Option<Template> {
    let group = favorite_group(&user.history.done_exercises)?;
    tracing::debug!(user_id = %user.user_id, group = %group, "Favourite muscle group");

    let matching: Vec<_> = catalog
        .iter()
        .filter(|e| !user.has_done(&e.id) && targets(e.muscle_group.as_ref(), &group))
        .map(|e| e.id)
        .take(FAVORITE_GROUP_LIMIT)
        .collect();

    if !matching.is_empty() {
        return Template::assemble(format!("More {}", group), group, Some(matching));
    }

    tracing::info!(
        user_id = %user.user_id,
        group = %group,
        "All exercises for favourite group done, suggesting general picks"
    );

    let fallback: Vec<_> = catalog
        .iter()
        .filter(|e| !user.has_done(&e.id))
        .map(|e| e.id)
        .take(FALLBACK_LIMIT)
        .collect();

    Template::assemble(format!("More {}", group), "General Picks", Some(fallback))
}

/// Content-based generator built on the user's favourite muscle group
pub struct FavoriteGroupGenerator;

#[async_trait::async_trait]
impl TemplateGenerator for FavoriteGroupGenerator {
    fn name(&self) -> String {
        "FavoriteGroup".to_string()
    }

    async fn generate(
        &self,
        ctx: &GenerationContext<'_>,
        _rng: &mut (dyn RngCore + Send),
    ) -> Option<Template> {
        generate_favorite_template(ctx.user, ctx.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseId, MuscleGroups, UserHistory};
    use uuid::Uuid;

    fn exercise(id: i64, muscle: &str) -> Exercise {
        Exercise {
            id: ExerciseId(id),
            name: format!("Exercise {}", id),
            muscle_group: Some(MuscleGroups::Single(muscle.to_string())),
            equipment: None,
            category: None,
            difficulty: None,
        }
    }

    fn user_with_done(done: Vec<Exercise>) -> UserContext {
        UserContext::new(
            Uuid::new_v4(),
            None,
            UserHistory {
                workout_links: vec![],
                done_exercises: done,
            },
        )
    }

    #[test]
    fn test_favorite_group_most_frequent() {
        let done = vec![
            exercise(1, "Back"),
            exercise(2, "Chest"),
            exercise(3, "Chest"),
        ];
        assert_eq!(favorite_group(&done).as_deref(), Some("Chest"));
    }

    #[test]
    fn test_favorite_group_tie_goes_to_first_to_lead() {
        let done = vec![
            exercise(1, "Back"),
            exercise(2, "Chest"),
            exercise(3, "Chest"),
            exercise(4, "Back"),
        ];
        assert_eq!(favorite_group(&done).as_deref(), Some("Chest"));
    }

    #[test]
    fn test_favorite_group_ignores_unannotated() {
        let mut unannotated = exercise(1, "Chest");
        unannotated.muscle_group = None;
        assert_eq!(favorite_group(&[unannotated]), None);
        assert_eq!(favorite_group(&[]), None);
    }

    #[test]
    fn test_recommends_unperformed_exercises_for_group() {
        let catalog = vec![
            exercise(1, "Chest"),
            exercise(2, "Chest"),
            exercise(3, "Back"),
            exercise(4, "Upper Chest"),
        ];
        let user = user_with_done(vec![catalog[0].clone()]);

        let template = generate_favorite_template(&user, &catalog).unwrap();
        assert_eq!(template.name, "More Chest");
        assert_eq!(template.focus, "Chest");
        assert_eq!(template.exercises, vec![ExerciseId(2), ExerciseId(4)]);
    }

    #[test]
    fn test_caps_at_ten() {
        let catalog: Vec<Exercise> = (1..=15).map(|id| exercise(id, "Back")).collect();
        let user = user_with_done(vec![catalog[0].clone()]);

        let template = generate_favorite_template(&user, &catalog).unwrap();
        assert_eq!(template.len(), 10);
        assert_eq!(template.exercises[0], ExerciseId(2));
    }

    #[test]
    fn test_falls_back_when_group_exhausted() {
        let catalog = vec![
            exercise(1, "Chest"),
            exercise(2, "Back"),
            exercise(3, "Legs"),
        ];
        let user = user_with_done(vec![catalog[0].clone()]);

        let template = generate_favorite_template(&user, &catalog).unwrap();
        assert_eq!(template.focus, "General Picks");
        assert_eq!(template.exercises, vec![ExerciseId(2), ExerciseId(3)]);
    }

    #[test]
    fn test_no_history_no_template() {
        let catalog = vec![exercise(1, "Chest")];
        let user = user_with_done(vec![]);
        assert!(generate_favorite_template(&user, &catalog).is_none());
    }

    #[test]
    fn test_everything_done_no_template() {
        let catalog = vec![exercise(1, "Chest")];
        let user = user_with_done(catalog.clone());
        assert!(generate_favorite_template(&user, &catalog).is_none());
    }
}
