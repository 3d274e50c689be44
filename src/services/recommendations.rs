use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::RngCore;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Exercise, RecommendationResult, Template, UserContext},
    services::{
        collaborative::CommunityGenerator, content::ArchetypeGenerator,
        favorite::FavoriteGroupGenerator, providers::WorkoutDataProvider, quotas::Archetype,
    },
};

/// Everything a generator may read while producing one template
pub struct GenerationContext<'a> {
    pub user: &'a UserContext,
    pub catalog: &'a [Exercise],
    pub provider: &'a dyn WorkoutDataProvider,
    pub now: DateTime<Utc>,
}

/// A source of one optional template
///
/// Generators never fail: anything that prevents a template resolves to `None`
/// and sibling generators are unaffected.
#[async_trait::async_trait]
pub trait TemplateGenerator: Send + Sync {
    /// Generator name for logging
    fn name(&self) -> String;

    async fn generate(
        &self,
        ctx: &GenerationContext<'_>,
        rng: &mut (dyn RngCore + Send),
    ) -> Option<Template>;
}

/// Builds both recommendation buckets for a user
///
/// Content-based generators fill "for_you", collaborative ones fill
/// "community". Generators are registered once and run for every request.
pub struct RecommendationService {
    provider: Arc<dyn WorkoutDataProvider>,
    content_generators: Vec<Box<dyn TemplateGenerator>>,
    community_generators: Vec<Box<dyn TemplateGenerator>>,
}

impl RecommendationService {
    /// Service with the standard generator registry
    pub fn new(provider: Arc<dyn WorkoutDataProvider>, community_template_size: usize) -> Self {
        let mut content_generators: Vec<Box<dyn TemplateGenerator>> = Archetype::ALL
            .into_iter()
            .map(|archetype| Box::new(ArchetypeGenerator::new(archetype)) as Box<dyn TemplateGenerator>)
            .collect();
        content_generators.push(Box::new(FavoriteGroupGenerator));

        let community_generators: Vec<Box<dyn TemplateGenerator>> = vec![
            Box::new(CommunityGenerator::all_time(community_template_size)),
            Box::new(CommunityGenerator::same_goal(community_template_size)),
            Box::new(CommunityGenerator::trending_week(community_template_size)),
            Box::new(CommunityGenerator::trending_month(community_template_size)),
        ];

        Self::with_generators(provider, content_generators, community_generators)
    }

    pub fn with_generators(
        provider: Arc<dyn WorkoutDataProvider>,
        content_generators: Vec<Box<dyn TemplateGenerator>>,
        community_generators: Vec<Box<dyn TemplateGenerator>>,
    ) -> Self {
        Self {
            provider,
            content_generators,
            community_generators,
        }
    }

    /// Loads the user's context and runs every generator
    ///
    /// Fails only when the exercise catalog is unavailable. Missing history or
    /// goal degrade to cold-start behaviour and baseline quotas.
    pub async fn recommend(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        rng: &mut (dyn RngCore + Send),
    ) -> AppResult<RecommendationResult> {
        let provider = self.provider.as_ref();

        let (catalog, history, goal) = tokio::join!(
            provider.fetch_catalog(),
            provider.fetch_user_history(user_id),
            provider.fetch_user_goal(user_id),
        );

        let catalog = catalog.unwrap_or_else(|e| {
            tracing::error!(error = %e, provider = provider.name(), "Failed to fetch exercise catalog");
            Vec::new()
        });

        if catalog.is_empty() {
            tracing::error!(user_id = %user_id, "Exercise catalog unavailable");
            return Err(AppError::DataUnavailable);
        }

        let history = history.unwrap_or_else(|e| {
            tracing::warn!(error = %e, user_id = %user_id, "Failed to fetch user history, using cold start");
            Default::default()
        });

        let goal = goal.unwrap_or_else(|e| {
            tracing::warn!(error = %e, user_id = %user_id, "Failed to fetch user goal, using baseline quotas");
            None
        });

        if history.is_empty() {
            tracing::info!(user_id = %user_id, "No workout history, cold start");
        }
        if goal.is_none() {
            tracing::info!(user_id = %user_id, "No goal set, using baseline quotas");
        }

        let user = UserContext::new(user_id, goal, history);
        let ctx = GenerationContext {
            user: &user,
            catalog: &catalog,
            provider,
            now,
        };

        let mut content_order: Vec<&Box<dyn TemplateGenerator>> =
            self.content_generators.iter().collect();
        content_order.shuffle(rng);

        let for_you = run_generators(content_order, &ctx, rng).await;
        let community = run_generators(self.community_generators.iter().collect(), &ctx, rng).await;

        tracing::info!(
            user_id = %user_id,
            catalog_size = catalog.len(),
            done = user.done.len(),
            goal = ?user.goal,
            for_you = for_you.len(),
            community = community.len(),
            "Recommendations generated"
        );

        Ok(RecommendationResult::new(for_you, community))
    }
}

async fn run_generators(
    generators: Vec<&Box<dyn TemplateGenerator>>,
    ctx: &GenerationContext<'_>,
    rng: &mut (dyn RngCore + Send),
) -> Vec<Template> {
    let mut templates = Vec::with_capacity(generators.len());

    for generator in generators {
        match generator.generate(ctx, rng).await {
            Some(template) => {
                tracing::debug!(
                    generator = %generator.name(),
                    exercises = template.len(),
                    "Generator produced a template"
                );
                templates.push(template);
            }
            None => {
                tracing::debug!(generator = %generator.name(), "Generator produced nothing");
            }
        }
    }

    templates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ExerciseId, Goal, MuscleGroups, PeerProfile, UserHistory, WorkoutExerciseLink, WorkoutId,
    };
    use crate::services::providers::MockWorkoutDataProvider;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

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

    fn catalog() -> Vec<Exercise> {
        let groups = [
            "Chest", "Back", "Shoulders", "Biceps", "Triceps", "Quadriceps", "Hamstrings",
            "Glutes", "Calves", "Legs",
        ];
        (1..=40)
            .map(|id| exercise(id, groups[(id as usize) % groups.len()]))
            .collect()
    }

    fn mock_provider(catalog: Vec<Exercise>) -> MockWorkoutDataProvider {
        let mut provider = MockWorkoutDataProvider::new();
        provider
            .expect_fetch_catalog()
            .returning(move || Ok(catalog.clone()));
        provider
            .expect_fetch_user_history()
            .returning(|_| Ok(UserHistory::default()));
        provider.expect_fetch_user_goal().returning(|_| Ok(None));
        provider.expect_fetch_peer_profiles().returning(|_| Ok(vec![]));
        provider.expect_name().return_const("mock");
        provider
    }

    #[tokio::test]
    async fn test_empty_catalog_is_fatal() {
        let provider = mock_provider(vec![]);
        let service = RecommendationService::new(Arc::new(provider), 6);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let result = service.recommend(Uuid::new_v4(), Utc::now(), &mut rng).await;
        assert!(matches!(result, Err(AppError::DataUnavailable)));
    }

    #[tokio::test]
    async fn test_catalog_fetch_error_is_fatal_even_with_history() {
        let mut provider = MockWorkoutDataProvider::new();
        provider
            .expect_fetch_catalog()
            .returning(|| Err(AppError::ExternalApi("down".to_string())));
        provider.expect_fetch_user_history().returning(|_| {
            Ok(UserHistory {
                workout_links: vec![WorkoutExerciseLink {
                    exercise_id: ExerciseId(1),
                    workout_id: WorkoutId(1),
                }],
                done_exercises: vec![],
            })
        });
        provider
            .expect_fetch_user_goal()
            .returning(|_| Ok(Some(Goal::BuildMuscle)));
        provider.expect_name().return_const("mock");

        let service = RecommendationService::new(Arc::new(provider), 6);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let result = service.recommend(Uuid::new_v4(), Utc::now(), &mut rng).await;
        assert!(matches!(result, Err(AppError::DataUnavailable)));
    }

    #[tokio::test]
    async fn test_cold_start_fills_both_buckets() {
        let provider = mock_provider(catalog());
        let service = RecommendationService::new(Arc::new(provider), 6);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let result = service
            .recommend(Uuid::new_v4(), Utc::now(), &mut rng)
            .await
            .unwrap();

        // Four archetypes; the favourite-group generator needs history.
        assert_eq!(result.for_you.len(), 4);
        let names: HashSet<&str> = result.for_you.iter().map(|t| t.name.as_str()).collect();
        for archetype in Archetype::ALL {
            assert!(names.contains(archetype.template_name()));
        }

        // No peers: every community generator except same-goal falls back to general picks.
        assert_eq!(result.community.len(), 3);
        for template in &result.community {
            assert_eq!(template.len(), 6);
        }
        assert!(result.message.is_none());
    }

    #[tokio::test]
    async fn test_history_and_goal_errors_degrade() {
        let mut provider = MockWorkoutDataProvider::new();
        let catalog = catalog();
        provider
            .expect_fetch_catalog()
            .returning(move || Ok(catalog.clone()));
        provider
            .expect_fetch_user_history()
            .returning(|_| Err(AppError::Internal("history".to_string())));
        provider
            .expect_fetch_user_goal()
            .returning(|_| Err(AppError::Internal("goal".to_string())));
        provider
            .expect_fetch_peer_profiles()
            .returning(|_| Err(AppError::Internal("peers".to_string())));
        provider.expect_name().return_const("mock");

        let service = RecommendationService::new(Arc::new(provider), 6);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let result = service
            .recommend(Uuid::new_v4(), Utc::now(), &mut rng)
            .await
            .unwrap();

        assert_eq!(result.for_you.len(), 4);
        let full_body = result
            .for_you
            .iter()
            .find(|t| t.name == Archetype::FullBody.template_name())
            .unwrap();
        assert_eq!(full_body.len(), 7);
    }

    #[tokio::test]
    async fn test_done_exercises_never_recommended() {
        let mut provider = MockWorkoutDataProvider::new();
        let catalog = catalog();
        let done: Vec<Exercise> = catalog.iter().take(10).cloned().collect();
        let done_ids: HashSet<ExerciseId> = done.iter().map(|e| e.id).collect();
        provider
            .expect_fetch_catalog()
            .returning(move || Ok(catalog.clone()));
        provider.expect_fetch_user_history().returning(move |_| {
            Ok(UserHistory {
                workout_links: vec![],
                done_exercises: done.clone(),
            })
        });
        provider
            .expect_fetch_user_goal()
            .returning(|_| Ok(Some(Goal::BuildMuscle)));
        provider.expect_fetch_peer_profiles().returning(|_| {
            Ok(vec![PeerProfile {
                user_id: Uuid::new_v4(),
                goal: Some(Goal::BuildMuscle),
            }])
        });
        provider
            .expect_fetch_cohort_workouts()
            .returning(|_, _| Ok(vec![WorkoutId(1)]));
        provider.expect_fetch_workout_exercise_links().returning(|_| {
            Ok((1..=12)
                .map(|id| WorkoutExerciseLink {
                    exercise_id: ExerciseId(id),
                    workout_id: WorkoutId(1),
                })
                .collect())
        });
        provider.expect_name().return_const("mock");

        let service = RecommendationService::new(Arc::new(provider), 6);

        for seed in 0..5 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let result = service
                .recommend(Uuid::new_v4(), Utc::now(), &mut rng)
                .await
                .unwrap();

            for template in result.for_you.iter().chain(result.community.iter()) {
                let unique: HashSet<_> = template.exercises.iter().collect();
                assert_eq!(unique.len(), template.len(), "{}", template.name);
                for id in &template.exercises {
                    assert!(!done_ids.contains(id), "{} contains done {}", template.name, id);
                }
            }
        }
    }

    struct Nothing;

    #[async_trait::async_trait]
    impl TemplateGenerator for Nothing {
        fn name(&self) -> String {
            "nothing".to_string()
        }

        async fn generate(
            &self,
            _ctx: &GenerationContext<'_>,
            _rng: &mut (dyn RngCore + Send),
        ) -> Option<Template> {
            None
        }
    }

    #[tokio::test]
    async fn test_all_generators_empty_is_success_with_message() {
        let provider = mock_provider(catalog());
        let service = RecommendationService::with_generators(
            Arc::new(provider),
            vec![Box::new(Nothing)],
            vec![Box::new(Nothing)],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let result = service
            .recommend(Uuid::new_v4(), Utc::now(), &mut rng)
            .await
            .unwrap();

        assert!(result.is_empty());
        assert!(result.message.is_some());
    }
}
