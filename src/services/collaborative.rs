use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::collections::HashSet;

use crate::{
    models::{Exercise, ExerciseId, Template, TimeWindow, UserContext},
    services::{
        peer_frequency::{aggregate, PeerFrequency},
        recommendations::{GenerationContext, TemplateGenerator},
    },
};

pub const RANKED_FOCUS: &str = "Popular in the community";
pub const MIXED_FOCUS: &str = "Community favorites + variety";
pub const FALLBACK_FOCUS: &str = "General Picks";

/// Ranks peer favourites into a template
///
/// Exercises the user has done, or that are missing from the catalog, are
/// dropped first. With no peer signal left the template is a random sample of
/// unperformed catalog exercises; with too little signal the ranked list is
/// topped up with random fillers. Each case is labelled differently.
pub fn recommend<R: Rng + ?Sized>(
    user: &UserContext,
    catalog: &[Exercise],
    mut frequency: PeerFrequency,
    target_count: usize,
    name_prefix: &str,
    rng: &mut R,
) -> Option<Template> {
    let catalog_ids: HashSet<ExerciseId> = catalog.iter().map(|e| e.id).collect();
    frequency.retain(|id| !user.has_done(id) && catalog_ids.contains(id));

    if frequency.is_empty() {
        let available = unperformed(catalog, user, &HashSet::new());
        if available.is_empty() {
            tracing::info!(user_id = %user.user_id, "Nothing left to recommend from the catalog");
            return None;
        }

        tracing::debug!(
            user_id = %user.user_id,
            template = %name_prefix,
            "No peer signal, falling back to random picks"
        );

        let picks: Vec<ExerciseId> = available
            .choose_multiple(rng, target_count)
            .copied()
            .collect();

        return Template::assemble(
            format!("{} (General Picks)", name_prefix),
            FALLBACK_FOCUS,
            Some(picks),
        );
    }

    let mut selected: Vec<ExerciseId> = frequency
        .ranked()
        .into_iter()
        .take(target_count)
        .map(|(id, _)| id)
        .collect();

    if selected.len() >= target_count {
        return Template::assemble(name_prefix, RANKED_FOCUS, Some(selected));
    }

    let taken: HashSet<ExerciseId> = selected.iter().copied().collect();
    let fillers = unperformed(catalog, user, &taken);

    if fillers.is_empty() {
        tracing::debug!(ranked = selected.len(), "No fillers left, keeping short ranked list");
        return Template::assemble(name_prefix, RANKED_FOCUS, Some(selected));
    }

    let shortfall = target_count - selected.len();

    tracing::debug!(
        ranked = selected.len(),
        shortfall,
        available = fillers.len(),
        "Topping up ranked picks with random fillers"
    );

    selected.extend(fillers.choose_multiple(rng, shortfall).copied());

    Template::assemble(format!("{} (Mixed)", name_prefix), MIXED_FOCUS, Some(selected))
}

/// Distinct catalog ids the user has not done, minus `taken`
fn unperformed(
    catalog: &[Exercise],
    user: &UserContext,
    taken: &HashSet<ExerciseId>,
) -> Vec<ExerciseId> {
    let mut seen = HashSet::new();
    catalog
        .iter()
        .map(|e| e.id)
        .filter(|id| !user.has_done(id) && !taken.contains(id))
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Collaborative generator over one cohort and time window
pub struct CommunityGenerator {
    name_prefix: &'static str,
    window_days: Option<i64>,
    same_goal: bool,
    target_count: usize,
}

impl CommunityGenerator {
    /// Favourites of every other user, all time
    pub fn all_time(target_count: usize) -> Self {
        Self {
            name_prefix: "Community Favorites",
            window_days: None,
            same_goal: false,
            target_count,
        }
    }

    /// Favourites of users sharing the requester's goal
    pub fn same_goal(target_count: usize) -> Self {
        Self {
            name_prefix: "Popular With Your Goal",
            window_days: None,
            same_goal: true,
            target_count,
        }
    }

    pub fn trending_week(target_count: usize) -> Self {
        Self {
            name_prefix: "Trending This Week",
            window_days: Some(7),
            same_goal: false,
            target_count,
        }
    }

    pub fn trending_month(target_count: usize) -> Self {
        Self {
            name_prefix: "Trending This Month",
            window_days: Some(30),
            same_goal: false,
            target_count,
        }
    }
}

#[async_trait::async_trait]
impl TemplateGenerator for CommunityGenerator {
    fn name(&self) -> String {
        self.name_prefix.to_string()
    }

    async fn generate(
        &self,
        ctx: &GenerationContext<'_>,
        rng: &mut (dyn RngCore + Send),
    ) -> Option<Template> {
        let goal = if self.same_goal {
            match ctx.user.goal {
                Some(goal) => Some(goal),
                None => {
                    tracing::debug!(user_id = %ctx.user.user_id, "No goal, skipping same-goal community template");
                    return None;
                }
            }
        } else {
            None
        };

        let window = self
            .window_days
            .map(|days| TimeWindow::last_days(ctx.now, days));

        let frequency = aggregate(ctx.provider, ctx.user.user_id, goal, window).await;

        recommend(
            ctx.user,
            ctx.catalog,
            frequency,
            self.target_count,
            self.name_prefix,
            rng,
        )
    }
}
