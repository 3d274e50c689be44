use rand::{Rng, RngCore};

use crate::{
    models::{Exercise, Template, UserContext},
    services::{
        quotas::{allocate, Archetype},
        recommendations::{GenerationContext, TemplateGenerator},
        selector::select_exercises,
    },
};

/// Builds one archetype template from the exercises the user has not done yet
///
/// The requested size is always the sum of the archetype's quotas for the
/// user's goal.
pub fn generate_archetype_template<R: Rng + ?Sized>(
    archetype: Archetype,
    user: &UserContext,
    catalog: &[Exercise],
    rng: &mut R,
) -> Option<Template> {
    let pool_size = catalog
        .iter()
        .filter(|e| e.has_muscle_annotation() && !user.has_done(&e.id))
        .count();

    if pool_size == 0 {
        tracing::info!(
            user_id = %user.user_id,
            archetype = ?archetype,
            "No unperformed annotated exercises left"
        );
        return None;
    }

    let quota = allocate(archetype, user.goal);
    let target_count = quota.total();
    let selection = select_exercises(&quota, catalog, &user.done, target_count, rng);

    Template::assemble(archetype.template_name(), archetype.focus(), selection)
}

/// Content-based generator for one archetype
pub struct ArchetypeGenerator {
    archetype: Archetype,
}

impl ArchetypeGenerator {
    pub fn new(archetype: Archetype) -> Self {
        Self { archetype }
    }
}

#[async_trait::async_trait]
impl TemplateGenerator for ArchetypeGenerator {
    fn name(&self) -> String {
        format!("{:?}", self.archetype)
    }

    async fn generate(
        &self,
        ctx: &GenerationContext<'_>,
        rng: &mut (dyn RngCore + Send),
    ) -> Option<Template> {
        generate_archetype_template(self.archetype, ctx.user, ctx.catalog, rng)
    }
}
