pub mod collaborative;
pub mod content;
pub mod favorite;
pub mod matcher;
pub mod peer_frequency;
pub mod providers;
pub mod quotas;
pub mod recommendations;
pub mod selector;

pub use providers::WorkoutDataProvider;
pub use quotas::Archetype;
pub use recommendations::{GenerationContext, RecommendationService, TemplateGenerator};
