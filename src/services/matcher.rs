use crate::models::MuscleGroups;

/// Whether an exercise's muscle annotation references `group`
///
/// Case-insensitive substring match against every stored label; no other
/// normalization is applied. A missing annotation never matches.
pub fn targets(muscles: Option<&MuscleGroups>, group: &str) -> bool {
    let needle = group.to_lowercase();

    match muscles {
        None => false,
        Some(MuscleGroups::Single(label)) => label.to_lowercase().contains(&needle),
        Some(MuscleGroups::Many(labels)) => labels
            .iter()
            .any(|label| label.to_lowercase().contains(&needle)),
    }
}
