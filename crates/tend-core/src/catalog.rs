//! Static ritual catalog: the fixed registry of checkable recurring actions.
//!
//! Built once at startup and never mutated. Point values live here and are
//! the single source of truth for the progress engine's point arithmetic.

/// One checkable recurring action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RitualDefinition {
    pub id: &'static str,
    pub display_name: &'static str,
    pub emoji: &'static str,
    pub category_id: &'static str,
    pub point_value: u32,
}

/// A themed group of rituals.
#[derive(Clone, Debug)]
pub struct RitualCategory {
    pub id: &'static str,
    pub title: &'static str,
    pub emoji: &'static str,
    pub rituals: Vec<RitualDefinition>,
}

/// Immutable registry of ritual categories.
pub struct Catalog {
    categories: Vec<RitualCategory>,
}

impl Catalog {
    pub fn new(categories: Vec<RitualCategory>) -> Self {
        Self { categories }
    }

    /// The built-in catalog: four categories, sixteen rituals.
    pub fn builtin() -> Self {
        let categories = vec![
            RitualCategory {
                id: "school",
                title: "School & Learning",
                emoji: "🎓",
                rituals: vec![
                    ritual("homework", "Did my homework", "✏️", "school", 10),
                    ritual("study-time", "25-min study session", "⏰", "school", 10),
                    ritual("reading", "Read for 20 minutes", "📖", "school", 10),
                    ritual("organize-backpack", "Organized my backpack", "🎒", "school", 5),
                ],
            },
            RitualCategory {
                id: "brain",
                title: "Brain Power",
                emoji: "🚀",
                rituals: vec![
                    ritual("plan-tomorrow", "Planned tomorrow", "📅", "brain", 10),
                    ritual("reviewed-notes", "Reviewed my notes", "📝", "brain", 10),
                    ritual("brain-break", "Took a brain break", "🧘", "brain", 5),
                ],
            },
            RitualCategory {
                id: "feelings",
                title: "Feelings & Wellness",
                emoji: "🌈",
                rituals: vec![
                    ritual("mood-check", "Checked in with my mood", "😊", "feelings", 5),
                    ritual("deep-breaths", "Took 5 deep breaths", "🌬️", "feelings", 5),
                    ritual("gratitude", "Thought of something good", "🙏", "feelings", 5),
                    ritual("moved-body", "Moved my body", "💃", "feelings", 10),
                ],
            },
            RitualCategory {
                id: "life",
                title: "Daily Life",
                emoji: "✨",
                rituals: vec![
                    ritual("made-bed", "Made my bed", "🛏️", "life", 5),
                    ritual("drank-water", "Drank water", "💧", "life", 5),
                    ritual("healthy-snack", "Had a healthy snack", "🍎", "life", 5),
                    ritual("screen-break", "Took a screen break", "📱", "life", 5),
                ],
            },
        ];
        Self { categories }
    }

    pub fn categories(&self) -> &[RitualCategory] {
        &self.categories
    }

    /// Look up a ritual by id.
    pub fn ritual(&self, id: &str) -> Option<&RitualDefinition> {
        self.all_rituals().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ritual(id).is_some()
    }

    /// Iterate over every ritual across all categories, in catalog order.
    pub fn all_rituals(&self) -> impl Iterator<Item = &RitualDefinition> {
        self.categories.iter().flat_map(|c| c.rituals.iter())
    }

    /// Total number of rituals; this is the perfect-day threshold.
    pub fn ritual_count(&self) -> usize {
        self.categories.iter().map(|c| c.rituals.len()).sum()
    }
}

fn ritual(
    id: &'static str,
    display_name: &'static str,
    emoji: &'static str,
    category_id: &'static str,
    point_value: u32,
) -> RitualDefinition {
    RitualDefinition {
        id,
        display_name,
        emoji,
        category_id,
        point_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_shape() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.categories().len(), 4);
        assert_eq!(catalog.ritual_count(), 16);
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::builtin();
        let homework = catalog.ritual("homework").unwrap();
        assert_eq!(homework.point_value, 10);
        assert_eq!(homework.category_id, "school");

        assert!(catalog.ritual("flossing").is_none());
        assert!(!catalog.contains("flossing"));
    }

    #[test]
    fn test_ids_unique() {
        let catalog = Catalog::builtin();
        let mut seen = std::collections::HashSet::new();
        for r in catalog.all_rituals() {
            assert!(seen.insert(r.id), "duplicate ritual id: {}", r.id);
        }
    }

    #[test]
    fn test_point_values_are_five_or_ten() {
        let catalog = Catalog::builtin();
        for r in catalog.all_rituals() {
            assert!(
                r.point_value == 5 || r.point_value == 10,
                "unexpected point value {} on {}",
                r.point_value,
                r.id
            );
        }
    }
}
