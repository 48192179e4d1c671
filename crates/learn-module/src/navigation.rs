//! Position tracking and traversal rules for a module.

use crate::models::{ContentBlock, Module, ModuleSettings, Section, StudentProgress};

/// Cursor over a module's sections and content blocks.
///
/// The navigator stores indices only; callers pass the (shared, read-only)
/// module into each operation. All skip/sequential policy runs through
/// [`Navigator::can_jump_to`], so no call site can bypass it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    section: usize,
    content: usize,
}

impl Navigator {
    /// Start at the first content block of the first section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a persisted snapshot, clamped to the module's bounds.
    ///
    /// Content position within the section is not persisted; resumption
    /// lands on the section's first block.
    pub fn resume(module: &Module, progress: &StudentProgress) -> Self {
        let section = progress
            .current_section
            .min(module.sections.len().saturating_sub(1));
        Self {
            section,
            content: 0,
        }
    }

    /// Current section index.
    pub fn section_index(&self) -> usize {
        self.section
    }

    /// Current content index within the section.
    pub fn content_index(&self) -> usize {
        self.content
    }

    /// The section under the cursor.
    pub fn current_section<'m>(&self, module: &'m Module) -> Option<&'m Section> {
        module.section(self.section)
    }

    /// The content block under the cursor.
    pub fn current_block<'m>(&self, module: &'m Module) -> Option<&'m ContentBlock> {
        self.current_section(module)?.content.get(self.content)
    }

    /// Whether the cursor sits at the very first position.
    pub fn at_start(&self) -> bool {
        self.section == 0 && self.content == 0
    }

    /// Whether the cursor sits at the last block of the last section.
    pub fn at_end(&self, module: &Module) -> bool {
        let Some(section) = self.current_section(module) else {
            return true;
        };
        self.section + 1 == module.sections.len()
            && self.content + 1 >= section.content.len()
    }

    /// Whether the cursor sits at the last block of the current section,
    /// where its quiz (if any) is offered.
    pub fn at_section_end(&self, module: &Module) -> bool {
        self.current_section(module)
            .map(|s| self.content + 1 >= s.content.len())
            .unwrap_or(false)
    }

    /// Step forward one content block, rolling into the next section.
    ///
    /// No-op at the terminal position. Returns whether the cursor moved.
    pub fn advance(&mut self, module: &Module) -> bool {
        let Some(section) = module.section(self.section) else {
            return false;
        };
        if self.content + 1 < section.content.len() {
            self.content += 1;
            true
        } else if self.section + 1 < module.sections.len() {
            self.section += 1;
            self.content = 0;
            true
        } else {
            false
        }
    }

    /// Step backward one content block, rolling into the previous
    /// section's last block.
    ///
    /// No-op at the initial position. Returns whether the cursor moved.
    pub fn retreat(&mut self, module: &Module) -> bool {
        if self.content > 0 {
            self.content -= 1;
            true
        } else if self.section > 0 {
            self.section -= 1;
            self.content = module
                .section(self.section)
                .map(|s| s.content.len().saturating_sub(1))
                .unwrap_or(0);
            true
        } else {
            false
        }
    }

    /// The single authorization predicate for section jumps.
    ///
    /// A jump to `index` is permitted iff it is in bounds, it is not more
    /// than one section ahead while sequential progress is required, and
    /// either skipping is allowed or it is at most one section ahead.
    pub fn can_jump_to(&self, module: &Module, settings: &ModuleSettings, index: usize) -> bool {
        if index >= module.sections.len() {
            return false;
        }
        if settings.require_sequential_progress && index > self.section + 1 {
            return false;
        }
        settings.allow_skipping || index <= self.section + 1
    }

    /// Jump to a section's first content block, subject to
    /// [`Navigator::can_jump_to`]. Returns whether the jump happened.
    pub fn jump_to_section(
        &mut self,
        module: &Module,
        settings: &ModuleSettings,
        index: usize,
    ) -> bool {
        if !self.can_jump_to(module, settings, index) {
            return false;
        }
        self.section = index;
        self.content = 0;
        true
    }

    /// Fractional progress through the current section, in [0, 1].
    pub fn section_progress(&self, module: &Module) -> f64 {
        let Some(section) = self.current_section(module) else {
            return 0.0;
        };
        if section.content.is_empty() {
            return 0.0;
        }
        (self.content + 1) as f64 / section.content.len() as f64
    }

    /// Fractional progress through the module, in [0, 1].
    ///
    /// Blends the section index with the fractional position inside it;
    /// distinct from the coarser index-only percentage reported by the
    /// progress aggregator.
    pub fn module_progress(&self, module: &Module) -> f64 {
        if module.sections.is_empty() {
            return 0.0;
        }
        (self.section as f64 + self.section_progress(module)) / module.sections.len() as f64
    }

    /// Composite bookmark key for the current (section, content) pair.
    pub fn bookmark_key(&self, module: &Module) -> Option<String> {
        let section = self.current_section(module)?;
        let block = section.content.get(self.content)?;
        Some(format!("{}-{}", section.id, block.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentBody, Level};
    use proptest::prelude::*;

    /// Build a module whose sections have the given content block counts.
    fn module_with(content_counts: &[usize]) -> Module {
        let sections = content_counts
            .iter()
            .enumerate()
            .map(|(si, &count)| Section {
                id: format!("sec{si}"),
                title: format!("Section {si}"),
                description: String::new(),
                content: (0..count)
                    .map(|ci| ContentBlock {
                        id: format!("block{ci}"),
                        body: ContentBody::Text(format!("text {si}/{ci}")),
                        metadata: None,
                    })
                    .collect(),
                quiz: Vec::new(),
                estimated_time: 5,
                is_required: true,
            })
            .collect();
        Module {
            id: "m1".to_string(),
            title: "Test Module".to_string(),
            description: String::new(),
            subject: "Testing".to_string(),
            level: Level::Beginner,
            estimated_duration: 30,
            learning_objectives: Vec::new(),
            sections,
            final_assessment: Vec::new(),
            resources: Vec::new(),
            tags: Vec::new(),
        }
    }

    fn sequential_settings() -> ModuleSettings {
        ModuleSettings {
            allow_skipping: false,
            require_sequential_progress: true,
            ..ModuleSettings::default()
        }
    }

    #[test]
    fn test_advance_walks_every_block_then_stops() {
        let module = module_with(&[3, 2, 4]);
        let mut nav = Navigator::new();
        // 3 + 2 + 4 blocks => 8 moves land on the final block.
        for _ in 0..8 {
            assert!(nav.advance(&module));
        }
        assert_eq!(nav.section_index(), 2);
        assert_eq!(nav.content_index(), 3);
        assert!(nav.at_end(&module));
        assert!(!nav.advance(&module));
    }

    #[test]
    fn test_retreat_is_no_op_at_start() {
        let module = module_with(&[2, 2]);
        let mut nav = Navigator::new();
        assert!(!nav.retreat(&module));
        assert!(nav.at_start());
    }

    #[test]
    fn test_retreat_lands_on_previous_sections_last_block() {
        let module = module_with(&[3, 2]);
        let mut nav = Navigator::new();
        for _ in 0..3 {
            nav.advance(&module);
        }
        assert_eq!((nav.section_index(), nav.content_index()), (1, 0));
        assert!(nav.retreat(&module));
        assert_eq!((nav.section_index(), nav.content_index()), (0, 2));
    }

    #[test]
    fn test_sequential_jump_gate() {
        let module = module_with(&[1, 1, 1, 1]);
        let settings = sequential_settings();
        let mut nav = Navigator::new();

        assert!(nav.can_jump_to(&module, &settings, 0));
        assert!(nav.can_jump_to(&module, &settings, 1));
        assert!(!nav.can_jump_to(&module, &settings, 2));
        assert!(!nav.jump_to_section(&module, &settings, 3));
        assert_eq!(nav.section_index(), 0);

        assert!(nav.jump_to_section(&module, &settings, 1));
        assert!(nav.can_jump_to(&module, &settings, 2));
    }

    #[test]
    fn test_skipping_allows_any_section_in_bounds() {
        let module = module_with(&[1, 1, 1, 1]);
        let settings = ModuleSettings::default();
        let mut nav = Navigator::new();
        assert!(nav.jump_to_section(&module, &settings, 3));
        assert_eq!((nav.section_index(), nav.content_index()), (3, 0));
        assert!(!nav.jump_to_section(&module, &settings, 4));
    }

    #[test]
    fn test_sequential_rejection_beats_skipping() {
        let module = module_with(&[1, 1, 1, 1]);
        let settings = ModuleSettings {
            allow_skipping: true,
            require_sequential_progress: true,
            ..ModuleSettings::default()
        };
        let nav = Navigator::new();
        assert!(nav.can_jump_to(&module, &settings, 1));
        assert!(!nav.can_jump_to(&module, &settings, 2));
    }

    #[test]
    fn test_jump_resets_content_index() {
        let module = module_with(&[3, 3]);
        let settings = ModuleSettings::default();
        let mut nav = Navigator::new();
        nav.advance(&module);
        nav.advance(&module);
        assert_eq!(nav.content_index(), 2);
        assert!(nav.jump_to_section(&module, &settings, 1));
        assert_eq!(nav.content_index(), 0);
    }

    #[test]
    fn test_progress_fractions() {
        let module = module_with(&[2, 2]);
        let mut nav = Navigator::new();
        assert!((nav.section_progress(&module) - 0.5).abs() < f64::EPSILON);
        assert!((nav.module_progress(&module) - 0.25).abs() < f64::EPSILON);

        nav.advance(&module);
        assert!((nav.module_progress(&module) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_module_is_degenerate() {
        let module = module_with(&[]);
        let mut nav = Navigator::new();
        assert!(!nav.advance(&module));
        assert!(!nav.retreat(&module));
        assert_eq!(nav.module_progress(&module), 0.0);
        assert_eq!(nav.section_progress(&module), 0.0);
        assert!(nav.bookmark_key(&module).is_none());
        assert!(nav.at_end(&module));
    }

    #[test]
    fn test_resume_clamps_stale_snapshot() {
        let module = module_with(&[1, 1]);
        let mut progress = StudentProgress::new("m1", "s1");
        progress.current_section = 9;
        let nav = Navigator::resume(&module, &progress);
        assert_eq!(nav.section_index(), 1);
    }

    #[test]
    fn test_bookmark_key_is_composite() {
        let module = module_with(&[2]);
        let mut nav = Navigator::new();
        nav.advance(&module);
        assert_eq!(nav.bookmark_key(&module).as_deref(), Some("sec0-block1"));
    }

    proptest! {
        /// M*N-1 advances from the start land exactly on the last block;
        /// one more is a no-op.
        #[test]
        fn prop_advance_exhausts_module(counts in prop::collection::vec(1usize..5, 1..5)) {
            let module = module_with(&counts);
            let total: usize = counts.iter().sum();
            let mut nav = Navigator::new();
            for _ in 0..total - 1 {
                prop_assert!(nav.advance(&module));
            }
            prop_assert!(nav.at_end(&module));
            prop_assert!(!nav.advance(&module));
            prop_assert_eq!(nav.section_index(), counts.len() - 1);
            prop_assert_eq!(nav.content_index(), counts[counts.len() - 1] - 1);
        }

        /// retreat is the exact left inverse of advance away from the end.
        #[test]
        fn prop_retreat_inverts_advance(
            counts in prop::collection::vec(1usize..5, 1..5),
            steps in 0usize..16,
        ) {
            let module = module_with(&counts);
            let mut nav = Navigator::new();
            for _ in 0..steps {
                nav.advance(&module);
            }
            let before = nav.clone();
            if nav.advance(&module) {
                prop_assert!(nav.retreat(&module));
                prop_assert_eq!(nav, before);
            }
        }

        /// The sequential gate admits exactly current+1 and below.
        #[test]
        fn prop_sequential_gate_boundary(
            counts in prop::collection::vec(1usize..3, 2..6),
            target in 0usize..8,
        ) {
            let module = module_with(&counts);
            let settings = sequential_settings();
            let nav = Navigator::new();
            let expected = target < counts.len() && target <= 1;
            prop_assert_eq!(nav.can_jump_to(&module, &settings, target), expected);
        }
    }
}
