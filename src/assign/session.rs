use super::{AssignError, BulkMode, EditMode, MoveDirection};
use crate::catalog::TagCatalog;
use crate::model::{File, TagId};
use std::collections::BTreeSet;

/// Two disjoint tag sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSets {
    assigned: BTreeSet<TagId>,
    available: BTreeSet<TagId>,
}

impl TagSets {
    fn split(catalog: &TagCatalog, assigned: BTreeSet<TagId>) -> Self {
        let available = catalog.ids().difference(&assigned).copied().collect();
        Self {
            assigned,
            available,
        }
    }
}

/// An open tag editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagAssignmentSession {
    /// Editing one file's tag set directly
    Single {
        target: File,
        /// The file's catalog-known tags when the session opened
        original: BTreeSet<TagId>,
        sets: TagSets,
    },
    /// Adding or removing tags across several files
    Bulk {
        mode: BulkMode,
        targets: Vec<File>,
        sets: TagSets,
    },
}

impl TagAssignmentSession {
    /// Open a session over `targets`
    ///
    /// Tag ids on a target that `catalog` does not know are left out of the
    /// session.
    ///
    /// # Errors
    ///
    /// Returns `AssignError::EmptyTargets` when `targets` is empty and
    /// `AssignError::SingleTargetRequired` for single mode with more than one
    /// target.
    pub fn start(
        mut targets: Vec<File>,
        mode: EditMode,
        catalog: &TagCatalog,
    ) -> Result<Self, AssignError> {
        if targets.is_empty() {
            return Err(AssignError::EmptyTargets);
        }

        match mode {
            EditMode::Single => {
                if targets.len() != 1 {
                    return Err(AssignError::SingleTargetRequired(targets.len()));
                }
                let target = targets.remove(0);
                let original: BTreeSet<TagId> = target
                    .tags
                    .iter()
                    .copied()
                    .filter(|id| catalog.contains(*id))
                    .collect();
                let sets = TagSets::split(catalog, original.clone());
                Ok(Self::Single {
                    target,
                    original,
                    sets,
                })
            }
            EditMode::Bulk(mode) => {
                let assigned = match mode {
                    BulkMode::Add => BTreeSet::new(),
                    BulkMode::Remove => catalog.ids(),
                };
                Ok(Self::Bulk {
                    mode,
                    targets,
                    sets: TagSets::split(catalog, assigned),
                })
            }
        }
    }

    #[must_use]
    pub const fn mode(&self) -> EditMode {
        match self {
            Self::Single { .. } => EditMode::Single,
            Self::Bulk { mode, .. } => EditMode::Bulk(*mode),
        }
    }

    #[must_use]
    pub fn targets(&self) -> &[File] {
        match self {
            Self::Single { target, .. } => std::slice::from_ref(target),
            Self::Bulk { targets, .. } => targets,
        }
    }

    const fn sets(&self) -> &TagSets {
        match self {
            Self::Single { sets, .. } | Self::Bulk { sets, .. } => sets,
        }
    }

    fn sets_mut(&mut self) -> &mut TagSets {
        match self {
            Self::Single { sets, .. } | Self::Bulk { sets, .. } => sets,
        }
    }

    #[must_use]
    pub fn assigned(&self) -> &BTreeSet<TagId> {
        &self.sets().assigned
    }

    #[must_use]
    pub fn available(&self) -> &BTreeSet<TagId> {
        &self.sets().available
    }

    /// Move a tag between the sets
    ///
    /// Returns `false`, leaving both sets untouched, unless `id` is in the
    /// source set for `direction`.
    pub fn move_tag(&mut self, id: TagId, direction: MoveDirection) -> bool {
        let sets = self.sets_mut();
        let (from, to) = match direction {
            MoveDirection::Assign => (&mut sets.available, &mut sets.assigned),
            MoveDirection::Unassign => (&mut sets.assigned, &mut sets.available),
        };
        if !from.remove(&id) {
            return false;
        }
        to.insert(id);
        true
    }

    /// Tag set a target will have after commit
    ///
    /// In bulk remove mode only the tags moved out of `assigned` are taken
    /// off, so an untouched session leaves every target as it is.
    #[must_use]
    pub fn planned_tags(&self, target: &File) -> BTreeSet<TagId> {
        match self {
            Self::Single { sets, .. } => sets.assigned.clone(),
            Self::Bulk {
                mode: BulkMode::Add,
                sets,
                ..
            } => target.tags.union(&sets.assigned).copied().collect(),
            Self::Bulk {
                mode: BulkMode::Remove,
                sets,
                ..
            } => target.tags.difference(&sets.available).copied().collect(),
        }
    }

    /// Whether committing would request anything meaningful
    #[must_use]
    pub fn has_changes(&self) -> bool {
        match self {
            Self::Single { original, sets, .. } => *original != sets.assigned,
            Self::Bulk {
                mode: BulkMode::Add,
                sets,
                ..
            } => !sets.assigned.is_empty(),
            Self::Bulk {
                mode: BulkMode::Remove,
                sets,
                ..
            } => !sets.available.is_empty(),
        }
    }

    /// Drop the session without sending anything
    pub fn cancel(self) {
        tracing::debug!(targets = self.targets().len(), "tag session cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_files, sample_tags};

    fn catalog() -> TagCatalog {
        TagCatalog::with_tags(sample_tags())
    }

    fn file(name: &str) -> File {
        sample_files()
            .into_iter()
            .find(|f| f.filename == name)
            .unwrap()
    }

    fn assert_disjoint(session: &TagAssignmentSession) {
        assert!(session.assigned().is_disjoint(session.available()));
    }

    #[test]
    fn test_single_session_splits_catalog() {
        let session =
            TagAssignmentSession::start(vec![file("notes.md")], EditMode::Single, &catalog())
                .unwrap();
        assert_eq!(session.assigned(), &BTreeSet::from([1, 2]));
        assert_eq!(session.available(), &BTreeSet::from([3, 4]));
        assert!(!session.has_changes());
    }

    #[test]
    fn test_single_session_drops_unknown_tags() {
        let target = File::new("x.txt", 1, chrono::Utc::now()).with_tags([2, 77]);
        let session =
            TagAssignmentSession::start(vec![target], EditMode::Single, &catalog()).unwrap();
        assert_eq!(session.assigned(), &BTreeSet::from([2]));
        assert_disjoint(&session);
    }

    #[test]
    fn test_single_requires_one_target() {
        let result = TagAssignmentSession::start(
            vec![file("notes.md"), file("main.rs")],
            EditMode::Single,
            &catalog(),
        );
        assert_eq!(result.unwrap_err(), AssignError::SingleTargetRequired(2));

        let result = TagAssignmentSession::start(Vec::new(), EditMode::Single, &catalog());
        assert_eq!(result.unwrap_err(), AssignError::EmptyTargets);
    }

    #[test]
    fn test_bulk_initial_sets() {
        let catalog = catalog();
        let targets = vec![file("notes.md"), file("song.mp3")];

        let add =
            TagAssignmentSession::start(targets.clone(), EditMode::Bulk(BulkMode::Add), &catalog)
                .unwrap();
        assert!(add.assigned().is_empty());
        assert_eq!(add.available(), &catalog.ids());
        assert!(!add.has_changes());

        let remove =
            TagAssignmentSession::start(targets, EditMode::Bulk(BulkMode::Remove), &catalog)
                .unwrap();
        assert_eq!(remove.assigned(), &catalog.ids());
        assert!(remove.available().is_empty());
        assert!(!remove.has_changes());
    }

    #[test]
    fn test_moves_keep_sets_disjoint() {
        let mut session =
            TagAssignmentSession::start(vec![file("notes.md")], EditMode::Single, &catalog())
                .unwrap();

        assert!(session.move_tag(3, MoveDirection::Assign));
        assert!(!session.move_tag(3, MoveDirection::Assign));
        assert!(!session.move_tag(99, MoveDirection::Assign));
        assert!(session.move_tag(1, MoveDirection::Unassign));
        assert!(!session.move_tag(1, MoveDirection::Unassign));
        assert_disjoint(&session);

        assert_eq!(session.assigned(), &BTreeSet::from([2, 3]));
        assert_eq!(session.available(), &BTreeSet::from([1, 4]));
        assert!(session.has_changes());

        session.move_tag(3, MoveDirection::Unassign);
        session.move_tag(1, MoveDirection::Assign);
        assert!(!session.has_changes());
    }

    #[test]
    fn test_planned_tags_per_mode() {
        let catalog = catalog();
        let notes = file("notes.md");

        let mut add = TagAssignmentSession::start(
            vec![notes.clone()],
            EditMode::Bulk(BulkMode::Add),
            &catalog,
        )
        .unwrap();
        add.move_tag(3, MoveDirection::Assign);
        assert_eq!(add.planned_tags(&notes), BTreeSet::from([1, 2, 3]));

        let mut remove = TagAssignmentSession::start(
            vec![notes.clone()],
            EditMode::Bulk(BulkMode::Remove),
            &catalog,
        )
        .unwrap();
        assert_eq!(remove.planned_tags(&notes), BTreeSet::from([1, 2]));
        remove.move_tag(1, MoveDirection::Unassign);
        remove.move_tag(3, MoveDirection::Unassign);
        assert!(remove.has_changes());
        assert_eq!(remove.available(), &BTreeSet::from([1, 3]));
        assert_eq!(remove.planned_tags(&notes), BTreeSet::from([2]));
    }
}
