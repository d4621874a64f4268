use super::item::{clean_title, Subtask, Task, TaskList};

/// Field-wise overwrite of an entity with a partial set of fields.
///
/// Unset fields are preserved. Nested collections are replaced wholesale,
/// never merged element by element.
pub trait MergePatch {
    type Patch;

    /// Apply `patch`, or `None` if it carries a blank title/name
    fn merge_patch(&self, patch: &Self::Patch) -> Option<Self>
    where
        Self: Sized;
}

/// Partial update for a [`Subtask`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl SubtaskPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}

/// Partial update for a [`Task`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub details: Option<String>,
    pub completed: Option<bool>,
    pub starred: Option<bool>,
    pub subtasks: Option<Vec<Subtask>>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn details(details: impl Into<String>) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn starred(starred: bool) -> Self {
        Self {
            starred: Some(starred),
            ..Self::default()
        }
    }

    pub fn subtasks(subtasks: Vec<Subtask>) -> Self {
        Self {
            subtasks: Some(subtasks),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Partial update for a [`TaskList`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPatch {
    pub name: Option<String>,
}

/// Resolve an optional replacement title, `None` when it is present but blank
fn patched_title(current: &str, replacement: Option<&String>) -> Option<String> {
    match replacement {
        Some(title) => clean_title(title),
        None => Some(current.to_string()),
    }
}

impl MergePatch for Subtask {
    type Patch = SubtaskPatch;

    fn merge_patch(&self, patch: &SubtaskPatch) -> Option<Self> {
        Some(Self {
            id: self.id.clone(),
            title: patched_title(&self.title, patch.title.as_ref())?,
            completed: patch.completed.unwrap_or(self.completed),
        })
    }
}

impl MergePatch for Task {
    type Patch = TaskPatch;

    fn merge_patch(&self, patch: &TaskPatch) -> Option<Self> {
        Some(Self {
            id: self.id.clone(),
            title: patched_title(&self.title, patch.title.as_ref())?,
            details: patch.details.clone().unwrap_or_else(|| self.details.clone()),
            completed: patch.completed.unwrap_or(self.completed),
            starred: patch.starred.unwrap_or(self.starred),
            subtasks: patch
                .subtasks
                .clone()
                .unwrap_or_else(|| self.subtasks.clone()),
            created_at: self.created_at,
        })
    }
}

impl MergePatch for TaskList {
    type Patch = ListPatch;

    fn merge_patch(&self, patch: &ListPatch) -> Option<Self> {
        Some(Self {
            id: self.id.clone(),
            name: patched_title(&self.name, patch.name.as_ref())?,
            tasks: self.tasks.clone(),
        })
    }
}
