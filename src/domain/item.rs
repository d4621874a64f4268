use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Generate a fresh entity id
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Trim a user-supplied title, rejecting whitespace-only input
pub fn clean_title(title: &str) -> Option<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A checklist entry inside a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    /// Create a subtask, or `None` if the title is blank
    pub fn create(title: &str) -> Option<Self> {
        Some(Self {
            id: new_id(),
            title: clean_title(title)?,
            completed: false,
        })
    }
}

/// A task in a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Free-text notes
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub starred: bool,
    /// Checklist, in insertion order
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Creation instant in milliseconds since the Unix epoch, never changes
    pub created_at: i64,
}

impl Task {
    /// Create a task stamped with `created_at`, or `None` if the title is blank
    pub fn create(title: &str, created_at: i64) -> Option<Self> {
        Some(Self {
            id: new_id(),
            title: clean_title(title)?,
            details: String::new(),
            completed: false,
            starred: false,
            subtasks: Vec::new(),
            created_at,
        })
    }

    /// Find a subtask by id
    pub fn subtask(&self, subtask_id: &str) -> Option<&Subtask> {
        self.subtasks.iter().find(|st| st.id == subtask_id)
    }

    /// Number of completed subtasks
    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|st| st.completed).count()
    }

    /// Drop subtasks whose id repeats an earlier one. Returns how many were dropped.
    pub fn dedup_subtasks(&mut self) -> usize {
        dedup_by_id(&mut self.subtasks, |st| st.id.as_str())
    }
}

/// A named list of tasks
///
/// Tasks sit behind `Arc` so snapshots can share untouched tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Arc<Task>>,
}

impl TaskList {
    /// Create an empty list, or `None` if the name is blank
    pub fn create(name: &str) -> Option<Self> {
        Some(Self {
            id: new_id(),
            name: clean_title(name)?,
            tasks: Vec::new(),
        })
    }

    /// Find a task by id
    pub fn task(&self, task_id: &str) -> Option<&Arc<Task>> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Position of a task by id
    pub fn task_position(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    /// Drop tasks (and subtasks within them) with repeated ids. Returns how many were dropped.
    pub fn normalize(&mut self) -> usize {
        let mut dropped = dedup_by_id(&mut self.tasks, |t| t.id.as_str());
        for task in &mut self.tasks {
            if has_duplicate_ids(task.subtasks.iter().map(|st| st.id.as_str())) {
                dropped += Arc::make_mut(task).dedup_subtasks();
            }
        }
        dropped
    }
}

/// Restore id uniqueness across a collection of lists. Returns how many entries were dropped.
///
/// Lists without duplicates are left untouched (still shared).
pub fn normalize_lists(lists: &mut Vec<Arc<TaskList>>) -> usize {
    let mut dropped = dedup_by_id(lists, |l| l.id.as_str());
    for list in lists.iter_mut() {
        if list_has_duplicates(list) {
            dropped += Arc::make_mut(list).normalize();
        }
    }
    dropped
}

fn list_has_duplicates(list: &TaskList) -> bool {
    has_duplicate_ids(list.tasks.iter().map(|t| t.id.as_str()))
        || list
            .tasks
            .iter()
            .any(|t| has_duplicate_ids(t.subtasks.iter().map(|st| st.id.as_str())))
}

fn has_duplicate_ids<'a>(mut ids: impl Iterator<Item = &'a str>) -> bool {
    let mut seen = HashSet::new();
    ids.any(|id| !seen.insert(id))
}

/// Keep the first entry for each id, preserving order
fn dedup_by_id<T>(items: &mut Vec<T>, id: impl Fn(&T) -> &str) -> usize {
    let before = items.len();
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(id(item).to_string()));
    before - items.len()
}
