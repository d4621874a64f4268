use crate::domain::{
    ListPatch, MergePatch, Subtask, SubtaskPatch, Task, TaskGroups, TaskList, TaskPatch,
};
use crate::persistence::{
    KeyValueStore, PersistedState, Persistence, ACTIVE_LIST_ID_KEY, SIDEBAR_OPEN_KEY,
    TASK_LISTS_KEY,
};
use std::fmt;
use std::sync::Arc;

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Immutable view of the whole state at one point in time.
///
/// Cloning is cheap: lists and tasks are shared behind `Arc`, and a
/// mutation only rebuilds the path from the changed entity to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub task_lists: Arc<Vec<Arc<TaskList>>>,
    /// Empty when there are no lists
    pub active_list_id: String,
    pub selected_task_id: Option<String>,
    pub is_sidebar_open: bool,
}

impl Snapshot {
    /// Find a list by id
    pub fn list(&self, list_id: &str) -> Option<&Arc<TaskList>> {
        self.task_lists.iter().find(|l| l.id == list_id)
    }

    /// The list matching the active-list cursor
    pub fn active_list(&self) -> Option<&Arc<TaskList>> {
        self.list(&self.active_list_id)
    }

    /// The task of the active list matching the selected-task cursor
    pub fn selected_task(&self) -> Option<&Arc<Task>> {
        let task_id = self.selected_task_id.as_deref()?;
        self.active_list()?.task(task_id)
    }

    /// Incomplete/completed partition of the active list
    pub fn task_groups(&self) -> Option<TaskGroups> {
        self.active_list().map(|list| TaskGroups::for_list(list))
    }

    fn list_position(&self, list_id: &str) -> Option<usize> {
        self.task_lists.iter().position(|l| l.id == list_id)
    }

    fn with_lists(&self, task_lists: Vec<Arc<TaskList>>) -> Self {
        Self {
            task_lists: Arc::new(task_lists),
            ..self.clone()
        }
    }

    /// Copy of this snapshot with one list swapped out, siblings shared
    fn with_list_replaced(&self, list_index: usize, list: TaskList) -> Self {
        let mut task_lists = self.task_lists.as_ref().clone();
        task_lists[list_index] = Arc::new(list);
        self.with_lists(task_lists)
    }

    /// Copy of this snapshot with one task swapped out, siblings shared
    fn with_task_replaced(&self, list_index: usize, task_index: usize, task: Task) -> Self {
        let mut list = TaskList::clone(&self.task_lists[list_index]);
        list.tasks[task_index] = Arc::new(task);
        self.with_list_replaced(list_index, list)
    }
}

impl From<PersistedState> for Snapshot {
    fn from(state: PersistedState) -> Self {
        Self {
            task_lists: Arc::new(state.task_lists),
            active_list_id: state.active_list_id,
            selected_task_id: None,
            is_sidebar_open: state.is_sidebar_open,
        }
    }
}

/// Callback run synchronously after each committed mutation
pub type CommitObserver = Box<dyn FnMut(&Snapshot)>;

/// The single owner of task-list state.
///
/// Every operation either commits a new [`Snapshot`] or leaves state
/// untouched. A commit persists the slices that changed and then notifies
/// observers. Blank titles and unknown ids are silent no-ops.
pub struct AppState<S: KeyValueStore> {
    snapshot: Snapshot,
    persistence: Persistence<S>,
    observers: Vec<CommitObserver>,
    clock: fn() -> i64,
    /// Last creation stamp handed out; stamps strictly increase
    last_stamp: i64,
}

impl<S: KeyValueStore> fmt::Debug for AppState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("snapshot", &self.snapshot)
            .field("observers", &self.observers.len())
            .field("last_stamp", &self.last_stamp)
            .finish()
    }
}

impl<S: KeyValueStore> AppState<S> {
    /// Load state from `backend`, falling back to defaults for anything unusable
    pub fn load(backend: S) -> Self {
        Self::load_with_clock(backend, now_ms)
    }

    /// Like [`AppState::load`] with an explicit clock for creation stamps
    pub fn load_with_clock(backend: S, clock: fn() -> i64) -> Self {
        let persistence = Persistence::new(backend);
        let state = persistence.load_state(clock());
        let mut app = Self::new(persistence, Snapshot::from(state), clock);
        // Write back whatever defaults and reconciliation produced
        app.save_all();
        app
    }

    fn new(persistence: Persistence<S>, snapshot: Snapshot, clock: fn() -> i64) -> Self {
        let last_stamp = snapshot
            .task_lists
            .iter()
            .flat_map(|l| l.tasks.iter())
            .map(|t| t.created_at)
            .max()
            .unwrap_or(i64::MIN);

        Self {
            snapshot,
            persistence,
            observers: Vec::new(),
            clock,
            last_stamp,
        }
    }

    /// Cheap copy of the current snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.clone()
    }

    /// Borrow the current snapshot
    pub fn current(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn active_list(&self) -> Option<&Arc<TaskList>> {
        self.snapshot.active_list()
    }

    pub fn selected_task(&self) -> Option<&Arc<Task>> {
        self.snapshot.selected_task()
    }

    pub fn task_groups(&self) -> Option<TaskGroups> {
        self.snapshot.task_groups()
    }

    /// Register an observer called after every committed mutation
    pub fn on_commit<F>(&mut self, observer: F)
    where
        F: FnMut(&Snapshot) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Persist all three slices regardless of what changed
    pub fn save_all(&mut self) {
        self.persistence
            .save(TASK_LISTS_KEY, self.snapshot.task_lists.as_ref());
        self.persistence
            .save(ACTIVE_LIST_ID_KEY, &self.snapshot.active_list_id);
        self.persistence
            .save(SIDEBAR_OPEN_KEY, &self.snapshot.is_sidebar_open);
    }

    /// Next creation stamp, without consuming it
    fn peek_stamp(&self) -> i64 {
        (self.clock)().max(self.last_stamp.saturating_add(1))
    }

    /// Replace the snapshot, persist changed slices, notify observers
    fn commit(&mut self, next: Snapshot, op: &'static str) {
        let prev = std::mem::replace(&mut self.snapshot, next);
        let next = &self.snapshot;

        if !Arc::ptr_eq(&prev.task_lists, &next.task_lists) {
            self.persistence
                .save(TASK_LISTS_KEY, next.task_lists.as_ref());
        }
        if prev.active_list_id != next.active_list_id {
            self.persistence
                .save(ACTIVE_LIST_ID_KEY, &next.active_list_id);
        }
        if prev.is_sidebar_open != next.is_sidebar_open {
            self.persistence
                .save(SIDEBAR_OPEN_KEY, &next.is_sidebar_open);
        }

        tracing::debug!(
            op,
            lists = next.task_lists.len(),
            active = %next.active_list_id,
            "committed"
        );

        for observer in &mut self.observers {
            observer(&self.snapshot);
        }
    }

    /// Active list position and the position of `task_id` within it
    fn locate_in_active(&self, task_id: &str) -> Option<(usize, usize)> {
        let list_index = self.snapshot.list_position(&self.snapshot.active_list_id)?;
        let task_index = self.snapshot.task_lists[list_index].task_position(task_id)?;
        Some((list_index, task_index))
    }

    /// The selected task, only if it is `task_id`
    fn selected_task_matching(&self, task_id: &str) -> Option<Arc<Task>> {
        self.snapshot
            .selected_task()
            .filter(|task| task.id == task_id)
            .cloned()
    }

    // ---- lists ----

    /// Append a new list and make it active
    pub fn add_list(&mut self, name: &str) {
        let Some(list) = TaskList::create(name) else {
            return;
        };

        let mut task_lists = self.snapshot.task_lists.as_ref().clone();
        let active_list_id = list.id.clone();
        task_lists.push(Arc::new(list));

        let next = Snapshot {
            active_list_id,
            selected_task_id: None,
            ..self.snapshot.with_lists(task_lists)
        };
        self.commit(next, "add_list");
    }

    /// Remove a list. Deleting the active list activates the first remaining one.
    pub fn delete_list(&mut self, list_id: &str) {
        if self.snapshot.list(list_id).is_none() {
            return;
        }

        let remaining: Vec<Arc<TaskList>> = self
            .snapshot
            .task_lists
            .iter()
            .filter(|l| l.id != list_id)
            .cloned()
            .collect();

        let mut next = self.snapshot.with_lists(remaining);
        if self.snapshot.active_list_id == list_id {
            next.active_list_id = next
                .task_lists
                .first()
                .map(|l| l.id.clone())
                .unwrap_or_default();
            next.selected_task_id = None;
        }
        self.commit(next, "delete_list");
    }

    /// Point the active-list cursor at `list_id`.
    ///
    /// The id is not checked; an unknown id simply yields no active list.
    /// Switching lists clears the task selection.
    pub fn select_list(&mut self, list_id: &str) {
        if self.snapshot.active_list_id == list_id {
            return;
        }
        let next = Snapshot {
            active_list_id: list_id.to_string(),
            selected_task_id: None,
            ..self.snapshot.clone()
        };
        self.commit(next, "select_list");
    }

    /// Rename a list; blank names are rejected
    pub fn rename_list(&mut self, list_id: &str, name: &str) {
        let Some(list_index) = self.snapshot.list_position(list_id) else {
            return;
        };
        let patch = ListPatch {
            name: Some(name.to_string()),
        };
        let current = &self.snapshot.task_lists[list_index];
        let Some(renamed) = current.merge_patch(&patch) else {
            return;
        };
        if renamed == **current {
            return;
        }
        let next = self.snapshot.with_list_replaced(list_index, renamed);
        self.commit(next, "rename_list");
    }

    // ---- tasks ----

    /// Create a task at the front of `list_id`
    pub fn add_task(&mut self, list_id: &str, title: &str) {
        let Some(list_index) = self.snapshot.list_position(list_id) else {
            return;
        };
        let Some(task) = Task::create(title, self.peek_stamp()) else {
            return;
        };
        self.last_stamp = task.created_at;

        let mut list = TaskList::clone(&self.snapshot.task_lists[list_index]);
        list.tasks.insert(0, Arc::new(task));

        let next = self.snapshot.with_list_replaced(list_index, list);
        self.commit(next, "add_task");
    }

    /// Merge `patch` into a task of the active list
    pub fn update_task(&mut self, task_id: &str, patch: &TaskPatch) {
        let Some((list_index, task_index)) = self.locate_in_active(task_id) else {
            return;
        };
        let current = &self.snapshot.task_lists[list_index].tasks[task_index];
        let Some(updated) = current.merge_patch(patch) else {
            return;
        };
        if updated == **current {
            return;
        }
        let next = self
            .snapshot
            .with_task_replaced(list_index, task_index, updated);
        self.commit(next, "update_task");
    }

    /// Remove a task from the active list, clearing the selection if it pointed there
    pub fn delete_task(&mut self, task_id: &str) {
        let Some((list_index, task_index)) = self.locate_in_active(task_id) else {
            return;
        };

        let mut list = TaskList::clone(&self.snapshot.task_lists[list_index]);
        list.tasks.remove(task_index);

        let mut next = self.snapshot.with_list_replaced(list_index, list);
        if next.selected_task_id.as_deref() == Some(task_id) {
            next.selected_task_id = None;
        }
        self.commit(next, "delete_task");
    }

    /// Set the selected-task cursor directly
    pub fn select_task(&mut self, task_id: Option<&str>) {
        if self.snapshot.selected_task_id.as_deref() == task_id {
            return;
        }
        let next = Snapshot {
            selected_task_id: task_id.map(str::to_string),
            ..self.snapshot.clone()
        };
        self.commit(next, "select_task");
    }

    /// Close the detail panel
    pub fn close_details(&mut self) {
        self.select_task(None);
    }

    // ---- subtasks (scoped to the selected task) ----

    /// Append a subtask to the selected task.
    ///
    /// Does nothing unless `task_id` is the selected task of the active list.
    pub fn add_subtask(&mut self, task_id: &str, title: &str) {
        let Some(task) = self.selected_task_matching(task_id) else {
            return;
        };
        let Some(subtask) = Subtask::create(title) else {
            return;
        };

        let mut subtasks = task.subtasks.clone();
        subtasks.push(subtask);
        self.update_task(task_id, &TaskPatch::subtasks(subtasks));
    }

    /// Merge `patch` into one subtask of the selected task
    pub fn update_subtask(&mut self, task_id: &str, subtask_id: &str, patch: &SubtaskPatch) {
        let Some(task) = self.selected_task_matching(task_id) else {
            return;
        };
        let Some(position) = task.subtasks.iter().position(|st| st.id == subtask_id) else {
            return;
        };
        let Some(updated) = task.subtasks[position].merge_patch(patch) else {
            return;
        };

        let mut subtasks = task.subtasks.clone();
        subtasks[position] = updated;
        self.update_task(task_id, &TaskPatch::subtasks(subtasks));
    }

    /// Remove one subtask from the selected task
    pub fn delete_subtask(&mut self, task_id: &str, subtask_id: &str) {
        let Some(task) = self.selected_task_matching(task_id) else {
            return;
        };
        if task.subtask(subtask_id).is_none() {
            return;
        }

        let subtasks: Vec<Subtask> = task
            .subtasks
            .iter()
            .filter(|st| st.id != subtask_id)
            .cloned()
            .collect();
        self.update_task(task_id, &TaskPatch::subtasks(subtasks));
    }

    // ---- preferences ----

    pub fn set_sidebar_open(&mut self, open: bool) {
        if self.snapshot.is_sidebar_open == open {
            return;
        }
        let next = Snapshot {
            is_sidebar_open: open,
            ..self.snapshot.clone()
        };
        self.commit(next, "set_sidebar_open");
    }

    pub fn toggle_sidebar(&mut self) {
        self.set_sidebar_open(!self.snapshot.is_sidebar_open);
    }
}
