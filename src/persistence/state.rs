use super::kv::KeyValueStore;
use crate::domain::{initial_task_lists, normalize_lists, TaskList};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Key holding the serialized array of task lists
pub const TASK_LISTS_KEY: &str = "taskLists";
/// Key holding the serialized active list id
pub const ACTIVE_LIST_ID_KEY: &str = "activeListId";
/// Key holding the serialized sidebar-open flag
pub const SIDEBAR_OPEN_KEY: &str = "isSidebarOpen";

/// Typed, failure-tolerant access to a [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    backend: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_inner(self) -> S {
        self.backend
    }

    /// Read and deserialize `key`, substituting `default()` when the key is
    /// missing, unreadable or malformed. Never fails.
    pub fn load<T, F>(&self, key: &str, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.backend.get(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key, error = %e, "stored value is malformed, using default");
                    default()
                }
            },
            Ok(None) => {
                tracing::info!(key, "no stored value, using default");
                default()
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored value, using default");
                default()
            }
        }
    }

    /// Serialize and write `value` under `key`. Best-effort: failures are logged and dropped.
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(key, error = %e, "failed to serialize value");
                return;
            }
        };
        if let Err(e) = self.backend.set(key, &json) {
            tracing::error!(key, error = %e, "failed to persist value");
        }
    }

    /// Stored active list id. Accepts a JSON string as well as a bare legacy value.
    pub fn load_active_list_id(&self) -> Option<String> {
        let raw = match self.backend.get(ACTIVE_LIST_ID_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = ACTIVE_LIST_ID_KEY, error = %e, "failed to read stored value");
                return None;
            }
        };
        let id = serde_json::from_str::<String>(&raw).unwrap_or_else(|_| raw.trim().to_string());
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }

    /// Load the three persisted slices and reconcile them with each other
    pub fn load_state(&self, now_ms: i64) -> PersistedState {
        let mut task_lists: Vec<Arc<TaskList>> =
            self.load(TASK_LISTS_KEY, || initial_task_lists(now_ms));

        let dropped = normalize_lists(&mut task_lists);
        if dropped > 0 {
            tracing::warn!(dropped, "dropped stored entries with duplicate ids");
        }

        let active_list_id = reconcile_active_list_id(&task_lists, self.load_active_list_id());
        let is_sidebar_open = self.load(SIDEBAR_OPEN_KEY, || true);

        PersistedState {
            task_lists,
            active_list_id,
            is_sidebar_open,
        }
    }
}

/// Everything read back from storage on startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedState {
    pub task_lists: Vec<Arc<TaskList>>,
    pub active_list_id: String,
    pub is_sidebar_open: bool,
}

/// Keep `stored` if it names an existing list, else fall back to the first list, else empty
pub fn reconcile_active_list_id(lists: &[Arc<TaskList>], stored: Option<String>) -> String {
    match stored {
        Some(id) if lists.iter().any(|l| l.id == id) => id,
        _ => lists.first().map(|l| l.id.clone()).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;
    use crate::error::{PersistError, PersistResult};
    use crate::persistence::{FileStore, MemoryStore};
    use pretty_assertions::assert_eq;

    /// Backend whose every operation fails
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> PersistResult<Option<String>> {
            Err(PersistError::Unavailable("disk gone".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> PersistResult<()> {
            Err(PersistError::Unavailable("disk gone".to_string()))
        }
    }

    fn sample_lists() -> Vec<Arc<TaskList>> {
        let mut list = TaskList::create("Groceries").unwrap();
        let mut task = Task::create("Milk", 1_000).unwrap();
        task.details = "2 litres".to_string();
        list.tasks.push(Arc::new(task));
        vec![Arc::new(list), Arc::new(TaskList::create("Empty").unwrap())]
    }

    #[test]
    fn test_load_missing_key_uses_default() {
        let persistence = Persistence::new(MemoryStore::new());
        let value: bool = persistence.load(SIDEBAR_OPEN_KEY, || true);
        assert!(value);
    }

    #[test]
    fn test_load_malformed_uses_default() {
        let persistence =
            Persistence::new(MemoryStore::with_entries([(TASK_LISTS_KEY, "{not json")]));
        let lists: Vec<Arc<TaskList>> = persistence.load(TASK_LISTS_KEY, Vec::new);
        assert!(lists.is_empty());
    }

    #[test]
    fn test_load_read_failure_uses_default() {
        let persistence = Persistence::new(BrokenStore);
        let open: bool = persistence.load(SIDEBAR_OPEN_KEY, || false);
        assert!(!open);
        assert_eq!(persistence.load_active_list_id(), None);
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let mut persistence = Persistence::new(BrokenStore);
        persistence.save(SIDEBAR_OPEN_KEY, &true);
    }

    #[test]
    fn test_round_trip_all_keys() {
        let mut persistence = Persistence::new(MemoryStore::new());
        let lists = sample_lists();
        let active = lists[1].id.clone();

        persistence.save(TASK_LISTS_KEY, &lists);
        persistence.save(ACTIVE_LIST_ID_KEY, &active);
        persistence.save(SIDEBAR_OPEN_KEY, &false);

        let loaded_lists: Vec<Arc<TaskList>> = persistence.load(TASK_LISTS_KEY, Vec::new);
        assert_eq!(loaded_lists, lists);
        assert_eq!(persistence.load_active_list_id(), Some(active));
        assert!(!persistence.load(SIDEBAR_OPEN_KEY, || true));
    }

    #[test]
    fn test_round_trip_file_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lists = sample_lists();
        {
            let mut persistence = Persistence::new(FileStore::open(temp_dir.path()).unwrap());
            persistence.save(TASK_LISTS_KEY, &lists);
        }

        let persistence = Persistence::new(FileStore::open(temp_dir.path()).unwrap());
        let loaded: Vec<Arc<TaskList>> = persistence.load(TASK_LISTS_KEY, Vec::new);
        assert_eq!(loaded, lists);
    }

    #[test]
    fn test_active_list_id_accepts_bare_value() {
        let persistence = Persistence::new(MemoryStore::with_entries([(ACTIVE_LIST_ID_KEY, "work")]));
        assert_eq!(persistence.load_active_list_id(), Some("work".to_string()));

        let empty = Persistence::new(MemoryStore::with_entries([(ACTIVE_LIST_ID_KEY, "\"\"")]));
        assert_eq!(empty.load_active_list_id(), None);
    }

    #[test]
    fn test_load_state_defaults() {
        let persistence = Persistence::new(MemoryStore::new());
        let state = persistence.load_state(1_000_000);

        assert_eq!(state.task_lists, initial_task_lists(1_000_000));
        assert_eq!(state.active_list_id, "my-tasks");
        assert!(state.is_sidebar_open);
    }

    #[test]
    fn test_load_state_rejects_dangling_active_id() {
        let lists = sample_lists();
        let json = serde_json::to_string(&lists).unwrap();
        let persistence = Persistence::new(MemoryStore::with_entries([
            (TASK_LISTS_KEY, json.as_str()),
            (ACTIVE_LIST_ID_KEY, "\"gone\""),
            (SIDEBAR_OPEN_KEY, "false"),
        ]));

        let state = persistence.load_state(0);

        assert_eq!(state.task_lists, lists);
        assert_eq!(state.active_list_id, lists[0].id);
        assert!(!state.is_sidebar_open);
    }

    #[test]
    fn test_load_state_empty_collection() {
        let persistence = Persistence::new(MemoryStore::with_entries([
            (TASK_LISTS_KEY, "[]"),
            (ACTIVE_LIST_ID_KEY, "\"work\""),
        ]));

        let state = persistence.load_state(0);

        assert!(state.task_lists.is_empty());
        assert_eq!(state.active_list_id, "");
    }

    #[test]
    fn test_reconcile_keeps_valid_id() {
        let lists = sample_lists();
        let id = lists[1].id.clone();
        assert_eq!(reconcile_active_list_id(&lists, Some(id.clone())), id);
        assert_eq!(reconcile_active_list_id(&lists, None), lists[0].id);
        assert_eq!(reconcile_active_list_id(&[], None), "");
    }
}
