pub mod files;
pub mod kv;
pub mod state;

pub use files::{atomic_write, read_file};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use state::{
    reconcile_active_list_id, PersistedState, Persistence, ACTIVE_LIST_ID_KEY, SIDEBAR_OPEN_KEY,
    TASK_LISTS_KEY,
};
