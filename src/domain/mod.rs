pub mod defaults;
pub mod item;
pub mod patch;
pub mod views;

pub use defaults::initial_task_lists;
pub use item::{clean_title, new_id, normalize_lists, Subtask, Task, TaskList};
pub use patch::{ListPatch, MergePatch, SubtaskPatch, TaskPatch};
pub use views::{check_glyph, partition_tasks, star_glyph, subtask_badge, TaskGroups};
