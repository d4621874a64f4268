use super::item::{Subtask, Task, TaskList};
use std::sync::Arc;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

fn seed_task(
    id: &str,
    title: &str,
    details: &str,
    completed: bool,
    starred: bool,
    subtasks: Vec<Subtask>,
    created_at: i64,
) -> Arc<Task> {
    Arc::new(Task {
        id: id.to_string(),
        title: title.to_string(),
        details: details.to_string(),
        completed,
        starred,
        subtasks,
        created_at,
    })
}

fn seed_subtask(id: &str, title: &str, completed: bool) -> Subtask {
    Subtask {
        id: id.to_string(),
        title: title.to_string(),
        completed,
    }
}

/// The collection used when nothing usable is stored yet.
///
/// Timestamps are relative to `now_ms` so the seeded tasks sort sensibly.
pub fn initial_task_lists(now_ms: i64) -> Vec<Arc<TaskList>> {
    vec![
        Arc::new(TaskList {
            id: "my-tasks".to_string(),
            name: "My Tasks".to_string(),
            tasks: vec![
                seed_task(
                    "1",
                    "Finish the project report",
                    "Review sections A and B and send for final review.",
                    false,
                    true,
                    vec![
                        seed_subtask("s1", "Review section A", true),
                        seed_subtask("s2", "Review section B", false),
                    ],
                    now_ms - DAY_MS,
                ),
                seed_task(
                    "2",
                    "Call tech support",
                    "Internet connection keeps dropping.",
                    false,
                    false,
                    Vec::new(),
                    now_ms - 2 * DAY_MS,
                ),
                seed_task("3", "Buy milk and bread", "", true, false, Vec::new(), now_ms),
            ],
        }),
        Arc::new(TaskList {
            id: "work".to_string(),
            name: "Work".to_string(),
            tasks: vec![
                seed_task(
                    "4",
                    "Prepare Monday presentation",
                    "Include last quarter's sales charts.",
                    false,
                    true,
                    Vec::new(),
                    now_ms,
                ),
                seed_task(
                    "5",
                    "Team meeting at 10 AM",
                    "",
                    true,
                    false,
                    Vec::new(),
                    now_ms - 3 * DAY_MS,
                ),
            ],
        }),
    ]
}
