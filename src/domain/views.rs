use super::item::{Task, TaskList};
use std::sync::Arc;

/// Tasks of one list split by completion, each group newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskGroups {
    pub incomplete: Vec<Arc<Task>>,
    pub completed: Vec<Arc<Task>>,
}

impl TaskGroups {
    /// Partition a list's tasks and sort each group by `created_at`, descending
    pub fn for_list(list: &TaskList) -> Self {
        partition_tasks(&list.tasks)
    }

    pub fn is_empty(&self) -> bool {
        self.incomplete.is_empty() && self.completed.is_empty()
    }
}

/// Partition tasks by `completed` and order each side newest first.
///
/// The sort is stable, so tasks sharing a timestamp keep their list order.
pub fn partition_tasks(tasks: &[Arc<Task>]) -> TaskGroups {
    let (mut completed, mut incomplete): (Vec<_>, Vec<_>) =
        tasks.iter().cloned().partition(|task| task.completed);

    completed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    incomplete.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    TaskGroups {
        incomplete,
        completed,
    }
}

/// Checkbox glyph for a task or subtask line
pub fn check_glyph(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Star marker for a task line
pub fn star_glyph(starred: bool) -> &'static str {
    if starred {
        "★"
    } else {
        " "
    }
}

/// Subtask progress badge like "1/2", empty when there are no subtasks
pub fn subtask_badge(task: &Task) -> String {
    if task.subtasks.is_empty() {
        String::new()
    } else {
        format!("{}/{}", task.completed_subtasks(), task.subtasks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Subtask;
    use pretty_assertions::assert_eq;

    fn create_test_task(id: &str, created_at: i64, completed: bool) -> Arc<Task> {
        let mut task = Task::create(id, created_at).unwrap();
        task.id = id.to_string();
        task.completed = completed;
        Arc::new(task)
    }

    fn ids(tasks: &[Arc<Task>]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_partition_simple() {
        let mut list = TaskList::create("L").unwrap();
        list.tasks = vec![
            create_test_task("T1", 100, false),
            create_test_task("T2", 200, true),
        ];

        let groups = TaskGroups::for_list(&list);

        assert_eq!(ids(&groups.incomplete), vec!["T1"]);
        assert_eq!(ids(&groups.completed), vec!["T2"]);
    }

    #[test]
    fn test_partition_sorts_newest_first() {
        let tasks = vec![
            create_test_task("old", 10, false),
            create_test_task("new", 30, false),
            create_test_task("mid", 20, false),
            create_test_task("done-old", 5, true),
            create_test_task("done-new", 50, true),
        ];

        let groups = partition_tasks(&tasks);

        assert_eq!(ids(&groups.incomplete), vec!["new", "mid", "old"]);
        assert_eq!(ids(&groups.completed), vec!["done-new", "done-old"]);
    }

    #[test]
    fn test_partition_ties_keep_list_order() {
        let tasks = vec![
            create_test_task("a", 10, false),
            create_test_task("b", 10, false),
        ];
        let groups = partition_tasks(&tasks);
        assert_eq!(ids(&groups.incomplete), vec!["a", "b"]);
    }

    #[test]
    fn test_partition_shares_tasks() {
        let tasks = vec![create_test_task("a", 10, false)];
        let groups = partition_tasks(&tasks);
        assert!(Arc::ptr_eq(&groups.incomplete[0], &tasks[0]));
    }

    #[test]
    fn test_partition_empty() {
        let groups = partition_tasks(&[]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(check_glyph(true), "[x]");
        assert_eq!(check_glyph(false), "[ ]");
        assert_eq!(star_glyph(true), "★");
        assert_eq!(star_glyph(false), " ");
    }

    #[test]
    fn test_subtask_badge() {
        let mut task = Task::create("Parent", 0).unwrap();
        assert_eq!(subtask_badge(&task), "");

        task.subtasks.push(Subtask::create("One").unwrap());
        let mut done = Subtask::create("Two").unwrap();
        done.completed = true;
        task.subtasks.push(done);

        assert_eq!(subtask_badge(&task), "1/2");
    }
}
