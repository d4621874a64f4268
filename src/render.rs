use crate::app::Snapshot;
use crate::domain::{check_glyph, star_glyph, subtask_badge, Task, TaskGroups};
use std::fmt::Write;

/// One line per list, the active one marked with `>`
pub fn render_lists(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for list in snapshot.task_lists.iter() {
        let marker = if list.id == snapshot.active_list_id { ">" } else { " " };
        let _ = writeln!(
            out,
            "{} {} ({}) [{}]",
            marker,
            list.name,
            list.tasks.len(),
            list.id
        );
    }
    if out.is_empty() {
        out.push_str("No lists. Create one with `add-list`.\n");
    }
    out
}

fn render_task_line(out: &mut String, task: &Task, selected: bool) {
    let cursor = if selected { ">" } else { " " };
    let badge = subtask_badge(task);
    let _ = write!(
        out,
        "{} {} {} {}",
        cursor,
        check_glyph(task.completed),
        star_glyph(task.starred),
        task.title
    );
    if !badge.is_empty() {
        let _ = write!(out, " ({badge})");
    }
    let _ = writeln!(out, "  [{}]", task.id);
}

/// The active list: open tasks first, then the completed group
pub fn render_active(snapshot: &Snapshot) -> String {
    let Some(list) = snapshot.active_list() else {
        return "Select a list or create a new one.\n".to_string();
    };

    let selected = snapshot.selected_task_id.as_deref();
    let groups = TaskGroups::for_list(list);
    let mut out = String::new();
    let _ = writeln!(out, "{}", list.name);
    let _ = writeln!(out, "{}", "=".repeat(list.name.chars().count()));

    for task in &groups.incomplete {
        render_task_line(&mut out, task, selected == Some(task.id.as_str()));
    }
    if !groups.completed.is_empty() {
        let _ = writeln!(out, "\nCompleted ({})", groups.completed.len());
        for task in &groups.completed {
            render_task_line(&mut out, task, selected == Some(task.id.as_str()));
        }
    }
    out
}

/// Detail panel for one task: flags, details and subtasks
pub fn render_task(task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {}",
        check_glyph(task.completed),
        star_glyph(task.starred),
        task.title
    );
    if !task.details.is_empty() {
        for line in task.details.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }
    for subtask in &task.subtasks {
        let _ = writeln!(
            out,
            "    {} {}  [{}]",
            check_glyph(subtask.completed),
            subtask.title,
            subtask.id
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{initial_task_lists, Subtask};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn seeded_snapshot() -> Snapshot {
        Snapshot {
            task_lists: Arc::new(initial_task_lists(1_000_000_000)),
            active_list_id: "work".to_string(),
            selected_task_id: Some("4".to_string()),
            is_sidebar_open: true,
        }
    }

    #[test]
    fn test_render_lists_marks_active() {
        let out = render_lists(&seeded_snapshot());
        assert_eq!(
            out,
            "  My Tasks (3) [my-tasks]\n> Work (2) [work]\n"
        );
    }

    #[test]
    fn test_render_lists_empty() {
        let snapshot = Snapshot {
            task_lists: Arc::new(Vec::new()),
            active_list_id: String::new(),
            selected_task_id: None,
            is_sidebar_open: true,
        };
        assert!(render_lists(&snapshot).starts_with("No lists"));
        assert!(render_active(&snapshot).starts_with("Select a list"));
    }

    #[test]
    fn test_render_active_groups() {
        let out = render_active(&seeded_snapshot());
        assert_eq!(
            out,
            "Work\n\
             ====\n\
             > [ ] ★ Prepare Monday presentation  [4]\n\
             \n\
             Completed (1)\n  \
             [x]   Team meeting at 10 AM  [5]\n"
        );
    }

    #[test]
    fn test_render_task_details() {
        let mut task = Task::create("Report", 0).unwrap();
        task.details = "line one\nline two".to_string();
        let mut subtask = Subtask::create("Section A").unwrap();
        subtask.id = "s1".to_string();
        subtask.completed = true;
        task.subtasks.push(subtask);

        assert_eq!(
            render_task(&task),
            "[ ]   Report\n    line one\n    line two\n    [x] Section A  [s1]\n"
        );
    }
}
