use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tareas::config::{get_data_dir, init_local_data_dir};
use tareas::domain::{SubtaskPatch, TaskPatch};
use tareas::logging::init_tracing;
use tareas::persistence::FileStore;
use tareas::render::{render_active, render_lists, render_task};
use tareas::AppState;

#[derive(Parser)]
#[command(name = "tareas")]
#[command(about = "Task lists with subtasks, stars and details", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .tareas directory in the current directory
    Init,
    /// Show the active list (default)
    Show,
    /// Show all lists
    Lists,
    /// Create a list and make it active
    AddList { name: String },
    /// Rename a list
    RenameList { id: String, name: String },
    /// Delete a list
    DeleteList { id: String },
    /// Make a list active
    SelectList { id: String },
    /// Add a task to the front of a list
    AddTask {
        title: String,
        /// Target list. Defaults to the active list.
        #[arg(short, long)]
        list: Option<String>,
    },
    /// Show a task of the active list with its details and subtasks
    Task { id: String },
    /// Edit the title and/or details of a task in the active list
    EditTask {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        details: Option<String>,
    },
    /// Mark a task as completed
    Complete { id: String },
    /// Mark a task as not completed
    Reopen { id: String },
    /// Star a task
    Star { id: String },
    /// Remove the star from a task
    Unstar { id: String },
    /// Delete a task from the active list
    DeleteTask { id: String },
    /// Add a subtask to a task of the active list
    AddSubtask { task: String, title: String },
    /// Flip the completed flag of a subtask
    ToggleSubtask { task: String, subtask: String },
    /// Delete a subtask
    DeleteSubtask { task: String, subtask: String },
    /// Toggle the sidebar preference
    Sidebar,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Show) {
        Commands::Init => {
            let cwd = std::env::current_dir().context("Could not determine current directory")?;
            let data_dir = init_local_data_dir(&cwd)?;
            println!("Initialized data directory: {}", data_dir.display());
            println!("Tareas will now use this local directory for storage.");
            Ok(())
        }
        command => {
            let data_dir = get_data_dir()?;
            let store = FileStore::open(&data_dir).with_context(|| {
                format!("Failed to open data directory: {}", data_dir.display())
            })?;
            let mut app = AppState::load(store);
            run_command(&mut app, command)
        }
    }
}

fn run_command(app: &mut AppState<FileStore>, command: Commands) -> Result<()> {
    match command {
        Commands::Init | Commands::Show => {}
        Commands::Lists => {
            print!("{}", render_lists(app.current()));
            return Ok(());
        }
        Commands::AddList { name } => app.add_list(&name),
        Commands::RenameList { id, name } => app.rename_list(&id, &name),
        Commands::DeleteList { id } => app.delete_list(&id),
        Commands::SelectList { id } => app.select_list(&id),
        Commands::AddTask { title, list } => {
            let list_id = list.unwrap_or_else(|| app.current().active_list_id.clone());
            app.add_task(&list_id, &title);
        }
        Commands::Task { id } => {
            app.select_task(Some(id.as_str()));
            let task = app
                .selected_task()
                .with_context(|| format!("No task {id} in the active list"))?;
            print!("{}", render_task(task));
            return Ok(());
        }
        Commands::EditTask { id, title, details } => {
            let patch = TaskPatch {
                title,
                details,
                ..TaskPatch::default()
            };
            app.update_task(&id, &patch);
        }
        Commands::Complete { id } => app.update_task(&id, &TaskPatch::completed(true)),
        Commands::Reopen { id } => app.update_task(&id, &TaskPatch::completed(false)),
        Commands::Star { id } => app.update_task(&id, &TaskPatch::starred(true)),
        Commands::Unstar { id } => app.update_task(&id, &TaskPatch::starred(false)),
        Commands::DeleteTask { id } => app.delete_task(&id),
        Commands::AddSubtask { task, title } => {
            // Subtask operations act on the selected task
            app.select_task(Some(task.as_str()));
            app.add_subtask(&task, &title);
        }
        Commands::ToggleSubtask { task, subtask } => {
            app.select_task(Some(task.as_str()));
            let completed = app
                .selected_task()
                .and_then(|t| t.subtask(&subtask))
                .map(|st| st.completed)
                .with_context(|| format!("No subtask {subtask} in task {task}"))?;
            app.update_subtask(&task, &subtask, &SubtaskPatch::completed(!completed));
        }
        Commands::DeleteSubtask { task, subtask } => {
            app.select_task(Some(task.as_str()));
            app.delete_subtask(&task, &subtask);
        }
        Commands::Sidebar => {
            app.toggle_sidebar();
            let state = if app.current().is_sidebar_open { "open" } else { "closed" };
            println!("Sidebar {state}");
            return Ok(());
        }
    }

    print!("{}", render_active(app.current()));
    Ok(())
}
