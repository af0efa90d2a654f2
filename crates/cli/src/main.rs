use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use goals_core::config::archived_statuses_from_env_value;
use goals_core::{
    CommentId, CoreConfig, GoalChanges, GoalController, GoalId, NewComment, NewGoal, StoreKind,
    DEFAULT_GOAL_DATA_DIR,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "goals")]
#[command(about = "Goal tracking CLI")]
struct Cli {
    /// Owner of the goals being listed or created
    #[arg(long, global = true, default_value = "local")]
    user: String,
    /// Data directory holding the goal store
    #[arg(long, global = true, env = "GOAL_DATA_DIR", default_value = DEFAULT_GOAL_DATA_DIR)]
    data_dir: PathBuf,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List active goals
    List,
    /// List archived goals
    Archived,
    /// Show the next active goal due
    Upcoming,
    /// List active goals due in a window
    Due {
        /// Exclusive lower bound in epoch milliseconds, or 0 for none
        start: String,
        /// Inclusive upper bound in epoch milliseconds, or 0 for none
        stop: String,
    },
    /// Show one goal with its notes rendered as HTML
    Show { id: String },
    /// Create a goal
    Create {
        title: String,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "type")]
        goal_type: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// RFC 3339 due date
        #[arg(long)]
        due: Option<DateTime<Utc>>,
    },
    /// Update a goal
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// Replaces the description; omitted means empty
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "type")]
        goal_type: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// RFC 3339 due date
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<DateTime<Utc>>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },
    /// Delete a goal
    Remove { id: String },
    /// Add a markdown note to a goal
    Note { id: String, content: String },
    /// Delete a note from a goal
    RemoveNote { id: String, note_id: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'goals --help' for commands");
        return Ok(());
    };

    let archived = archived_statuses_from_env_value(std::env::var("GOALS_ARCHIVED_STATUSES").ok())?;
    let cfg = CoreConfig::new(cli.data_dir, StoreKind::Files, archived)?;
    let controller = GoalController::from_config(&cfg);
    let user = cli.user.as_str();

    match command {
        Commands::List => print_json(&controller.list(user).await?)?,
        Commands::Archived => print_json(&controller.list_archived(user).await?)?,
        Commands::Upcoming => print_json(&controller.upcoming_one(user).await?)?,
        Commands::Due { start, stop } => {
            print_json(&controller.by_due_date_range(user, &start, &stop).await?)?
        }
        Commands::Show { id } => print_json(&controller.get(&GoalId::parse(&id)?).await?)?,
        Commands::Create {
            title,
            id,
            description,
            goal_type,
            status,
            due,
        } => {
            let input = NewGoal {
                id: id.as_deref().map(GoalId::parse).transpose()?,
                user_id: None,
                title: Some(title),
                description,
                goal_type,
                status,
                due_date: due,
                create_date: Some(Utc::now()),
            };
            print_json(&controller.create(user, input).await?)?
        }
        Commands::Update {
            id,
            title,
            description,
            goal_type,
            status,
            due,
            clear_due,
        } => {
            let due_date = if clear_due { Some(None) } else { due.map(Some) };
            let changes = GoalChanges {
                title,
                description,
                goal_type,
                status,
                due_date,
            };
            print_json(&controller.update(&GoalId::parse(&id)?, changes).await?)?
        }
        Commands::Remove { id } => print_json(&controller.remove(&GoalId::parse(&id)?).await?)?,
        Commands::Note { id, content } => {
            let note = NewComment {
                content,
                date: Some(Utc::now()),
            };
            print_json(&controller.create_note(&GoalId::parse(&id)?, note).await?)?
        }
        Commands::RemoveNote { id, note_id } => {
            let goal = controller
                .remove_note(&GoalId::parse(&id)?, &CommentId::parse(&note_id)?)
                .await?;
            print_json(&goal)?
        }
    }

    Ok(())
}
