use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kanban")]
#[command(about = "Command-line client for a remote kanban board service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the board API (or set KANBAN_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Bearer token sent with every request (or set KANBAN_TOKEN)
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Work against an empty in-process board service instead of the API
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Board operations
    Board(BoardCommand),
    /// Favourite board operations
    Favourite(FavouriteCommand),
    /// Section operations
    Section(SectionCommand),
    /// Task operations
    Task(TaskCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// Board commands
#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// List all boards in sidebar order
    List,
    /// Get a board with its sections and tasks
    Get {
        #[arg(long)]
        id: String,
    },
    /// Create a new board
    Create,
    /// Change a board's title
    Rename {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
    },
    /// Change a board's description
    Describe {
        #[arg(long)]
        id: String,
        #[arg(long)]
        description: String,
    },
    /// Change a board's icon
    Icon {
        #[arg(long)]
        id: String,
        #[arg(long)]
        icon: String,
    },
    /// Toggle a board in or out of favourites
    Favourite {
        #[arg(long)]
        id: String,
    },
    /// Delete a board
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Move a board to a new position in the list
    Move {
        #[arg(long)]
        id: String,
        #[arg(long)]
        position: usize,
    },
}

// Favourite commands
#[derive(Args)]
pub struct FavouriteCommand {
    #[command(subcommand)]
    pub action: FavouriteAction,
}

#[derive(Subcommand)]
pub enum FavouriteAction {
    /// List favourite boards
    List,
    /// Move a favourite from one position to another
    Move {
        #[arg(long)]
        from: usize,
        #[arg(long)]
        to: usize,
    },
}

// Section commands
#[derive(Args)]
pub struct SectionCommand {
    #[command(subcommand)]
    pub action: SectionAction,
}

#[derive(Subcommand)]
pub enum SectionAction {
    /// Add a section to a board
    Create {
        #[arg(long)]
        board_id: String,
        #[arg(long)]
        title: Option<String>,
    },
    /// Change a section's title
    Rename {
        #[arg(long)]
        board_id: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
    },
    /// Delete a section and its tasks
    Delete {
        #[arg(long)]
        board_id: String,
        #[arg(long)]
        id: String,
    },
}

// Task commands
#[derive(Args)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task at the top of a section
    Create {
        #[arg(long)]
        board_id: String,
        #[arg(long)]
        section_id: String,
        #[arg(long)]
        title: Option<String>,
    },
    /// Edit a task's title or content
    Edit(TaskEditArgs),
    /// Delete a task
    Delete {
        #[arg(long)]
        board_id: String,
        #[arg(long)]
        id: String,
    },
    /// Move a task within or across sections
    Move(TaskMoveArgs),
}

#[derive(Args)]
pub struct TaskEditArgs {
    #[arg(long)]
    pub board_id: String,
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
}

#[derive(Args)]
pub struct TaskMoveArgs {
    #[arg(long)]
    pub board_id: String,
    #[arg(long)]
    pub id: String,
    /// Destination section (defaults to the task's current section)
    #[arg(long)]
    pub section_id: Option<String>,
    #[arg(long)]
    pub position: usize,
}
