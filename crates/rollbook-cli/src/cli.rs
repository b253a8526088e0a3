use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rollbook",
    about = "Rollbook: a congregation roster kept as plain JSONL collections",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the .rollbook data layout with empty collections
    Init {
        /// Directory that will hold the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import roster rows from an LCR source
    Import {
        #[command(subcommand)]
        command: ImportCommands,
    },

    /// Export collections as portable text
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },

    /// Manage individual member records
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },

    /// Household groupings derived from member records
    Household {
        #[command(subcommand)]
        command: HouseholdCommands,
    },

    /// Family work lists and the weekly review rotation
    Family {
        #[command(subcommand)]
        command: FamilyCommands,
    },

    /// Birthday and anniversary reminder drafts
    Reminders {
        #[command(subcommand)]
        command: ReminderCommands,
    },

    /// Map plot locations
    Plot {
        #[command(subcommand)]
        command: PlotCommands,
    },

    /// Neighborhood map image settings
    Map {
        #[command(subcommand)]
        command: MapCommands,
    },

    /// Roster summary over the current member collection
    Summary {
        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the HTTP read API
    Serve {
        /// Bind address for the HTTP listener
        #[arg(long, default_value = "127.0.0.1:7877")]
        addr: String,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,
    },
}

#[derive(Subcommand)]
pub enum ImportCommands {
    /// Import from pasted LCR table text (tab-separated)
    Tsv {
        /// Input file, or `-` to read stdin
        file: String,

        /// Plan the import without writing the member collection
        #[arg(long)]
        dry_run: bool,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import from a saved report JSON document
    Report {
        /// Input file, or `-` to read stdin
        file: String,

        /// Plan the import without writing the member collection
        #[arg(long)]
        dry_run: bool,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import from a raw RSC page payload
    Rsc {
        /// Input file, or `-` to read stdin
        file: String,

        /// Plan the import without writing the member collection
        #[arg(long)]
        dry_run: bool,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export members as tab-separated text in the canonical column order
    Tsv {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<String>,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,
    },
}

#[derive(Subcommand)]
pub enum MemberCommands {
    /// Add a member record
    Add {
        /// Preferred name, usually `Last, First`
        preferred_name: String,

        /// Head-of-house key (defaults to the preferred name)
        #[arg(long)]
        head_of_house: Option<String>,

        /// Street address
        #[arg(long)]
        address: Option<String>,

        /// Individual phone
        #[arg(long)]
        phone: Option<String>,

        /// Individual email
        #[arg(long)]
        email: Option<String>,

        /// Age in years
        #[arg(long, default_value_t = 0)]
        age: u8,

        /// Gender, M or F
        #[arg(long, default_value = "M")]
        gender: String,

        /// Birth date as LCR reports it, e.g. `5 Mar 1985`
        #[arg(long)]
        birth_date: Option<String>,

        /// Marriage date as LCR reports it
        #[arg(long)]
        marriage_date: Option<String>,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List members sorted by name
    List {
        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one member record in full
    Show {
        /// Member id
        id: String,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update fields on an existing member
    Update {
        /// Member id
        id: String,

        /// New preferred name
        #[arg(long)]
        preferred_name: Option<String>,

        /// New head-of-house key
        #[arg(long)]
        head_of_house: Option<String>,

        /// New street address
        #[arg(long)]
        address: Option<String>,

        /// New individual phone
        #[arg(long)]
        phone: Option<String>,

        /// New individual email
        #[arg(long)]
        email: Option<String>,

        /// New age
        #[arg(long)]
        age: Option<u8>,

        /// New gender, M or F
        #[arg(long)]
        gender: Option<String>,

        /// New birth date
        #[arg(long)]
        birth_date: Option<String>,

        /// New marriage date
        #[arg(long)]
        marriage_date: Option<String>,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a member record
    Remove {
        /// Member id
        id: String,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search members by name, household, address, email, or phone
    Search {
        /// Search term (case-insensitive substring)
        term: String,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum HouseholdCommands {
    /// List households grouped from the member collection
    List {
        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum FamilyCommands {
    /// Create one family per household, rotating review days Monday-Friday
    Init {
        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List families joined against the member collection
    List {
        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one family with members and todo items
    Show {
        /// Family id
        id: String,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a family's weekly review day
    SetReviewDay {
        /// Family id
        id: String,

        /// Weekday, monday through friday
        day: String,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set or clear a family's notes
    SetNotes {
        /// Family id
        id: String,

        /// Notes text (omit to clear)
        notes: Option<String>,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Drop families referencing unknown members, then re-run init
    Repair {
        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Family todo items
    Todo {
        #[command(subcommand)]
        command: FamilyTodoCommands,
    },
}

#[derive(Subcommand)]
pub enum FamilyTodoCommands {
    /// Add a todo item to a family
    Add {
        /// Family id
        family_id: String,

        /// Todo title
        title: String,

        /// Category the item groups under
        #[arg(long, default_value = "other")]
        category: String,

        /// Priority: low, medium, or high
        #[arg(long, default_value = "medium")]
        priority: String,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark a todo item completed
    Done {
        /// Family id
        family_id: String,

        /// Todo item id
        todo_id: String,

        /// Mark the item not completed instead
        #[arg(long)]
        undo: bool,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Flip a todo item's completion state
    Toggle {
        /// Family id
        family_id: String,

        /// Todo item id
        todo_id: String,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a todo item from a family
    Remove {
        /// Family id
        family_id: String,

        /// Todo item id
        todo_id: String,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List todo items across all families, grouped by category
    List {
        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ReminderCommands {
    /// Build reminder drafts for a date
    Today {
        /// Target date as YYYY-MM-DD (defaults to the local date)
        #[arg(long)]
        date: Option<String>,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark a greeting handled for a month
    Complete {
        /// Reminder kind: birthday or anniversary
        kind: String,

        /// Member id for birthdays, head-of-house for anniversaries
        id: String,

        /// Month as YYYY-MM (defaults to the current month)
        #[arg(long)]
        month: Option<String>,

        /// Remove the mark instead
        #[arg(long)]
        undo: bool,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List completion records
    Completions {
        /// Month as YYYY-MM (all months when omitted)
        #[arg(long)]
        month: Option<String>,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum PlotCommands {
    /// Add a plot location to the map
    Add {
        /// Street address the plot marks
        address: String,

        /// Horizontal position as a percentage of the map image
        #[arg(long, default_value_t = 50.0)]
        x: f64,

        /// Vertical position as a percentage of the map image
        #[arg(long, default_value_t = 50.0)]
        y: f64,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List plots joined against families
    List {
        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assign a family to a plot, or clear the assignment
    SetFamily {
        /// Plot id
        id: String,

        /// Family id to assign (omit to clear)
        #[arg(long)]
        family: Option<String>,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a plot to a new map position
    Move {
        /// Plot id
        id: String,

        /// New horizontal position as a percentage
        #[arg(long)]
        x: f64,

        /// New vertical position as a percentage
        #[arg(long)]
        y: f64,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a plot from the map
    Remove {
        /// Plot id
        id: String,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum MapCommands {
    /// Show the configured map image
    Show {
        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update the map image settings
    Set {
        /// Map image URL
        #[arg(long)]
        image_url: Option<String>,

        /// Map image alt text
        #[arg(long)]
        image_alt: Option<String>,

        /// Directory that holds the .rollbook data
        #[arg(long, default_value = ".")]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
