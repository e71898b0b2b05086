//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scopebind")]
#[command(about = "Scoped expression resolution and resource commits over a store snapshot")]
#[command(version)]
pub struct Cli {
    /// Store snapshot file
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Settings file (JSON); defaults apply when absent
    #[arg(long)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the scope visible at an instance
    Scope {
        /// Instance path such as `box,body`; defaults to the selected instance
        #[arg(long)]
        selector: Option<String>,

        /// Variable id to leave out
        #[arg(long)]
        exclude: Option<String>,
    },

    /// Evaluate an expression against the scope
    Eval {
        /// Expression source
        expression: String,

        /// Instance path; defaults to the selected instance
        #[arg(long)]
        selector: Option<String>,

        /// Variable id to leave out of the scope
        #[arg(long)]
        exclude: Option<String>,
    },

    /// Create or update a resource and its variable
    SaveResource {
        /// Resource variable to edit; a new one is created when omitted
        #[arg(long)]
        variable: Option<String>,

        /// Resource name
        #[arg(long)]
        name: Option<String>,

        /// URL expression (literals are JSON encoded, e.g. '"https://x"')
        #[arg(long)]
        url: Option<String>,

        /// Request method: get, post, put or delete
        #[arg(long)]
        method: Option<String>,

        /// Header as `name=expression`; repeat for more, replaces all headers
        #[arg(long = "header")]
        headers: Vec<String>,

        /// Body expression
        #[arg(long)]
        body: Option<String>,
    },

    /// Change the selected instance
    Select {
        /// Instance path such as `box,body`; omit to clear the selection
        selector: Option<String>,
    },
}
