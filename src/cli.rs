use crate::models::{AutocompletePosition, Theme};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author = "Gokul <@bahdotsh>",
    version = env!("CARGO_PKG_VERSION"),
    about = "blurt - snippet triggers, aliases and autocomplete",
    long_about = "blurt stores text snippets behind short triggers and resolves typed tokens to them."
)]
pub struct Blurt {
    #[clap(long, global = true, help = "Store directory (defaults to $BLURT_HOME or ~/.blurt)")]
    pub dir: Option<PathBuf>,

    #[clap(subcommand)]
    pub commands: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new snippet
    Add {
        #[clap(long, short = 't', help = "Trigger; the prefix is added when missing")]
        trigger: String,

        #[clap(long, short = 'd', help = "Short description")]
        description: String,

        #[clap(long, short = 'c', help = "The snippet text")]
        body: String,
    },
    /// Update a snippet by id or trigger
    Update {
        key: String,

        #[clap(long, short = 't', help = "New trigger")]
        trigger: Option<String>,

        #[clap(long, short = 'd', help = "New description")]
        description: Option<String>,

        #[clap(long, short = 'c', help = "New snippet text")]
        body: Option<String>,
    },
    /// Delete snippets by id or trigger
    Delete { key: String },
    /// List snippets, optionally filtered by a query
    List { query: Option<String> },
    /// Expand the token before the caret in a piece of text
    Expand {
        text: String,

        #[clap(long, help = "Caret position in characters (defaults to end of text)")]
        caret: Option<usize>,

        #[clap(long, default_value = " ", help = "Key that was pressed")]
        key: String,

        #[clap(long, help = "Host the text is typed on")]
        host: Option<String>,
    },
    /// Show autocomplete suggestions for a term
    Suggest {
        term: String,

        #[clap(long, help = "Host the term is typed on")]
        host: Option<String>,

        #[clap(long, short = 'n', help = "Maximum number of suggestions")]
        max: Option<usize>,
    },
    /// Report triggers that are prefixes of other triggers
    Overlaps,
    /// Change the trigger prefix and retarget every trigger
    Prefix { prefix: String },
    /// Check whether blurt is active on a host
    Site { host: String },
    /// Show or change settings
    Settings {
        #[clap(long)]
        enabled: Option<bool>,

        #[clap(long, value_enum)]
        theme: Option<Theme>,

        #[clap(long, help = "Key that triggers expansion; empty for Space/Enter")]
        expansion_key: Option<String>,

        #[clap(long)]
        char_limit: Option<usize>,

        #[clap(long)]
        autocomplete: Option<bool>,

        #[clap(long, value_enum)]
        position: Option<AutocompletePosition>,

        #[clap(long)]
        max_items: Option<usize>,

        #[clap(long, help = "Allowed hosts, comma separated")]
        allow: Option<String>,

        #[clap(long, help = "Blocked hosts, comma separated")]
        block: Option<String>,
    },
    /// Import snippets and settings from blurt.snippets.json
    Import { file: PathBuf },
    /// Export snippets and settings to blurt.snippets.json
    Export {
        #[clap(long, default_value = ".", help = "Directory to write into")]
        out: PathBuf,
    },
    /// Remove snippets that repeat an id
    Dedupe,
}
