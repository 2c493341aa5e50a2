pub mod browse;
pub mod export;
pub mod filter_arg;
pub mod init;
pub mod list;
pub mod summary;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::engine::TableView;
use crate::error::{FinviewError, Result};
use crate::loader::{load_from, Snapshot};
use crate::settings::load_settings;
use crate::views::{investments_view, transactions_view};

#[derive(Parser)]
#[command(
    name = "finview",
    version,
    about = "Filter, sort and page through personal-finance transactions and investments."
)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and default page size.
    Init {
        /// Directory holding snapshot.json (default: ~/Documents/finview)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Default rows per page
        #[arg(long)]
        rows: Option<usize>,
    },
    /// Print one page of a table.
    List {
        #[arg(value_enum)]
        view: ViewKind,
        #[command(flatten)]
        args: ViewArgs,
    },
    /// Browse a table interactively.
    Browse {
        #[arg(value_enum)]
        view: ViewKind,
        #[command(flatten)]
        args: ViewArgs,
    },
    /// Write every filtered, sorted record of a table to CSV.
    Export {
        #[arg(value_enum)]
        view: ViewKind,
        /// Output CSV path
        #[arg(long, short)]
        output: String,
        #[command(flatten)]
        args: ViewArgs,
    },
    /// Income, expenses, investments and net worth.
    Summary {
        /// Snapshot file (default: <data_dir>/snapshot.json)
        #[arg(long)]
        file: Option<String>,
    },
    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewKind {
    Transactions,
    Investments,
}

impl ViewKind {
    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Transactions => "Transactions",
            ViewKind::Investments => "Investments",
        }
    }
}

/// Filter, sort and paging flags shared by list, browse and export.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Snapshot file (default: <data_dir>/snapshot.json)
    #[arg(long)]
    pub file: Option<String>,
    /// Case-insensitive search across every column
    #[arg(long)]
    pub search: Option<String>,
    /// Field filter: FIELD=MIN..MAX, FIELD=~TEXT or FIELD=A,B,C (repeatable)
    #[arg(long = "where", value_name = "FIELD=EXPR")]
    pub filters: Vec<String>,
    /// Sort by this field
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
    /// Rows per page (default from settings)
    #[arg(long)]
    pub rows: Option<usize>,
    /// Page to show
    #[arg(long)]
    pub page: Option<usize>,
}

pub(crate) fn build_view(kind: ViewKind, snapshot: &Snapshot) -> Result<TableView> {
    match kind {
        ViewKind::Transactions => transactions_view(snapshot),
        ViewKind::Investments => investments_view(snapshot),
    }
}

/// Apply the command-line filters and sort to a fresh view. The page is left
/// to the caller so it can report an out-of-range request.
pub(crate) fn apply_args(mut view: TableView, args: &ViewArgs) -> Result<TableView> {
    if args.rows == Some(0) {
        return Err(FinviewError::Other("--rows must be at least 1".into()));
    }
    let settings = load_settings();
    view = view
        .with_policy(settings.page_policy)
        .with_rows_per_page(args.rows.unwrap_or(settings.rows_per_page));

    for expr in &args.filters {
        let (field, mut predicate) = filter_arg::parse_where(view.schema(), expr)?;
        if let Some(existing) = view.filters().get(&field) {
            predicate = filter_arg::merge(&field, existing, predicate)?;
        }
        view.set_filter(&field, predicate);
    }
    if let Some(ref text) = args.search {
        view.set_global_filter(text);
    }
    if let Some(ref field) = args.sort {
        if !view.set_sort(field) {
            return Err(FinviewError::UnknownField(field.clone()));
        }
        if args.desc {
            view.set_sort(field);
        }
    }
    Ok(view)
}

/// Move to the requested `--page`. Returns a warning when the page is out of
/// range; the view then stays on its current page.
pub(crate) fn request_page(view: &mut TableView, page: Option<usize>) -> Option<String> {
    let page = page?;
    if view.set_page(page) {
        return None;
    }
    Some(format!(
        "page {page} is out of range (1-{}), showing page {}",
        view.total_pages().max(1),
        view.current_page(),
    ))
}

pub(crate) fn open_view(kind: ViewKind, args: &ViewArgs) -> Result<TableView> {
    let snapshot = load_from(args.file.as_deref())?;
    apply_args(build_view(kind, &snapshot)?, args)
}
