//! loantrail - single-user lead tracker CLI
//!
//! Thin presentational layer over the loantrail-common store: every
//! subcommand opens the store from the resolved data folder, performs one
//! synchronous operation, and prints the result.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use loantrail_common::codec;
use loantrail_common::config;
use loantrail_common::contact::{contact_action, ContactAction};
use loantrail_common::model::{Lead, LeadPatch, LeadStatus};
use loantrail_common::normalize::{self, LeadDraft};
use loantrail_common::storage::FileStorage;
use loantrail_common::store::{LeadStore, StatusMove};
use loantrail_common::time;
use loantrail_common::view::{self, SortKey, ViewParams};

#[derive(Parser)]
#[command(name = "loantrail", version, about = "Single-user sales lead tracker")]
struct Cli {
    /// Data folder override (highest priority; also LOANTRAIL_DATA env var)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a new lead
    Add {
        #[arg(long)]
        name: String,
        /// Phone and/or email, free text
        #[arg(long, default_value = "")]
        contact: String,
        #[arg(long, default_value = "")]
        amount: String,
        #[arg(long, default_value = "New")]
        status: String,
        #[arg(long, default_value = "")]
        source: String,
        /// Comma-separated tag list
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value = "")]
        notes: String,
        /// Next follow-up date, YYYY-MM-DD
        #[arg(long, default_value = "")]
        follow_up: String,
    },
    /// Edit fields of an existing lead (absent flags are left unchanged)
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// YYYY-MM-DD; an empty value clears the follow-up
        #[arg(long)]
        follow_up: Option<String>,
    },
    /// Delete one or more leads by id
    Rm { ids: Vec<String> },
    /// Move a lead one step along the status pipeline
    Move {
        id: String,
        /// Step backward instead of forward
        #[arg(long)]
        back: bool,
    },
    /// List leads with optional search, filters, and sort
    List {
        /// Case-insensitive substring search
        #[arg(long, default_value = "")]
        query: String,
        /// Status filter (e.g. "Won"); omit for all
        #[arg(long)]
        status: Option<String>,
        /// Source filter; omit for all
        #[arg(long)]
        source: Option<String>,
        /// recent | amount-desc | amount-asc | name | follow-up
        #[arg(long, default_value = "recent")]
        sort: String,
    },
    /// Show a single lead in full
    Show { id: String },
    /// Pipeline metrics over the full collection
    Stats,
    /// Export the collection to a dated JSON (or CSV) file
    Export {
        /// Export CSV instead of JSON
        #[arg(long)]
        csv: bool,
        /// Output directory (default: current directory)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Import a JSON array of leads, merging by id
    Import { file: PathBuf },
}

fn main() -> Result<()> {
    let fallback = config::log_filter(config::load_toml_config().as_ref());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
    debug!("loantrail v{} starting", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    let data_dir = config::resolve_data_dir(cli.data_dir.as_deref());
    config::ensure_dir_exists(&data_dir)
        .with_context(|| format!("cannot create data folder {}", data_dir.display()))?;
    let storage = FileStorage::new(config::leads_path(&data_dir));
    debug!(path = %storage.path().display(), "using lead file");
    let mut store = LeadStore::open(Box::new(storage));

    match cli.command {
        Command::Add {
            name,
            contact,
            amount,
            status,
            source,
            tags,
            notes,
            follow_up,
        } => {
            let draft = LeadDraft {
                name,
                contact,
                loan_amount: amount,
                status,
                source,
                tags,
                notes,
                next_follow_up: follow_up,
            };
            let lead = store.create(normalize::normalize(&draft)?);
            println!("Added {} ({})", lead.name, lead.id);
        }
        Command::Edit {
            id,
            name,
            contact,
            amount,
            status,
            source,
            tags,
            notes,
            follow_up,
        } => {
            let patch = edit_patch(name, contact, amount, status, source, tags, notes, follow_up)?;
            match store.update(&id, &patch) {
                Some(lead) => println!("Updated {} ({})", lead.name, lead.id),
                None => println!("No lead with id {id}"),
            }
        }
        Command::Rm { ids } => {
            if ids.is_empty() {
                bail!("no ids given");
            }
            let removed = if ids.len() == 1 {
                usize::from(store.delete(&ids[0]))
            } else {
                store.bulk_delete(&ids)
            };
            println!("Removed {removed} lead(s)");
        }
        Command::Move { id, back } => {
            let direction = if back {
                StatusMove::Back
            } else {
                StatusMove::Forward
            };
            match store.move_status(&id, direction) {
                Some(status) => println!("{id} → {status}"),
                None => println!("No lead with id {id}"),
            }
        }
        Command::List {
            query,
            status,
            source,
            sort,
        } => {
            let params = ViewParams {
                query,
                status: status.as_deref().map(parse_status_filter).transpose()?,
                source,
                sort: SortKey::from_name(&sort)
                    .ok_or_else(|| anyhow::anyhow!("unknown sort key: {sort}"))?,
            };
            print_list(&view::project(store.leads(), &params));
        }
        Command::Show { id } => match store.get(&id) {
            Some(lead) => print_lead(lead),
            None => println!("No lead with id {id}"),
        },
        Command::Stats => print_stats(&view::pipeline_metrics_now(store.leads())),
        Command::Export { csv, out } => {
            let dir = out.unwrap_or_else(|| PathBuf::from("."));
            let today = time::today();
            let (file_name, content) = if csv {
                (
                    codec::export_file_name("csv", today),
                    codec::export_csv(store.leads()),
                )
            } else {
                (
                    codec::export_file_name("json", today),
                    codec::export_json(store.leads())?,
                )
            };
            let path = dir.join(file_name);
            std::fs::write(&path, content)
                .with_context(|| format!("cannot write {}", path.display()))?;
            println!("Exported {} lead(s) to {}", store.len(), path.display());
        }
        Command::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let records = codec::import_json(&text)?;
            let outcome = store.merge_import(records);
            println!(
                "Imported: {} new, {} merged ({} total)",
                outcome.added,
                outcome.merged,
                store.len()
            );
        }
    }

    Ok(())
}

/// Build an update patch from edit flags, coercing through the same rules as
/// form entry. Name edits are manual entry, so a blank name is rejected.
#[allow(clippy::too_many_arguments)]
fn edit_patch(
    name: Option<String>,
    contact: Option<String>,
    amount: Option<String>,
    status: Option<String>,
    source: Option<String>,
    tags: Option<String>,
    notes: Option<String>,
    follow_up: Option<String>,
) -> Result<LeadPatch> {
    let name = match name {
        Some(raw) => {
            let trimmed = raw.trim().to_string();
            if trimmed.is_empty() {
                bail!("name cannot be empty");
            }
            Some(trimmed)
        }
        None => None,
    };
    Ok(LeadPatch {
        id: None,
        name,
        contact: contact.map(|c| c.trim().to_string()),
        loan_amount: amount.as_deref().map(normalize::parse_amount),
        status: status.as_deref().map(LeadStatus::parse_lenient),
        source: source.map(|s| s.trim().to_string()),
        tags: tags.as_deref().map(normalize::parse_tags),
        notes: notes.map(|n| n.trim().to_string()),
        next_follow_up: follow_up.as_deref().map(normalize::parse_date),
        close_date: None,
        created_at: None,
        updated_at: None,
    })
}

fn parse_status_filter(raw: &str) -> Result<LeadStatus> {
    LeadStatus::from_label(raw).ok_or_else(|| anyhow::anyhow!("unknown status: {raw}"))
}

fn print_list(projection: &view::Projection) {
    println!(
        "{:<10} {:<22} {:>12} {:<15} {:<12} {}",
        "ID", "NAME", "AMOUNT", "STATUS", "FOLLOW-UP", "TAGS"
    );
    for lead in &projection.leads {
        println!(
            "{:<10} {:<22} {:>12} {:<15} {:<12} {}",
            short_id(&lead.id),
            truncate(&lead.name, 22),
            format!("{:.0}", lead.loan_amount),
            lead.status,
            lead.next_follow_up.map(time::format_date).unwrap_or_default(),
            lead.tags.join(","),
        );
    }
    println!(
        "\n{} lead(s), volume {:.2}",
        projection.count, projection.volume
    );
}

fn print_lead(lead: &Lead) {
    println!("id:         {}", lead.id);
    println!("name:       {}", lead.name);
    println!("contact:    {}", lead.contact);
    match contact_action(&lead.contact) {
        Some(ContactAction::Call(dial)) => println!("action:     call {dial}"),
        Some(ContactAction::Email(addr)) => println!("action:     email {addr}"),
        None => {}
    }
    println!("amount:     {:.2}", lead.loan_amount);
    println!("status:     {}", lead.status);
    println!("source:     {}", lead.source);
    println!("tags:       {}", lead.tags.join(", "));
    println!("notes:      {}", lead.notes);
    println!(
        "follow-up:  {}",
        lead.next_follow_up.map(time::format_date).unwrap_or_default()
    );
    println!(
        "close date: {}",
        lead.close_date.map(time::format_date).unwrap_or_default()
    );
}

fn print_stats(m: &view::PipelineMetrics) {
    println!("total leads:   {}", m.total);
    println!("active:        {}", m.active);
    println!("won:           {}", m.won);
    println!("lost:          {}", m.lost);
    println!("won volume:    {:.2}", m.won_volume);
    println!("close rate:    {}%", m.close_rate);
    println!("overdue:       {}", m.overdue);
}

fn short_id(id: &str) -> String {
    truncate(id, 8)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}
