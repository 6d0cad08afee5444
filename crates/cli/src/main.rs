//! Roadmap CLI - plan and track a learning roadmap from the terminal.

use std::io::Read;
use std::path::PathBuf;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use roadmap_core::{
    Difficulty, Milestone, MilestoneId, MilestonePatch, Notification, Resource, ResourceDraft,
    ResourceId, ResourceType, Roadmap, Tone,
};
use roadmap_progress::{MilestoneProgress, TRACKED_TYPES};
use roadmap_search::{tag_catalogue, MilestoneOrder, ResourceFilter, SearchEngine, ViewMode};
use roadmap_storage::{JsonStorage, Storage};
use roadmap_store::{Outcome, RoadmapStore, StoreConfig, ROADMAP_STORAGE_KEY};

#[derive(Parser)]
#[command(name = "roadmap")]
#[command(about = "Learning roadmap planner", long_about = None)]
struct Cli {
    /// Directory holding the saved roadmap
    #[arg(long, global = true, default_value = ".roadmap")]
    data_dir: PathBuf,

    /// Storage key of the roadmap
    #[arg(long, global = true, default_value = ROADMAP_STORAGE_KEY)]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the roadmap
    Show {
        /// Milestone order: index, progress or favorites
        #[arg(long, default_value = "index")]
        order: String,
        /// Which resources to list: all, completed or favorites
        #[arg(long, default_value = "all")]
        view: String,
        /// Only list resources of this type (repeatable)
        #[arg(long = "type")]
        types: Vec<String>,
        /// Only list resources of this difficulty (repeatable)
        #[arg(long = "difficulty")]
        difficulties: Vec<String>,
        /// Only list resources carrying this tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Show progress statistics
    Stats,
    /// Search milestones and resources
    Search {
        /// Text to look for
        query: String,
    },
    /// List every tag in use
    Tags,
    /// Add a milestone
    AddMilestone {
        /// Title
        title: String,
        /// Description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Rename or describe a milestone
    EditMilestone {
        /// Milestone id or 1-based position
        milestone: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
    },
    /// Add a resource to a milestone
    AddResource {
        /// Milestone id or 1-based position
        milestone: String,
        /// Title
        title: String,
        /// Link
        url: String,
        /// Description
        #[arg(long, default_value = "")]
        description: String,
        /// Resource type
        #[arg(long = "type")]
        kind: Option<String>,
        /// Difficulty
        #[arg(long)]
        difficulty: Option<String>,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Mark a resource complete, or incomplete again
    ToggleComplete {
        /// Milestone id or 1-based position
        milestone: String,
        /// Resource id or 1-based position
        resource: String,
    },
    /// Add a resource to favorites, or remove it
    ToggleFavorite {
        /// Milestone id or 1-based position
        milestone: String,
        /// Resource id or 1-based position
        resource: String,
    },
    /// Mark every resource of a milestone complete
    CompleteAll {
        /// Milestone id or 1-based position
        milestone: String,
        /// Mark everything incomplete instead
        #[arg(long)]
        reset: bool,
    },
    /// Collapse or expand a milestone
    Fold {
        /// Milestone id or 1-based position
        milestone: String,
    },
    /// Move a milestone to another position
    Move {
        /// Current 1-based position
        from: usize,
        /// New 1-based position
        to: usize,
    },
    /// Delete a milestone and its resources
    DeleteMilestone {
        /// Milestone id or 1-based position
        milestone: String,
    },
    /// Delete a resource
    DeleteResource {
        /// Milestone id or 1-based position
        milestone: String,
        /// Resource id or 1-based position
        resource: String,
    },
    /// Add or remove a resource tag
    Tag {
        /// Milestone id or 1-based position
        milestone: String,
        /// Resource id or 1-based position
        resource: String,
        /// Tag text
        tag: String,
        /// Remove the tag instead of adding it
        #[arg(long)]
        remove: bool,
    },
    /// Print the roadmap as JSON
    Export,
    /// Replace the roadmap with a JSON document
    Import {
        /// File to read; standard input when omitted
        file: Option<PathBuf>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let storage = JsonStorage::new(&cli.data_dir)
        .with_context(|| format!("Cannot open data directory {}", cli.data_dir.display()))?;
    let config = StoreConfig {
        storage_key: cli.key,
        ..Default::default()
    };
    let mut store = RoadmapStore::open_with_config(storage, config);
    if let Some(err) = store.load_error() {
        report(&err.notification());
    }

    match cli.command {
        Commands::Show { order, view, types, difficulties, tags } => {
            let mut filter = ResourceFilter::new().with_view(parse_view(&view)?);
            for kind in types {
                filter = filter.with_type(kind.parse()?);
            }
            for difficulty in difficulties {
                filter = filter.with_difficulty(difficulty.parse()?);
            }
            for tag in tags {
                filter = filter.with_tag(tag);
            }
            print_roadmap(store.roadmap(), parse_order(&order)?, &filter);
        }
        Commands::Stats => {
            let stats = store.statistics();
            println!("Progress: {}% ({}/{} resources)",
                stats.progress_percentage,
                stats.completed_resources,
                stats.total_resources,
            );
            println!("Favorites: {}", stats.favorite_resources);

            println!("By difficulty:");
            for difficulty in Difficulty::ALL {
                let tally = stats.difficulty_stats.get(difficulty);
                println!("  {:<12} {}/{}", difficulty, tally.completed, tally.total);
            }

            println!("By type:");
            for kind in TRACKED_TYPES {
                let tally = stats.type_stats.get(&kind).copied().unwrap_or_default();
                println!("  {:<12} {}/{}", kind, tally.completed, tally.total);
            }

            if !stats.recently_completed.is_empty() {
                println!("Recently completed:");
                for recent in &stats.recently_completed {
                    println!("  {} ({})", recent.resource.title, recent.milestone_title);
                }
            }
        }
        Commands::Search { query } => {
            let found = SearchEngine::search(store.roadmap(), &query);
            println!("Milestones matching \"{}\" ({})", query.trim(), found.len());
            for milestone in &found {
                print_milestone(milestone, &ResourceFilter::new());
            }
        }
        Commands::Tags => {
            for tag in tag_catalogue(store.roadmap().resources().map(|(_, r)| r)) {
                println!("{}", tag);
            }
        }
        Commands::AddMilestone { title, description } => {
            let outcome = store.add_milestone(title, description);
            finish(&outcome);
        }
        Commands::EditMilestone { milestone, title, description } => {
            let id = resolve_milestone(store.roadmap(), &milestone)?;
            let patch = MilestonePatch {
                title,
                description,
                ..Default::default()
            };
            let outcome = store.update_milestone(&id, &patch);
            finish(&outcome);
        }
        Commands::AddResource { milestone, title, url, description, kind, difficulty, tags } => {
            let id = resolve_milestone(store.roadmap(), &milestone)?;
            let mut draft = ResourceDraft::new(title, url)
                .with_description(description)
                .with_tags(tags);
            if let Some(kind) = kind {
                draft = draft.with_kind(kind.parse::<ResourceType>()?);
            }
            if let Some(difficulty) = difficulty {
                draft = draft.with_difficulty(difficulty.parse::<Difficulty>()?);
            }
            let outcome = store.add_resource(&id, draft);
            finish(&outcome);
        }
        Commands::ToggleComplete { milestone, resource } => {
            let (mid, rid) = resolve_resource(store.roadmap(), &milestone, &resource)?;
            let outcome = store.toggle_resource_completion(&mid, &rid);
            finish(&outcome);
        }
        Commands::ToggleFavorite { milestone, resource } => {
            let (mid, rid) = resolve_resource(store.roadmap(), &milestone, &resource)?;
            let outcome = store.toggle_resource_favorite(&mid, &rid);
            finish(&outcome);
        }
        Commands::CompleteAll { milestone, reset } => {
            let id = resolve_milestone(store.roadmap(), &milestone)?;
            let outcome = store.mark_all_resources_complete(&id, !reset);
            finish(&outcome);
        }
        Commands::Fold { milestone } => {
            let id = resolve_milestone(store.roadmap(), &milestone)?;
            let outcome = store.toggle_milestone_expansion(&id);
            finish(&outcome);
        }
        Commands::Move { from, to } => {
            if from == 0 || to == 0 {
                bail!("Positions start at 1");
            }
            let outcome = store.move_milestone(from - 1, to - 1)?;
            finish(&outcome);
        }
        Commands::DeleteMilestone { milestone } => {
            let id = resolve_milestone(store.roadmap(), &milestone)?;
            let outcome = store.delete_milestone(&id);
            finish(&outcome);
        }
        Commands::DeleteResource { milestone, resource } => {
            let (mid, rid) = resolve_resource(store.roadmap(), &milestone, &resource)?;
            let outcome = store.delete_resource(&mid, &rid);
            finish(&outcome);
        }
        Commands::Tag { milestone, resource, tag, remove } => {
            let (mid, rid) = resolve_resource(store.roadmap(), &milestone, &resource)?;
            let outcome = if remove {
                store.remove_resource_tag(&mid, &rid, &tag)
            } else {
                store.add_resource_tag(&mid, &rid, &tag)
            };
            finish(&outcome);
        }
        Commands::Export => {
            println!("{}", store.export_data()?);
        }
        Commands::Import { file } => {
            let raw = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Cannot read {}", path.display()))?,
                None => {
                    let mut raw = String::new();
                    std::io::stdin().read_to_string(&mut raw)?;
                    raw
                }
            };
            let outcome = import(&mut store, &raw)?;
            finish(&outcome);
        }
    }

    Ok(())
}

/// Replace the roadmap with `raw`. A rejected document is returned as the
/// command's error and reported once, by `main`.
fn import<S: Storage>(store: &mut RoadmapStore<S>, raw: &str) -> Result<Outcome> {
    Ok(store.import_data(raw)?)
}

/// Print what a mutation did, and whether it was saved.
fn finish(outcome: &Outcome) {
    debug!(change = ?outcome.change, "Command finished");
    if outcome.change.is_unchanged() {
        println!("Nothing changed");
    }
    if let Some(notification) = outcome.notification() {
        report(&notification);
    }
    if let Some(warning) = outcome.warning() {
        report(&warning);
    }
}

fn report(notification: &Notification) {
    match notification.tone {
        Tone::Default => println!("{}: {}", notification.title, notification.description),
        Tone::Destructive => eprintln!("{}: {}", notification.title, notification.description),
    }
}

fn print_roadmap(roadmap: &Roadmap, order: MilestoneOrder, filter: &ResourceFilter) {
    println!("{}", roadmap.title);
    if !roadmap.description.is_empty() {
        println!("  {}", roadmap.description);
    }
    for milestone in order.arrange(&roadmap.milestones) {
        print_milestone(milestone, filter);
    }
}

fn print_milestone(milestone: &Milestone, filter: &ResourceFilter) {
    let progress = MilestoneProgress::of(milestone);
    let marker = if milestone.is_expanded { "-" } else { "+" };
    println!("{} {} [{}%, {}/{}] ({})",
        marker,
        milestone.title,
        progress.percentage,
        progress.completed,
        progress.total,
        milestone.id,
    );
    if !milestone.is_expanded {
        return;
    }
    for resource in filter.apply(&milestone.resources) {
        print_resource(resource);
    }
}

fn print_resource(resource: &Resource) {
    let done = if resource.is_completed() { "x" } else { " " };
    let star = if resource.is_favorite() { " *" } else { "" };
    let kind = resource.kind().map(|k| k.as_str()).unwrap_or("-");
    let difficulty = resource.difficulty().map(|d| d.as_str()).unwrap_or("-");
    println!("    [{}] {}{} | {} | {} | {}", done, resource.title, star, kind, difficulty, resource.url);
    if !resource.tags.is_empty() {
        println!("        tags: {}", resource.tags.join(", "));
    }
    println!("        id: {}", resource.id);
}

/// Find a milestone by id, or by 1-based position.
fn resolve_milestone(roadmap: &Roadmap, reference: &str) -> Result<MilestoneId> {
    let id = MilestoneId::from(reference);
    if roadmap.milestone(&id).is_some() {
        return Ok(id);
    }
    reference
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| roadmap.milestones.get(i))
        .map(|m| m.id.clone())
        .ok_or_else(|| anyhow!("No milestone '{}'", reference))
}

/// Find a resource by id or 1-based position inside its milestone.
fn resolve_resource(
    roadmap: &Roadmap,
    milestone: &str,
    reference: &str,
) -> Result<(MilestoneId, ResourceId)> {
    let milestone_id = resolve_milestone(roadmap, milestone)?;
    let milestone = roadmap
        .milestone(&milestone_id)
        .ok_or_else(|| anyhow!("No milestone '{}'", milestone))?;

    let id = ResourceId::from(reference);
    if milestone.resource(&id).is_some() {
        return Ok((milestone_id, id));
    }
    let resource = reference
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| milestone.resources.get(i))
        .ok_or_else(|| anyhow!("No resource '{}' in \"{}\"", reference, milestone.title))?;
    Ok((milestone_id, resource.id.clone()))
}

fn parse_view(s: &str) -> Result<ViewMode> {
    match s.to_lowercase().as_str() {
        "all" => Ok(ViewMode::All),
        "completed" => Ok(ViewMode::Completed),
        "favorites" => Ok(ViewMode::Favorites),
        _ => bail!("Unknown view '{}'", s),
    }
}

fn parse_order(s: &str) -> Result<MilestoneOrder> {
    match s.to_lowercase().as_str() {
        "index" => Ok(MilestoneOrder::Index),
        "progress" => Ok(MilestoneOrder::Progress),
        "favorites" => Ok(MilestoneOrder::Favorites),
        _ => bail!("Unknown order '{}'", s),
    }
}
