use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use internship_recommender::analytics::{dashboard_stats, user_summary};
use internship_recommender::listings::load_listings;
use internship_recommender::recommender::{build_profile, mark_applied, rank, UserPreferences};
use internship_recommender::resume_parser::extract_skills_from_file;
use internship_recommender::search::{page_count, paginate, search_listings, SearchQuery, DEFAULT_PAGE_SIZE};
use internship_recommender::storage::ApplicationStore;
use internship_recommender::types::{ApplicationRecord, JobListing};
use internship_recommender::utils::split_skill_list;
use internship_recommender::AppConfig;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "internship-recommender")]
#[command(about = "Rank internship listings for a student profile")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print ranked recommendations as JSON
    Recommend(RecommendArgs),
    /// Keyword search over listing descriptions
    Search {
        /// Comma separated keywords
        #[arg(long, default_value = "")]
        skills: String,
        #[arg(long)]
        city: Option<String>,
        /// Hide listings this user already applied to
        #[arg(long)]
        user: Option<String>,
        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Print the skills found in a plain-text resume
    ExtractSkills { resume: PathBuf },
    /// Record an application
    Apply {
        #[arg(long)]
        user: String,
        /// Listing title or id
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        company: String,
        #[arg(long, default_value = "")]
        location: String,
    },
    /// Create the application store
    InitDb,
    /// Admin dashboard numbers for all listings and applications
    Stats,
    /// One user's applications, newest first
    Applications {
        #[arg(long)]
        user: String,
    },
}

#[derive(clap::Args)]
struct RecommendArgs {
    /// Comma separated skills
    #[arg(long, default_value = "")]
    skills: String,
    /// Plain-text resume to extract additional skills from
    #[arg(long)]
    resume: Option<PathBuf>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    domain: Option<String>,
    #[arg(long)]
    min_stipend: Option<i64>,
    #[arg(long)]
    max_stipend: Option<i64>,
    /// Prefer remote listings; `--remote false` overrides a configured `true`
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    remote: Option<bool>,
    #[arg(long)]
    experience: Option<String>,
    #[arg(long)]
    top_n: Option<usize>,
    /// Score without application history
    #[arg(long)]
    no_history: bool,
    /// Flag listings this user already applied to
    #[arg(long)]
    user: Option<String>,
    /// With --user, drop already applied listings instead of flagging them
    #[arg(long, requires = "user")]
    hide_applied: bool,
}

#[derive(Serialize)]
struct SearchPage<'a> {
    total: usize,
    page: usize,
    pages: usize,
    results: &'a [&'a JobListing],
}

fn init_logging() -> Result<()> {
    let file_layer = match std::env::var_os("RECOMMENDER_LOG_FILE") {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true) // Clear file on startup
                .open(&path)
                .context("Failed to open log file")?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_current_span(false)
                    .with_span_list(false),
            )
        }
        None => None,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

async fn open_store(config: &AppConfig) -> Result<ApplicationStore> {
    let store = ApplicationStore::open(&config.storage).await?;
    store.migrate().await?;
    Ok(store)
}

async fn open_store_for_read(config: &AppConfig) -> Result<ApplicationStore> {
    ApplicationStore::open_read_only(&config.storage).await
}

/// The UI offers "Any" for location and domain; both mean no preference.
fn preference_text(value: Option<String>) -> Option<String> {
    value.map(|v| {
        if v.trim().eq_ignore_ascii_case("any") {
            String::new()
        } else {
            v
        }
    })
}

/// Request preferences from the command line, config defaults underneath.
fn request_preferences(args: &RecommendArgs, defaults: &UserPreferences) -> UserPreferences {
    UserPreferences {
        location: preference_text(args.location.clone()),
        domain: preference_text(args.domain.clone()),
        min_stipend: args.min_stipend,
        max_stipend: args.max_stipend,
        remote: args.remote,
        experience: args.experience.clone(),
    }
    .or(defaults)
}

async fn recommend(config: &AppConfig, args: RecommendArgs) -> Result<()> {
    let mut listings = load_listings(&config.data.listings_path).await?;

    let mut skills: BTreeSet<String> = split_skill_list(&args.skills).into_iter().collect();
    if let Some(resume) = &args.resume {
        skills.extend(extract_skills_from_file(resume).await?);
    }

    let preferences = request_preferences(&args, &config.preferences);
    let profile = build_profile(&skills, &preferences);

    let store = if args.no_history && args.user.is_none() {
        None
    } else {
        Some(open_store_for_read(config).await?)
    };

    let history = match (&store, args.no_history) {
        (Some(store), false) => Some(store.load_all().await?),
        _ => None,
    };

    let applied: HashSet<String> = match (&store, &args.user) {
        (Some(store), Some(user)) => store.applied_titles(user).await?,
        _ => HashSet::new(),
    };
    if args.hide_applied {
        listings.retain(|job| !job.applied_in(&applied));
    }

    let top_n = args.top_n.unwrap_or(config.ranking.top_n);
    let mut recommendations = rank(&profile, &listings, history.as_deref(), top_n);
    mark_applied(&mut recommendations, &applied);

    info!(
        "Ranked {} listings for {} skills, returning {} ({} already applied)",
        listings.len(),
        profile.skills.len(),
        recommendations.len(),
        recommendations.iter().filter(|r| r.already_applied).count()
    );

    println!("{}", serde_json::to_string_pretty(&recommendations)?);
    Ok(())
}

async fn search(
    config: &AppConfig,
    skills: String,
    city: Option<String>,
    user: Option<String>,
    page: usize,
) -> Result<()> {
    let listings = load_listings(&config.data.listings_path).await?;

    let mut query = SearchQuery::new(&skills);
    if let Some(city) = city {
        query = query.with_city(&city);
    }
    if let Some(user) = user {
        let store = open_store_for_read(config).await?;
        query = query.with_applied_titles(store.applied_titles(&user).await?);
    }

    let results = search_listings(&listings, &query);
    let output = SearchPage {
        total: results.len(),
        page,
        pages: page_count(results.len(), DEFAULT_PAGE_SIZE),
        results: paginate(&results, page, DEFAULT_PAGE_SIZE),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Recommend(args) => recommend(&config, args).await?,
        Command::Search {
            skills,
            city,
            user,
            page,
        } => search(&config, skills, city, user, page).await?,
        Command::ExtractSkills { resume } => {
            let skills = extract_skills_from_file(&resume).await?;
            println!("{}", serde_json::to_string_pretty(&skills)?);
        }
        Command::Apply {
            user,
            title,
            company,
            location,
        } => {
            let store = open_store(&config).await?;
            let application = ApplicationRecord::new(&user, &title)
                .with_company(&company)
                .with_location(&location)
                .applied_now();
            store.record(&application).await?;
            println!("Recorded application for {} to {}", user, title);
        }
        Command::InitDb => {
            open_store(&config).await?;
            info!(
                "Application store ready at {}",
                config.storage.path.display()
            );
        }
        Command::Stats => {
            let listings = load_listings(&config.data.listings_path).await?;
            let applications = open_store_for_read(&config).await?.load_all().await?;
            let stats = dashboard_stats(&listings, &applications);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Applications { user } => {
            let applications = open_store_for_read(&config).await?.for_user(&user).await?;
            let summary = user_summary(&applications);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recommend_args(argv: &[&str]) -> RecommendArgs {
        let cli = Cli::try_parse_from(argv.iter().copied()).unwrap();
        match cli.command {
            Command::Recommend(args) => args,
            _ => panic!("expected recommend"),
        }
    }

    #[test]
    fn test_remote_flag_forms() {
        assert_eq!(recommend_args(&["app", "recommend"]).remote, None);
        assert_eq!(recommend_args(&["app", "recommend", "--remote"]).remote, Some(true));
        assert_eq!(
            recommend_args(&["app", "recommend", "--remote", "false"]).remote,
            Some(false)
        );
    }

    #[test]
    fn test_remote_false_overrides_config() {
        let defaults = UserPreferences::default()
            .with_location("Pune")
            .with_remote(true);

        let args = recommend_args(&["app", "recommend", "--remote", "false"]);
        let prefs = request_preferences(&args, &defaults);
        assert_eq!(prefs.remote, Some(false));
        assert_eq!(prefs.location.as_deref(), Some("Pune"));

        let args = recommend_args(&["app", "recommend"]);
        assert_eq!(request_preferences(&args, &defaults).remote, Some(true));
    }

    #[test]
    fn test_any_location_clears_preference() {
        let args = recommend_args(&["app", "recommend", "--location", "Any"]);
        let prefs = request_preferences(&args, &UserPreferences::default());
        assert_eq!(prefs.location.as_deref(), Some(""));
    }

    #[test]
    fn test_hide_applied_requires_user() {
        assert!(Cli::try_parse_from(["app", "recommend", "--hide-applied"]).is_err());
        let args = recommend_args(&["app", "recommend", "--user", "asha", "--hide-applied"]);
        assert_eq!(args.user.as_deref(), Some("asha"));
        assert!(args.hide_applied);
    }

    #[test]
    fn test_new_subcommands_parse() {
        let cli = Cli::try_parse_from(["app", "applications", "--user", "asha"]).unwrap();
        assert!(matches!(cli.command, Command::Applications { user } if user == "asha"));
        let cli = Cli::try_parse_from(["app", "stats"]).unwrap();
        assert!(matches!(cli.command, Command::Stats));
    }
}
