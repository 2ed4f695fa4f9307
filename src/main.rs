mod burndown;
mod events;
mod github;
mod model;
mod report;
mod utils;

use crate::burndown::{BurndownCalculator, Granularity};
use crate::events::{collect_events, log_summary, Aggregator, EventLimits};
use crate::github::{since_days_ago, GitHubClient, HttpTransport};
use crate::model::config::DEFAULT_API_URL;
use crate::model::{Config, Error, Issue, Repository, Result, Snapshot};
use crate::report::{update_stories, write_json, write_module, MarkdownReport};
use crate::utils::{MultiProgressNew, StageFinish};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use env_logger::{Env, Target};
use indicatif::MultiProgress;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Collects GitHub issues and activity and computes burndown series")]
struct Args {
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,
    #[arg(long = "api-url", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,
    #[arg(long = "per-page", default_value_t = 100, global = true)]
    per_page: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Fetch every issue of a repository and save the flattened records
    Issues {
        #[arg(long)]
        repo: Repository,
        /// Only issues updated within the last N days
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Collect commit, pull request and issue activity into one event list
    Events {
        #[arg(long)]
        repo: Repository,
        #[arg(long, default_value_t = 30)]
        commits: usize,
        #[arg(long, default_value_t = 30)]
        prs: usize,
        #[arg(long, default_value_t = 50)]
        issues: usize,
        #[arg(long, default_value = "fetch.json")]
        output: PathBuf,
    },
    /// Compute remaining open issues per day or week
    Burndown(BurndownArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct BurndownArgs {
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    repo: Option<Repository>,
    #[arg(long, requires = "repo")]
    days: Option<u32>,
    /// Issue records saved earlier by the `issues` command
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long, requires = "repo")]
    save_issues: Option<PathBuf>,
    #[arg(long, value_parser = parse_date)]
    start: NaiveDate,
    #[arg(long, value_enum, default_value_t = Granularity::Daily)]
    granularity: Granularity,
    #[arg(long = "output-ts")]
    output_ts: Option<PathBuf>,
    #[arg(long = "output-json")]
    output_json: Option<PathBuf>,
    #[arg(long)]
    markdown: Option<PathBuf>,
    /// Presentation file whose `const data = [...]` blocks get rewritten
    #[arg(long)]
    stories: Option<PathBuf>,
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate(value.to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .init();

    let args = Args::parse();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<()> {
    let multi_progress = MultiProgress::default();
    match &args.command {
        Command::Issues { repo, days, output } => {
            let config = config(args)?;
            let issues = issues_fetch(&config, repo, *days, &multi_progress).await?;
            let output = output.clone().unwrap_or_else(|| default_issues_path(repo));
            write_json(&output, &issues)
        }
        Command::Events {
            repo,
            commits,
            prs,
            issues,
            output,
        } => {
            let config = config(args)?;
            let limits = EventLimits {
                commits: *commits,
                pull_requests: *prs,
                issues: *issues,
            };
            events_fetch(&config, repo, &limits, output, &multi_progress).await
        }
        Command::Burndown(burndown_args) => burndown(args, burndown_args, &multi_progress).await,
    }
}

fn config(args: &Args) -> Result<Config> {
    Config::new(args.token.clone(), &args.api_url, args.per_page)
}

fn default_issues_path(repo: &Repository) -> PathBuf {
    PathBuf::from("data").join(format!(
        "github_issues_{}_{}_{}.json",
        repo.owner,
        repo.name,
        Local::now().format("%Y-%m-%d_%H%M%S")
    ))
}

async fn issues_fetch(
    config: &Config,
    repo: &Repository,
    days: Option<u32>,
    multi_progress: &MultiProgress,
) -> Result<Vec<Issue>> {
    let pb = multi_progress.add_stage("issues", format!("Fetch issues of {} ...", repo));
    let since = days.map(|days| since_days_ago(Utc::now(), days));
    if let Some(since) = since {
        info!("Fetching issues of {} updated since {}", repo, since.to_rfc3339());
    }

    let client = GitHubClient::new(HttpTransport::new(config)?, config);
    let progress_pb = pb.clone();
    let progress = move |page: usize| {
        progress_pb.set_message(format!("Fetch issues (#{} page) ...", page));
    };
    match client.fetch_issues(repo, since, None, Box::new(progress)).await {
        Ok(issues) => {
            pb.finish_ok(format!("Completed fetch issues (find {} issues)", issues.len()));
            if issues.is_empty() {
                warn!("No issues found in {}", repo);
            }
            Ok(issues.into_iter().map(Issue::from).collect())
        }
        Err(err) => {
            pb.finish_failed(format!("Failed to fetch issues of {}", repo));
            Err(err)
        }
    }
}

async fn events_fetch(
    config: &Config,
    repo: &Repository,
    limits: &EventLimits,
    output: &Path,
    multi_progress: &MultiProgress,
) -> Result<()> {
    let pb = multi_progress.add_stage("events", format!("Collect activity of {} ...", repo));
    let client = GitHubClient::new(HttpTransport::new(config)?, config);
    let aggregation = collect_events(&client, repo, limits).await;
    if aggregation.all_failed() {
        pb.finish_failed(format!("Every source failed for {}", repo));
        return Err(Error::NoEventSources(repo.to_string()));
    }

    let events = aggregation.aggregate();
    let failed = aggregation
        .failed_sources
        .iter()
        .map(|source| source.to_string())
        .collect::<Vec<_>>();
    if failed.is_empty() {
        pb.finish_ok(format!("Completed collect activity (find {} events)", events.len()));
    } else {
        pb.finish_ok(format!(
            "Completed collect activity (find {} events, skipped {})",
            events.len(),
            failed.join(", ")
        ));
    }
    log_summary(repo, &events);
    write_json(output, &events)
}

async fn burndown(args: &Args, burndown_args: &BurndownArgs, multi_progress: &MultiProgress) -> Result<()> {
    let (issues, title) = match (&burndown_args.input, &burndown_args.repo) {
        (Some(input), _) => {
            let issues = Issue::from_file(input)?;
            info!("Loaded {} issues from {}", issues.len(), input.display());
            (issues, input.display().to_string())
        }
        (None, Some(repo)) => {
            let config = config(args)?;
            let issues = issues_fetch(&config, repo, burndown_args.days, multi_progress).await?;
            if let Some(path) = &burndown_args.save_issues {
                write_json(path, &issues)?;
            }
            (issues, repo.slug())
        }
        (None, None) => return Err(Error::MissingIssueSource),
    };

    let today = Local::now().date_naive();
    let snapshots = issues.burndown(burndown_args.start, today, burndown_args.granularity);
    if snapshots.is_empty() {
        warn!(
            "No snapshots between {} and {}",
            burndown_args.start.format("%Y-%m-%d"),
            today.format("%Y-%m-%d")
        );
    } else {
        info!(
            "Computed {} {:?} snapshots for {}",
            snapshots.len(),
            burndown_args.granularity,
            title
        );
    }
    burndown_save(burndown_args, &snapshots, &title)
}

fn burndown_save(burndown_args: &BurndownArgs, snapshots: &[Snapshot], title: &str) -> Result<()> {
    let mut saved = false;
    if let Some(path) = &burndown_args.output_ts {
        write_module(path, snapshots)?;
        saved = true;
    }
    if let Some(path) = &burndown_args.output_json {
        write_json(path, snapshots)?;
        saved = true;
    }
    if let Some(path) = &burndown_args.markdown {
        snapshots.report_create(path, title, burndown_args.granularity)?;
        saved = true;
    }
    if let Some(path) = &burndown_args.stories {
        update_stories(path, snapshots)?;
        saved = true;
    }
    if !saved {
        println!("{}", serde_json::to_string_pretty(snapshots)?);
    }
    Ok(())
}
