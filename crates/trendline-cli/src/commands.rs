//! # Project Subcommands
//!
//! - `create`: Create a project (end date must come after start date).
//! - `show`: Print stats, chart table, and history for a project.
//! - `log`: Record the tasks completed on a day.
//! - `update`: Rename a project or move its dates.
//! - `link`: Print the shareable web link for a project.
//!
//! Input guards run before any request is sent: a rejected date never
//! reaches the server.

use std::io::Write;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Args;
use trendline_client::{CreateProjectRequest, ProgressRequest, TrendlineClient, UpdateProjectRequest};
use trendline_core::{burndown, today_utc, MetadataPatch, Project, ProjectId};

use crate::render;

/// Clap value parser for `YYYY-MM-DD` arguments.
pub fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    trendline_core::parse_date(value).map_err(|e| e.to_string())
}

/// Clap value parser for project IDs. Surrounding whitespace is dropped.
pub fn parse_project_id(value: &str) -> Result<ProjectId, String> {
    ProjectId::new(value.trim()).map_err(|e| e.to_string())
}

/// Arguments for `trendline create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Project identifier (also the share-link path segment).
    #[arg(value_parser = parse_project_id)]
    pub id: ProjectId,
    /// Total number of tasks.
    #[arg(long)]
    pub tasks: i64,
    /// First day, YYYY-MM-DD.
    #[arg(long, value_parser = parse_date_arg)]
    pub start: NaiveDate,
    /// Last day, YYYY-MM-DD.
    #[arg(long, value_parser = parse_date_arg)]
    pub end: NaiveDate,
    /// Display name.
    #[arg(long)]
    pub name: Option<String>,
    /// Fail instead of overwriting an existing project.
    #[arg(long)]
    pub no_overwrite: bool,
}

/// Arguments for `trendline show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[arg(value_parser = parse_project_id)]
    pub id: ProjectId,
    /// Reference date for the report (default: today, UTC).
    #[arg(long, value_parser = parse_date_arg)]
    pub today: Option<NaiveDate>,
    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `trendline log`.
#[derive(Args, Debug)]
pub struct LogArgs {
    #[arg(value_parser = parse_project_id)]
    pub id: ProjectId,
    /// Tasks completed on that day.
    #[arg(allow_negative_numbers = true)]
    pub tasks: i64,
    /// Day the work was done (default: today, UTC).
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
    /// Override "today" for the future-date check.
    #[arg(long, value_parser = parse_date_arg, hide = true)]
    pub today: Option<NaiveDate>,
}

/// Arguments for `trendline update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[arg(value_parser = parse_project_id)]
    pub id: ProjectId,
    /// New display name.
    #[arg(long)]
    pub name: Option<String>,
    /// New start date.
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,
    /// New end date.
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,
}

/// Arguments for `trendline link`.
#[derive(Args, Debug)]
pub struct LinkArgs {
    #[arg(value_parser = parse_project_id)]
    pub id: ProjectId,
}

/// Execute `trendline create`.
pub async fn run_create(
    client: &TrendlineClient,
    args: &CreateArgs,
    out: &mut impl Write,
) -> Result<u8> {
    let mut project = Project::new(args.id.clone(), args.tasks, args.start, args.end)?;
    project.project_name = args.name.clone();

    let mut req = CreateProjectRequest::from(&project);
    req.create_only = args.no_overwrite;
    client
        .create_project(&req)
        .await
        .with_context(|| format!("failed to create project {}", args.id))?;

    writeln!(out, "OK: created project {}", args.id)?;
    writeln!(out, "Share: {}", client.share_link(&args.id)?)?;
    Ok(0)
}

/// Execute `trendline show`.
pub async fn run_show(
    client: &TrendlineClient,
    args: &ShowArgs,
    out: &mut impl Write,
) -> Result<u8> {
    let project = fetch(client, &args.id).await?;
    let today = args.today.unwrap_or_else(today_utc);
    let report = burndown::compute(&project, today)?;

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(out, "{}", render::render_report(&project, &report))?;
    }
    Ok(0)
}

/// Execute `trendline log`.
pub async fn run_log(client: &TrendlineClient, args: &LogArgs, out: &mut impl Write) -> Result<u8> {
    let today = args.today.unwrap_or_else(today_utc);
    let date = args.date.unwrap_or(today);

    let project = fetch(client, &args.id).await?;
    project.check_progress_date(date, today)?;

    client
        .record_progress(&ProgressRequest {
            project_id: args.id.clone(),
            date,
            tasks_completed: args.tasks,
        })
        .await
        .with_context(|| format!("failed to record progress for {}", args.id))?;

    writeln!(
        out,
        "OK: {} on {} for {}",
        burndown::task_label(args.tasks),
        render::display_date(date),
        args.id
    )?;
    Ok(0)
}

/// Execute `trendline update`.
pub async fn run_update(
    client: &TrendlineClient,
    args: &UpdateArgs,
    out: &mut impl Write,
) -> Result<u8> {
    let patch = MetadataPatch {
        project_name: args.name.clone(),
        start_date: args.start,
        end_date: args.end,
    };
    if patch.is_empty() {
        bail!("nothing to update: pass --name, --start, or --end");
    }

    client
        .update_project(&UpdateProjectRequest::new(args.id.clone(), patch))
        .await
        .with_context(|| format!("failed to update project {}", args.id))?;

    writeln!(out, "OK: updated project {}", args.id)?;
    Ok(0)
}

/// Execute `trendline link`.
pub fn run_link(client: &TrendlineClient, args: &LinkArgs, out: &mut impl Write) -> Result<u8> {
    writeln!(out, "{}", client.share_link(&args.id)?)?;
    Ok(0)
}

async fn fetch(client: &TrendlineClient, id: &ProjectId) -> Result<Project> {
    match client
        .get_project(id)
        .await
        .with_context(|| format!("failed to load project {id}"))?
    {
        Some(project) => Ok(project),
        None => bail!("Project not found: {id}"),
    }
}
