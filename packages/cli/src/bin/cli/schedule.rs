//! Schedule commands: shift status, day roster and template diff

use anyhow::{anyhow, Result};
use colored::*;
use std::path::Path;
use std::sync::Arc;

use choreboard_client::ScheduleClient;
use choreboard_config::ClientConfig;
use choreboard_core::{week_start_of, ShiftInfo};
use choreboard_schedule::{diff, group_shifts, DiffOutcome, ShiftResolver};

use choreboard_cli::output::{describe_outcome, describe_override, describe_shift, describe_shifts};
use choreboard_cli::template::load_template;

use super::{parse_date, parse_instant, resolve_user};

pub async fn show_shift(config: &ClientConfig, user: Option<String>, at: Option<String>) -> Result<()> {
    let user = resolve_user(config, user)?;
    let now = parse_instant(at.as_deref())?;

    let client = ScheduleClient::from_config(config)?;
    let week = client.get_week(week_start_of(now.date())).await?;
    let resolver = ShiftResolver::new(Arc::new(client));

    let info = resolver.resolve(now, &user, &week).await;
    let line = describe_shift(info.as_ref());
    match info {
        Some(ShiftInfo::Current { .. }) => println!("{}", line.green().bold()),
        Some(ShiftInfo::Next { .. }) => println!("{}", line.cyan()),
        None => println!("{}", line.dimmed()),
    }
    Ok(())
}

pub async fn show_roster(config: &ClientConfig, date: Option<String>) -> Result<()> {
    let date = match date {
        Some(raw) => parse_date(&raw)?,
        None => parse_instant(None)?.date(),
    };

    let client = ScheduleClient::from_config(config)?;
    let week = client.get_week(week_start_of(date)).await?;
    let day = week
        .day(date)
        .ok_or_else(|| anyhow!("{} is missing from the week returned by the server", date))?;

    println!("{}", format!("Shifts for {}", date.format("%A %Y-%m-%d")).bold());
    let lines = describe_shifts(&group_shifts(date, &day.tasks));
    if lines.is_empty() {
        println!("{}", "  Nothing scheduled".dimmed());
    }
    for line in lines {
        println!("  {}", line);
    }
    Ok(())
}

pub async fn show_diff(config: &ClientConfig, date: &str, template: &Path, apply: bool) -> Result<()> {
    let date = parse_date(date)?;
    let items = load_template(template)?;

    let client = ScheduleClient::from_config(config)?;
    let week_start = week_start_of(date);
    let week = client.get_week(week_start).await?;
    let current = week.day(date).map(|day| day.tasks.as_slice()).unwrap_or_default();

    let plan = diff(date, current, &items);
    let summary = describe_outcome(date, &plan);
    match plan.outcome {
        DiffOutcome::NoChanges => println!("{}", summary.green()),
        DiffOutcome::ClearDay => println!("{}", summary.yellow().bold()),
        DiffOutcome::Changes => println!("{}", summary.bold()),
    }
    for command in &plan.overrides {
        println!("  {}", describe_override(command));
    }

    if !apply || plan.is_empty() {
        return Ok(());
    }

    match client.submit_overrides(week_start, plan.overrides, false).await {
        Ok(()) => {
            println!("{}", "Overrides submitted".green());
            Ok(())
        }
        Err(e) => {
            let message = e.user_message();
            Err(anyhow::Error::new(e).context(message))
        }
    }
}
