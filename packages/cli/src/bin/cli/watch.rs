//! Long-running watch: realtime notifications plus a polled shift status

use anyhow::Result;
use colored::*;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{broadcast, Notify};
use tracing::info;

use choreboard_client::ScheduleClient;
use choreboard_config::ClientConfig;
use choreboard_realtime::events::TASK_SCHEDULE_UPDATED;
use choreboard_realtime::{ConnectionState, RealtimeSyncClient};
use choreboard_schedule::{ShiftPoller, ShiftResolver};

use choreboard_cli::output::describe_shift;

use super::{require_token, resolve_user};

pub async fn watch(config: &ClientConfig, user: Option<String>) -> Result<()> {
    let user = resolve_user(config, user)?;
    let token = require_token(config)?;

    let client = ScheduleClient::from_config(config)?;
    let poller = ShiftPoller::start(
        ShiftResolver::new(Arc::new(client)),
        user.clone(),
        config.poll_interval,
    );
    let mut shifts = poller.subscribe();

    let realtime = RealtimeSyncClient::from_config(config)?;
    let schedule_changed = Arc::new(Notify::new());
    let notify = Arc::clone(&schedule_changed);
    let subscription = realtime.on(
        TASK_SCHEDULE_UPDATED,
        Arc::new(move |_: &Value| notify.notify_one()),
    );
    let mut notifications = realtime.subscribe_notifications();
    let mut states = realtime.watch_state();

    realtime.connect(&token).await?;
    println!("{} {}", "Watching schedule for".bold(), user.cyan());

    loop {
        tokio::select! {
            received = notifications.recv() => match received {
                Ok(notification) => println!(
                    "{} {} {}",
                    notification.timestamp.format("%H:%M:%S").to_string().dimmed(),
                    "●".yellow(),
                    notification.message
                ),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    println!("{}", format!("({} notifications skipped)", missed).dimmed());
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            changed = shifts.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = shifts.borrow_and_update().clone();
                match snapshot {
                    Some(snapshot) if snapshot.is_failed() => println!(
                        "{} {}",
                        "Shift:".bold(),
                        format!("unavailable ({})", snapshot.error.unwrap_or_default()).red()
                    ),
                    Some(snapshot) => {
                        println!("{} {}", "Shift:".bold(), describe_shift(snapshot.info.as_ref()))
                    }
                    None => {}
                }
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *states.borrow_and_update();
                let label = match state {
                    ConnectionState::Connected => "connected".green(),
                    ConnectionState::Connecting => "reconnecting".yellow(),
                    ConnectionState::Disconnected => "disconnected".red(),
                };
                println!("{} {}", "Realtime:".bold(), label);
            }
            _ = schedule_changed.notified() => {
                info!("Schedule updated on the server, refreshing shift");
                poller.refresh();
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    realtime.off(TASK_SCHEDULE_UPDATED, Some(subscription));
    realtime.disconnect();
    poller.stop();
    Ok(())
}
