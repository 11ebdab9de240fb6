//! Complaint (support ticket) lookups and updates.

use std::{fmt::Write as _, sync::Arc};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use colored::{ColoredString, Colorize};
use shared::{
    config::client::Config,
    format::{calculate_progress, format_date, format_time_remaining, parse_timestamp, status_color},
    models::{ComplaintDetails, ComplaintStatus},
};
use tracing::warn;
use widget::{ComplaintDesk, HelpdeskClient, NotificationBoard};

use crate::terminal::TerminalSink;

const PROGRESS_WIDTH: usize = 20;

#[derive(Subcommand, Debug)]
pub enum ComplaintCommand {
    /// Show the details of a complaint
    Show {
        /// Complaint number, e.g. 5E2B7F10
        complaint_no: String,
    },

    /// Change the status of a complaint
    Status {
        /// Complaint number, e.g. 5E2B7F10
        complaint_no: String,

        /// New status (pending, in_progress, resolved or escalated)
        status: String,
    },

    /// Add a comment to a complaint
    Comment {
        /// Complaint number, e.g. 5E2B7F10
        complaint_no: String,

        /// Comment text
        comment: String,
    },
}

/// Runs one complaint subcommand. Banners go to stdout through the terminal sink.
///
/// # Errors
/// Returns an error if the client cannot be built or the server call fails.
pub async fn handle_complaint(command: &ComplaintCommand, config: &Config) -> Result<()> {
    let client = HelpdeskClient::from_config(config).context("failed to build helpdesk client")?;
    let sink = Arc::new(TerminalSink::stdout());
    let board = NotificationBoard::new(sink, config.notification_timeout());
    let desk = ComplaintDesk::new(Arc::new(client), board);

    match command {
        ComplaintCommand::Show { complaint_no } => {
            let Some(details) = desk.view_details(complaint_no).await else {
                bail!("could not load complaint {complaint_no}");
            };
            print!("{}", render_details(&details, Utc::now()));
        }
        ComplaintCommand::Status {
            complaint_no,
            status,
        } => {
            if status.parse::<ComplaintStatus>().is_err() {
                warn!(status, "status is not one the assistant knows; sending it anyway");
            }
            if !desk.update_status(complaint_no, status).await {
                bail!("status of complaint {complaint_no} was not updated");
            }
        }
        ComplaintCommand::Comment {
            complaint_no,
            comment,
        } => {
            if !desk.add_comment(complaint_no, comment).await {
                bail!("comment was not added to complaint {complaint_no}");
            }
        }
    }

    Ok(())
}

fn colorize_status(status: &str) -> ColoredString {
    match status_color(status) {
        "warning" => status.yellow(),
        "primary" => status.blue(),
        "success" => status.green(),
        "danger" => status.red(),
        _ => status.normal(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn progress_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * PROGRESS_WIDTH as f64).round() as usize;
    let filled = filled.min(PROGRESS_WIDTH);
    format!(
        "[{}{}] {percent:.0}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled)
    )
}

/// Formats a complaint for the terminal. `now` drives the resolution timer.
pub fn render_details(details: &ComplaintDetails, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let number = details.complaint_no.as_deref().unwrap_or("unknown");
    let status = details.status.as_deref().unwrap_or("unknown");
    let _ = writeln!(out, "{} {number} [{}]", "Complaint".bold(), colorize_status(status));

    if let Some(issue) = &details.issue {
        let _ = writeln!(out, "Issue: {issue}");
    }
    if let Some(priority) = &details.priority {
        let _ = writeln!(out, "Priority: {priority}");
    }

    let created = details.created_at.as_deref().and_then(parse_timestamp);
    if let Some(created) = created {
        let _ = writeln!(out, "Created: {}", format_date(created));
    }

    let technician = details
        .technician
        .as_ref()
        .map_or("Not assigned", |tech| tech.username.as_str());
    let _ = writeln!(out, "Technician: {technician}");

    if let Some(name) = &details.employee_name {
        let extra: Vec<&str> = [&details.employee_designation, &details.employee_department]
            .into_iter()
            .filter_map(Option::as_deref)
            .collect();
        if extra.is_empty() {
            let _ = writeln!(out, "Employee: {name}");
        } else {
            let _ = writeln!(out, "Employee: {name} ({})", extra.join(", "));
        }
    }

    if let Some(steps) = &details.troubleshooting_steps {
        let _ = writeln!(out, "Troubleshooting steps: {steps}");
    }
    let attempted = if details.resolution_attempted { "yes" } else { "no" };
    let _ = writeln!(out, "Resolution attempted: {attempted}");

    if let Some(created) = created {
        let _ = writeln!(
            out,
            "Progress: {} ({})",
            progress_bar(calculate_progress(created, now)),
            format_time_remaining(created, now)
        );
    }

    if !details.comments.is_empty() {
        let _ = writeln!(out, "Comments:");
        for comment in &details.comments {
            let author = comment
                .user
                .as_ref()
                .map_or("unknown", |user| user.username.as_str());
            let when = comment
                .created_at
                .as_deref()
                .and_then(parse_timestamp)
                .map(format_date)
                .unwrap_or_default();
            if when.is_empty() {
                let _ = writeln!(out, "  - {author}: {}", comment.content);
            } else {
                let _ = writeln!(out, "  - {author} ({when}): {}", comment.content);
            }
        }
    }

    out
}
