//! Text report rendering

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::deployment::{DeploymentCheckResult, FunctionSummary};
use crate::utils::format_duration_ms;

const RULE_WIDTH: usize = 60;

/// Render a check result as a plain-text report.
///
/// Output depends only on the result, so it is safe for golden-file tests.
pub fn format_report(result: &DeploymentCheckResult) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        rule.clone(),
        format!("Deployment Status: {}", result.status),
        rule.clone(),
        field("ID", &result.deployment_id),
    ];

    if let Some(name) = &result.name {
        lines.push(field("Project", name));
    }
    if let Some(url) = &result.url {
        lines.push(field("URL", url));
    }
    lines.push(field("State", &result.state));
    lines.push(field("Created", &format_time(&result.created_at)));
    if let Some(completed) = &result.completed_at {
        lines.push(field("Completed", &format_time(completed)));
    }
    if let Some(ms) = result.duration_ms {
        lines.push(field("Duration", &format_duration_ms(ms)));
    }
    lines.push(field(
        "Environment",
        result.target.as_deref().unwrap_or("preview"),
    ));
    lines.push(field("Creator", &result.creator));
    if let Some(branch) = &result.branch {
        lines.push(field("Branch", branch));
    }
    if let Some(commit) = &result.commit {
        lines.push(field("Commit", short_sha(commit)));
    }

    let urls: Vec<(&str, &String)> = [
        ("Deployment", result.url.as_ref()),
        ("Alias", result.alias_url.as_ref()),
        ("Inspector", result.inspector_url.as_ref()),
    ]
    .into_iter()
    .filter_map(|(label, url)| url.map(|url| (label, url)))
    .collect();
    if !urls.is_empty() {
        lines.push(String::new());
        lines.push("URLs:".to_string());
        for (label, url) in urls {
            lines.push(format!("  {:<12}{}", format!("{}:", label), url));
        }
    }

    push_section(&mut lines, "Errors", &result.errors);
    push_section(&mut lines, "Warnings", &result.warnings);

    if let Some(functions) = result.functions.as_ref().filter(|f| !f.is_empty()) {
        lines.push(String::new());
        lines.push(format!("Functions ({}):", functions.len()));
        for function in functions {
            lines.push(format!("  - {}", function_line(function)));
        }
    }

    lines.push(rule);
    lines.join("\n") + "\n"
}

fn field(label: &str, value: &str) -> String {
    format!("{:<13}{}", format!("{}:", label), value)
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

fn push_section(lines: &mut Vec<String>, title: &str, entries: &[String]) {
    if entries.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(format!("{} ({}):", title, entries.len()));
    for entry in entries {
        lines.push(format!("  - {}", entry.trim_end()));
    }
}

fn function_line(function: &FunctionSummary) -> String {
    let mut parts = Vec::new();
    if let Some(runtime) = &function.runtime {
        parts.push(runtime.clone());
    }
    if let Some(memory) = function.memory {
        parts.push(format!("{}MB", memory));
    }
    if let Some(max_duration) = function.max_duration {
        parts.push(format!("{}s max", max_duration));
    }
    if !function.regions.is_empty() {
        parts.push(function.regions.join(","));
    }

    let mut line = function.name.clone();
    if let Some(state) = &function.state {
        line.push_str(&format!(" [{}]", state));
    }
    if !parts.is_empty() {
        line.push_str(&format!(" ({})", parts.join(", ")));
    }
    line
}
