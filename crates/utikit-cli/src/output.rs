//! Output formatting utilities.

use serde::Serialize;
use std::path::Path;
use utikit::{Resolver, TypeIdentifier};

/// Resolution result as printed by the commands.
#[derive(Debug, Serialize)]
pub struct TypeReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub identifier: String,
    pub preferred_extension: Option<String>,
    pub dynamic: bool,
}

impl TypeReport {
    pub fn new(resolver: &Resolver<'_>, identifier: &TypeIdentifier) -> Self {
        Self {
            path: None,
            identifier: identifier.to_string(),
            preferred_extension: resolver.preferred_path_extension(identifier),
            dynamic: identifier.is_dynamic(),
        }
    }

    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.display().to_string());
        self
    }
}

/// Formats a report as a single JSON line.
pub fn format_json(report: &TypeReport) -> String {
    serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a report as a table row.
pub fn format_row(report: &TypeReport) -> String {
    let extension = report.preferred_extension.as_deref().unwrap_or("-");
    match &report.path {
        Some(path) => format!("{:<40} {:<40} {}", truncate(path, 40), report.identifier, extension),
        None => format!("{:<40} {}", report.identifier, extension),
    }
}

pub fn print(report: &TypeReport, json: bool) {
    if json {
        println!("{}", format_json(report));
    } else {
        println!("{}", format_row(report));
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
