//! Text rendering for index listings.

use srcstore_core::IndexSummary;
use srcstore_store::IndexStatus;

/// One line per index: name, type, where it was found, and its status.
pub fn status_line(status: &IndexStatus) -> String {
    let mut scope = Vec::new();
    if let Some(repo) = &status.repo {
        scope.push(repo.clone());
    }
    if let Some(version) = &status.version {
        scope.push(version.clone());
    }
    if let Some(unit) = &status.unit {
        scope.push(unit.to_string());
    }

    let state = match (&status.error, status.stale, status.size) {
        (Some(error), _, _) => format!("error: {}", error),
        (None, true, _) => "stale".to_string(),
        (None, false, Some(size)) => format_bytes(size),
        (None, false, None) => "ok".to_string(),
    };

    let mut line = format!("{:<16} {:<14}", status.name, status.index_type);
    if !scope.is_empty() {
        line.push(' ');
        line.push_str(&scope.join(" "));
    }
    line.push_str("  ");
    line.push_str(&state);
    line
}

pub fn summary_line(summary: &IndexSummary) -> String {
    format!(
        "{} indexes: {} fresh ({}), {} stale, {} errors",
        summary.total,
        summary.fresh,
        format_bytes(summary.bytes),
        summary.stale,
        summary.errors
    )
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use srcstore_store::UnitId;

    #[test]
    fn test_status_line_with_scope() {
        let mut status = IndexStatus::new("graph", "graph");
        status.version = Some("c1".to_string());
        status.unit = Some(UnitId::new("app", "go"));
        status.size = Some(120);

        let line = status_line(&status);
        assert!(line.starts_with("graph"));
        assert!(line.contains("c1 app@go"));
        assert!(line.ends_with("120 B"));
    }

    #[test]
    fn test_status_line_states() {
        let mut stale = IndexStatus::new("depresolve", "depresolve");
        stale.stale = true;
        assert!(status_line(&stale).ends_with("stale"));

        let mut failed = IndexStatus::new("docs", "docs");
        failed.error = Some("permission denied".to_string());
        assert!(status_line(&failed).ends_with("error: permission denied"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
