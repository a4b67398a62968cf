//! `credvault audit` — display your own audit history.
//!
//! Usage:
//!   credvault audit               # show last 50 entries
//!   credvault audit --last 20     # show last 20

use crate::audit::AuditEntry;
use crate::cli::output;
use crate::cli::{open_app, require_user, Cli};
use crate::errors::{CredVaultError, Result};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize) -> Result<()> {
    let app = open_app(cli)?;
    let user_id = require_user(cli, &app)?;

    let audit = app
        .audit_log()
        .ok_or_else(|| CredVaultError::AuditError("failed to open audit database".into()))?;

    let entries = audit.query(last, Some(&user_id))?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Print audit entries in a formatted table.
pub fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Entry", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.entry_id.clone().unwrap_or_else(|| "-".into()),
            entry.details.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "init" | "register" => style(op).green().to_string(),
        "add" | "update" => style(op).blue().to_string(),
        "delete" => style(op).red().to_string(),
        "login" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLog;

    #[test]
    fn colorize_operation_keeps_name() {
        console::set_colors_enabled(false);
        assert_eq!(colorize_operation("delete"), "delete");
        assert_eq!(colorize_operation("unknown"), "unknown");
    }

    #[test]
    fn audit_is_scoped_to_user() {
        let dir = tempfile::TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("add", Some("1"), Some("100"), Some("ok"));
        audit.log("add", Some("2"), Some("200"), Some("ok"));

        let mine = audit.query(10, Some("1")).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].entry_id.as_deref(), Some("100"));
    }
}
