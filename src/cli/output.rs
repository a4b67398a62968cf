//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::DecryptedEntry;

/// Fixed-width mask so the length of a secret is not shown.
const MASK: &str = "\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of vault entries (Id, Site, Username, Secret, Created, Updated).
pub fn print_entries_table(entries: &[DecryptedEntry], reveal: bool) {
    if entries.is_empty() {
        info("No entries in your vault yet.");
        tip("Run `credvault add <SITE> <USERNAME>` to add your first entry.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Site", "Username", "Secret", "Created", "Updated"]);

    for e in entries {
        let secret = if reveal {
            e.secret.clone()
        } else {
            MASK.to_string()
        };
        table.add_row(vec![
            e.id.clone(),
            e.site.clone(),
            e.username.clone(),
            secret,
            e.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            e.updated_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
        ]);
    }

    println!("{table}");
}
