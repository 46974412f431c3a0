//! `passvault list` — list stored sites.
//!
//! Three levels of detail: `--names-only` reads site names without
//! unlocking at all, the default shows the disambiguated site listing,
//! and `--show` decrypts every entry best-effort (an entry that fails
//! to decrypt prints a placeholder rather than failing the listing).

use comfy_table::{ContentArrangement, Table};

use crate::cli::output;
use crate::cli::{unlock, vault_paths, Cli};
use crate::errors::Result;
use crate::vault::CredentialStore;

/// Placeholder shown for entries that failed to decrypt in `--show`.
const UNREADABLE: &str = "<decryption failed>";

/// Execute the `list` command.
pub fn execute(cli: &Cli, show: bool, names_only: bool) -> Result<()> {
    let paths = vault_paths(cli)?;
    let store = CredentialStore::new(paths.clone());

    if names_only {
        let names = store.list_site_names()?;
        if names.is_empty() {
            empty_hint();
            return Ok(());
        }
        for name in names {
            println!("{name}");
        }
        return Ok(());
    }

    let ctx = unlock(cli, &paths)?;

    if show {
        let all = store.list_all(&ctx)?;
        if all.is_empty() {
            empty_hint();
            return Ok(());
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Site", "Username", "Password"]);
        for (site, entries) in &all {
            for entry in entries {
                match entry {
                    Some(c) => {
                        table.add_row(vec![site.clone(), c.username.clone(), c.password.clone()])
                    }
                    None => table.add_row(vec![
                        site.clone(),
                        UNREADABLE.to_string(),
                        UNREADABLE.to_string(),
                    ]),
                };
            }
        }
        println!("{table}");
        return Ok(());
    }

    let items = store.site_display_names(&ctx)?;
    if items.is_empty() {
        empty_hint();
        return Ok(());
    }
    output::print_sites_table(&items);

    Ok(())
}

fn empty_hint() {
    output::info("No credentials stored yet.");
    output::tip("Run `passvault add <site> <username>` to store your first credential.");
}
