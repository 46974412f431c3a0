//! `passvault delete` — remove a site or a single entry.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{unlock, vault_paths, Cli};
use crate::errors::{PassVaultError, Result};
use crate::vault::CredentialStore;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, site: &str, username: Option<&str>, force: bool) -> Result<()> {
    let paths = vault_paths(cli)?;
    let ctx = unlock(cli, &paths)?;
    let store = CredentialStore::new(paths);

    if !force {
        let prompt = match username {
            Some(user) => format!("Delete the entry for '{user}' at '{site}'?"),
            None => format!("Delete '{site}' and every entry stored for it?"),
        };
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| {
                PassVaultError::CommandFailed(format!("failed to read confirmation: {e}"))
            })?;
        if !confirmed {
            return Err(PassVaultError::UserCancelled);
        }
    }

    if store.delete(site, username, &ctx)? {
        match username {
            Some(user) => output::success(&format!("Deleted '{user}' at '{site}'")),
            None => output::success(&format!("Deleted '{site}'")),
        }
    } else {
        output::warning("Nothing deleted — no matching entry.");
    }

    Ok(())
}
