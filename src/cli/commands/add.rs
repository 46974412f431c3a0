//! `passvault add` — store a credential for a site.

use dialoguer::Confirm;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{prompt_password, unlock, vault_paths, Cli};
use crate::errors::{PassVaultError, Result};
use crate::vault::CredentialStore;

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    site: &str,
    username: &str,
    value: Option<&str>,
    replace: bool,
) -> Result<()> {
    let paths = vault_paths(cli)?;
    let ctx = unlock(cli, &paths)?;
    let store = CredentialStore::new(paths);

    // The store itself permits duplicate usernames; replace-or-reject
    // is decided here, before the insert.
    if store.find_by_username(site, username, &ctx)? {
        let confirmed = replace
            || Confirm::new()
                .with_prompt(format!(
                    "An entry for '{username}' at '{site}' already exists. Replace it?"
                ))
                .default(false)
                .interact()
                .map_err(|e| {
                    PassVaultError::CommandFailed(format!("failed to read confirmation: {e}"))
                })?;
        if !confirmed {
            return Err(PassVaultError::UserCancelled);
        }
        store.delete(site, Some(username), &ctx)?;
    }

    let password = match value {
        Some(v) => Zeroizing::new(v.to_string()),
        None => prompt_password(&format!("Password for {username}@{site}"))?,
    };

    store.add(site, username, &password, &ctx)?;

    output::success(&format!("Stored credential for '{username}' at '{site}'"));
    Ok(())
}
