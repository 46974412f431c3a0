//! `passvault wipe` — delete every stored credential.
//!
//! The master password stays valid: the unlock token is regenerated
//! under the unchanged current key over an empty store.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{unlock, vault_paths, Cli};
use crate::errors::{PassVaultError, Result};
use crate::vault::VaultAdmin;

/// Execute the `wipe` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let paths = vault_paths(cli)?;
    let ctx = unlock(cli, &paths)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt("Permanently delete every stored credential?")
            .default(false)
            .interact()
            .map_err(|e| {
                PassVaultError::CommandFailed(format!("failed to read confirmation: {e}"))
            })?;
        if !confirmed {
            return Err(PassVaultError::UserCancelled);
        }
    }

    VaultAdmin::new(paths).wipe_all(&ctx)?;

    output::success("Vault wiped — the master password is unchanged.");
    Ok(())
}
