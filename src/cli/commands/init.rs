//! `passvault init` — create the master password.
//!
//! Handles all three starting states of the vault: a fresh directory, a
//! legacy-key vault (records are migrated under the new password), and
//! orphaned records with no key at all (wiped only after explicit
//! confirmation).

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{new_password_from, vault_paths, Cli};
use crate::errors::{PassVaultError, Result};
use crate::vault::UnlockGate;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let paths = vault_paths(cli)?;
    let mut gate = UnlockGate::new(paths.clone());

    // 1. Refuse to overwrite an existing master password.
    if gate.has_master_password()? {
        output::tip("Use `passvault rotate` to change the master password.");
        return Err(PassVaultError::MasterPasswordAlreadySet);
    }

    // 2. Choose the master password (flag/env for scripting, else
    //    prompt).  The length floor applies either way.
    let password = new_password_from(cli.password.as_deref())?;

    // 3. First attempt never wipes; orphaned records surface as
    //    WipeDeclined and get an explicit confirmation below.
    match gate.create_master_password(&password, false) {
        Ok(_) => {}
        Err(PassVaultError::WipeDeclined) => {
            output::warning("Existing credentials cannot be decrypted with any password.");
            let confirmed = Confirm::new()
                .with_prompt("Wipe all existing credentials and start fresh?")
                .default(false)
                .interact()
                .map_err(|e| {
                    PassVaultError::CommandFailed(format!("failed to read confirmation: {e}"))
                })?;
            if !confirmed {
                return Err(PassVaultError::UserCancelled);
            }
            gate.create_master_password(&password, true)?;
            output::info("Existing credentials wiped.");
        }
        Err(e) => return Err(e),
    }

    output::success(&format!(
        "Master password set — vault at {}",
        paths.data_dir().display()
    ));
    output::tip("Run `passvault add <site> <username>` to store a credential.");
    output::tip("Run `passvault list` to see stored sites.");

    Ok(())
}
