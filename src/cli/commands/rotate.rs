//! `passvault rotate` — change the master password.
//!
//! Every record is decrypted under the old key and re-encrypted under
//! the new one; the store and the unlock token are replaced together.
//! Entries that cannot be decrypted under the old key are dropped from
//! the rewritten store — that count is reported loudly because it is
//! permanent data loss.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{new_password_from, prompt_password, vault_paths, Cli};
use crate::errors::Result;
use crate::vault::VaultAdmin;

/// Execute the `rotate` command.
pub fn execute(cli: &Cli, new_password: Option<&str>) -> Result<()> {
    let paths = vault_paths(cli)?;

    // 1. Current password: flag/env for scripting, else prompt.
    let old_password = match &cli.password {
        Some(pw) => Zeroizing::new(pw.clone()),
        None => prompt_password("Current master password")?,
    };

    // 2. New password, with confirmation when prompted.  The length
    //    floor applies to the flag/env path too.
    let new_password = new_password_from(new_password)?;

    // 3. Re-encrypt everything and swap the unlock token.
    let report = VaultAdmin::new(paths).rotate_password(&old_password, &new_password)?;

    output::success(&format!(
        "Master password rotated ({} entries re-encrypted)",
        report.reencrypted
    ));
    if report.dropped > 0 {
        output::warning(&format!(
            "{} entr{} could not be decrypted under the old password and {} dropped",
            report.dropped,
            if report.dropped == 1 { "y" } else { "ies" },
            if report.dropped == 1 { "was" } else { "were" },
        ));
    }

    Ok(())
}
