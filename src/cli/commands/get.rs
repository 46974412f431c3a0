//! `passvault get` — show the credentials stored for a site.

use crate::cli::output;
use crate::cli::{unlock, vault_paths, Cli};
use crate::errors::Result;
use crate::vault::CredentialStore;

/// Execute the `get` command.
pub fn execute(cli: &Cli, site: &str) -> Result<()> {
    let paths = vault_paths(cli)?;
    let ctx = unlock(cli, &paths)?;
    let store = CredentialStore::new(paths);

    let credentials = store.get(site, &ctx)?;
    output::print_credentials_table(site, &credentials);

    Ok(())
}
