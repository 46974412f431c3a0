//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use clap::Parser;
use dialoguer::Password;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{PassVaultError, Result};
use crate::vault::{Unlocked, UnlockGate, VaultPaths};

/// Minimum master-password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// PassVault CLI: local credential vault encrypted under a master password.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Local credential vault encrypted under a master password",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault data directory (default: from .passvault.toml, else .passvault)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Master password (for scripting; prefer the env var over the flag)
    #[arg(
        long,
        global = true,
        env = "PASSVAULT_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create the master password (migrates any legacy-key vault)
    Init,

    /// Add a credential for a site
    Add {
        /// Site name (e.g. example.com)
        site: String,
        /// Username for the site
        username: String,
        /// Password for the site (omit for interactive prompt)
        value: Option<String>,
        /// Replace an existing entry with the same username
        #[arg(long)]
        replace: bool,
    },

    /// Show the credentials stored for a site
    Get {
        /// Site name
        site: String,
    },

    /// List stored sites
    List {
        /// Show decrypted usernames and passwords for every site
        #[arg(long)]
        show: bool,
        /// Print site names only (no master password needed)
        #[arg(long)]
        names_only: bool,
    },

    /// Delete a site or a single entry
    Delete {
        /// Site name
        site: String,
        /// Delete only the entry with this username
        #[arg(short, long)]
        username: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Change the master password (re-encrypts every record)
    Rotate {
        /// New master password (for scripting; omit for interactive prompt)
        #[arg(long, env = "PASSVAULT_NEW_PASSWORD", hide_env_values = true)]
        new_password: Option<String>,
    },

    /// Delete every stored credential, keeping the master password
    Wipe {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
}

/// Resolve the vault data directory: CLI flag, then `.passvault.toml`,
/// then the default.
pub fn vault_paths(cli: &Cli) -> Result<VaultPaths> {
    let cwd = std::env::current_dir()?;
    let dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => Settings::load(&cwd)?.data_dir,
    };
    Ok(VaultPaths::new(cwd.join(dir)))
}

/// Prompt for a password without echo.
pub fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    let password = Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| PassVaultError::CommandFailed(format!("failed to read password: {e}")))?;
    Ok(Zeroizing::new(password))
}

/// Reject a new master password below the minimum length.
fn check_min_length(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(PassVaultError::InvalidInput(format!(
            "master password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Prompt for a new password with confirmation and a length check.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    let password = prompt_password("New master password")?;
    check_min_length(&password)?;
    let confirm = prompt_password("Confirm new master password")?;
    if *password != *confirm {
        return Err(PassVaultError::PasswordMismatch);
    }
    Ok(password)
}

/// Resolve a new master password from a flag/env value or the prompt.
///
/// The length floor applies to both paths — a scripted password is held
/// to the same minimum as an interactive one.
pub fn new_password_from(value: Option<&str>) -> Result<Zeroizing<String>> {
    match value {
        Some(pw) => {
            check_min_length(pw)?;
            Ok(Zeroizing::new(pw.to_string()))
        }
        None => prompt_new_password(),
    }
}

/// Unlock the vault, prompting interactively unless a password was
/// supplied via flag or environment.
///
/// Interactive mode re-prompts on a wrong password, showing the
/// remaining attempts, and stops as soon as the gate locks out.
pub fn unlock(cli: &Cli, paths: &VaultPaths) -> Result<Unlocked> {
    let mut gate = UnlockGate::new(paths.clone());

    if !gate.has_master_password()? {
        return Err(PassVaultError::NoMasterPassword);
    }

    if let Some(password) = &cli.password {
        return gate.verify(password);
    }

    loop {
        let password = prompt_password("Master password")?;
        match gate.verify(&password) {
            Ok(ctx) => return Ok(ctx),
            Err(PassVaultError::WrongPassword) => {
                output::warning(&format!(
                    "Incorrect password — {} attempt(s) left",
                    gate.attempts_left()
                ));
            }
            Err(e) => return Err(e),
        }
    }
}
