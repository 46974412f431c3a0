use clap::Parser;
use passvault::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => passvault::cli::commands::init::execute(&cli),
        Commands::Add {
            ref site,
            ref username,
            ref value,
            replace,
        } => passvault::cli::commands::add::execute(&cli, site, username, value.as_deref(), replace),
        Commands::Get { ref site } => passvault::cli::commands::get::execute(&cli, site),
        Commands::List { show, names_only } => {
            passvault::cli::commands::list::execute(&cli, show, names_only)
        }
        Commands::Delete {
            ref site,
            ref username,
            force,
        } => passvault::cli::commands::delete::execute(&cli, site, username.as_deref(), force),
        Commands::Rotate { ref new_password } => {
            passvault::cli::commands::rotate::execute(&cli, new_password.as_deref())
        }
        Commands::Wipe { force } => passvault::cli::commands::wipe::execute(&cli, force),
        Commands::Completions { ref shell } => passvault::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
