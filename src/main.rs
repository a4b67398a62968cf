use clap::Parser;
use credvault::cli::{Cli, Commands};

fn main() {
    credvault::logging::init("warn");

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => credvault::cli::commands::init::execute(&cli),
        Commands::Register { ref username } => {
            credvault::cli::commands::register::execute(&cli, username)
        }
        Commands::Login { ref username, raw } => {
            credvault::cli::commands::login::execute(&cli, username, raw)
        }
        Commands::Whoami => credvault::cli::commands::whoami::execute(&cli),
        Commands::List { reveal } => credvault::cli::commands::list::execute(&cli, reveal),
        Commands::Add {
            ref site,
            ref username,
            ref secret,
        } => credvault::cli::commands::add::execute(&cli, site, username, secret.as_deref()),
        Commands::Update {
            ref id,
            ref site,
            ref username,
            ref secret,
        } => credvault::cli::commands::update::execute(
            &cli,
            id,
            site,
            username,
            secret.as_deref(),
        ),
        Commands::Delete { ref id, force } => {
            credvault::cli::commands::delete::execute(&cli, id, force)
        }
        #[cfg(feature = "audit-log")]
        Commands::Audit { last } => credvault::cli::commands::audit_cmd::execute(&cli, last),
    };

    if let Err(e) = result {
        credvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
