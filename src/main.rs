use clap::Parser;
use std::io;
use std::process;
use tm::cli::{Cli, Commands};
use tm::cli_handlers;
use tm::config::Config;
use tm::shell::Shell;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so menu and command output stay clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Everything that holds the database runs in here, so the connection is
/// closed before `main` decides on the exit code.
fn run(cli: Cli) -> tm::Result<()> {
    let config = Config::from_cli(&cli);
    let tracker = config.open_tracker()?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = io::stdin();
            Shell::new(&tracker, stdin.lock(), io::stdout()).run()
        }
        Commands::Add {
            title,
            due,
            desc,
            priority,
            assign,
        } => cli_handlers::handle_add(
            &tracker,
            &title,
            &due,
            desc.as_deref(),
            priority,
            assign.as_deref(),
        ),
        Commands::List { assignee, json } => {
            cli_handlers::handle_list(&tracker, assignee.as_deref(), json)
        }
        Commands::Assigned { assignee } => {
            cli_handlers::handle_assigned(&tracker, assignee.as_deref())
        }
        Commands::Show { id } => cli_handlers::handle_show(&tracker, id),
        Commands::Update { id, status, due } => {
            cli_handlers::handle_update(&tracker, id, status, due.as_deref())
        }
        Commands::Assign { id, member } => cli_handlers::handle_assign(&tracker, id, &member),
        Commands::Complete { id } => cli_handlers::handle_complete(&tracker, id),
        Commands::Delete { id } => cli_handlers::handle_delete(&tracker, id),
        Commands::Comment { id, text } => cli_handlers::handle_comment(&tracker, id, &text),
        Commands::Comments { assignee, json } => {
            cli_handlers::handle_comments(&tracker, assignee.as_deref(), json)
        }
        Commands::Members => cli_handlers::handle_members(&tracker),
        Commands::Report => cli_handlers::handle_report(&tracker),
        Commands::MemberReport { member } => {
            cli_handlers::handle_member_report(&tracker, &member)
        }
    }
}
