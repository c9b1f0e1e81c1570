use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use rusqlite::Connection;

use globe::args::{Cli, Command, UserCommand};
use globe::config::Config;
use globe::db::{schema, user_repo};
use globe::logging::init_logging;
use globe::ops::user_ops;
use globe::{api, cli, migrate};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.verbosity());

    let mut config = Config::load_from(args.config.as_deref()).context("loading configuration")?;
    if let Some(file) = &args.file {
        config.database.path = file.clone();
    }

    let conn = open_database(&config.database.path)?;

    match args.command.unwrap_or(Command::Repl) {
        Command::Repl => cli::run(conn, config),
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            let addr = config.bind_addr()?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(api::serve(api::AppState::new(conn, config), addr))?;
        }
        Command::Import { path } => {
            let Some(user) = user_repo::find_first(&conn)? else {
                bail!("no user yet; create one with 'globe user add <name>'");
            };
            println!("Importing {} for {}...", path.display(), user.name);
            let stats = migrate::import_profiles(&conn, user.id, &path)
                .with_context(|| format!("importing {}", path.display()))?;
            println!("Import complete!");
            println!("  People: {}", stats.people);
            println!("  Interactions: {}", stats.interactions);
            println!("  Skipped: {}", stats.skipped);
        }
        Command::User(UserCommand::Add { name, email }) => {
            let user = user_ops::create_user(&conn, &name, &email)?;
            println!("Created {} ({})", user.name, user.id);
            println!("API token: {}", user.api_token);
        }
        Command::User(UserCommand::List) => {
            for user in user_repo::list(&conn)? {
                println!("{}  {}  {}", user.id, user.name, user.email);
            }
        }
    }

    Ok(())
}

fn open_database(path: &Path) -> anyhow::Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    let conn = Connection::open(path).with_context(|| format!("opening {}", path.display()))?;
    schema::initialize(&conn)?;
    Ok(conn)
}
