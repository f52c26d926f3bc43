use clap::{Parser, Subcommand, ValueEnum};
use migration::{migrate, MigrationCommand};
use portal::auth::secret::generate_secret;
use portal::config::db::{DbOwner, DbProfile};
use portal::config::session::JWT_SECRET_KEY;
use portal::infra::db::connect_db;
use portal::repos::{executives, settings};
use portal::AppError;

#[derive(Clone, Copy, ValueEnum)]
enum Env {
    Prod,
    Test,
}

impl From<Env> for DbProfile {
    fn from(env: Env) -> Self {
        match env {
            Env::Prod => DbProfile::Prod,
            Env::Test => DbProfile::Test,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Migration {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl From<Migration> for MigrationCommand {
    fn from(m: Migration) -> Self {
        match m {
            Migration::Up => MigrationCommand::Up,
            Migration::Down => MigrationCommand::Down,
            Migration::Fresh => MigrationCommand::Fresh,
            Migration::Reset => MigrationCommand::Reset,
            Migration::Refresh => MigrationCommand::Refresh,
            Migration::Status => MigrationCommand::Status,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Apply or inspect schema migrations (runs as the owner role)
    Migrate {
        #[arg(value_enum)]
        command: Migration,
    },
    /// Replace the session signing secret; every open session ends
    RotateSecret,
    /// Give a member access to the admin console
    GrantExecutive {
        sid: String,
        name: String,
        #[arg(long)]
        position: Option<String>,
    },
    /// Remove a member's admin access
    RevokeExecutive { sid: String },
}

#[derive(Parser)]
#[command(name = "portal-cli")]
#[command(about = "Member portal administration tool")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Runtime environment
    #[arg(short, long, value_enum, default_value = "prod", global = true)]
    env: Env,
}

async fn run(args: Args) -> Result<(), AppError> {
    let profile = DbProfile::from(args.env);

    match args.command {
        Command::Migrate { command } => {
            let db = connect_db(profile, DbOwner::Owner).await?;
            migrate(&db, command.into()).await?;
        }
        Command::RotateSecret => {
            let db = connect_db(profile, DbOwner::App).await?;
            settings::put(&db, JWT_SECRET_KEY, &generate_secret()).await?;
            tracing::info!("signing secret rotated; existing sessions are no longer valid");
        }
        Command::GrantExecutive {
            sid,
            name,
            position,
        } => {
            let db = connect_db(profile, DbOwner::App).await?;
            let granted = executives::grant(&db, &sid, &name, position.as_deref()).await?;
            tracing::info!(sid = %granted.sid, "executive granted");
        }
        Command::RevokeExecutive { sid } => {
            let db = connect_db(profile, DbOwner::App).await?;
            executives::revoke(&db, &sid).await?;
            tracing::info!(sid = %sid, "executive revoked");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter("portal_cli=info,portal=info,migration=info,sqlx=warn")
        .init();

    if let Err(e) = run(Args::parse()).await {
        eprintln!("portal-cli failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_grant_with_position() {
        let args = Args::try_parse_from([
            "portal-cli",
            "grant-executive",
            "s100",
            "Ada Lovelace",
            "--position",
            "Treasurer",
        ])
        .unwrap();

        match args.command {
            Command::GrantExecutive { sid, name, position } => {
                assert_eq!(sid, "s100");
                assert_eq!(name, "Ada Lovelace");
                assert_eq!(position.as_deref(), Some("Treasurer"));
            }
            _ => panic!("expected grant-executive"),
        }
    }

    #[test]
    fn parses_migrate_with_env() {
        let args = Args::try_parse_from(["portal-cli", "--env", "test", "migrate", "status"]).unwrap();
        assert!(matches!(args.env, Env::Test));
        assert!(matches!(
            args.command,
            Command::Migrate {
                command: Migration::Status
            }
        ));
    }
}
