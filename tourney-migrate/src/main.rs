use std::process::ExitCode;

use clap::Parser;
use tourney_migrate::{Config, MigrateError, PgEngine, Runner};

#[derive(Parser)]
#[command(name = "tourney-migrate")]
#[command(about = "Add playersPerTeam to tournaments, backfilled from numPots")]
struct Args {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Check the catalog and print the statements without executing them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    if let Err(e) = init_tracing() {
        eprintln!("failed to initialize tracing: {e}");
    }

    let args = Args::parse();
    let config = Config {
        database_url: args.database_url,
        dry_run: args.dry_run,
    };

    let result = Runner::new(config)
        .run(|url| async move { PgEngine::connect(&url).await })
        .await;

    match result {
        Ok(outcome) => {
            tracing::debug!(?outcome, "migration finished");

            ExitCode::SUCCESS
        }
        Err(MigrateError::MissingDatabaseUrl) => {
            println!("Error: DATABASE_URL not found in environment or .env file");

            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("migration failed: {e}");
            println!("❌ Error: {e}");

            ExitCode::FAILURE
        }
    }
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tourney_migrate=warn".parse()?),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    Ok(())
}
