use anyhow::Context;
use clap::{Parser, Subcommand};
use mzgrant_catalog::{GrantInspector, MaterializeCatalog};
use mzgrant_core::{LoggingConfig, MzgrantConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::default_privileges::{DefaultGrantArgs, DefaultKeyArgs};
use commands::object::{GrantArgs, ObjectArgs};

#[derive(Parser, Debug)]
#[command(name = "mzgrant", version, about = "Inspect and manage Materialize privileges")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "mzgrant.yaml")]
    config: PathBuf,

    /// Connection URL, overriding the configuration file
    #[arg(long, global = true, env = "MZGRANT_DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Log filter (error, warn, info, debug, trace or an EnvFilter directive)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every privilege currently held on an object
    Show {
        #[command(flatten)]
        object: ObjectArgs,
    },

    /// Check whether a role holds a privilege. Exits 1 when it does not.
    Check {
        #[command(flatten)]
        grant: GrantArgs,
    },

    /// Grant a privilege if it is not already held
    Grant {
        #[command(flatten)]
        grant: GrantArgs,
    },

    /// Revoke a privilege if it is held
    Revoke {
        #[command(flatten)]
        grant: GrantArgs,
    },

    /// Default privileges for objects created in the future
    DefaultPrivileges {
        #[command(subcommand)]
        cmd: DefaultPrivilegesCommand,
    },

    /// Compare a file of wanted grants with the live catalog, changing nothing
    Plan {
        /// YAML file listing `grants` and `default_privileges`
        file: PathBuf,
    },

    /// Grant identifiers
    Id {
        #[command(subcommand)]
        cmd: IdCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DefaultPrivilegesCommand {
    /// Show default privileges for a grantee and target role
    Show {
        #[command(flatten)]
        key: DefaultKeyArgs,
    },

    /// Add a default privilege if it is not already present
    Grant {
        #[command(flatten)]
        grant: DefaultGrantArgs,
    },

    /// Remove a default privilege if it is present
    Revoke {
        #[command(flatten)]
        grant: DefaultGrantArgs,
    },
}

#[derive(Subcommand, Debug)]
enum IdCommand {
    /// Decode a grant or default-privilege identifier (offline)
    Parse { id: String },
}

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(logging.with_target)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<MzgrantConfig> {
    let mut config = MzgrantConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;
    if let Some(url) = &cli.database_url {
        config.connection.database_url = Some(url.clone());
        config.connection.database_url_env = None;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    Ok(config)
}

async fn connect(config: &MzgrantConfig) -> anyhow::Result<GrantInspector<MaterializeCatalog>> {
    let catalog = MaterializeCatalog::connect(&config.connection)
        .await
        .context("Failed to connect to Materialize")?;
    Ok(GrantInspector::new(catalog))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config.logging);

    let json = cli.json;
    match cli.cmd {
        Command::Id {
            cmd: IdCommand::Parse { id },
        } => commands::id::parse(&id, json)?,

        Command::Plan { file } => {
            let wanted = commands::plan::Wanted::from_file(&file)?;
            let inspector = connect(&config).await?;
            let pending = commands::plan::run(&inspector, &wanted, json).await?;
            tracing::debug!(pending, "plan complete");
        }

        Command::Show { object } => {
            let inspector = connect(&config).await?;
            commands::object::show(&inspector, &object, json).await?;
        }

        Command::Check { grant } => {
            let inspector = connect(&config).await?;
            if !commands::object::check(&inspector, &grant, json).await? {
                return Ok(ExitCode::from(1));
            }
        }

        Command::Grant { grant } => {
            let inspector = connect(&config).await?;
            commands::object::grant(&inspector, &grant, json).await?;
        }

        Command::Revoke { grant } => {
            let inspector = connect(&config).await?;
            commands::object::revoke(&inspector, &grant, json).await?;
        }

        Command::DefaultPrivileges { cmd } => {
            let inspector = connect(&config).await?;
            match cmd {
                DefaultPrivilegesCommand::Show { key } => {
                    commands::default_privileges::show(&inspector, &key, json).await?
                }
                DefaultPrivilegesCommand::Grant { grant } => {
                    commands::default_privileges::grant(&inspector, &grant, json).await?
                }
                DefaultPrivilegesCommand::Revoke { grant } => {
                    commands::default_privileges::revoke(&inspector, &grant, json).await?
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
