use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;
use schoolgate_access::{CommitReport, defaults};
use schoolgate_cli::{commands, open_store};
use schoolgate_config::{JwtConfig, StorageConfig};
use schoolgate_models::{Action, FeatureKey, RoleKey};

#[derive(Parser)]
#[command(name = "schoolgate-cli")]
#[command(about = "Schoolgate CLI - Access configuration administration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the committed permission grid and section visibility
    Show {
        /// Only this role (e.g. Teacher, super_admin)
        #[arg(short, long)]
        role: Option<RoleKey>,
    },
    /// Grant (or with --deny, revoke) one action on one feature
    Grant {
        #[arg(short, long)]
        role: RoleKey,

        /// Feature key (`__Profile` is accepted)
        #[arg(short, long)]
        feature: FeatureKey,

        /// view, create, edit or delete
        #[arg(short, long)]
        action: Action,

        /// Revoke instead of grant
        #[arg(long)]
        deny: bool,
    },
    /// Set a role to view-only on every feature
    ViewOnly {
        #[arg(short, long)]
        role: RoleKey,
    },
    /// Grant every action on every feature to a role
    AllowAll {
        #[arg(short, long)]
        role: RoleKey,
    },
    /// Revoke every action on every feature from a role
    DenyAll {
        #[arg(short, long)]
        role: RoleKey,
    },
    /// Reset a role's permissions and sections to the shipped defaults
    RestoreDefaults {
        #[arg(short, long)]
        role: RoleKey,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Write the committed configuration as one JSON document
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Replace the committed configuration with an exported document
    Import {
        file: PathBuf,
    },
    /// Mint a development access token
    IssueToken {
        #[arg(short, long)]
        role: RoleKey,

        /// Token subject
        #[arg(short, long, default_value = "dev-user")]
        sub: String,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    schoolgate_observability::init_basic_console_logging();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("\n❌ {e:#}");
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    if let Commands::IssueToken { role, sub } = &command {
        let token = commands::issue_token(*role, sub, &JwtConfig::from_env())?;
        println!("{token}");
        return Ok(());
    }

    let store = open_store(&StorageConfig::from_env(), defaults::shipped()).await?;

    match command {
        Commands::Show { role } => print!("{}", commands::show(&store, role)),
        Commands::Grant {
            role,
            feature,
            action,
            deny,
        } => {
            let report = commands::grant(&store, role, feature, action, !deny).await?;
            let verb = if deny { "Revoked" } else { "Granted" };
            committed(&format!("{verb} {action} on {feature} for {role}"), &report);
        }
        Commands::ViewOnly { role } => {
            let report = commands::view_only(&store, role).await?;
            committed(&format!("{role} is now view-only"), &report);
        }
        Commands::AllowAll { role } => {
            let report = commands::set_all(&store, role, true).await?;
            committed(&format!("{role} may now do everything"), &report);
        }
        Commands::DenyAll { role } => {
            let report = commands::set_all(&store, role, false).await?;
            committed(&format!("{role} may now do nothing"), &report);
        }
        Commands::RestoreDefaults { role, yes } => {
            let confirmed = yes
                || Confirm::new()
                    .with_prompt(format!("Restore default permissions and sections for {role}?"))
                    .default(false)
                    .interact()
                    .context("Failed to read confirmation")?;
            if !confirmed {
                println!("Aborted, nothing changed");
                return Ok(());
            }
            let report = commands::restore_defaults(&store, role).await?;
            committed(&format!("{role} restored to defaults"), &report);
        }
        Commands::Export { out } => {
            let document = commands::export(&store)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, document)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("✅ Configuration exported to {}", path.display());
                }
                None => println!("{document}"),
            }
        }
        Commands::Import { file } => {
            let document = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let report = commands::import(&store, &document).await?;
            committed(&format!("Imported {}", file.display()), &report);
        }
        Commands::IssueToken { .. } => {}
    }

    Ok(())
}

fn committed(summary: &str, report: &CommitReport) {
    println!("\n✅ {summary}");
    println!("   Generation: {}", report.generation);
    println!("   Fingerprint: {}", report.fingerprint);
}
