// src/cli.rs
use crate::app_log;
use crate::core::{ConfigManager, FsOps};
use crate::matching::MATCH_COUNT;
use crate::pipeline::{EmailGenerator, EmailPipeline};
use crate::portfolio::{Embedder, Portfolio, PortfolioStore, SqlitePortfolioStore};
use crate::types::{JobInput, JobRecord, SenderProfile};
use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_PORT: u16 = 8000;

#[derive(Parser)]
#[command(name = "cold-mail")]
#[command(about = "Generate cold outreach emails from job postings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Defaults to ROCKET_PORT, then 8000
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate one email and print it
    #[command(group(ArgGroup::new("job").required(true).args(["url", "role"])))]
    Generate {
        /// Job posting to scrape
        #[arg(long)]
        url: Option<String>,
        #[arg(long, requires_all = ["experience", "skills", "description"])]
        role: Option<String>,
        #[arg(long)]
        experience: Option<String>,
        #[arg(long)]
        skills: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// TOML file with the sender profile
        #[arg(long)]
        profile: Option<PathBuf>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        job_title: Option<String>,
        #[arg(long)]
        company: Option<String>,
        /// Also write the draft here; bare names land in the output directory
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Inspect or manage the portfolio store
    Portfolio {
        #[command(subcommand)]
        command: PortfolioCommand,
    },
}

#[derive(Subcommand)]
pub enum PortfolioCommand {
    /// Seed the store from the CSV if it is empty
    Load {
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Number of stored entries
    Count,
    /// Remove every entry
    Clear,
    /// Show the links nearest to a tech stack
    Query {
        text: String,
        #[arg(long, default_value_t = MATCH_COUNT)]
        limit: usize,
    },
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = ConfigManager::load()?;
    config.ensure_directories().await?;
    app_log!(debug, "Environment: {}", config.environment_name);

    match cli.command {
        Command::Serve { port } => {
            let port = match port {
                Some(port) => port,
                None => resolve_port()?,
            };
            crate::web::start_web_server(&config, port).await
        }

        Command::Generate {
            url,
            role,
            experience,
            skills,
            description,
            profile,
            name,
            job_title,
            company,
            output,
        } => {
            let mut sender = match profile {
                Some(path) => SenderProfile::from_toml_file(&path)?,
                None => SenderProfile::default(),
            };
            if let Some(name) = name {
                sender.name = name;
            }
            if let Some(job_title) = job_title {
                sender.job_title = job_title;
            }
            if let Some(company) = company {
                sender.company = company;
            }

            let input = match url {
                Some(url) => JobInput::Url(url),
                None => JobInput::Manual(JobRecord::new(
                    role.unwrap_or_default(),
                    experience.unwrap_or_default(),
                    skills.unwrap_or_default(),
                    description.unwrap_or_default(),
                )),
            };

            let pipeline = EmailPipeline::from_config(&config).await?;
            let generated = pipeline.generate(input, &sender).await?;

            app_log!(
                info,
                "Role: {} | links: {}",
                generated.job.role,
                generated.links.join(", ")
            );

            if let Some(output) = output {
                let path = FsOps::output_path(&config.environment.output_path, &output);
                FsOps::write_file_safe(&path, generated.draft.as_str()).await?;
                app_log!(info, "Draft written to {}", path.display());
            }

            println!("{}", generated.draft);
            Ok(())
        }

        Command::Portfolio { command } => handle_portfolio_command(&config, command).await,
    }
}

async fn handle_portfolio_command(config: &ConfigManager, command: PortfolioCommand) -> Result<()> {
    let embedder = Arc::new(Embedder::load(&config.embedding).await);
    let store = Arc::new(SqlitePortfolioStore::open(&config.environment.store_path, embedder).await?);

    match command {
        PortfolioCommand::Load { csv } => {
            let csv = csv.unwrap_or_else(|| config.environment.portfolio_csv.clone());
            let portfolio = Portfolio::new(store, csv);
            let report = portfolio.ensure_loaded().await?;
            if report.already_populated {
                println!("Store already populated, nothing loaded");
            } else {
                println!(
                    "Loaded {} entries ({} rows skipped)",
                    report.loaded, report.skipped
                );
            }
        }
        PortfolioCommand::Count => {
            println!("{}", store.count().await?);
        }
        PortfolioCommand::Clear => {
            let removed = store.clear().await?;
            println!("Removed {} entries", removed);
        }
        PortfolioCommand::Query { text, limit } => {
            let results = store
                .query(&[text], limit)
                .await?
                .into_iter()
                .next()
                .unwrap_or_default();
            if results.is_empty() {
                println!("No matching portfolio entries");
            }
            for link in results {
                println!("{}", link);
            }
        }
    }

    Ok(())
}

fn resolve_port() -> Result<u16> {
    match std::env::var("ROCKET_PORT") {
        Ok(value) => value
            .parse::<u16>()
            .with_context(|| format!("ROCKET_PORT must be a valid port number, got '{}'", value)),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_requires_job_source() {
        let parsed = Cli::try_parse_from(["cold-mail", "generate", "--name", "Ann"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_manual_generate_requires_all_fields() {
        let parsed = Cli::try_parse_from(["cold-mail", "generate", "--role", "Engineer"]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from([
            "cold-mail",
            "generate",
            "--role",
            "Engineer",
            "--experience",
            "2 years",
            "--skills",
            "Rust",
            "--description",
            "Build",
        ]);
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_url_and_manual_conflict() {
        let parsed = Cli::try_parse_from([
            "cold-mail",
            "generate",
            "--url",
            "https://example.com",
            "--role",
            "Engineer",
            "--experience",
            "2 years",
            "--skills",
            "Rust",
            "--description",
            "Build",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_query_default_limit() {
        let cli = Cli::try_parse_from(["cold-mail", "portfolio", "query", "react node"]).unwrap();
        match cli.command {
            Command::Portfolio {
                command: PortfolioCommand::Query { text, limit },
            } => {
                assert_eq!(text, "react node");
                assert_eq!(limit, MATCH_COUNT);
            }
            _ => panic!("expected portfolio query"),
        }
    }
}
