use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use job_notion::environment::{normalize_database_id, AppConfig};
use job_notion::notion::{payload, NotionClient};
use job_notion::types::JobPosting;

#[derive(Parser)]
#[command(name = "jobnotion")]
#[command(about = "Extract job postings and save them to a Notion database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML config file (defaults to $JOBNOTION_CONFIG or config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a job posting and print it
    Extract {
        /// Job page URL or saved HTML file
        source: String,
        /// Page URL used to resolve links when SOURCE is a file
        #[arg(long)]
        page_url: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Extract a job posting and create a page for it in Notion
    Save {
        source: String,
        #[arg(long)]
        page_url: Option<String>,
        /// Print the Notion request body instead of sending it
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        database_id: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let mut config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract {
            source,
            page_url,
            format,
        } => {
            let job = job_notion::extract_job(&source, page_url, &config).await?;
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&job).context("Failed to serialize job")?
                ),
                OutputFormat::Text => print_text(&job),
            }
        }
        Commands::Save {
            source,
            page_url,
            dry_run,
            token,
            database_id,
        } => {
            if let Some(token) = token {
                config.notion = config.notion.with_token(token);
            }
            if let Some(id) = database_id {
                config.notion = config.notion.with_database_id(normalize_database_id(&id)?);
            }

            let job = job_notion::extract_job(&source, page_url, &config).await?;

            if dry_run {
                let database_id = config.notion.database_id.as_deref().unwrap_or("<database-id>");
                let body = payload::page_payload(&job, database_id);
                let requests = payload::page_children(&job)
                    .len()
                    .div_ceil(config.notion.max_children_per_request.max(1));
                info!("Dry run: upload would take {} request(s)", requests.max(1));
                println!(
                    "{}",
                    serde_json::to_string_pretty(&body).context("Failed to serialize payload")?
                );
                return Ok(());
            }

            let client = NotionClient::new(config.notion.clone())?;
            let saved = client.save_job(&job).await?;

            println!("✓ Saved {} at {} to Notion", job.title, job.company);
            if let Some(url) = saved.url {
                println!("  {}", url);
            }
        }
    }

    Ok(())
}

fn print_text(job: &JobPosting) {
    println!("{} at {}", job.title, job.company);
    for (label, value) in [
        ("Location", &job.location),
        ("Work type", &job.work_type),
        ("Salary", &job.salary),
        ("Contact", &job.contact_person),
        ("URL", &job.url),
    ] {
        if !value.is_empty() {
            println!("{}: {}", label, value);
        }
    }
    println!();
    println!("{}", job.description_text());
}
