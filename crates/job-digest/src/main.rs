//! Job digest CLI - emails the top new job postings and marks them notified.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use job_digest::jobs::{select_digest, JobStore};
use job_digest::{
    DigestConfig, DigestOutcome, DigestPipeline, FileReferenceStore, JsonFileJobStore, LogTransport,
    MailTransport, MemoryJobStore, SmtpTransport,
};

/// Job digest CLI - select, email and mark top job postings.
#[derive(Parser)]
#[command(name = "job-digest")]
#[command(about = "Job search digest email sender")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// TOML config file (defaults to DIGEST_* environment variables)
    #[arg(long, global = true, env = "DIGEST_CONFIG")]
    config: Option<PathBuf>,

    /// Override the number of jobs per digest
    #[arg(long, global = true)]
    top_n: Option<usize>,

    /// Override the minimum score
    #[arg(long, global = true)]
    min_score: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
pub struct StoreArgs {
    /// Job store file (JSON array of job records)
    #[arg(long, env = "DIGEST_JOBS_FILE", default_value = "data/jobs.json")]
    jobs: PathBuf,

    /// Directory holding reference documents (<id>.txt or <id>.md)
    #[arg(long, env = "DIGEST_DOCUMENTS_DIR", default_value = "data/documents")]
    documents: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send the digest and mark the emailed jobs as notified
    Send {
        #[command(flatten)]
        store: StoreArgs,

        /// Log the email instead of sending it and leave the job file untouched
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the email the next run would send
    Preview {
        #[command(flatten)]
        store: StoreArgs,

        /// Print the HTML body instead of the text body
        #[arg(long)]
        html: bool,
    },

    /// List the jobs the next digest would include
    List {
        /// Job store file
        #[arg(long, env = "DIGEST_JOBS_FILE", default_value = "data/jobs.json")]
        jobs: PathBuf,
    },

    /// Send a test email to verify SMTP settings
    TestEmail {
        /// Recipient (defaults to the configured recipient)
        #[arg(long)]
        to: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("job_digest=debug,info")
    } else {
        EnvFilter::new("job_digest=info,warn")
    };

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(top_n) = cli.top_n {
        config.top_n = top_n;
    }
    if let Some(min_score) = cli.min_score {
        config.min_score = min_score;
    }

    match cli.command {
        Commands::Send { store, dry_run } => {
            tracing::info!(
                jobs = %store.jobs.display(),
                dry_run,
                top_n = config.top_n,
                min_score = config.min_score,
                "Starting digest run"
            );
            run_send(config, store, dry_run).await
        }
        Commands::Preview { store, html } => run_preview(config, store, html).await,
        Commands::List { jobs } => run_list(&config, &jobs).await,
        Commands::TestEmail { to } => run_test_email(&config, to).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<DigestConfig> {
    match path {
        Some(path) => DigestConfig::from_file(path),
        None => DigestConfig::from_env(),
    }
}

async fn run_send(config: DigestConfig, store: StoreArgs, dry_run: bool) -> Result<()> {
    let file_store = Arc::new(JsonFileJobStore::new(&store.jobs));
    let references = Arc::new(FileReferenceStore::new(&store.documents));

    let job_store: Arc<dyn JobStore>;
    let transport: Arc<dyn MailTransport>;
    if dry_run {
        // Operate on a copy so the job file is never rewritten
        let rows = file_store
            .read_all()
            .await
            .with_context(|| format!("Failed to read {}", store.jobs.display()))?;
        job_store = Arc::new(MemoryJobStore::new(rows));
        transport = Arc::new(LogTransport);
    } else {
        job_store = file_store;
        transport = Arc::new(SmtpTransport::from_env().context("SMTP is not configured")?);
    }

    let pipeline = DigestPipeline::new(config, job_store, transport, references);
    let outcome = pipeline.run().await?;

    println!("\n📊 Digest Summary");
    match outcome {
        DigestOutcome::NoEligibleJobs => {
            println!("   📭 No eligible jobs to email");
        }
        DigestOutcome::Sent {
            emailed,
            rendered,
            updated,
        } => {
            println!("   Emailed: {emailed}");
            println!("   Rendered rows: {rendered}");
            println!("   Marked notified: {updated}");
            if dry_run {
                println!("   (dry run: nothing sent, job file unchanged)");
            }
        }
    }

    Ok(())
}

async fn run_preview(config: DigestConfig, store: StoreArgs, html: bool) -> Result<()> {
    let pipeline = DigestPipeline::new(
        config,
        Arc::new(JsonFileJobStore::new(&store.jobs)),
        Arc::new(LogTransport),
        Arc::new(FileReferenceStore::new(&store.documents)),
    );

    let Some(email) = pipeline.preview().await? else {
        println!("📭 No eligible jobs to email");
        return Ok(());
    };

    println!("To: {}", pipeline.config().email_recipient);
    println!("Subject: {}\n", email.subject);
    if html {
        println!("{}", email.html_body);
    } else {
        println!("{}", email.text_body);
    }

    Ok(())
}

async fn run_list(config: &DigestConfig, jobs: &Path) -> Result<()> {
    let store = JsonFileJobStore::new(jobs);
    let rows = store
        .read_all()
        .await
        .with_context(|| format!("Failed to read {}", jobs.display()))?;

    let digest = select_digest(&rows, config.min_score, config.top_n);
    if digest.is_empty() {
        println!("No eligible jobs.");
        return Ok(());
    }

    println!("📋 Next digest ({} of {} rows)\n", digest.len(), rows.len());
    for job in &digest {
        let score = job.score.map_or_else(|| "N/A".to_string(), |s| s.to_string());
        println!("🔖 {} [{}] {}", job.id, score, job.title);
        if !job.company.is_empty() || !job.location.is_empty() {
            println!("   {} {}", job.company, job.location);
        }
        println!("   {}\n", job.link);
    }

    Ok(())
}

async fn run_test_email(config: &DigestConfig, to: Option<String>) -> Result<()> {
    let recipient = to.unwrap_or_else(|| config.email_recipient.clone());
    if recipient.trim().is_empty() {
        anyhow::bail!("No recipient: pass --to or set DIGEST_TO_EMAIL");
    }

    let transport = SmtpTransport::from_env().context("SMTP is not configured")?;
    transport.send_test(&recipient).await?;
    println!("✅ Test email sent to {recipient}");

    Ok(())
}
