//! CLI entry point for post-directory

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use post_directory::config::WidgetConfig;
use post_directory::Directory;

#[derive(Parser)]
#[command(name = "post-directory")]
#[command(version)]
#[command(about = "Render a tag-filtered post directory from index.json", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    cwd: Option<PathBuf>,

    /// Configuration file (defaults to post-directory.yml in the base directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the directory page
    #[command(alias = "r")]
    Render {
        /// Query string of the page URL, e.g. "tag=rust"
        #[arg(short, long, default_value = "")]
        query: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List tags by post count
    Tags,

    /// Report malformed index entries
    Check,

    /// Start a local server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Disable live reload on index changes
        #[arg(long)]
        r#static: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "post_directory=debug,info"
    } else {
        "post_directory=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let directory = match &cli.config {
        Some(path) => Directory::with_config(&base_dir, WidgetConfig::load(path)?)?,
        None => Directory::new(&base_dir)?,
    };

    match cli.command {
        Commands::Render { query, output } => {
            post_directory::commands::render::run(&directory, &query, output.as_deref())?;
        }

        Commands::Tags => {
            post_directory::commands::tags::run(&directory)?;
        }

        Commands::Check => {
            post_directory::commands::check::run(&directory)?;
        }

        Commands::Serve {
            port,
            ip,
            open,
            r#static,
        } => {
            tracing::info!("Starting server at http://{}:{}", ip, port);
            post_directory::server::start(&directory, &ip, port, !r#static, open).await?;
        }
    }

    Ok(())
}
