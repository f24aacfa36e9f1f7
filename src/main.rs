//! CLI entry point for stationary

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stationary")]
#[command(version)]
#[command(about = "A small static blog generator with a preview server", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Generate the static site
    #[command(alias = "b")]
    Build,

    /// Remove the output directory
    Clean,

    /// Serve the output directory over HTTP
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Clean and rebuild the site before serving
        #[arg(short, long)]
        build: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "stationary=debug,info"
    } else {
        "stationary=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            stationary::commands::init::init_site(&target_dir)?;
            println!("Initialized new site in {:?}", target_dir);
        }

        Commands::Build => {
            let site = stationary::Stationary::new(&base_dir)?;
            site.build()?;
            println!("Built {:?}", site.public_dir);
        }

        Commands::Clean => {
            let site = stationary::Stationary::new(&base_dir)?;
            tracing::info!("Cleaning {:?}", site.public_dir);
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Serve { port, ip, build } => {
            let site = stationary::Stationary::new(&base_dir)?;

            if build {
                stationary::commands::build::rebuild(&site)?;
            }

            let port = port.unwrap_or(site.config.port);
            tracing::info!("Starting server at http://{}:{}", ip, port);
            stationary::server::start(&site, &ip, port).await?;
        }
    }

    Ok(())
}
