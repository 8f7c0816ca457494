//! CLI entry point for devblog

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devblog::commands::theme::ThemeAction;
use devblog::theme::Theme;

#[derive(Parser)]
#[command(name = "devblog")]
#[command(author = "Jay Kim")]
#[command(version = "0.1.0")]
#[command(about = "A small personal blog toolkit", long_about = None)]
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
    /// Start a local server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Rebuild the manifest and reload pages when posts change
        #[arg(short, long)]
        watch: bool,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Regenerate the post manifest from the pages directory
    #[command(alias = "m")]
    Manifest,

    /// List posts or tags
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only posts carrying this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Search query
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Render a single post
    Show {
        /// Post file name under the pages directory
        file: String,
    },

    /// Search posts interactively
    Search,

    /// Read or change the theme preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeCommand>,

        /// OS color scheme to assume
        #[arg(long, value_enum, default_value = "light")]
        os: Scheme,
    },

    /// Commit and push all changes
    Deploy,

    /// Display version information
    Version,
}

#[derive(Subcommand)]
enum ThemeCommand {
    /// Print the active theme
    Get,
    /// Switch between light and dark
    Toggle,
    /// Store a theme
    Set {
        #[arg(value_enum)]
        theme: Scheme,
    },
    /// Simulate an OS color scheme change
    OsChange {
        #[arg(value_enum)]
        theme: Scheme,
    },
    /// Forget the stored preference
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum Scheme {
    Light,
    Dark,
}

impl From<Scheme> for Theme {
    fn from(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Light => Theme::Light,
            Scheme::Dark => Theme::Dark,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "devblog=debug,info"
    } else {
        "devblog=info"
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
        Commands::Serve {
            port,
            ip,
            watch,
            open,
        } => {
            let blog = devblog::Blog::new(&base_dir)?;

            if watch {
                let count = blog.build_manifest()?;
                tracing::info!("Manifest written with {} posts", count);
            }

            tracing::info!("Starting server at http://{}:{}", ip, port);
            devblog::server::start(&blog, &ip, port, watch, open).await?;
        }

        Commands::Manifest => {
            let blog = devblog::Blog::new(&base_dir)?;
            let count = blog.build_manifest()?;
            println!(
                "Wrote {} posts to {}",
                count,
                blog.manifest_path.display()
            );
        }

        Commands::List { r#type, tag, query } => {
            let blog = devblog::Blog::new(&base_dir)?;
            devblog::commands::list::run(&blog, &r#type, tag.as_deref(), &query).await?;
        }

        Commands::Show { file } => {
            let blog = devblog::Blog::new(&base_dir)?;
            devblog::commands::show::run(&blog, &file).await?;
        }

        Commands::Search => {
            let blog = devblog::Blog::new(&base_dir)?;
            devblog::commands::search::run(&blog).await?;
        }

        Commands::Theme { action, os } => {
            let blog = devblog::Blog::new(&base_dir)?;
            let action = match action.unwrap_or(ThemeCommand::Get) {
                ThemeCommand::Get => ThemeAction::Get,
                ThemeCommand::Toggle => ThemeAction::Toggle,
                ThemeCommand::Set { theme } => ThemeAction::Set(theme.into()),
                ThemeCommand::OsChange { theme } => ThemeAction::OsChange(theme.into()),
                ThemeCommand::Reset => ThemeAction::Reset,
            };
            devblog::commands::theme::run(&blog, action, matches!(os, Scheme::Dark))?;
        }

        Commands::Deploy => {
            let blog = devblog::Blog::new(&base_dir)?;
            if let Err(e) = devblog::commands::deploy::run(&blog) {
                eprintln!("\n❌ Deploy failed: {}", e);
                eprintln!("\nRun these steps manually:");
                for step in devblog::commands::deploy::manual_steps(&blog.config.deploy) {
                    eprintln!("  {}", step);
                }
                std::process::exit(1);
            }
        }

        Commands::Version => {
            println!("devblog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
