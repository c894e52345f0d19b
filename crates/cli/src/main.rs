mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::new::{Layout, NewArticle};

#[derive(Parser)]
#[command(name = "blog-kit")]
#[command(version, about = "Content tooling for multilingual markdown blogs", long_about = None)]
struct Cli {
    /// Site root containing blog.toml
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Machine-translate an article into other locales
    ///
    /// Requires OPENAI_API_KEY. OPENAI_BASE_URL and OPENAI_MODEL override
    /// the [translation] section of blog.toml. A .env file in the site root
    /// is read if present.
    Translate {
        /// Collection the article belongs to (e.g. posts)
        collection: String,

        /// Article directory name
        slug: String,

        /// Locale to translate from (defaults to the default locale)
        #[arg(long)]
        from: Option<String>,

        /// Locale to translate into; repeat for several (defaults to every missing locale)
        #[arg(long = "to")]
        to: Vec<String>,

        /// Fail a locale when its fenced code blocks come back altered
        #[arg(long)]
        strict_code_blocks: bool,
    },

    /// Scaffold a new article
    New {
        /// Collection to create the article in
        collection: String,

        /// Article directory name (lowercase letters, digits and dashes)
        slug: String,

        /// Article title
        #[arg(long)]
        title: String,

        /// Short description
        #[arg(long, default_value = "")]
        description: String,

        /// Locale of the new file (defaults to the default locale)
        #[arg(long)]
        locale: Option<String>,

        /// Storage layout (defaults to the article's existing layout, else flat)
        #[arg(long, value_enum)]
        layout: Option<Layout>,

        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// List content routes
    Routes {
        /// Only this collection
        collection: Option<String>,
    },

    /// Check configuration and content
    Validate,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Translate {
            collection,
            slug,
            from,
            to,
            strict_code_blocks,
        } => {
            commands::translate::run(cli.root, collection, slug, from, to, strict_code_blocks).await
        }
        Command::New {
            collection,
            slug,
            title,
            description,
            locale,
            layout,
            tags,
        } => commands::new::run(
            cli.root,
            NewArticle {
                collection,
                slug,
                title,
                description,
                locale,
                layout,
                tags,
            },
        ),
        Command::Routes { collection } => commands::routes::run(cli.root, collection),
        Command::Validate => commands::validate::run(cli.root),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "blog-kit", &mut io::stdout());
            Ok(())
        }
    }
}
