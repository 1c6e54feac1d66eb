use clap::{Parser, ValueEnum};
use gitignore_create::fs_utils::{self, GenerateOptions};
use gitignore_create::{
    ClientConfig, DEFAULT_BASE_URL, Result, TemplateClient, TemplateName, TemplateQuery, tui,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LONG_HELP: &str = r#"
Examples:
  # Write ./.gitignore for Python
  gitignore-create python
  # Combine several templates (space or comma separated)
  gitignore-create rust linux,macos
  # Write into another directory
  gitignore-create java --path ../service
  # Keep the current .gitignore and add the templates after it
  gitignore-create node --extend
  # Add custom lines after the templates (written verbatim)
  gitignore-create go --append "/bin
.env"
  # Print the result instead of writing it
  gitignore-create python --dry-run
  # List every template, or search them
  gitignore-create --list
  gitignore-create --search java --format json
  # Browse and pick templates in the terminal
  gitignore-create --interactive

Interactive keys:
  Tab / Shift+Tab  move between search, list and output directory
  Space            select or deselect the highlighted template
  Enter            preview the highlighted template
  p                preview the current selection
  Ctrl+G           write the .gitignore for the selection
  Ctrl+R           reload the template list
  Esc / Ctrl+C     quit

For more information, visit: https://github.com/iliailmer/gitignore-create
"#;

/// Generate .gitignore files from gitignore.io templates.
#[derive(Parser, Debug)]
#[command(
    name = "gitignore-create",
    version,
    about = "Generate .gitignore files from gitignore.io templates.",
    after_long_help = LONG_HELP,
    after_help = "For more information, visit: https://github.com/iliailmer/gitignore-create"
)]
struct Cli {
    /// Template names to combine (e.g. python java,linux)
    #[arg(value_name = "NAMES", value_delimiter = ',')]
    names: Vec<String>,

    /// Directory that receives the .gitignore
    #[arg(
        short,
        long,
        value_name = "DIR",
        default_value = ".",
        env = "GITIGNORE_CREATE_PATH"
    )]
    path: PathBuf,

    /// Text written verbatim after the templates
    #[arg(short, long, value_name = "TEXT")]
    append: Option<String>,

    /// Keep the existing .gitignore and add the templates after it
    #[arg(short, long)]
    extend: bool,

    /// List every available template
    #[arg(short, long, conflicts_with_all = ["search", "names"])]
    list: bool,

    /// Search templates by (case-insensitive) substring
    #[arg(short, long, value_name = "QUERY", conflicts_with = "names")]
    search: Option<String>,

    /// Output format for --list and --search
    #[arg(short = 'f', long, value_enum, default_value = "plain")]
    format: ListFormat,

    /// Print the resulting file to stdout instead of writing it
    #[arg(long, requires = "names")]
    dry_run: bool,

    /// Pick templates in a terminal UI (default when no names are given)
    #[arg(short, long, conflicts_with_all = ["list", "search", "dry_run"])]
    interactive: bool,

    /// Base URL of the template service
    #[arg(long, value_name = "URL", env = "GITIGNORE_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// The terminal UI runs when asked for, or when no other mode was chosen
    fn wants_interactive(&self) -> bool {
        self.interactive
            || (self.names.is_empty() && !self.list && self.search.is_none() && !self.dry_run)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
enum ListFormat {
    /// One name per line
    Plain,
    /// JSON document for scripting
    Json,
}

#[derive(Serialize)]
struct CatalogReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
    count: usize,
    templates: &'a [TemplateName],
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let interactive = cli.wants_interactive();

    // The terminal UI owns the screen, so nothing is logged while it runs
    if !interactive {
        init_logging(cli.quiet, cli.verbose);
    }

    let client = match TemplateClient::new(ClientConfig {
        base_url: cli.api_url.clone(),
        timeout: Duration::from_secs(cli.timeout),
    }) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let result = if interactive {
        tui::run(client, cli.path.display().to_string(), generate_options(&cli)).await
    } else if cli.list {
        list_templates(&client, cli.format).await
    } else if let Some(query) = &cli.search {
        search_templates(&client, query, cli.format).await
    } else {
        generate_gitignore(&client, &cli).await
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn generate_options(cli: &Cli) -> GenerateOptions {
    GenerateOptions {
        extend: cli.extend,
        append: cli.append.clone(),
    }
}

async fn generate_gitignore(client: &TemplateClient, cli: &Cli) -> Result<()> {
    let query = TemplateQuery::parse(&cli.names)?;
    info!(templates = %query, "fetching templates");
    let content = client.fetch_valid(&query).await?;
    let options = generate_options(cli);

    if cli.dry_run {
        debug!("dry run, printing instead of writing");
        let bytes = fs_utils::render(&cli.path, &content, &options)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(&bytes)?;
        stdout.flush()?;
    } else {
        let path = fs_utils::generate(&cli.path, &content, &options)?;
        if !cli.quiet {
            eprintln!("Wrote {} ({query})", path.display());
        }
    }
    Ok(())
}

async fn list_templates(client: &TemplateClient, format: ListFormat) -> Result<()> {
    let catalog = client.list_catalog().await?;
    print_names(None, catalog.names(), format)
}

async fn search_templates(client: &TemplateClient, query: &str, format: ListFormat) -> Result<()> {
    let found = client.search_catalog(query).await?;
    info!(query, matches = found.len(), "search finished");
    print_names(Some(query), &found, format)
}

fn print_names(query: Option<&str>, names: &[TemplateName], format: ListFormat) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match format {
        ListFormat::Plain => {
            for name in names {
                writeln!(stdout, "{name}")?;
            }
        }
        ListFormat::Json => {
            let report = CatalogReport {
                query,
                count: names.len(),
                templates: names,
            };
            writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;
        }
    }
    stdout.flush()?;
    Ok(())
}
