use anyhow::{bail, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use dblp_cite::config::{find_config_file, load_config, Config, ConfigFile};
use dblp_cite::models::{CitationKeyField, SearchResponse};
use dblp_cite::sources::{bibtex_url_for, DblpSource, Source};
use dblp_cite::ui::{self, Spinner, Status};
use dblp_cite::utils::{doi_resolver_url, extract_doi, parse_max_results, prepare_bibtex, ValidationError};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// dblp-cite - Search DBLP and copy clean BibTeX citations
#[derive(Parser, Debug)]
#[command(name = "dblp-cite")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search the DBLP bibliography and prepare BibTeX with readable citation keys", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: KeyOverrides,

    #[command(subcommand)]
    command: Commands,
}

/// Command-line overrides for the citation options
#[derive(Args, Debug, Default)]
struct KeyOverrides {
    /// Keep the original DBLP citation key
    #[arg(long, global = true)]
    no_rename: bool,

    /// Citation key tokens, e.g. author,dash,year (author, year, venue, title, dash, underscore)
    #[arg(long, global = true, value_delimiter = ',')]
    key_fields: Option<Vec<String>>,

    /// Capitalize the first letter of the author token
    #[arg(long, global = true)]
    capitalize_author: bool,

    /// Uppercase the venue token
    #[arg(long, global = true)]
    uppercase_venue: bool,

    /// Keep the timestamp, biburl and bibsource fields
    #[arg(long, global = true)]
    keep_metadata: bool,

    /// Remove the url field
    #[arg(long, global = true)]
    remove_url: bool,
}

impl KeyOverrides {
    fn apply(&self, config: &mut Config) {
        if self.no_rename {
            config.key_renaming = false;
        }
        if let Some(fields) = &self.key_fields {
            config.citation_key_fields =
                Some(fields.iter().map(|f| CitationKeyField::from_token(f)).collect());
        }
        if self.capitalize_author {
            config.author_capitalize = true;
        }
        if self.uppercase_venue {
            config.venue_uppercase = true;
        }
        if self.keep_metadata {
            config.remove_timestamp_biburl_bibsource = false;
        }
        if self.remove_url {
            config.remove_url = true;
        }
    }
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if ui::is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search DBLP for publications
    #[command(alias = "s")]
    Search {
        /// Search query string
        query: String,

        /// Results per page (1-1000, default from config)
        #[arg(long, short, value_parser = parse_max_results)]
        max_results: Option<usize>,

        /// Index of the first result
        #[arg(long, default_value_t = 0, conflicts_with = "page")]
        offset: usize,

        /// Page number, starting at 1
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page: Option<u32>,
    },

    /// Fetch a DBLP BibTeX entry and prepare it for citing
    #[command(alias = "b")]
    Bibtex {
        /// BibTeX link, record URL, or DBLP key (e.g. DBLP:journals/tse/Smith23)
        reference: String,
    },

    /// Prepare a local DBLP BibTeX entry (from a file, or stdin with "-")
    Cite {
        /// Input file; reads stdin when omitted or "-"
        file: Option<PathBuf>,
    },

    /// Extract a DOI from text and print its resolver URL
    Doi {
        /// Text containing a DOI, e.g. "https://doi.org/10.1145/1234567."
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show or create the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file location
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("dblp_cite={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_file = match &cli.config {
        Some(path) => Some(ConfigFile::new(path)),
        None => find_config_file(),
    };
    if let Some(file) = &config_file {
        tracing::info!("Using config file: {}", file.path().display());
    }

    // `config init` may target a file that does not exist yet
    let initializing = matches!(
        cli.command,
        Commands::Config {
            action: ConfigAction::Init { .. }
        }
    );
    let load_path = config_file
        .as_ref()
        .filter(|file| !initializing || file.exists())
        .map(|file| file.path());

    let mut config = load_config(load_path).context("failed to load configuration")?;
    cli.overrides.apply(&mut config);
    config.validate()?;

    let format = cli.output.resolve();

    match cli.command {
        Commands::Search {
            query,
            max_results,
            offset,
            page,
        } => {
            let mut search_query = config.search_query(query);
            if let Some(max) = max_results {
                search_query = search_query.max_results(max);
            }
            let offset = match page {
                Some(page) => (page as usize - 1) * search_query.effective_max_results(),
                None => offset,
            };
            let search_query = search_query.offset(offset);

            let dblp = DblpSource::new()?;
            let spinner = spinner(cli.quiet, &format!("Searching DBLP for \"{}\"...", search_query.query));
            let started = Instant::now();

            let response = match dblp.search(&search_query).await {
                Ok(response) => {
                    spinner.clear();
                    response
                }
                Err(e) => {
                    spinner.finish_with_error("Search failed");
                    return Err(e.into());
                }
            };

            output_search(&response, format, cli.quiet, started.elapsed());
        }

        Commands::Bibtex { reference } => {
            let url = bibtex_url_for(&reference);
            let dblp = DblpSource::new()?;
            let spinner = spinner(cli.quiet, "Fetching BibTeX from DBLP...");

            let raw = match dblp.fetch_bibtex(&url).await {
                Ok(raw) => {
                    spinner.clear();
                    raw
                }
                Err(e) => {
                    spinner.finish_with_error("Download failed");
                    return Err(e).with_context(|| format!("could not fetch {}", url));
                }
            };

            let prepared = prepare_bibtex(&raw, &config.citation_options())
                .context("could not rewrite the citation key")?;
            output_bibtex(&prepared, Some(&url), format);
        }

        Commands::Cite { file } => {
            let raw = read_input(file.as_ref())?;
            let prepared = prepare_bibtex(&raw, &config.citation_options())
                .context("could not rewrite the citation key")?;
            output_bibtex(&prepared, None, format);
        }

        Commands::Doi { text } => {
            let text = text.join(" ");
            let Some(doi) = extract_doi(&text) else {
                if !cli.quiet {
                    ui::print_status(Status::Error, "Invalid DOI format");
                }
                return Err(ValidationError::InvalidDoi(text).into());
            };

            let resolver = doi_resolver_url(&doi);
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "doi": doi,
                        "url": resolver,
                    }))?
                ),
                _ => {
                    println!("{}", doi);
                    println!("{}", resolver);
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                print!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigAction::Init { force } => {
                let file = match cli.config {
                    Some(path) => ConfigFile::new(path),
                    None => ConfigFile::user_default()
                        .context("could not determine the user configuration directory")?,
                };
                if file.exists() && !force {
                    bail!(
                        "{} already exists (use --force to overwrite)",
                        file.path().display()
                    );
                }
                file.save(&Config::default())?;
                if !cli.quiet {
                    ui::print_status(
                        Status::Success,
                        &format!("Wrote {}", file.path().display()),
                    );
                }
            }
            ConfigAction::Path => match config_file {
                Some(file) => println!("{}", file.path().display()),
                None => {
                    if !cli.quiet {
                        ui::print_status(Status::Info, "No configuration file found");
                    }
                    if let Some(default) = ConfigFile::user_default() {
                        println!("{}", default.path().display());
                    }
                }
            },
        },

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "dblp-cite", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn spinner(quiet: bool, msg: &str) -> Spinner {
    if quiet || !std::io::stderr().is_terminal() {
        Spinner::hidden()
    } else {
        Spinner::new(msg)
    }
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("could not read stdin")?;
            Ok(buf)
        }
    }
}

fn output_search(
    response: &SearchResponse,
    format: OutputFormat,
    quiet: bool,
    elapsed: std::time::Duration,
) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(response) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!("Failed to serialize results: {}", e),
        },
        OutputFormat::Plain => {
            print!("{}", ui::publications_plain(&response.publications));
        }
        OutputFormat::Table | OutputFormat::Auto => {
            if !quiet {
                ui::print_search_header(response, elapsed);
            }
            if response.publications.is_empty() {
                if !quiet {
                    ui::print_status(Status::Info, "No publications found");
                }
            } else {
                println!(
                    "{}",
                    ui::publications_table(&response.publications, ui::terminal_width())
                );
            }
            if response.has_more() && !quiet {
                ui::print_status(
                    Status::Info,
                    &format!(
                        "More results available: --offset {}",
                        response.offset + response.sent_hits
                    ),
                );
            }
        }
    }
}

fn output_bibtex(bibtex: &str, source_url: Option<&str>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({ "url": source_url, "bibtex": bibtex });
            match serde_json::to_string_pretty(&value) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::error!("Failed to serialize BibTeX: {}", e),
            }
        }
        _ => println!("{}", bibtex.trim_end()),
    }
}
