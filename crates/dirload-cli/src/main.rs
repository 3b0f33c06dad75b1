//! dirload CLI - list, check and load the files of one directory

mod json;
mod value_loader;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dirload_core::{DirectoryListing, LoadFormat, LoadableDirectory, LoaderConfig};
use std::path::{Path, PathBuf};
use std::process;
use value_loader::ValueLoader;

#[derive(Parser)]
#[command(name = "dirload")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Directory-scoped file inventory and loader",
    long_about = "List, validate and load the files directly inside one directory.\n\nOnly regular files whose extension is configured are considered."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Args)]
struct DirArgs {
    /// Directory to manage (defaults to the config's directory)
    dir: Option<PathBuf>,

    /// Accepted extension including the dot, repeatable (e.g. -e .json -e .yml)
    #[arg(short, long = "ext")]
    extensions: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the files currently matching the directory's extensions
    List {
        #[command(flatten)]
        target: DirArgs,
    },

    /// Check whether a file belongs to the directory listing
    Check {
        #[command(flatten)]
        target: DirArgs,

        /// File to check, relative to the directory or absolute
        #[arg(long)]
        file: PathBuf,
    },

    /// Load every listed file and report values and errors
    Load {
        #[command(flatten)]
        target: DirArgs,

        /// Content format (auto picks by extension)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,

        /// Exit with an error if any file failed to load
        #[arg(short, long)]
        strict: bool,
    },

    /// Initialize config file
    Init {
        /// Output path for config
        #[arg(default_value = ".dirload.toml")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Auto,
    Text,
    Json,
    Yaml,
    Toml,
}

impl From<FormatArg> for LoadFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Auto => LoadFormat::Auto,
            FormatArg::Text => LoadFormat::Text,
            FormatArg::Json => LoadFormat::Json,
            FormatArg::Yaml => LoadFormat::Yaml,
            FormatArg::Toml => LoadFormat::Toml,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::List { target } => list_command(target, &cli).await,
        Commands::Check { target, file } => check_command(target, file, &cli).await,
        Commands::Load {
            target,
            format,
            output,
            strict,
        } => load_command(target, *format, *output, *strict, &cli).await,
        Commands::Init { output } => init_command(output),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Merge config file and command-line arguments.
///
/// A relative directory argument is taken from the current directory; a
/// relative `directory` in a config file is taken from the file's location.
fn resolve_config(target: &DirArgs, cli: &Cli) -> anyhow::Result<(PathBuf, LoaderConfig)> {
    let mut config = match &cli.config {
        Some(path) => LoaderConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => LoaderConfig::load_or_default(None),
    };

    if !target.extensions.is_empty() {
        config.extensions = target.extensions.clone();
    }
    config.validate()?;

    let dir = match (&target.dir, &config.directory) {
        (Some(dir), _) => absolute(dir)?,
        (None, Some(dir)) => {
            let base = cli
                .config
                .as_deref()
                .and_then(Path::parent)
                .map(absolute)
                .transpose()?;
            match base {
                Some(base) if dir.is_relative() => base.join(dir),
                _ => absolute(dir)?,
            }
        }
        (None, None) => anyhow::bail!("no directory given and none configured"),
    };

    Ok((dir, config))
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

async fn list_command(target: &DirArgs, cli: &Cli) -> anyhow::Result<()> {
    let (dir, config) = resolve_config(target, cli)?;
    let listing = DirectoryListing::new(&dir, config.extensions)?;
    listing.refresh_listing().await?;

    let paths = listing.file_paths();
    for path in &paths {
        println!("{}", path.display());
    }

    if cli.verbose {
        eprintln!(
            "{} {} in {}",
            paths.len(),
            if paths.len() == 1 { "file" } else { "files" },
            listing.directory().display()
        );
    }

    Ok(())
}

async fn check_command(target: &DirArgs, file: &Path, cli: &Cli) -> anyhow::Result<()> {
    let (dir, config) = resolve_config(target, cli)?;
    let listing = DirectoryListing::new(&dir, config.extensions)?;
    listing.refresh_listing().await?;

    let resolved = listing.resolve(file);
    match listing.file_location_error(file) {
        None => {
            println!("{} {}", "✓".green().bold(), resolved.display());
            Ok(())
        }
        Some(error) => {
            println!(
                "{} {} {}",
                "✗".red().bold(),
                error.kind().as_str().yellow(),
                error
            );
            process::exit(1);
        }
    }
}

async fn load_command(
    target: &DirArgs,
    format: Option<FormatArg>,
    output: OutputFormat,
    strict: bool,
    cli: &Cli,
) -> anyhow::Result<()> {
    let (dir, mut config) = resolve_config(target, cli)?;
    if let Some(format) = format {
        config.format = format.into();
    }

    let loader = ValueLoader::new(config.format, config.max_file_size);
    let directory: LoadableDirectory<serde_json::Value, _> =
        LoadableDirectory::new(&dir, config.extensions, loader)?;
    directory.load_all_entries().await;

    let loaded = directory.loaded_entries();
    let errors = directory.error_records();
    let listing_failed = errors
        .iter()
        .any(|r| r.kind == dirload_core::ErrorKind::DirectoryAccess);

    if output == OutputFormat::Json {
        let report = json::load_to_json(directory.directory(), &loaded, &errors);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} {}",
            "Loading:".cyan().bold(),
            directory.directory().display()
        );
        println!();

        for (path, value) in &loaded {
            let file = json::path_to_string(path, directory.directory());
            println!("{} {}", "✓".green().bold(), file);
            if cli.verbose {
                println!("  {}", serde_json::to_string(value)?.dimmed());
            }
        }

        for record in &errors {
            let file = json::path_to_string(&record.path, directory.directory());
            println!(
                "{} {} {}: {}",
                "✗".red().bold(),
                file,
                record.kind.as_str().yellow(),
                record.message
            );
        }

        println!("{}", "─".repeat(60).dimmed());
        println!(
            "Loaded {} {}, {} {}",
            loaded.len(),
            if loaded.len() == 1 { "file" } else { "files" },
            errors.len(),
            if errors.len() == 1 { "error" } else { "errors" }
        );
    }

    if listing_failed || (strict && !errors.is_empty()) {
        process::exit(1);
    }

    Ok(())
}

fn init_command(output: &Path) -> anyhow::Result<()> {
    let default_config = LoaderConfig::default();
    let toml_content = toml::to_string_pretty(&default_config)?;

    std::fs::write(output, toml_content)?;

    println!(
        "{} Created config file: {}",
        "✓".green().bold(),
        output.display()
    );

    Ok(())
}
