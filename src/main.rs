use clap::{Parser, Subcommand};
use inline_gal::{bundler, compress, config, embed, output, scan};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "inline-gal")]
#[command(about = "Embed a directory of JPEGs into a single-file HTML gallery")]
#[command(long_about = "\
Embed a directory of JPEGs into a single-file HTML gallery

Images are compressed, base64-encoded, and written into one inline
<script> block in the target HTML file as data: URIs. The finished page
is fully self-contained: it renders from a file:// URL or any static
host with no further requests.

Project layout:

  project/
  ├── index.html               # Target page, rewritten in place
  ├── config.toml              # Optional overrides (quality, width, backend)
  └── images/
      ├── atrium.jpg           # Embedded under key \"atrium\"
      ├── facade.jpeg          # .jpg and .jpeg, any case
      └── notes.txt            # Ignored (only JPEGs are embedded)

The generated block assigns a key → data URI object to 'galleryImages',
where each key is the source filename without its extension. Re-running
the tool replaces the block it wrote; other markup is never touched.

Run 'inline-gal gen-config' to print a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory of source JPEGs
    #[arg(long, default_value = "images", global = true)]
    source: PathBuf,

    /// Target HTML file, rewritten in place
    #[arg(long, default_value = "index.html", global = true)]
    html: PathBuf,

    /// Config file (default: config.toml next to the HTML file, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress and embed all images into the HTML file
    Embed,
    /// List the images a run would embed, without writing anything
    Check,
    /// Print the front-end build descriptor as JSON
    BundlerConfig,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Embed => {
            let config = load_tool_config(&cli)?;
            let strategy = compress::CompressionStrategy::resolve(config.compression.backend);
            let params = compress::CompressParams::from_config(&config);

            println!(
                "==> Embedding {} into {}",
                cli.source.display(),
                cli.html.display()
            );
            println!("{}", output::format_strategy_banner(strategy));

            let result = embed::run(&cli.source, &cli.html, strategy, params, &mut |event| {
                output::print_embed_event(&event);
            })?;

            println!();
            output::print_embed_summary(&result.report);
            println!("{}", output::format_splice_outcome(result.splice, &cli.html));
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let images = scan::scan(&cli.source)?;
            output::print_check_output(&images);
        }
        Command::BundlerConfig => {
            let descriptor = bundler::BundlerConfig::from_env();
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the tool config: explicit `--config` path wins, else `config.toml`
/// next to the target HTML file, else stock defaults.
fn load_tool_config(cli: &Cli) -> Result<config::ToolConfig, config::ConfigError> {
    match &cli.config {
        Some(path) => config::load_config_file(path),
        None => {
            let dir = match cli.html.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            config::load_config(dir)
        }
    }
}
