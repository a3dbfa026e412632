// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use vitrine_runtime::cli;
use vitrine_runtime::config::Settings;
use vitrine_runtime::ingest::ManualForm;

#[derive(Parser)]
#[command(
    name = "vitrine",
    about = "Vitrine: turn product links into a catalog and publish it as an XML feed",
    version,
    after_help = "Run 'vitrine <command> --help' for details on each command."
)]
struct Cli {
    /// Data directory (default: $VITRINE_DATA_DIR or ~/.vitrine)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Timeout for each outbound HTTP call, in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the REST API and the product feed
    Serve {
        /// Port to listen on (default: $PORT or 5000)
        #[arg(long)]
        port: Option<u16>,
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },
    /// Resolve a product link and add it to the catalog
    Add {
        /// Product page, post or image link
        url: String,
        /// Category label (default: General)
        #[arg(long)]
        category: Option<String>,
    },
    /// Import every link of a CSV file in one batch
    Import {
        /// CSV file with a `url` or `link` column
        csv: PathBuf,
        /// Category label for all imported items
        #[arg(long)]
        category: Option<String>,
    },
    /// Add an item from a local image file
    Manual {
        /// Image file to store
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Sale price
        #[arg(long)]
        price: Option<String>,
        /// Mold price
        #[arg(long)]
        mold_price: Option<String>,
        #[arg(long)]
        width: Option<String>,
        #[arg(long)]
        height: Option<String>,
        /// Quantity on hand (default: 1)
        #[arg(long)]
        quantity: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// List catalog items
    List,
    /// Remove an item and its stored image
    Remove {
        /// Item id
        id: String,
    },
    /// Print the product feed XML
    Feed {
        /// Base URL used for locally stored images
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List categories
    List,
    /// Add a category
    Add { name: String },
    /// Remove a category
    Remove { name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var("VITRINE_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("VITRINE_QUIET", "1");
    }
    if cli.no_color {
        std::env::set_var("VITRINE_NO_COLOR", "1");
    }

    cli::logging::init(cli.verbose, cli.quiet, cli.log_json);
    let settings = Settings::resolve(cli.data_dir.as_deref(), cli.timeout_ms);

    let result = match cli.command {
        Commands::Serve { port, bind } => cli::serve_cmd::run(settings, port, &bind).await,
        Commands::Add { url, category } => {
            cli::add_cmd::run(&settings, &url, category.as_deref()).await
        }
        Commands::Import { csv, category } => {
            cli::import_cmd::run(&settings, &csv, category.as_deref()).await
        }
        Commands::Manual {
            image,
            title,
            category,
            price,
            mold_price,
            width,
            height,
            quantity,
            description,
        } => {
            let form = ManualForm {
                title,
                category,
                price,
                mold_price,
                width,
                height,
                quantity,
                description,
            };
            cli::manual_cmd::run(&settings, &image, form).await
        }
        Commands::List => cli::items_cmd::list(&settings).await,
        Commands::Remove { id } => cli::items_cmd::remove(&settings, &id).await,
        Commands::Feed { base_url } => cli::feed_cmd::run(&settings, base_url.as_deref()).await,
        Commands::Categories { action } => match action {
            CategoryAction::List => cli::categories_cmd::list(&settings).await,
            CategoryAction::Add { name } => cli::categories_cmd::add(&settings, &name).await,
            CategoryAction::Remove { name } => cli::categories_cmd::remove(&settings, &name).await,
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "vitrine", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if cli::output::is_json() {
            cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        } else if !cli::output::is_quiet() {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_manual() {
        let cli = Cli::try_parse_from([
            "vitrine",
            "--data-dir",
            "/tmp/v",
            "manual",
            "--image",
            "a.png",
            "--mold-price",
            "90",
        ])
        .unwrap();
        assert_eq!(cli.data_dir.as_deref(), Some("/tmp/v"));
        match cli.command {
            Commands::Manual { mold_price, image, .. } => {
                assert_eq!(mold_price.as_deref(), Some("90"));
                assert_eq!(image, PathBuf::from("a.png"));
            }
            _ => panic!("expected manual"),
        }
    }
}
