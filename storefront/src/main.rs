use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::{CatalogManifest, DisplayProduct};
use storefront::catalog::needs_description;
use storefront::{AppError, AppState, Config, print_banner, setup_environment};

#[derive(Parser, Debug)]
#[command(name = "aura", version, about = "Aura storefront catalog tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Show the catalog (cached for an hour, seed data when empty)
    Catalog,
    /// Drop the local cache and read the remote catalog
    Refresh,
    /// List generative models visible to the configured API key
    Models,
    /// Generate missing descriptions into the local draft
    Generate,
    /// Overwrite the remote catalog with the local draft
    Publish {
        /// Skip the confirmation prompt
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    /// Save the generative API key locally
    SetKey { key: String },
    /// Inspect or drop the local draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
}

#[derive(Subcommand, Debug)]
enum DraftAction {
    Show,
    Discard,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env();
    setup_environment(&config)?;
    if !config.is_production() {
        print_banner();
    }

    let state = AppState::initialize(&config).context("failed to initialize storefront")?;

    match cli.command {
        Commands::Catalog => print_products(&state.storefront.load_products().await),
        Commands::Refresh => {
            let products = state.storefront.catalog().refresh_catalog().await;
            println!("Fetched {} products from remote", products.len());
            print_products(&products);
        }
        Commands::Models => {
            let client = state.generative_client()?;
            for model in state.admin.check_connection(&client).await? {
                println!("{model}");
            }
        }
        Commands::Generate => {
            let backfill = state.description_backfill()?;
            let outcome = state.admin.generate_descriptions(&backfill).await?;
            println!(
                "Updated {} of {} products. Run `aura publish` to save to the remote catalog.",
                outcome.success_count, outcome.candidate_count
            );
        }
        Commands::Publish { yes } => {
            let result = state
                .admin
                .publish(|manifest| yes || confirm_publish(manifest))
                .await;
            match result {
                Ok(manifest) => println!("Published {} products", manifest.items.len()),
                Err(AppError::NoDraft) => println!("Nothing to publish"),
                Err(AppError::Aborted(_)) => println!("Publish cancelled"),
                Err(e) => return Err(e.into()),
            }
        }
        Commands::SetKey { key } => {
            state.admin.save_api_key(&key)?;
            println!("API key saved");
        }
        Commands::Draft { action } => match action {
            DraftAction::Show => match state.admin.load_draft()? {
                Some(draft) => print_products(&draft),
                None => println!("No unsaved changes"),
            },
            DraftAction::Discard => {
                state.admin.discard_draft()?;
                println!("Draft discarded");
            }
        },
    }

    Ok(())
}

fn print_products(products: &[DisplayProduct]) {
    for product in products {
        let marker = if needs_description(&product.description) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {:<12} {:<32} {:>8.2}  {}",
            product.id, product.name, product.price, product.category
        );
    }
    println!("{} products (* = missing description)", products.len());
}

fn confirm_publish(manifest: &CatalogManifest) -> bool {
    print!(
        "Overwrite the remote catalog with {} products? [y/N] ",
        manifest.items.len()
    );
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
