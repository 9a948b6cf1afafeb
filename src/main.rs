//! `recipe-bom` command line entry point.
//!
//! Usage:
//! ```bash
//! # List clients (uses DATABASE_URL from environment)
//! cargo run -- clients
//!
//! # Seed the clients listed in config.toml as RECIPE_USER_ID
//! cargo run -- seed
//!
//! # Create a recipe from a JSON ingredient list
//! cargo run -- add-recipe 1 "Sourdough" ingredients.json --allowance 5
//!
//! # Print the BOM table of a recipe
//! cargo run -- report 3
//! ```

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use recipe_bom::{
    config::{database, settings, users},
    core::{
        calculations::Ingredient,
        client,
        draft::RecipeDraft,
        recipe::{self, NewRecipe},
        report,
    },
    errors::Result,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "recipe-bom",
    about = "Recipe bill-of-materials calculator",
    long_about = "Manage clients and print stored recipe BOM tables"
)]
struct Args {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Path to the settings file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all clients, newest first
    Clients,
    /// List the recipes of one client
    Recipes {
        /// Client ID
        client_id: i64,
    },
    /// Print the BOM table of a recipe
    Report {
        /// Recipe ID
        recipe_id: i64,
    },
    /// Create the clients listed in the settings file
    Seed,
    /// Create a client as the current user
    AddClient {
        /// Client name
        name: String,
    },
    /// Create a recipe from a JSON ingredient list as the current user
    AddRecipe {
        /// Owning client ID
        client_id: i64,
        /// Recipe name
        name: String,
        /// JSON file holding an array of ingredients
        ingredients: PathBuf,
        /// Moisture in product, percent (defaults from settings)
        #[arg(long)]
        moisture: Option<f64>,
        /// Allowance, percent (defaults from settings)
        #[arg(long)]
        allowance: Option<f64>,
        /// Production quantity in kilograms (defaults from settings)
        #[arg(long)]
        production: Option<f64>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Load .env before reading any environment variables
    dotenv().ok();

    let args = Args::parse();

    // 2. Initialize tracing
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // 3. Load settings and connect
    let config = settings::load_optional_config(&args.config)
        .inspect_err(|e| error!("Failed to load settings: {e}"))?;
    let database_url = args.database_url.unwrap_or_else(database::get_database_url);
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;

    // 4. Run the command
    match args.command {
        Command::Clients => {
            for client in client::list_clients(&db).await? {
                println!("{:>5}  {}  (created {})", client.id, client.name, client.created_at.date_naive());
            }
        }
        Command::Recipes { client_id } => {
            for recipe in recipe::list_recipes_by_client(&db, client_id).await? {
                println!(
                    "{:>5}  {}  final output {:.2}",
                    recipe.id, recipe.name, recipe.final_output
                );
            }
        }
        Command::Report { recipe_id } => {
            let bom = report::generate_bom_report(&db, recipe_id).await?;
            print!("{}", report::format_bom_report(&bom));
        }
        Command::Seed => {
            let user = users::current_user();
            let created = client::seed_clients(&db, user.as_ref(), &config.clients)
                .await
                .inspect_err(|e| error!("Failed to seed clients: {e}"))?;
            info!("Created {} clients", created.len());
        }
        Command::AddClient { name } => {
            let user = users::current_user();
            let created = client::create_client(&db, user.as_ref(), name).await?;
            println!("Created client {} ({})", created.id, created.name);
        }
        Command::AddRecipe {
            client_id,
            name,
            ingredients,
            moisture,
            allowance,
            production,
        } => {
            let contents = std::fs::read_to_string(&ingredients)?;
            let rows: Vec<Ingredient> = serde_json::from_str(&contents)?;

            let mut inputs = config.defaults;
            inputs.moisture_in_product = moisture.unwrap_or(inputs.moisture_in_product);
            inputs.allowance_percentage = allowance.unwrap_or(inputs.allowance_percentage);
            inputs.production_quantity = production.unwrap_or(inputs.production_quantity);

            let user = users::current_user();
            let created = recipe::create_recipe(
                &db,
                user.as_ref(),
                NewRecipe {
                    client_id: Some(client_id),
                    name,
                    description: None,
                    instructions: None,
                    draft: RecipeDraft::from_parts(rows, inputs),
                },
            )
            .await?;
            print!(
                "{}",
                report::format_bom_report(&report::BomReport::from_recipe(created))
            );
        }
    }

    Ok(())
}
