//! Product Sync - warehouse product client
//!
//! Loads the product list from the product service and applies one intent
//! (list, suggest, add, adjust quantity, delete) against it.

use std::io::{self, Write};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use product_sync::config::{API_URL_ENV, DEFAULT_API_URL};
use product_sync::{
    Adjustment, AdjustmentOutcome, GatewayConfig, HttpGateway, Product, ProductDraft, ProductId,
    ProductStore, QuantityPolicy, Resolution, StoreResult, UpdateOutcome, SUGGESTION_LIMIT,
};

const NEGATIVE_QUANTITY_PROMPT: &str = "Quantity below 0. Do you want to delete this product?";
const DELETE_PROMPT: &str = "Are you sure you want to completely remove this product from the warehouse? This action cannot be undone.";

/// Warehouse product client - keeps a local product list in sync with the product service
#[derive(Parser, Debug)]
#[command(name = "product_sync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the product service
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List products, optionally filtered by name or category
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show autocomplete suggestions for a search term
    Suggest {
        term: String,
        #[arg(long, default_value_t = SUGGESTION_LIMIT)]
        limit: usize,
    },
    /// Add a new product
    Add(AddArgs),
    /// Change the quantity of a product; going below zero offers to delete it
    Adjust {
        id: ProductId,
        #[command(flatten)]
        change: QuantityChange,
        /// Answer yes to the deletion prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete a product
    Delete {
        id: ProductId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Command {
    fn mutates(&self) -> bool {
        !matches!(self, Command::List { .. } | Command::Suggest { .. })
    }
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, default_value = product_sync::models::DEFAULT_CATEGORY)]
    category: String,
    #[arg(long, default_value = product_sync::models::DEFAULT_SUB_CATEGORY)]
    sub_category: String,
    #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
    quantity: i64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    price: f64,
    #[arg(long, default_value = product_sync::models::DEFAULT_UNIT)]
    unit: String,
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    sku: Option<String>,
    #[arg(long)]
    barcode: Option<String>,
    /// Expiry date as YYYY-MM-DD
    #[arg(long)]
    expiry_date: Option<NaiveDate>,
    /// Mark the product as inactive
    #[arg(long, default_value_t = false)]
    inactive: bool,
}

impl From<AddArgs> for ProductDraft {
    fn from(args: AddArgs) -> Self {
        ProductDraft {
            name: args.name,
            description: args.description,
            category: args.category,
            sub_category: args.sub_category,
            quantity: args.quantity,
            price: args.price,
            unit: args.unit,
            brand: args.brand,
            sku: args.sku,
            barcode: args.barcode,
            expiry_date: args.expiry_date,
            is_active: !args.inactive,
        }
    }
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct QuantityChange {
    /// Change the quantity by this amount
    #[arg(long, allow_hyphen_values = true)]
    by: Option<i64>,
    /// Set the quantity to this value (unparseable input counts as 0)
    #[arg(long, allow_hyphen_values = true)]
    set: Option<String>,
}

impl QuantityChange {
    fn into_adjustment(self) -> Adjustment {
        match self.by {
            Some(delta) => Adjustment::By(delta),
            None => Adjustment::Entered(self.set.unwrap_or_default()),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Product service: {}", cli.api_url);

    let store = ProductStore::new(HttpGateway::new(GatewayConfig::new(cli.api_url)));

    if let Err(e) = store.load().await {
        if cli.command.mutates() {
            log::error!("{e}");
            std::process::exit(1);
        }
        log::warn!("{e}; showing an empty product list");
    }

    if let Err(e) = run(&store, cli.command).await {
        log::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(store: &ProductStore<HttpGateway>, command: Command) -> StoreResult<()> {
    match command {
        Command::List { search } => {
            let view = store.view(&search).await;
            print_products(&view.products);
        }
        Command::Suggest { term, limit } => {
            let products = store.snapshot().await;
            for name in product_sync::suggestions(&term, &products, limit) {
                println!("{name}");
            }
        }
        Command::Add(args) => {
            let created = store.add(args.into()).await?;
            println!("Added {} (ID: {})", created.name, created.id);
        }
        Command::Adjust { id, change, yes } => {
            let policy = QuantityPolicy::new(store);
            match policy.adjust(&id, change.into_adjustment()).await? {
                AdjustmentOutcome::Committed(UpdateOutcome::Applied(product)) => {
                    println!("{} quantity is now {}", product.name, product.quantity);
                }
                AdjustmentOutcome::Committed(UpdateOutcome::RolledBack { original, reason }) => {
                    log::warn!("Update not applied: {reason}");
                    println!("{} quantity stays at {}", original.name, original.quantity);
                }
                AdjustmentOutcome::PendingConfirmation(token) => {
                    let confirmed = yes || confirm(NEGATIVE_QUANTITY_PROMPT);
                    report(policy.resolve(token, confirmed).await?);
                }
            }
        }
        Command::Delete { id, yes } => {
            let policy = QuantityPolicy::new(store);
            let token = policy.propose_deletion(&id).await?;
            let confirmed = yes || confirm(DELETE_PROMPT);
            report(policy.resolve(token, confirmed).await?);
        }
    }
    Ok(())
}

fn report(resolution: Resolution) {
    match resolution {
        Resolution::Deleted(product) => println!("Deleted {} (ID: {})", product.name, product.id),
        Resolution::Declined(product) => {
            println!("Kept {} with quantity {}", product.name, product.quantity)
        }
    }
}

/// Reads a yes/no answer from stdin; anything but yes declines.
fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products.");
        return;
    }
    println!(
        "{:>8}  {:<30} {:<15} {:>8}  Unit",
        "ID", "Name", "Category", "Quantity"
    );
    for product in products {
        println!(
            "{:>8}  {:<30} {:<15} {:>8}  {}",
            product.id.to_string(),
            product.name,
            product.category,
            product.quantity,
            product.unit
        );
    }
}
