use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::runtime::Builder;

use simple_viewmodel::config::{Config, DemoConfig};
use simple_viewmodel::demo::{
    CartInput, CartViewModel, InMemoryCart, ProductInput, ProductProvider, ProductService,
    ProductViewModel, SearchInput, SearchViewModel, SkuInput, SkuViewModel,
};
use simple_viewmodel::logging::init_tracing;
use simple_viewmodel::{Dispatcher, MainContext};

/// Extra wait after the slowest expected output before a scenario ends.
const SETTLE_MARGIN: Duration = Duration::from_millis(500);

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive the demo view models from the terminal")]
struct Cli {
    /// Config file (default: the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a product, like it, and add its SKUs to the bag
    Product {
        /// Product to load (default: from config)
        #[arg(long)]
        id: Option<String>,
    },
    /// Type each term one keystroke at a time into the search box
    Search {
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// Add and remove a product, tapping faster than the cart can keep up
    Cart,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let runtime = Builder::new_multi_thread()
        .thread_name("simple-vm-worker")
        .enable_all()
        .build()
        .context("failed to build runtime")?;
    let main = MainContext::spawn("main").context("failed to start main context")?;
    let dispatcher =
        Dispatcher::new(runtime.handle().clone(), main).with_config(config.engine.clone());

    match cli.command {
        Command::Product { id } => {
            let id = id.unwrap_or_else(|| config.demo.product_id.clone());
            run_product(&dispatcher, &config.demo, id);
        }
        Command::Search { terms } => run_search(&dispatcher, &config.demo, &terms),
        Command::Cart => run_cart(&dispatcher, &config.demo)?,
    }
    Ok(())
}

fn run_product(dispatcher: &Dispatcher, demo: &DemoConfig, id: String) {
    let quiet = demo.latency() + SETTLE_MARGIN;
    let (tx, rx) = mpsc::channel();
    let provider: Arc<dyn ProductProvider> = Arc::new(ProductService::from_config(demo));

    let product_tx = tx.clone();
    let product = Arc::new(dispatcher.interface(
        ProductViewModel::new(provider),
        move |output| {
            let _ = product_tx.send(format!("product: {output:?}"));
        },
    ));

    // The second load is dropped while the first is in flight.
    product.send(ProductInput::LoadProduct { id: id.clone() });
    product.send(ProductInput::LoadProduct { id });
    product.send(ProductInput::DidTapLike);
    print_until_quiet(&rx, quiet);

    let skus = product.view_model().product().skus;
    let mut rows = Vec::with_capacity(skus.len());
    for sku in skus {
        let page = Arc::clone(&product);
        let sku_tx = tx.clone();
        let row = dispatcher.interface(SkuViewModel::new(sku), move |output| {
            let _ = sku_tx.send(format!("sku: {output:?}"));
            page.send(ProductInput::Sku(output));
        });
        row.send(SkuInput::AddToBag);
        rows.push(row);
    }
    print_until_quiet(&rx, quiet);
}

fn run_search(dispatcher: &Dispatcher, demo: &DemoConfig, terms: &[String]) {
    let quiet = demo.search_debounce() + SETTLE_MARGIN;
    let (tx, rx) = mpsc::channel();
    let search = dispatcher.interface(SearchViewModel::new(demo.search_debounce()), move |output| {
        let _ = tx.send(format!("search: {output:?}"));
    });

    for term in terms {
        let mut typed = String::new();
        for c in term.chars() {
            typed.push(c);
            search.send(SearchInput::Search(typed.clone()));
        }
        print_until_quiet(&rx, quiet);
    }
}

fn run_cart(dispatcher: &Dispatcher, demo: &DemoConfig) -> Result<()> {
    let quiet = demo.latency() + SETTLE_MARGIN;
    let service = ProductService::from_config(demo);
    let product = dispatcher
        .runtime()
        .block_on(service.product(&demo.product_id))
        .context("failed to load demo product")?;

    let (tx, rx) = mpsc::channel();
    let cart = dispatcher.interface(
        CartViewModel::new(Arc::new(InMemoryCart::new())),
        move |output| {
            let _ = tx.send(format!("cart: {output:?}"));
        },
    );

    // Only the first tap of each burst gets through.
    cart.send(CartInput::DidTapAddButton(product.clone()));
    cart.send(CartInput::DidTapAddButton(product.clone()));
    print_until_quiet(&rx, quiet);

    cart.send(CartInput::DidTapRemoveButton(product.clone()));
    print_until_quiet(&rx, quiet);

    // Nothing left to remove, so this one surfaces an error.
    cart.send(CartInput::DidTapRemoveButton(product));
    print_until_quiet(&rx, quiet);
    Ok(())
}

fn print_until_quiet(rx: &Receiver<String>, quiet: Duration) {
    loop {
        match rx.recv_timeout(quiet) {
            Ok(line) => println!("{line}"),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}
