use std::io::{self, Write};

use clap::{Parser, Subcommand};
use parkcart::{
    cart::{CartError, CartItemError, CartRepository, ParkId},
    catalog::CatalogError,
    receipt::ReceiptError,
    storage::Storage,
};
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

use self::config::{CatalogConfig, LoggingConfig, StorageConfig};

mod cart;
mod config;
pub(crate) mod logging;
mod parks;

/// Errors reported by a CLI command.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Item(#[from] CartItemError),

    #[error("failed to load catalogue: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    #[error("unknown park: {0}")]
    UnknownPark(ParkId),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("failed to initialise logging: {0}")]
    Logging(#[from] TryInitError),
}

#[derive(Debug, Parser)]
#[command(name = "parkcart", about = "National park booking cart", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    storage: StorageConfig,

    #[command(flatten)]
    catalog: CatalogConfig,

    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List parks with their ticket prices and rating
    Parks(parks::ParksArgs),

    /// Show the reviews of a park
    Reviews(parks::ReviewsArgs),

    /// Add a park booking to the cart
    Add(cart::AddArgs),

    /// Remove an item from the cart
    Remove(cart::RemoveArgs),

    /// Change the adult or child ticket count of an item
    SetQuantity(cart::SetQuantityArgs),

    /// Empty the cart
    Clear,

    /// Print the cart with its price summary
    Show,

    /// Print the number of tickets in the cart
    Count,
}

impl Cli {
    pub(crate) fn run(self, mut out: impl Write) -> Result<(), CliError> {
        let mut repository = self.storage.repository();

        self.command.run(&self.catalog, &mut repository, &mut out)
    }
}

impl Commands {
    fn run<S: Storage>(
        self,
        catalog: &CatalogConfig,
        repository: &mut CartRepository<S>,
        out: &mut impl Write,
    ) -> Result<(), CliError> {
        match self {
            Self::Parks(args) => parks::list(&args, &catalog.load()?, out),
            Self::Reviews(args) => parks::reviews(&args, &catalog.load()?, out),
            Self::Add(args) => cart::add(&args, &catalog.load()?, repository, out),
            Self::Remove(args) => cart::remove(&args, repository, out),
            Self::SetQuantity(args) => cart::set_quantity(&args, repository, out),
            Self::Clear => cart::clear(repository, out),
            Self::Show => cart::show(&catalog.load()?, repository, out),
            Self::Count => cart::count(repository, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use parkcart::storage::MemoryStorage;
    use testresult::TestResult;

    use super::*;

    const CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/parks.yml");

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(
            ["parkcart", "--catalog", CATALOG]
                .iter()
                .chain(args)
                .copied(),
        )
    }

    #[test]
    fn set_quantity_accepts_negative_numbers() -> TestResult {
        let cli = parse(&["set-quantity", "item-1", "kids", "-2"])?;

        assert!(matches!(cli.command, Commands::SetQuantity(_)));

        Ok(())
    }

    #[test]
    fn set_quantity_rejects_unknown_ticket_type() {
        assert!(parse(&["set-quantity", "item-1", "seniors", "2"]).is_err());
    }

    #[test]
    fn global_options_follow_the_subcommand() -> TestResult {
        let cli = parse(&["count", "--cart-key", "other"])?;

        assert_eq!(cli.storage.cart_key, "other");

        Ok(())
    }

    #[test]
    fn commands_share_one_repository() -> TestResult {
        let mut repository = CartRepository::new(MemoryStorage::new());
        let mut out = Vec::new();

        let add = parse(&["add", "--park", "yosemite", "--days", "2", "--kids", "1"])?;
        add.command.run(&add.catalog, &mut repository, &mut out)?;

        let count = parse(&["count"])?;
        let mut counted = Vec::new();
        count.command.run(&count.catalog, &mut repository, &mut counted)?;

        assert_eq!(String::from_utf8(counted)?, "2\n");

        Ok(())
    }

    #[test]
    fn missing_catalogue_is_reported() -> TestResult {
        let mut repository = CartRepository::new(MemoryStorage::new());
        let mut out = Vec::new();

        let cli = Cli::try_parse_from(["parkcart", "--catalog", "does/not/exist.yml", "parks"])?;
        let result = cli.command.run(&cli.catalog, &mut repository, &mut out);

        assert!(matches!(result, Err(CliError::Catalog(CatalogError::Io(_)))));

        Ok(())
    }
}
