//! Cart commands

use std::io::Write;

use clap::Args;
use parkcart::{
    cart::{CartItemId, CartRepository, ParkId, QuantityUpdate, TicketType, Tickets},
    catalog::Catalog,
    receipt::CartReceipt,
    storage::Storage,
};

use super::CliError;

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Park identifier
    #[arg(long)]
    park: String,

    /// Number of days to visit
    #[arg(long)]
    days: u32,

    /// Adult tickets
    #[arg(long, default_value_t = 1)]
    adults: u32,

    /// Child tickets
    #[arg(long, default_value_t = 0)]
    kids: u32,
}

#[derive(Debug, Args)]
pub(crate) struct RemoveArgs {
    /// Cart item identifier
    id: String,
}

#[derive(Debug, Args)]
pub(crate) struct SetQuantityArgs {
    /// Cart item identifier
    id: String,

    /// Ticket type (adults, kids)
    ticket_type: TicketType,

    /// New number of tickets; negative values are ignored
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

pub(crate) fn add<S: Storage>(
    args: &AddArgs,
    catalog: &Catalog,
    repository: &mut CartRepository<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let park_id = ParkId::from(args.park.as_str());

    let park = catalog
        .park(&park_id)
        .ok_or_else(|| CliError::UnknownPark(park_id.clone()))?;

    let input = park.book(args.days, Tickets::new(args.adults, args.kids))?;
    let id = repository.add_item(input)?;

    writeln!(out, "Added {} for {} day(s): {id}", park.name, args.days)?;
    writeln!(out, "Tickets in cart: {}", repository.total_ticket_count()?)?;

    Ok(())
}

pub(crate) fn remove<S: Storage>(
    args: &RemoveArgs,
    repository: &mut CartRepository<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id = CartItemId::from(args.id.as_str());

    match repository.remove_item(&id)? {
        Some(item) => writeln!(out, "Removed {} ({} day(s))", item.park_id(), item.days())?,
        None => writeln!(out, "No cart item with id {id}")?,
    }

    Ok(())
}

pub(crate) fn set_quantity<S: Storage>(
    args: &SetQuantityArgs,
    repository: &mut CartRepository<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id = CartItemId::from(args.id.as_str());
    let ticket_type = args.ticket_type;
    let quantity = args.quantity;

    match repository.update_item_quantity(&id, ticket_type, quantity)? {
        QuantityUpdate::Updated => writeln!(out, "Set {ticket_type} on {id} to {quantity}")?,
        QuantityUpdate::Removed => writeln!(out, "Removed {id}: no tickets left")?,
        QuantityUpdate::Ignored => writeln!(out, "Ignored invalid quantity {quantity}")?,
        QuantityUpdate::NotFound => writeln!(out, "No cart item with id {id}")?,
    }

    Ok(())
}

pub(crate) fn clear<S: Storage>(
    repository: &mut CartRepository<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    repository.clear()?;

    writeln!(out, "Cart cleared.")?;

    Ok(())
}

pub(crate) fn show<S: Storage>(
    catalog: &Catalog,
    repository: &CartRepository<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let cart = repository.load()?;

    CartReceipt::from_cart(&cart, catalog.currency())?.write_to(out)?;

    Ok(())
}

pub(crate) fn count<S: Storage>(
    repository: &CartRepository<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    writeln!(out, "{}", repository.total_ticket_count()?)?;

    Ok(())
}
