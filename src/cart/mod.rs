//! Cart

use rust_decimal::Decimal;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::storage::StorageError;

pub mod item;
pub mod repository;

pub use item::{
    CartItem, CartItemError, CartItemId, CartItemInput, ParkId, TicketType, Tickets, UnitPrice,
};
pub use repository::{CART_STORAGE_KEY, CartRepository};

/// Errors raised while persisting a cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outcome of a quantity update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The ticket count was changed.
    Updated,

    /// Both ticket counts reached zero, so the item was removed.
    Removed,

    /// The requested quantity was negative (or out of range) and was ignored.
    Ignored,

    /// No item has the given identifier.
    NotFound,
}

/// The booking cart.
///
/// Items keep their insertion order, and no two items book the same park for
/// the same number of days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over the items in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Number of items (booking lines, not tickets).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find an item by identifier.
    pub fn get(&self, id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Find the item booking `park_id` for `days` days.
    pub fn find_booking(&self, park_id: &ParkId, days: u32) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|item| item.same_booking(park_id, days))
    }

    /// Total tickets across all items, for the cart badge.
    pub fn total_ticket_count(&self) -> u64 {
        self.items.iter().map(|item| item.tickets().total()).sum()
    }

    /// Add a booking.
    ///
    /// A booking for a park and day count already in the cart adds its tickets
    /// to the existing item, keeping that item's price snapshot. Otherwise a new
    /// item with a fresh identifier is appended. Returns the identifier of the
    /// item holding the tickets.
    pub fn add(&mut self, input: CartItemInput) -> CartItemId {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.same_booking(input.park_id(), input.days()))
        {
            let merged = existing.tickets().saturating_add(input.tickets());
            *existing.tickets_mut() = merged;

            debug!(
                item = %existing.id(),
                park = %existing.park_id(),
                days = existing.days(),
                "merged booking into existing item"
            );

            return existing.id().clone();
        }

        let id = self.unused_id();
        let item = CartItem::from_input(id.clone(), input);

        debug!(item = %id, park = %item.park_id(), days = item.days(), "appended booking");

        self.items.push(item);

        id
    }

    /// Remove an item, returning it if it was present.
    pub fn remove(&mut self, id: &CartItemId) -> Option<CartItem> {
        let position = self.items.iter().position(|item| item.id() == id)?;

        Some(self.items.remove(position))
    }

    /// Set the count of one ticket type on an item.
    ///
    /// Negative quantities are ignored. An item whose adult and child counts
    /// both reach zero is removed from the cart.
    pub fn update_quantity(
        &mut self,
        id: &CartItemId,
        ticket_type: TicketType,
        new_quantity: i64,
    ) -> QuantityUpdate {
        let Some(position) = self.items.iter().position(|item| item.id() == id) else {
            return QuantityUpdate::NotFound;
        };

        let Ok(quantity) = u32::try_from(new_quantity) else {
            debug!(item = %id, new_quantity, "ignored out of range quantity");
            return QuantityUpdate::Ignored;
        };

        let Some(item) = self.items.get_mut(position) else {
            return QuantityUpdate::NotFound;
        };

        item.tickets_mut().set(ticket_type, quantity);

        if item.tickets().is_empty() {
            self.items.remove(position);

            return QuantityUpdate::Removed;
        }

        QuantityUpdate::Updated
    }

    /// Restore the cart invariants on data read back from storage.
    ///
    /// Drops items without tickets or days or with a negative price. Merges
    /// items that book the same park for the same day count. An item whose id
    /// repeats an earlier one is renamed to `<id>-<n>`, the first suffix not
    /// used elsewhere in the blob, so the same stored data always yields the
    /// same ids. Returns the number of items dropped, merged away or renamed.
    pub(crate) fn normalize(&mut self) -> usize {
        let mut changed = 0;

        let stored_ids: FxHashSet<CartItemId> =
            self.items.iter().map(|item| item.id().clone()).collect();

        let mut kept: Vec<CartItem> = Vec::with_capacity(self.items.len());
        let mut bookings: FxHashMap<(ParkId, u32), usize> = FxHashMap::default();
        let mut seen: FxHashSet<CartItemId> = FxHashSet::default();

        for mut item in self.items.drain(..) {
            let price = item.unit_price();

            if item.days() == 0
                || item.tickets().is_empty()
                || price.adult() < Decimal::ZERO
                || price.child() < Decimal::ZERO
            {
                changed += 1;
                continue;
            }

            let key = (item.park_id().clone(), item.days());

            if let Some(existing) = bookings.get(&key).and_then(|&idx| kept.get_mut(idx)) {
                let merged = existing.tickets().saturating_add(item.tickets());
                *existing.tickets_mut() = merged;
                changed += 1;
                continue;
            }

            if !seen.insert(item.id().clone()) {
                let id = suffixed_id(item.id(), &stored_ids, &seen);
                seen.insert(id.clone());
                item.set_id(id);
                changed += 1;
            }

            bookings.insert(key, kept.len());
            kept.push(item);
        }

        self.items = kept;

        changed
    }

    fn unused_id(&self) -> CartItemId {
        loop {
            let id = CartItemId::generate();

            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

fn suffixed_id(
    id: &CartItemId,
    stored: &FxHashSet<CartItemId>,
    seen: &FxHashSet<CartItemId>,
) -> CartItemId {
    (2..=u32::MAX)
        .map(|n| CartItemId::from(format!("{id}-{n}")))
        .find(|candidate| !stored.contains(candidate) && !seen.contains(candidate))
        .unwrap_or_else(CartItemId::generate)
}
