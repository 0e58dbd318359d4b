//! Cart Repository

use tracing::{debug, warn};

use crate::storage::Storage;

use super::{Cart, CartError, CartItem, CartItemId, CartItemInput, QuantityUpdate, TicketType};

/// Default storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Persists the single cart in a [`Storage`] backend.
///
/// Every mutation loads the stored cart, applies the change and writes the
/// whole cart back.
#[derive(Debug)]
pub struct CartRepository<S> {
    storage: S,
    key: String,
}

impl<S: Storage> CartRepository<S> {
    /// Create a repository storing the cart under [`CART_STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, CART_STORAGE_KEY)
    }

    /// Create a repository storing the cart under `key`.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The storage key holding the cart.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give back the storage backend.
    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Load the stored cart.
    ///
    /// A missing or unreadable blob yields an empty cart; the bad value is
    /// logged, not reported.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the backend itself fails.
    pub fn load(&self) -> Result<Cart, CartError> {
        let Some(blob) = self.storage.get(&self.key)? else {
            return Ok(Cart::new());
        };

        let mut cart = match serde_json::from_str::<Cart>(&blob) {
            Ok(cart) => cart,
            Err(err) => {
                warn!(key = %self.key, error = %err, "discarding unreadable cart data");
                return Ok(Cart::new());
            }
        };

        let changed = cart.normalize();

        if changed > 0 {
            warn!(key = %self.key, changed, "repaired invalid stored cart items");
        }

        Ok(cart)
    }

    /// Persist `cart`, replacing the stored one.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart cannot be serialized or written.
    pub fn save(&mut self, cart: &Cart) -> Result<(), CartError> {
        let blob = serde_json::to_string(cart)?;

        self.storage.set(&self.key, &blob)?;

        debug!(key = %self.key, items = cart.len(), "saved cart");

        Ok(())
    }

    /// Remove the stored cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the backend fails.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.storage.remove(&self.key)?;

        debug!(key = %self.key, "cleared cart");

        Ok(())
    }

    /// Add a booking, merging it into an existing item for the same park and
    /// day count. Returns the identifier of the item holding the tickets.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart cannot be loaded or saved.
    pub fn add_item(&mut self, input: CartItemInput) -> Result<CartItemId, CartError> {
        let mut cart = self.load()?;

        let id = cart.add(input);

        self.save(&cart)?;

        Ok(id)
    }

    /// Remove an item. Returns the removed item, or `None` when no item has
    /// the identifier. The cart is saved either way.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart cannot be loaded or saved.
    pub fn remove_item(&mut self, id: &CartItemId) -> Result<Option<CartItem>, CartError> {
        let mut cart = self.load()?;

        let removed = cart.remove(id);

        self.save(&cart)?;

        Ok(removed)
    }

    /// Set one ticket count on an item; see [`Cart::update_quantity`]. The cart
    /// is saved whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart cannot be loaded or saved.
    pub fn update_item_quantity(
        &mut self,
        id: &CartItemId,
        ticket_type: TicketType,
        new_quantity: i64,
    ) -> Result<QuantityUpdate, CartError> {
        let mut cart = self.load()?;

        let outcome = cart.update_quantity(id, ticket_type, new_quantity);

        self.save(&cart)?;

        Ok(outcome)
    }

    /// Total tickets in the stored cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the backend fails.
    pub fn total_ticket_count(&self) -> Result<u64, CartError> {
        Ok(self.load()?.total_ticket_count())
    }
}
