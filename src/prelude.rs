//! Parkcart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        CART_STORAGE_KEY, Cart, CartError, CartItem, CartItemError, CartItemId, CartItemInput,
        CartRepository, ParkId, QuantityUpdate, TicketType, Tickets, UnitPrice,
    },
    catalog::{Catalog, CatalogError, Park, Review},
    pricing::{PriceSummary, PricingError, compute_summary, line_total},
    receipt::{CartReceipt, ReceiptError, format_money},
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
};
