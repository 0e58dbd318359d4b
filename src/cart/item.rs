//! Cart Items

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while building a [`CartItemInput`].
#[derive(Debug, Error, PartialEq)]
pub enum CartItemError {
    /// A booking must cover at least one day.
    #[error("a booking must cover at least one day")]
    ZeroDays,

    /// A booking must include at least one ticket.
    #[error("a booking must include at least one ticket")]
    NoTickets,

    /// Unit prices cannot be negative.
    #[error("unit price cannot be negative, got {0}")]
    NegativePrice(Decimal),

    /// Ticket type string was not recognised.
    #[error("unknown ticket type {0:?}, expected \"adults\" or \"kids\"")]
    UnknownTicketType(String),
}

/// Cart item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItemId(String);

impl CartItemId {
    /// Generate a fresh, time-ordered identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CartItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CartItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for CartItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Park identifier.
///
/// Serialized as a string. Stored carts may hold numeric park ids, which are
/// read back as their decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ParkId(String);

impl<'de> Deserialize<'de> for ParkId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StoredParkId {
            Text(String),
            Number(i64),
        }

        Ok(match StoredParkId::deserialize(deserializer)? {
            StoredParkId::Text(id) => Self(id),
            StoredParkId::Number(id) => Self(id.to_string()),
        })
    }
}

impl ParkId {
    /// Create a park identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParkId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ParkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ticket category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    /// Adult tickets
    Adults,

    /// Child tickets
    Kids,
}

impl FromStr for TicketType {
    type Err = CartItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adults" | "adult" => Ok(Self::Adults),
            "kids" | "kid" | "child" | "children" => Ok(Self::Kids),
            _ => Err(CartItemError::UnknownTicketType(s.to_string())),
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adults => f.write_str("adults"),
            Self::Kids => f.write_str("kids"),
        }
    }
}

/// Ticket counts for a booking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tickets {
    /// Number of adult tickets
    #[serde(default)]
    pub adults: u32,

    /// Number of child tickets
    #[serde(default)]
    pub kids: u32,
}

impl Tickets {
    /// Create a ticket count.
    pub fn new(adults: u32, kids: u32) -> Self {
        Self { adults, kids }
    }

    /// Total number of tickets across both categories.
    pub fn total(self) -> u64 {
        u64::from(self.adults) + u64::from(self.kids)
    }

    /// Whether both counts are zero.
    pub fn is_empty(self) -> bool {
        self.adults == 0 && self.kids == 0
    }

    /// Count for a single ticket category.
    pub fn get(self, ticket_type: TicketType) -> u32 {
        match ticket_type {
            TicketType::Adults => self.adults,
            TicketType::Kids => self.kids,
        }
    }

    /// Set the count for a single ticket category.
    pub fn set(&mut self, ticket_type: TicketType, quantity: u32) {
        match ticket_type {
            TicketType::Adults => self.adults = quantity,
            TicketType::Kids => self.kids = quantity,
        }
    }

    /// Add counts from `other`, saturating at `u32::MAX`.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self {
            adults: self.adults.saturating_add(other.adults),
            kids: self.kids.saturating_add(other.kids),
        }
    }
}

/// Per-day price of one ticket of each category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPrice {
    adult: Decimal,
    child: Decimal,
}

impl UnitPrice {
    /// Create a unit price.
    ///
    /// # Errors
    ///
    /// Returns [`CartItemError::NegativePrice`] if either price is below zero.
    pub fn new(adult: Decimal, child: Decimal) -> Result<Self, CartItemError> {
        for price in [adult, child] {
            if price < Decimal::ZERO {
                return Err(CartItemError::NegativePrice(price));
            }
        }

        Ok(Self { adult, child })
    }

    /// Adult ticket price
    pub fn adult(&self) -> Decimal {
        self.adult
    }

    /// Child ticket price
    pub fn child(&self) -> Decimal {
        self.child
    }
}

/// A booking ready to be added to the cart.
///
/// Everything a [`CartItem`] carries except its identifier, which the cart
/// assigns when the booking becomes a new line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemInput {
    park_id: ParkId,
    days: u32,
    tickets: Tickets,
    unit_price: UnitPrice,
    park_name: String,
    park_image: String,
}

impl CartItemInput {
    /// Create a booking for `days` days.
    ///
    /// # Errors
    ///
    /// - [`CartItemError::ZeroDays`]: `days` is zero.
    /// - [`CartItemError::NoTickets`]: both ticket counts are zero.
    pub fn new(
        park_id: ParkId,
        days: u32,
        tickets: Tickets,
        unit_price: UnitPrice,
    ) -> Result<Self, CartItemError> {
        if days == 0 {
            return Err(CartItemError::ZeroDays);
        }

        if tickets.is_empty() {
            return Err(CartItemError::NoTickets);
        }

        Ok(Self {
            park_id,
            days,
            tickets,
            unit_price,
            park_name: String::new(),
            park_image: String::new(),
        })
    }

    /// Attach the park's display name and image.
    #[must_use]
    pub fn with_display(
        mut self,
        park_name: impl Into<String>,
        park_image: impl Into<String>,
    ) -> Self {
        self.park_name = park_name.into();
        self.park_image = park_image.into();
        self
    }

    /// Park being booked
    pub fn park_id(&self) -> &ParkId {
        &self.park_id
    }

    /// Number of days booked
    pub fn days(&self) -> u32 {
        self.days
    }

    /// Ticket counts
    pub fn tickets(&self) -> Tickets {
        self.tickets
    }

    /// Price snapshot
    pub fn unit_price(&self) -> UnitPrice {
        self.unit_price
    }
}

/// One booking line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    id: CartItemId,
    park_id: ParkId,
    days: u32,
    tickets: Tickets,
    unit_price: UnitPrice,
    #[serde(default)]
    park_name: String,
    #[serde(default)]
    park_image: String,
}

impl CartItem {
    pub(super) fn from_input(id: CartItemId, input: CartItemInput) -> Self {
        Self {
            id,
            park_id: input.park_id,
            days: input.days,
            tickets: input.tickets,
            unit_price: input.unit_price,
            park_name: input.park_name,
            park_image: input.park_image,
        }
    }

    /// Item identifier
    pub fn id(&self) -> &CartItemId {
        &self.id
    }

    /// Park being booked
    pub fn park_id(&self) -> &ParkId {
        &self.park_id
    }

    /// Number of days booked
    pub fn days(&self) -> u32 {
        self.days
    }

    /// Ticket counts
    pub fn tickets(&self) -> Tickets {
        self.tickets
    }

    /// Price snapshot taken when the item was first added
    pub fn unit_price(&self) -> UnitPrice {
        self.unit_price
    }

    /// Park display name
    pub fn park_name(&self) -> &str {
        &self.park_name
    }

    /// Park display image
    pub fn park_image(&self) -> &str {
        &self.park_image
    }

    /// Whether this item books the same park for the same number of days.
    pub fn same_booking(&self, park_id: &ParkId, days: u32) -> bool {
        self.park_id == *park_id && self.days == days
    }

    pub(super) fn tickets_mut(&mut self) -> &mut Tickets {
        &mut self.tickets
    }

    pub(super) fn set_id(&mut self, id: CartItemId) {
        self.id = id;
    }
}
