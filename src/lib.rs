//! Parkcart
//!
//! Parkcart is the booking cart behind a national park ticketing site: a
//! persisted cart of park bookings, checkout pricing with a bundle discount
//! and tax, and the park catalogue the bookings are taken from.

pub mod cart;
pub mod catalog;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod storage;
