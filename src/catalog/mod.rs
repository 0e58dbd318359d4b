//! Catalogue
//!
//! Parks available for booking and their visitor reviews, loaded from a YAML
//! document.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::cart::{CartItemError, CartItemInput, ParkId, Tickets, UnitPrice};

pub mod fixture;

use fixture::{CatalogFixture, ParkFixture, ReviewFixture, parse_currency, parse_price};

/// Catalogue loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalogue file
    #[error("Failed to read catalogue file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A price is in a different currency from the catalogue
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Two parks share an identifier
    #[error("Duplicate park id: {0}")]
    DuplicatePark(String),

    /// A review refers to a park that is not in the catalogue
    #[error("Review refers to unknown park: {0}")]
    UnknownPark(String),

    /// A rating outside 1 to 5
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    /// A park price failed validation
    #[error(transparent)]
    Price(#[from] CartItemError),
}

/// A bookable park.
#[derive(Debug, Clone, PartialEq)]
pub struct Park {
    /// Park identifier
    pub id: ParkId,

    /// Display name
    pub name: String,

    /// Image path or URL
    pub image: String,

    /// Region or state
    pub location: String,

    /// Short description
    pub description: String,

    /// Current per-day ticket prices
    pub prices: UnitPrice,
}

impl Park {
    /// Build a cart booking for this park, snapshotting its current prices,
    /// name and image.
    ///
    /// # Errors
    ///
    /// Returns a [`CartItemError`] if `days` is zero or no tickets are requested.
    pub fn book(&self, days: u32, tickets: Tickets) -> Result<CartItemInput, CartItemError> {
        CartItemInput::new(self.id.clone(), days, tickets, self.prices)
            .map(|input| input.with_display(&self.name, &self.image))
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.location.to_lowercase().contains(needle)
    }
}

/// A visitor review of a park.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// Reviewed park
    pub park_id: ParkId,

    /// Reviewer name
    pub author: String,

    /// Star rating, 1 to 5
    pub rating: u8,

    /// Review text
    pub comment: String,
}

/// Parks and reviews shown on the site.
#[derive(Debug, Clone)]
pub struct Catalog {
    parks: Vec<Park>,
    index: FxHashMap<ParkId, usize>,
    reviews: Vec<Review>,
    currency: &'static Currency,
}

impl Catalog {
    /// Load a catalogue from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or its contents are invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Parse a catalogue from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML is malformed, a price or currency
    /// is invalid, a park id repeats, a review names an unknown park, or a
    /// rating is outside 1 to 5.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        Self::try_from(fixture)
    }

    /// Currency every price is expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// All parks in catalogue order.
    pub fn parks(&self) -> &[Park] {
        &self.parks
    }

    /// Look up a park by identifier.
    pub fn park(&self, id: &ParkId) -> Option<&Park> {
        let idx = *self.index.get(id)?;

        self.parks.get(idx)
    }

    /// Parks whose name or location contains `query`, ignoring case.
    /// A blank query matches every park.
    pub fn search(&self, query: &str) -> Vec<&Park> {
        let needle = query.trim().to_lowercase();

        self.parks
            .iter()
            .filter(|park| needle.is_empty() || park.matches(&needle))
            .collect()
    }

    /// Reviews of one park, in catalogue order.
    pub fn reviews_for<'a>(&'a self, id: &'a ParkId) -> impl Iterator<Item = &'a Review> + 'a {
        self.reviews.iter().filter(move |review| review.park_id == *id)
    }

    /// Mean star rating of a park, or `None` if it has no reviews.
    pub fn average_rating(&self, id: &ParkId) -> Option<Decimal> {
        let (count, sum) = self
            .reviews_for(id)
            .fold((0u32, 0u32), |(count, sum), review| {
                (count + 1, sum + u32::from(review.rating))
            });

        if count == 0 {
            return None;
        }

        Some(Decimal::from(sum) / Decimal::from(count))
    }
}

impl TryFrom<CatalogFixture> for Catalog {
    type Error = CatalogError;

    fn try_from(fixture: CatalogFixture) -> Result<Self, Self::Error> {
        let currency = parse_currency(&fixture.currency)?;

        let mut parks = Vec::with_capacity(fixture.parks.len());
        let mut index = FxHashMap::default();

        for park_fixture in fixture.parks {
            let park = park_from_fixture(park_fixture, currency)?;

            if index.insert(park.id.clone(), parks.len()).is_some() {
                return Err(CatalogError::DuplicatePark(park.id.to_string()));
            }

            parks.push(park);
        }

        let reviews = fixture
            .reviews
            .into_iter()
            .map(|review| review_from_fixture(review, &index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            parks,
            index,
            reviews,
            currency,
        })
    }
}

fn park_from_fixture(
    fixture: ParkFixture,
    currency: &'static Currency,
) -> Result<Park, CatalogError> {
    let adult = price_in(&fixture.prices.adult, currency)?;
    let child = price_in(&fixture.prices.child, currency)?;

    Ok(Park {
        id: ParkId::new(fixture.id),
        name: fixture.name,
        image: fixture.image,
        location: fixture.location,
        description: fixture.description,
        prices: UnitPrice::new(adult, child)?,
    })
}

/// Parse a price and check it is in the catalogue currency.
fn price_in(raw: &str, currency: &'static Currency) -> Result<Decimal, CatalogError> {
    let (amount, price_currency) = parse_price(raw)?;

    if price_currency != currency {
        return Err(CatalogError::CurrencyMismatch(
            currency.iso_alpha_code.to_string(),
            price_currency.iso_alpha_code.to_string(),
        ));
    }

    Ok(amount)
}

fn review_from_fixture(
    fixture: ReviewFixture,
    index: &FxHashMap<ParkId, usize>,
) -> Result<Review, CatalogError> {
    let park_id = ParkId::new(fixture.park);

    if !index.contains_key(&park_id) {
        return Err(CatalogError::UnknownPark(park_id.to_string()));
    }

    if !(1..=5).contains(&fixture.rating) {
        return Err(CatalogError::InvalidRating(fixture.rating));
    }

    Ok(Review {
        park_id,
        author: fixture.author,
        rating: fixture.rating,
        comment: fixture.comment,
    })
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    const YAML: &str = r#"
currency: USD
parks:
  - id: zion
    name: Zion National Park
    image: images/zion.jpg
    location: Utah
    prices:
      adult: "35.00 USD"
      child: "15.00 USD"
  - id: acadia
    name: Acadia National Park
    location: Maine
    prices:
      adult: "30.00 USD"
      child: "0 USD"
reviews:
  - park: zion
    author: Sam
    rating: 5
    comment: Angels Landing was unforgettable.
  - park: zion
    author: Riley
    rating: 4
"#;

    #[test]
    fn parses_parks_in_order() -> TestResult {
        let catalog = Catalog::from_yaml_str(YAML)?;

        let ids: Vec<&str> = catalog.parks().iter().map(|park| park.id.as_str()).collect();

        assert_eq!(ids, vec!["zion", "acadia"]);
        assert_eq!(catalog.currency(), USD);

        Ok(())
    }

    #[test]
    fn park_lookup_by_id() -> TestResult {
        let catalog = Catalog::from_yaml_str(YAML)?;

        let park = catalog.park(&ParkId::from("acadia")).ok_or("acadia missing")?;

        assert_eq!(park.name, "Acadia National Park");
        assert_eq!(park.prices.adult(), Decimal::from(30));
        assert!(park.prices.child().is_zero());
        assert!(catalog.park(&ParkId::from("yosemite")).is_none());

        Ok(())
    }

    #[test]
    fn search_matches_name_or_location_case_insensitively() -> TestResult {
        let catalog = Catalog::from_yaml_str(YAML)?;

        let by_location: Vec<&str> = catalog
            .search("utah")
            .iter()
            .map(|park| park.id.as_str())
            .collect();

        assert_eq!(by_location, vec!["zion"]);
        assert_eq!(catalog.search("NATIONAL").len(), 2);
        assert_eq!(catalog.search("  ").len(), 2);
        assert!(catalog.search("glacier").is_empty());

        Ok(())
    }

    #[test]
    fn reviews_and_average_rating() -> TestResult {
        let catalog = Catalog::from_yaml_str(YAML)?;
        let zion = ParkId::from("zion");
        let acadia = ParkId::from("acadia");

        assert_eq!(catalog.reviews_for(&zion).count(), 2);
        assert_eq!(catalog.average_rating(&zion), Some(Decimal::new(45, 1)));
        assert_eq!(catalog.average_rating(&acadia), None);

        Ok(())
    }

    #[test]
    fn book_snapshots_park_details() -> TestResult {
        let catalog = Catalog::from_yaml_str(YAML)?;
        let park = catalog.park(&ParkId::from("zion")).ok_or("zion missing")?;

        let input = park.book(2, Tickets::new(2, 1))?;

        assert_eq!(input.park_id(), &park.id);
        assert_eq!(input.days(), 2);
        assert_eq!(input.unit_price(), park.prices);

        Ok(())
    }

    #[test]
    fn rejects_duplicate_park_ids() {
        let yaml = r#"
currency: USD
parks:
  - id: zion
    name: Zion
    prices: { adult: "1 USD", child: "1 USD" }
  - id: zion
    name: Zion again
    prices: { adult: "1 USD", child: "1 USD" }
"#;

        let result = Catalog::from_yaml_str(yaml);

        assert!(matches!(result, Err(CatalogError::DuplicatePark(id)) if id == "zion"));
    }

    #[test]
    fn rejects_currency_mismatch() {
        let yaml = r#"
currency: USD
parks:
  - id: zion
    name: Zion
    prices: { adult: "1 GBP", child: "1 USD" }
"#;

        let result = Catalog::from_yaml_str(yaml);

        assert!(matches!(
            result,
            Err(CatalogError::CurrencyMismatch(expected, found))
                if expected == "USD" && found == "GBP"
        ));
    }

    #[test]
    fn rejects_review_for_unknown_park() {
        let yaml = r"
currency: USD
parks: []
reviews:
  - park: zion
    author: Sam
    rating: 3
";

        let result = Catalog::from_yaml_str(yaml);

        assert!(matches!(result, Err(CatalogError::UnknownPark(id)) if id == "zion"));
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let yaml = r#"
currency: USD
parks:
  - id: zion
    name: Zion
    prices: { adult: "1 USD", child: "1 USD" }
reviews:
  - park: zion
    author: Sam
    rating: 6
"#;

        let result = Catalog::from_yaml_str(yaml);

        assert!(matches!(result, Err(CatalogError::InvalidRating(6))));
    }
}
