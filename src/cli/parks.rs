//! Catalogue commands

use std::io::Write;

use clap::Args;
use parkcart::{
    cart::ParkId,
    catalog::{Catalog, Park},
    receipt::format_money,
};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

use super::CliError;

const MAX_STARS: usize = 5;

#[derive(Debug, Args)]
pub(crate) struct ParksArgs {
    /// Only list parks whose name or location contains this text
    #[arg(long, short)]
    search: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct ReviewsArgs {
    /// Park identifier
    park: String,
}

pub(crate) fn list(
    args: &ParksArgs,
    catalog: &Catalog,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let parks = catalog.search(args.search.as_deref().unwrap_or_default());

    if parks.is_empty() {
        writeln!(out, "No parks found.")?;
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["Id", "Park", "Location", "Adult / day", "Child / day", "Rating"]);

    for park in parks {
        builder.push_record(park_row(park, catalog));
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

fn park_row(park: &Park, catalog: &Catalog) -> [String; 6] {
    let rating = catalog
        .average_rating(&park.id)
        .map_or_else(|| "-".to_string(), |rating| rating.round_dp(1).to_string());

    [
        park.id.to_string(),
        park.name.clone(),
        park.location.clone(),
        format_money(park.prices.adult(), catalog.currency()),
        format_money(park.prices.child(), catalog.currency()),
        rating,
    ]
}

pub(crate) fn reviews(
    args: &ReviewsArgs,
    catalog: &Catalog,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let park_id = ParkId::from(args.park.as_str());

    let park = catalog
        .park(&park_id)
        .ok_or_else(|| CliError::UnknownPark(park_id.clone()))?;

    writeln!(out, "{} ({})", park.name, park.location)?;

    match catalog.average_rating(&park_id) {
        Some(average) => writeln!(out, "Average rating: {}/5", average.round_dp(1))?,
        None => writeln!(out, "No reviews yet.")?,
    }

    for review in catalog.reviews_for(&park_id) {
        writeln!(out, "\n{} {}", stars(review.rating), review.author)?;

        if !review.comment.is_empty() {
            writeln!(out, "  {}", review.comment)?;
        }
    }

    Ok(())
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating).min(MAX_STARS);

    format!("{}{}", "★".repeat(filled), "☆".repeat(MAX_STARS - filled))
}
