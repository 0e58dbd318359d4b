//! Integration tests for the file-backed cart.

use parkcart::prelude::*;
use testresult::TestResult;

fn catalog() -> TestResult<Catalog> {
    Ok(Catalog::from_path(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/fixtures/parks.yml"
    ))?)
}

#[test]
fn cart_survives_a_new_repository() -> TestResult {
    let dir = tempfile::tempdir()?;
    let catalog = catalog()?;

    let zion = catalog.park(&ParkId::from("zion")).ok_or("zion missing")?;

    let id = {
        let mut repository = CartRepository::new(FileStorage::new(dir.path()));
        repository.add_item(zion.book(2, Tickets::new(2, 1))?)?
    };

    let repository = CartRepository::new(FileStorage::new(dir.path()));
    let cart = repository.load()?;
    let item = cart.get(&id).ok_or("item missing after reload")?;

    assert_eq!(item.park_name(), "Zion National Park");
    assert_eq!(item.tickets(), Tickets::new(2, 1));
    assert!(dir.path().join("cart.json").exists());

    Ok(())
}

#[test]
fn snapshot_prices_do_not_follow_the_catalogue() -> TestResult {
    let dir = tempfile::tempdir()?;
    let catalog = catalog()?;

    let mut repository = CartRepository::new(FileStorage::new(dir.path()));
    let zion = catalog.park(&ParkId::from("zion")).ok_or("zion missing")?;
    repository.add_item(zion.book(1, Tickets::new(1, 0))?)?;

    let repriced = Catalog::from_yaml_str(
        r#"
currency: USD
parks:
  - id: zion
    name: Zion National Park
    prices:
      adult: "80.00 USD"
      child: "40.00 USD"
"#,
    )?;
    let zion = repriced.park(&ParkId::from("zion")).ok_or("zion missing")?;
    repository.add_item(zion.book(1, Tickets::new(1, 0))?)?;

    let cart = repository.load()?;
    let item = cart.items().first().ok_or("cart is empty")?;

    assert_eq!(cart.len(), 1);
    assert_eq!(item.tickets(), Tickets::new(2, 0));
    assert_eq!(item.unit_price().adult(), rust_decimal::Decimal::from(50));

    Ok(())
}

#[test]
fn corrupt_file_loads_as_empty_cart() -> TestResult {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("cart.json"), "[1, 2")?;

    let repository = CartRepository::new(FileStorage::new(dir.path()));

    assert!(repository.load()?.is_empty());

    Ok(())
}

#[test]
fn clear_removes_the_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let catalog = catalog()?;
    let acadia = catalog.park(&ParkId::from("acadia")).ok_or("acadia missing")?;

    let mut repository = CartRepository::with_key(FileStorage::new(dir.path()), "family");
    repository.add_item(acadia.book(3, Tickets::new(2, 2))?)?;

    assert!(dir.path().join("family.json").exists());

    repository.clear()?;

    assert!(!dir.path().join("family.json").exists());
    assert!(repository.load()?.is_empty());

    Ok(())
}

#[test]
fn receipt_for_stored_cart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let catalog = catalog()?;

    let mut repository = CartRepository::new(FileStorage::new(dir.path()));

    let grand_canyon = catalog
        .park(&ParkId::from("grand-canyon"))
        .ok_or("grand canyon missing")?;
    let zion = catalog.park(&ParkId::from("zion")).ok_or("zion missing")?;

    repository.add_item(grand_canyon.book(1, Tickets::new(3, 0))?)?;
    repository.add_item(zion.book(3, Tickets::new(2, 0))?)?;

    let cart = repository.load()?;
    let receipt = CartReceipt::from_cart(&cart, catalog.currency())?;

    let mut out = Vec::new();
    receipt.write_to(&mut out)?;
    let output = String::from_utf8(out)?;

    assert!(output.contains("Grand Canyon National Park"));
    assert!(output.contains("600"));
    assert!(output.contains("60"));
    assert!(output.contains("43.2"));
    assert!(output.contains("583.2"));

    Ok(())
}
