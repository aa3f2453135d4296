use cafe_store::seed::build_store;
use cafe_store::{ConsumptionPolicy, Store, StoreConfig};

#[test]
fn store_follows_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.toml");
    std::fs::write(
        &path,
        r#"
[store]
name = "Harbour Cafe"

[tables]
seats = [2, 6, 4]

[billing]
tax_rate_bps = 500

[inventory]
consumption = "on_item_ready"

[seed]
sample_catalog = false
"#,
    )
    .unwrap();

    let config = StoreConfig::load(Some(path)).unwrap();
    let store = Store::new(&config).unwrap();

    let tables = store.tables();
    let numbers: Vec<u32> = tables.iter().map(|t| t.number).collect();
    let seats: Vec<u32> = tables.iter().map(|t| t.capacity).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(seats, vec![2, 6, 4]);

    assert_eq!(store.settings().name, "Harbour Cafe");
    assert_eq!(store.settings().tax_rate.bps(), 500);
    assert_eq!(store.settings().consumption, ConsumptionPolicy::OnItemReady);
}

#[test]
fn missing_file_means_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::load(Some(dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config.tables.seats.len(), 8);
}

#[test]
fn seeded_store_serves_a_bill() {
    let store = build_store(&StoreConfig::default()).unwrap();
    let espresso = store
        .menu_items()
        .into_iter()
        .find(|m| m.name == "Espresso")
        .unwrap();

    let order = store
        .create_order(&store.tables()[0].id, "Alice")
        .unwrap();
    store
        .add_item_to_order(&order.id, &espresso.id, 2, None)
        .unwrap();

    let bill = store.bill(&order.id).unwrap();
    assert_eq!(bill.store_name, "Cafe POS");
    assert_eq!(bill.subtotal_cents, 600);
    assert_eq!(bill.tax_cents, 60);
    assert_eq!(bill.total_cents, 660);
}
