use cafe_core::{
    MenuCategory, NewInventoryItem, NewMenuItem, OrderItemStatus, OrderStatus, TableStatus,
};
use cafe_store::Store;

#[test]
fn latte_for_alice_at_table_one() {
    let store = Store::with_tables(&[4]).unwrap();
    let t1 = store.tables()[0].clone();
    assert_eq!(t1.capacity, 4);
    assert_eq!(t1.status, TableStatus::Available);

    let latte = store
        .add_menu_item(NewMenuItem::new("Latte", MenuCategory::Coffee, 450))
        .unwrap();

    let o1 = store.create_order(&t1.id, "Alice").unwrap();
    assert_eq!(o1.total_cents, 0);
    assert_eq!(store.table(&t1.id).unwrap().status, TableStatus::Occupied);

    let o1 = store
        .add_item_to_order(&o1.id, &latte.id, 2, Some(String::new()))
        .unwrap();
    assert_eq!(o1.total_cents, 900);
    assert_eq!(o1.items.len(), 1);
    assert_eq!(o1.items[0].status, OrderItemStatus::Pending);
    assert_eq!(o1.items[0].notes, None);

    for status in [
        OrderItemStatus::Preparing,
        OrderItemStatus::Ready,
        OrderItemStatus::Served,
    ] {
        let order = store
            .update_order_item_status(&o1.id, &latte.id, status)
            .unwrap();
        assert_eq!(order.items[0].status, status);
    }

    let o1 = store.complete_order(&o1.id).unwrap();
    assert_eq!(o1.status, OrderStatus::Completed);

    let t1 = store.table(&t1.id).unwrap();
    assert_eq!(t1.status, TableStatus::Available);
    assert!(t1.current_order_id.is_none());
}

#[test]
fn milk_drops_below_threshold_and_is_restocked() {
    let store = Store::with_tables(&[2]).unwrap();
    let milk = store
        .add_inventory_item(NewInventoryItem::new("Milk", 5.0, "L", 10.0))
        .unwrap();

    let low = store.low_stock_items();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].name, "Milk");

    store.update_inventory_quantity(&milk.id, 20.0).unwrap();
    assert!(store.low_stock_items().is_empty());
}
