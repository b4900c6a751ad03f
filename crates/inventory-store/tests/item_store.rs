//! Item and user store behavior against a real SQLite file.

use inventory_core::{CoreError, ItemDraft, ItemFilter, ItemId};
use inventory_store::{NewUser, Store, StoreConfig, StoreError, schema};
use tempfile::TempDir;

async fn open_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::connect(StoreConfig::sqlite_file(dir.path().join("inventory.db")))
        .await
        .unwrap();
    (dir, store)
}

fn draft(name: &str, quantity: i64, description: Option<&str>) -> ItemDraft {
    ItemDraft::new(name, Some(quantity), description).unwrap()
}

async fn seed(store: &Store, names: &[(&str, i64)]) {
    for (name, quantity) in names {
        store.upsert_item(&draft(name, *quantity, None)).await.unwrap();
    }
}

// ============================================================================
// Upsert
// ============================================================================

#[tokio::test]
async fn test_upsert_creates_new_item() {
    let (_dir, store) = open_store().await;

    let outcome = store.upsert_item(&draft(" Screws ", 5, None)).await.unwrap();

    assert!(outcome.created);
    assert_eq!(outcome.item.name, "Screws");
    assert_eq!(outcome.item.quantity, 5);
    assert_eq!(outcome.item.description, "");
    assert_eq!(store.count_items().await.unwrap(), 1);
}

#[tokio::test]
async fn test_upsert_same_name_any_casing_accumulates() {
    let (_dir, store) = open_store().await;

    let first = store.upsert_item(&draft("Screws", 5, None)).await.unwrap();
    let second = store
        .upsert_item(&draft("screws", 3, Some("steel")))
        .await
        .unwrap();

    assert!(!second.created);
    assert_eq!(second.item.id, first.item.id);
    assert_eq!(second.item.name, "Screws");
    assert_eq!(second.item.quantity, 8);
    assert_eq!(second.item.description, "steel");
    assert_eq!(second.item.created_at, first.item.created_at);
    assert_eq!(store.count_items().await.unwrap(), 1);
}

#[tokio::test]
async fn test_upsert_without_description_keeps_existing_one() {
    let (_dir, store) = open_store().await;

    store
        .upsert_item(&draft("Washers", 2, Some("M6")))
        .await
        .unwrap();
    let outcome = store
        .upsert_item(&ItemDraft::new("WASHERS", Some(1), Some("   ")).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.item.description, "M6");
    assert_eq!(outcome.item.quantity, 3);
}

#[tokio::test]
async fn test_upsert_unicode_names_fold_case() {
    let (_dir, store) = open_store().await;

    store.upsert_item(&draft("Ölfilter", 1, None)).await.unwrap();
    let outcome = store.upsert_item(&draft("ÖLFILTER", 1, None)).await.unwrap();

    assert!(!outcome.created);
    assert_eq!(outcome.item.quantity, 2);
}

#[tokio::test]
async fn test_empty_name_creates_no_row() {
    let (_dir, store) = open_store().await;

    assert_eq!(
        ItemDraft::new("   ", Some(5), Some("steel")),
        Err(CoreError::EmptyName)
    );
    assert_eq!(store.count_items().await.unwrap(), 0);
}

#[tokio::test]
async fn test_upsert_overflow_is_rejected_and_leaves_item_unchanged() {
    let (_dir, store) = open_store().await;

    store
        .upsert_item(&draft("Grains", i64::MAX - 1, None))
        .await
        .unwrap();
    let result = store.upsert_item(&draft("grains", 5, None)).await;

    assert!(matches!(
        result,
        Err(StoreError::Validation(CoreError::QuantityOverflow { added: 5, .. }))
    ));
    let items = store.list_items(&ItemFilter::default()).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, i64::MAX - 1);
}

#[tokio::test]
async fn test_concurrent_upserts_of_one_name_do_not_lose_updates() {
    let (_dir, store) = open_store().await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.upsert_item(&draft("Rivets", 2, None)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let items = store.list_items(&ItemFilter::default()).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 16);
}

// ============================================================================
// Listing and counts
// ============================================================================

#[tokio::test]
async fn test_list_without_filters_returns_newest_first() {
    let (_dir, store) = open_store().await;
    seed(&store, &[("Alpha", 1), ("Beta", 2), ("Gamma", 3)]).await;

    let items = store.list_items(&ItemFilter::default()).await.unwrap();

    let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Gamma", "Beta", "Alpha"]);
    assert!(items.windows(2).all(|w| w[0].id > w[1].id));
}

#[tokio::test]
async fn test_list_numeric_query_matches_id_or_name() {
    let (_dir, store) = open_store().await;
    seed(
        &store,
        &[
            ("Hammer", 1),
            ("Saw", 1),
            ("Drill", 1),
            ("Pliers", 1),
            ("File", 1),
            ("Bit 5mm", 1),
        ],
    )
    .await;

    let items = store
        .list_items(&ItemFilter::default().query("5"))
        .await
        .unwrap();

    let ids: Vec<_> = items.iter().map(|i| i.id).collect();
    assert_eq!(ids, [ItemId(6), ItemId(5)]);
}

#[tokio::test]
async fn test_list_text_query_is_case_insensitive_substring() {
    let (_dir, store) = open_store().await;
    seed(&store, &[("Wood Screws", 1), ("Nails", 1), ("SCREWDRIVER", 1)]).await;

    let items = store
        .list_items(&ItemFilter::default().query("screw"))
        .await
        .unwrap();

    let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["SCREWDRIVER", "Wood Screws"]);
}

#[tokio::test]
async fn test_list_query_treats_like_wildcards_literally() {
    let (_dir, store) = open_store().await;
    seed(&store, &[("100% cotton", 1), ("Cotton", 1)]).await;

    let items = store
        .list_items(&ItemFilter::default().query("%"))
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "100% cotton");
}

#[tokio::test]
async fn test_list_quantity_bounds_are_inclusive_and_conjunctive() {
    let (_dir, store) = open_store().await;
    seed(
        &store,
        &[("Tape A", 2), ("Tape B", 5), ("Tape C", 10), ("Glue", 5)],
    )
    .await;

    let items = store
        .list_items(&ItemFilter::default().query("tape").min(5).max(10))
        .await
        .unwrap();

    let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Tape C", "Tape B"]);
}

#[tokio::test]
async fn test_count_below_is_strict() {
    let (_dir, store) = open_store().await;
    seed(&store, &[("A", 9), ("B", 10), ("C", 11), ("D", 1)]).await;

    assert_eq!(store.count_items().await.unwrap(), 4);
    assert_eq!(store.count_items_below(10.0).await.unwrap(), 2);
    assert_eq!(store.count_items_below(1.0).await.unwrap(), 0);
    assert_eq!(store.count_items_below(9.5).await.unwrap(), 2);
    assert_eq!(store.count_items_below(10.5).await.unwrap(), 3);
}

#[tokio::test]
async fn test_get_item_not_found() {
    let (_dir, store) = open_store().await;
    assert!(matches!(
        store.get_item(99).await,
        Err(StoreError::ItemNotFound(99))
    ));
}

#[tokio::test]
async fn test_ping_and_schema() {
    let (_dir, store) = open_store().await;
    store.ping().await.unwrap();
    assert!(schema::is_schema_initialized(store.pool()).await.unwrap());
}

#[tokio::test]
async fn test_store_from_shared_pool_sees_same_rows() {
    let (_dir, store) = open_store().await;
    seed(&store, &[("Hinges", 4)]).await;

    let shared = Store::from_pool(store.pool().clone());

    assert_eq!(shared.count_items().await.unwrap(), 1);
    shared.upsert_item(&draft("hinges", 2, None)).await.unwrap();
    let items = store.list_items(&ItemFilter::default()).await.unwrap();
    assert_eq!(items[0].quantity, 6);
}

// ============================================================================
// Users
// ============================================================================

fn new_user(username: Option<&str>, email: Option<&str>) -> NewUser {
    NewUser {
        username: username.map(str::to_string),
        email: email.map(str::to_string),
        password_hash: "hash".to_string(),
    }
}

#[tokio::test]
async fn test_insert_and_find_user_by_either_identifier() {
    let (_dir, store) = open_store().await;

    let row = store
        .insert_user(&new_user(Some("anna"), Some("anna@example.org")))
        .await
        .unwrap();

    let by_name = store.find_user_by_identifier("anna").await.unwrap().unwrap();
    let by_email = store
        .find_user_by_identifier("anna@example.org")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_name.id, row.id);
    assert_eq!(by_email.id, row.id);
    assert!(store.find_user_by_identifier("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_username_and_email_conflict() {
    let (_dir, store) = open_store().await;
    store
        .insert_user(&new_user(Some("anna"), Some("anna@example.org")))
        .await
        .unwrap();

    assert!(matches!(
        store.insert_user(&new_user(Some("anna"), None)).await,
        Err(StoreError::DuplicateUser { field: "username" })
    ));
    assert!(matches!(
        store
            .insert_user(&new_user(None, Some("anna@example.org")))
            .await,
        Err(StoreError::DuplicateUser { field: "email" })
    ));
}

#[tokio::test]
async fn test_get_user_by_id_not_found() {
    let (_dir, store) = open_store().await;
    assert!(matches!(
        store.get_user_by_id(7).await,
        Err(StoreError::UserNotFound(7))
    ));
}
