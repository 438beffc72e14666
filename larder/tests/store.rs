//! End-to-end behaviour of the store through the public API.

use std::collections::HashSet;

use larder::{
    bson::{Bson, doc},
    memory::InMemoryStore,
    prelude::*,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Product {
    #[serde(default)]
    id: String,
    name: String,
    price: f64,
    #[serde(default)]
    category: Option<String>,
}

impl Document for Product {
    fn collection_name() -> &'static str {
        "products"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Coupon {
    code: String,
}

impl Document for Coupon {
    fn collection_name() -> &'static str {
        "coupons"
    }
}

async fn memory_store() -> DynDocumentStore {
    connect(&StoreConfig::default()).await.unwrap()
}

#[tokio::test]
async fn milk_lifecycle() {
    let store = memory_store().await;
    let products = store.collection("products");

    let key = products.insert(doc! { "name": "Milk", "price": 2.5 }).await.unwrap();

    let milk = products.get_by_id(&key).await.unwrap().unwrap();
    assert_eq!(milk.get_str("name").unwrap(), "Milk");
    assert_eq!(milk.get_f64("price").unwrap(), 2.5);
    assert_eq!(milk.get_str("id").unwrap(), key);
    assert_eq!(milk.len(), 3);

    let by_name = products.get_by_field("name", "Milk").await.unwrap();
    assert_eq!(by_name, vec![milk]);

    assert!(products.delete(&key).await.unwrap());
    assert!(products.get_by_id(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn every_inserted_record_carries_its_key() {
    let store = memory_store().await;
    let users = store.collection("users");

    for email in ["a@shop.test", "b@shop.test", "c@shop.test"] {
        let key = users.insert(doc! { "email": email, "role": "CUSTOMER" }).await.unwrap();
        let user = users.get_by_id(&key).await.unwrap().unwrap();

        assert_eq!(user.get_str("id").unwrap(), key);
    }

    assert!(users
        .get_all()
        .await
        .unwrap()
        .iter()
        .all(|u| u.get_str("id").is_ok()));
}

#[tokio::test]
async fn shallow_merge_example() {
    let store = memory_store().await;
    let orders = store.collection("orders");
    let key = orders.insert(doc! { "a": 1, "b": 2 }).await.unwrap();

    assert!(orders.update(&key, doc! { "b": 3, "c": 4 }).await.unwrap());

    let merged = orders.get_by_id(&key).await.unwrap().unwrap();
    let fields = merged.keys().map(String::as_str).collect::<HashSet<_>>();
    assert_eq!(fields, HashSet::from(["a", "b", "c", "id"]));
    assert_eq!(merged.get_i32("a").unwrap(), 1);
    assert_eq!(merged.get_i32("b").unwrap(), 3);
    assert_eq!(merged.get_i32("c").unwrap(), 4);
    assert_eq!(merged.get_str("id").unwrap(), key);
}

#[tokio::test]
async fn update_of_missing_key_changes_nothing() {
    let store = memory_store().await;
    let orders = store.collection("orders");
    orders.insert(doc! { "total": 10 }).await.unwrap();

    assert!(!orders.update("no-such-order", doc! { "total": 99 }).await.unwrap());
    assert_eq!(orders.count().await.unwrap(), 1);
    assert!(orders.get_by_field("total", 99).await.unwrap().is_empty());
}

#[tokio::test]
async fn field_scan_matches_numbers_by_value() {
    let store = memory_store().await;
    let products = store.collection("products");
    products.insert(doc! { "name": "Eggs", "stock": 12 }).await.unwrap();
    products.insert(doc! { "name": "Rice", "stock": 12.0 }).await.unwrap();
    products.insert(doc! { "name": "Salt", "stock": 3_i64 }).await.unwrap();

    let twelve = products.get_by_field("stock", 12_i64).await.unwrap();
    let names = twelve
        .iter()
        .map(|p| p.get_str("name").unwrap())
        .collect::<HashSet<_>>();

    assert_eq!(names, HashSet::from(["Eggs", "Rice"]));
    assert!(products.get_by_field("stock", Bson::Null).await.unwrap().is_empty());
}

#[tokio::test]
async fn typed_collection_round_trips_products() {
    let store = memory_store().await;
    let products = store.typed_collection::<Product>();
    let cheese = Product { id: String::new(), name: "Cheese".into(), price: 4.75, category: Some("dairy".into()) };

    let key = products.insert(&cheese).await.unwrap();
    let stored = products.get_by_id(&key).await.unwrap().unwrap();
    assert_eq!(stored, Product { id: key.clone(), ..cheese.clone() });

    products.update(&key, doc! { "price": 4.5 }).await.unwrap();
    let dairy = products.get_by_field("category", "dairy").await.unwrap();
    assert_eq!(dairy.len(), 1);
    assert_eq!(dairy[0].price, 4.5);

    products.insert_with_key("house-bread", &Product {
        id: "ignored".into(),
        name: "Bread".into(),
        price: 1.2,
        category: None,
    }).await.unwrap();
    let bread = products.get_by_id("house-bread").await.unwrap().unwrap();
    assert_eq!(bread.id, "house-bread");
    assert_eq!(products.get_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn unconfigured_collections_are_errors() {
    let store = memory_store().await;

    assert!(matches!(
        store.collection("coupons").get_all().await,
        Err(DocumentStoreError::UnknownCollection(name)) if name == "coupons"
    ));
    assert!(matches!(
        store.typed_collection::<Coupon>().insert(&Coupon { code: "SAVE10".into() }).await,
        Err(DocumentStoreError::UnknownCollection(_))
    ));
}

#[tokio::test]
async fn connect_honours_configured_collections() {
    let config = StoreConfig::from_json(r#"{ "collections": ["users", "otps"] }"#).unwrap();
    let store = connect(&config).await.unwrap();

    assert_eq!(store.list_collections().await.unwrap(), vec!["otps", "users"]);
    assert!(store.collection("otps").insert(doc! { "email": "a@shop.test", "otp": "123456" }).await.is_ok());
    assert!(store.collection("products").count().await.is_err());
}

#[tokio::test]
async fn connect_rejects_invalid_config() {
    let config = StoreConfig { collections: vec!["users".into(), "users".into()], ..Default::default() };

    assert!(matches!(connect(&config).await, Err(DocumentStoreError::Configuration(_))));
}

#[cfg(not(feature = "mongodb"))]
#[tokio::test]
async fn mongodb_needs_feature() {
    let config = StoreConfig {
        backend: BackendConfig::Mongodb { dsn: "mongodb://localhost:27017".into(), database: "grocery".into() },
        ..Default::default()
    };

    assert!(matches!(connect(&config).await, Err(DocumentStoreError::Configuration(_))));
}

#[tokio::test]
async fn dyn_store_recovers_memory_backend() {
    let store = memory_store().await;
    assert!(store.downcast_backend::<InMemoryStore>().is_some());

    let key = store.collection("users").insert(doc! { "name": "Ravi" }).await.unwrap();
    let typed = store.into_static::<InMemoryStore>().unwrap();

    assert!(typed.collection("users").get_by_id(&key).await.unwrap().is_some());
    typed.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_and_readers() {
    let backend = InMemoryStore::builder().build().await.unwrap();
    let seed = DocumentStore::new(backend.clone())
        .collection("products")
        .insert(doc! { "name": "Flour", "v": 0, "w": 0 })
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for i in 0..32 {
        let backend = backend.clone();
        let seed = seed.clone();
        tasks.push(tokio::spawn(async move {
            let store = DocumentStore::new(backend);
            let products = store.collection("products");
            products.insert(doc! { "name": format!("item-{i}") }).await.unwrap();
            products.update(&seed, doc! { "v": i, "w": i }).await.unwrap();

            // v and w are always written together, so a scan must see them equal
            for record in products.get_all().await.unwrap() {
                if let (Ok(v), Ok(w)) = (record.get_i32("v"), record.get_i32("w")) {
                    assert_eq!(v, w);
                }
            }
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    let store = DocumentStore::new(backend);
    assert_eq!(store.collection("products").count().await.unwrap(), 33);
}
