use agent_photo::db;
use agent_photo::services::store::{MetadataStore, SettingsStore};

/// PostgreSQL store round trip.
///
/// Requires a running PostgreSQL instance configured via DATABASE_URL.
#[tokio::test]
#[ignore] // Run with: cargo test --test pg_store_test -- --ignored
async fn test_pg_store_overwrites_metadata_and_options() {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL not set");

    let store = db::connect(&database_url, 2)
        .await
        .expect("Failed to prepare the database");

    let image_id = format!("test-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default());

    assert!(store.image_metadata(&image_id).await.unwrap().is_none());

    store
        .update_image_metadata(&image_id, "first alt", "first legend")
        .await
        .unwrap();
    store
        .update_image_metadata(&image_id, "second alt", "second legend")
        .await
        .unwrap();

    let meta = store.image_metadata(&image_id).await.unwrap().unwrap();
    assert_eq!(meta.alt_text, "second alt");
    assert_eq!(meta.legend, "second legend");

    let option = format!("{image_id}_option");
    store.set_option(&option, "one").await.unwrap();
    store.set_option(&option, "two").await.unwrap();
    assert_eq!(store.get_option(&option).await.unwrap().as_deref(), Some("two"));

    store.delete_option(&option).await.unwrap();
    assert!(store.get_option(&option).await.unwrap().is_none());

    store.ping().await.unwrap();
}
