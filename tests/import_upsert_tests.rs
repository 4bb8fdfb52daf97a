// SPDX-License-Identifier: MIT

mod common;

use common::{activity, seed_user, test_db};

#[tokio::test]
async fn test_upsert_same_activity_twice_is_idempotent() {
    let db = test_db().await;

    let a = activity(100, 1, "Run", 5000.0, 2.5, Some("g1"));
    db.upsert_activity(&a).await.unwrap();
    db.upsert_activity(&a).await.unwrap();

    let stored = db.activities_for_athlete(100).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_upsert_updates_existing_record_in_place() {
    let db = test_db().await;

    db.upsert_activity(&activity(100, 1, "Run", 5000.0, 2.5, Some("g1")))
        .await
        .unwrap();
    let original_id = db.activities_for_athlete(100).await.unwrap()[0].id;

    // Same natural key, one changed field
    db.upsert_activity(&activity(100, 1, "Run", 5100.0, 2.5, Some("g1")))
        .await
        .unwrap();

    let stored = db.activities_for_athlete(100).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, original_id);
    assert_eq!(stored[0].distance, Some(5100.0));
}

#[tokio::test]
async fn test_same_activity_id_for_different_athletes_is_distinct() {
    let db = test_db().await;

    db.upsert_activity(&activity(100, 1, "Run", 5000.0, 2.5, None))
        .await
        .unwrap();
    db.upsert_activity(&activity(200, 1, "Run", 8000.0, 2.8, None))
        .await
        .unwrap();

    assert_eq!(db.activities_for_athlete(100).await.unwrap().len(), 1);
    assert_eq!(db.activities_for_athlete(200).await.unwrap().len(), 1);
    assert_eq!(db.list_activities().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_imported_pace_is_never_populated() {
    let db = test_db().await;

    db.upsert_activity(&activity(100, 1, "Run", 5000.0, 2.5, Some("g1")))
        .await
        .unwrap();
    db.upsert_activity(&activity(100, 1, "Run", 5200.0, 2.6, Some("g1")))
        .await
        .unwrap();

    let stored = db.activities_for_athlete(100).await.unwrap();
    assert_eq!(stored[0].pace, None);
}

#[tokio::test]
async fn test_athlete_id_is_unique_per_user() {
    let db = test_db().await;

    let first = seed_user(&db, 100, "[]").await;

    // Re-authorizing the same athlete updates credentials, no second row
    let second = db
        .upsert_user_credentials(100, "new_access", "new_refresh", 2_000_000_000, "scope")
        .await
        .unwrap();

    assert_eq!(first, second);
    let users = db.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].access_token, "new_access");
}

#[tokio::test]
async fn test_profile_update_preserves_credentials() {
    let db = test_db().await;

    seed_user(&db, 100, r#"[{"id":"g1","name":"Pegasus 40"}]"#).await;

    let user = db.get_user_by_athlete(100).await.unwrap().unwrap();
    assert_eq!(user.access_token, "test_access_token");
    assert_eq!(user.name.as_deref(), Some("Test Athlete"));
    assert!(user.shoes.contains("Pegasus 40"));
}
