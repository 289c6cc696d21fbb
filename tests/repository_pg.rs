//! PostgreSQL store tests. Need a database: `DATABASE_URL=... cargo test -- --ignored`.

use sqlx::PgPool;
use std::sync::Arc;
use urlsh::domain::repositories::{StoreError, UrlStore};
use urlsh::infrastructure::persistence::PgUrlStore;
use urlsh::utils::url_digest::original_digest;

fn store(pool: PgPool) -> Arc<PgUrlStore> {
    Arc::new(PgUrlStore::new(Arc::new(pool)))
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_put_and_get(pool: PgPool) {
    let repo = store(pool);

    let created = repo.put("abc1234", "https://example.com/").await.unwrap();
    assert_eq!(created.code, "abc1234");
    assert_eq!(created.hits, 0);

    let found = repo.get_by_code("abc1234").await.unwrap().unwrap();
    assert_eq!(found.original, "https://example.com/");
    assert_eq!(found.created_at, created.created_at);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_get_by_code_not_found(pool: PgPool) {
    let repo = store(pool);

    assert!(repo.get_by_code("missing").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_get_by_original(pool: PgPool) {
    let repo = store(pool);
    repo.put("abc1234", "https://example.com/a").await.unwrap();

    assert_eq!(
        repo.get_by_original("https://example.com/a")
            .await
            .unwrap()
            .as_deref(),
        Some("abc1234")
    );
    assert!(
        repo.get_by_original("https://example.com/b")
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_put_code_conflict(pool: PgPool) {
    let repo = store(pool);
    repo.put("abc1234", "https://example.com/a").await.unwrap();

    let err = repo.put("abc1234", "https://example.com/b").await.unwrap_err();

    assert!(matches!(err, StoreError::CodeConflict(_)));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_put_original_conflict(pool: PgPool) {
    let repo = store(pool);
    repo.put("first12", "https://example.com/").await.unwrap();

    let err = repo.put("second1", "https://example.com/").await.unwrap_err();

    assert!(
        matches!(err, StoreError::OriginalConflict { ref existing_code } if existing_code == "first12")
    );
    assert!(repo.get_by_code("second1").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_put_with_colliding_digest_is_not_reported_as_duplicate(pool: PgPool) {
    sqlx::query("INSERT INTO urls (code, original, original_digest) VALUES ($1, $2, $3)")
        .bind("seed001")
        .bind("https://other.example/")
        .bind(original_digest("https://example.com/"))
        .execute(&pool)
        .await
        .unwrap();
    let repo = store(pool);

    let err = repo.put("abc1234", "https://example.com/").await.unwrap_err();

    assert!(matches!(err, StoreError::Backend(_)));
    assert!(repo.get_by_code("abc1234").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_concurrent_puts_of_same_url_store_one_entry(pool: PgPool) {
    let repo = store(pool);

    let mut handles = Vec::new();
    for i in 0..8 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.put(&format!("race{i:03}"), "https://example.com/race").await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(StoreError::OriginalConflict { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(repo.list_recent(20).await.unwrap().len(), 1);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_concurrent_increments_are_not_lost(pool: PgPool) {
    let repo = store(pool);
    repo.put("abc1234", "https://example.com/").await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.increment_hit("abc1234").await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let entry = repo.get_by_code("abc1234").await.unwrap().unwrap();
    assert_eq!(entry.hits, 20);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_increment_unknown_code_is_noop(pool: PgPool) {
    let repo = store(pool);

    repo.increment_hit("missing").await.unwrap();
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_list_recent_order_and_limit(pool: PgPool) {
    let repo = store(pool);
    for i in 0..5 {
        repo.put(&format!("code{i:03}"), &format!("https://example.com/{i}"))
            .await
            .unwrap();
    }

    let recent = repo.list_recent(3).await.unwrap();
    let codes: Vec<_> = recent.iter().map(|e| e.code.as_str()).collect();

    assert_eq!(codes, ["code004", "code003", "code002"]);
    assert!(repo.list_recent(0).await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_ping(pool: PgPool) {
    let repo = store(pool);

    repo.ping().await.unwrap();
}
