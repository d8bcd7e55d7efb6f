//! Database and schema tests
//!
//! Tests SQLite migrations, entity storage, and schema constraints

use chrono::Utc;
use sqlx::SqlitePool;
use tokio_gemini_chat_api::infrastructure::entities::{Message, MessageRole, Session};
use uuid::Uuid;

/// Setup test database with migrations
async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}

async fn insert_session(pool: &SqlitePool, id: &str, user: Option<Uuid>) {
    sqlx::query("INSERT INTO sessions (id, user_id, created_at) VALUES (?, ?, ?)")
        .bind(id)
        .bind(user)
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_database_migrations_work() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .fetch_all(&pool)
            .await
            .unwrap();
    let tables: Vec<String> = tables.into_iter().map(|t| t.0).collect();

    assert!(tables.contains(&"sessions".to_string()));
    assert!(tables.contains(&"messages".to_string()));
}

#[tokio::test]
async fn test_session_round_trips_through_entity() {
    let pool = setup_test_db().await;
    let user_id = Uuid::new_v4();
    insert_session(&pool, "abc", Some(user_id)).await;
    insert_session(&pool, "anonymous", None).await;

    let session: Session = sqlx::query_as("SELECT * FROM sessions WHERE id = ?")
        .bind("abc")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(session.user_id, Some(user_id));
    // column default
    assert_eq!(session.title, "New Chat");

    let anonymous: Session = sqlx::query_as("SELECT * FROM sessions WHERE id = ?")
        .bind("anonymous")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(anonymous.user_id, None);
}

#[tokio::test]
async fn test_message_role_storage() {
    let pool = setup_test_db().await;
    insert_session(&pool, "roles", None).await;

    for role in [MessageRole::User, MessageRole::Assistant] {
        sqlx::query("INSERT INTO messages (id, session_id, role, content, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(Uuid::new_v4())
            .bind("roles")
            .bind(role)
            .bind(format!("Test {:?}", role))
            .bind(Utc::now())
            .execute(&pool)
            .await
            .unwrap();
    }

    let raw: Vec<(i64,)> = sqlx::query_as("SELECT role FROM messages ORDER BY rowid")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(raw, vec![(1,), (2,)]);

    let messages: Vec<Message> = sqlx::query_as("SELECT * FROM messages ORDER BY rowid")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[1].role, MessageRole::Assistant);
    assert_eq!(messages[1].content, "Test Assistant");
}

#[tokio::test]
async fn test_unknown_role_is_rejected() {
    let pool = setup_test_db().await;
    insert_session(&pool, "roles", None).await;

    let result = sqlx::query("INSERT INTO messages (id, session_id, role, content, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(Uuid::new_v4())
        .bind("roles")
        .bind(3)
        .bind("system prompt")
        .bind(Utc::now())
        .execute(&pool)
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_message_requires_existing_session() {
    let pool = setup_test_db().await;

    let result = sqlx::query("INSERT INTO messages (id, session_id, role, content, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(Uuid::new_v4())
        .bind("missing")
        .bind(1)
        .bind("orphan")
        .bind(Utc::now())
        .execute(&pool)
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_session_cascade_delete() {
    let pool = setup_test_db().await;
    insert_session(&pool, "doomed", None).await;

    sqlx::query("INSERT INTO messages (id, session_id, role, content, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(Uuid::new_v4())
        .bind("doomed")
        .bind(1)
        .bind("Test")
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();

    // Delete session (should cascade to messages)
    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind("doomed")
        .execute(&pool)
        .await
        .unwrap();

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages WHERE session_id = ?")
        .bind("doomed")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(count.0, 0);
}
