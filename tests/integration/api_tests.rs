//! API integration tests against a running server and its Postgres database
//!
//! Run with: DATABASE_URL=... cargo test --test api_tests -- --ignored --test-threads=1

use reqwest::Client;
use serde_json::{json, Value};
use sqlx::PgPool;

const BASE_URL: &str = "http://localhost:8000/v1";

/// Reset the tables and insert authors a1..a3, readers r1/r2 and books b1..b3
async fn seed() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPool::connect(&url).await.expect("Failed to connect to database");

    sqlx::query("TRUNCATE borrows, books, readers, authors RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("Failed to truncate tables");

    for name in ["a1", "a2", "a3"] {
        sqlx::query("INSERT INTO authors (name) VALUES ($1)")
            .bind(name)
            .execute(&pool)
            .await
            .expect("Failed to insert author");
    }
    for name in ["r1", "r2"] {
        sqlx::query("INSERT INTO readers (name) VALUES ($1)")
            .bind(name)
            .execute(&pool)
            .await
            .expect("Failed to insert reader");
    }
    for (i, title) in ["b1", "b2", "b3"].iter().enumerate() {
        sqlx::query("INSERT INTO books (title, author_id) VALUES ($1, $2)")
            .bind(title)
            .bind(i as i64 + 1)
            .execute(&pool)
            .await
            .expect("Failed to insert book");
    }

    pool
}

async fn borrow(client: &Client, reader_id: i64, book_id: i64) -> (u16, Value) {
    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .json(&json!({ "reader_id": reader_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");

    let status = response.status().as_u16();
    let body: Value = response.json().await.expect("Failed to parse response");
    (status, body)
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_borrow_lifecycle() {
    let pool = seed().await;
    let client = Client::new();

    let (status, body) = borrow(&client, 1, 1).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Borrow added successfully");

    let (status, body) = borrow(&client, 1, 1).await;
    assert_eq!(status, 200);
    assert_eq!(body["detail"], "The book is already borrowed by the same reader");

    let (status, body) = borrow(&client, 2, 1).await;
    assert_eq!(status, 409);
    assert_eq!(body["detail"], "The book is already borrowed by someone else");

    let active: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrows WHERE book_id = 1 AND return_time IS NULL")
        .fetch_one(&pool)
        .await
        .expect("Failed to count borrows");
    assert_eq!(active, 1);

    let response = client
        .delete(format!("{}/borrows/1", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let (status, body) = borrow(&client, 2, 1).await;
    assert_eq!(status, 200);
    assert_eq!(body["borrow"], json!({ "reader_id": 2, "book_id": 1 }));

    let body: Value = client
        .get(format!("{}/borrows", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let borrows = body["borrows"].as_array().expect("borrows is not an array");
    assert_eq!(borrows.len(), 1);
    assert_eq!(borrows[0]["reader"], "r2");
    assert_eq!(borrows[0]["title"], "b1");
    assert_eq!(borrows[0]["author"], "a1");
}

#[tokio::test]
#[ignore]
async fn test_invalid_references() {
    seed().await;
    let client = Client::new();

    let (status, body) = borrow(&client, 999, 1).await;
    assert_eq!(status, 400);
    assert_eq!(body["detail"], "Invalid reader_id");

    let (status, body) = borrow(&client, 1, 999).await;
    assert_eq!(status, 400);
    assert_eq!(body["detail"], "Invalid book_id");
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_leave_one_active_row() {
    let pool = seed().await;
    let client = Client::new();

    let (a, b) = tokio::join!(borrow(&client, 1, 2), borrow(&client, 2, 2));
    let mut statuses = [a.0, b.0];
    statuses.sort();
    assert_eq!(statuses, [200, 409]);

    let active: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrows WHERE book_id = 2 AND return_time IS NULL")
        .fetch_one(&pool)
        .await
        .expect("Failed to count borrows");
    assert_eq!(active, 1);
}
