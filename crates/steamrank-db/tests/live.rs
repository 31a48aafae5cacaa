//! Live integration tests for steamrank-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/steamrank-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use sqlx::Connection;
use steamrank_core::MatchStrategy;
use steamrank_db::{update_game, GameUpdate};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Insert a catalog row and return its generated `id`.
async fn insert_game(pool: &sqlx::PgPool, name: &str, appid: Option<&str>) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO games (name, steam_appid) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(appid)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_game failed for '{name}': {e}"))
}

async fn fetch_by_id(pool: &sqlx::PgPool, id: i64) -> (String, Option<String>, Option<String>, Option<String>) {
    sqlx::query_as::<_, (String, Option<String>, Option<String>, Option<String>)>(
        "SELECT name, steam_appid, profile_img, price FROM games WHERE id = $1",
    )
    .bind(id)
    .fetch_one(pool)
    .await
    .expect("fetch_by_id failed")
}

fn bulk_update<'a>(appid: &'a str, name: &'a str, price: Option<&'a str>) -> GameUpdate<'a> {
    GameUpdate {
        appid,
        name,
        profile_img: Some("img.jpg"),
        price,
        overwrite_name: false,
    }
}

// ---------------------------------------------------------------------------
// Either (default) matching
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn bulk_update_matches_by_name_and_sets_appid(pool: sqlx::PgPool) {
    let id = insert_game(&pool, "Team Fortress 2", None).await;
    let mut conn = pool.acquire().await.expect("acquire failed");

    let rows = update_game(
        &mut conn,
        &bulk_update("440", "Team Fortress 2", Some("free")),
        MatchStrategy::Either,
    )
    .await
    .expect("update_game failed");

    assert_eq!(rows, 1);
    let (name, appid, img, price) = fetch_by_id(&pool, id).await;
    assert_eq!(name, "Team Fortress 2");
    assert_eq!(appid.as_deref(), Some("440"));
    assert_eq!(img.as_deref(), Some("img.jpg"));
    assert_eq!(price.as_deref(), Some("free"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn bulk_update_leaves_name_untouched_when_matched_by_id(pool: sqlx::PgPool) {
    let id = insert_game(&pool, "TF2", Some("440")).await;
    let mut conn = pool.acquire().await.expect("acquire failed");

    let rows = update_game(
        &mut conn,
        &bulk_update("440", "Team Fortress 2", Some("free")),
        MatchStrategy::Either,
    )
    .await
    .expect("update_game failed");

    assert_eq!(rows, 1);
    let (name, ..) = fetch_by_id(&pool, id).await;
    assert_eq!(name, "TF2");
}

#[sqlx::test(migrations = "../../migrations")]
async fn either_match_updates_id_row_and_name_row(pool: sqlx::PgPool) {
    let by_id = insert_game(&pool, "Old Name", Some("620")).await;
    let by_name = insert_game(&pool, "Portal 2", Some("999999")).await;
    let untouched = insert_game(&pool, "Portal", Some("400")).await;
    let mut conn = pool.acquire().await.expect("acquire failed");

    let rows = update_game(
        &mut conn,
        &bulk_update("620", "Portal 2", Some("9.99")),
        MatchStrategy::Either,
    )
    .await
    .expect("update_game failed");

    assert_eq!(rows, 2);
    assert_eq!(fetch_by_id(&pool, by_id).await.3.as_deref(), Some("9.99"));
    assert_eq!(fetch_by_id(&pool, by_name).await.1.as_deref(), Some("620"));
    assert!(fetch_by_id(&pool, untouched).await.3.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn unmatched_update_affects_zero_rows(pool: sqlx::PgPool) {
    insert_game(&pool, "Dota 2", Some("570")).await;
    let mut conn = pool.acquire().await.expect("acquire failed");

    let rows = update_game(
        &mut conn,
        &GameUpdate {
            appid: "999",
            name: "Some Game",
            profile_img: None,
            price: None,
            overwrite_name: true,
        },
        MatchStrategy::Either,
    )
    .await
    .expect("zero-row update is not an error");

    assert_eq!(rows, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn retry_update_overwrites_name(pool: sqlx::PgPool) {
    let id = insert_game(&pool, "half life", Some("70")).await;
    let mut conn = pool.acquire().await.expect("acquire failed");

    let rows = update_game(
        &mut conn,
        &GameUpdate {
            appid: "70",
            name: "Half-Life",
            profile_img: None,
            price: Some("9.99"),
            overwrite_name: true,
        },
        MatchStrategy::Either,
    )
    .await
    .expect("update_game failed");

    assert_eq!(rows, 1);
    let (name, _, img, price) = fetch_by_id(&pool, id).await;
    assert_eq!(name, "Half-Life");
    assert!(img.is_none());
    assert_eq!(price.as_deref(), Some("9.99"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn absent_metadata_clears_columns(pool: sqlx::PgPool) {
    let id = insert_game(&pool, "Counter-Strike", Some("10")).await;
    sqlx::query("UPDATE games SET profile_img = 'old.jpg', price = '1.00' WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .expect("seed failed");
    let mut conn = pool.acquire().await.expect("acquire failed");

    update_game(
        &mut conn,
        &GameUpdate {
            appid: "10",
            name: "Counter-Strike",
            profile_img: None,
            price: None,
            overwrite_name: false,
        },
        MatchStrategy::Either,
    )
    .await
    .expect("update_game failed");

    let (_, _, img, price) = fetch_by_id(&pool, id).await;
    assert!(img.is_none());
    assert!(price.is_none());
}

// ---------------------------------------------------------------------------
// IdFirst matching
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn id_first_ignores_name_when_id_matches(pool: sqlx::PgPool) {
    let by_id = insert_game(&pool, "Old Name", Some("620")).await;
    let by_name = insert_game(&pool, "Portal 2", None).await;
    let mut conn = pool.acquire().await.expect("acquire failed");

    let rows = update_game(
        &mut conn,
        &bulk_update("620", "Portal 2", Some("9.99")),
        MatchStrategy::IdFirst,
    )
    .await
    .expect("update_game failed");

    assert_eq!(rows, 1);
    assert_eq!(fetch_by_id(&pool, by_id).await.3.as_deref(), Some("9.99"));
    assert!(fetch_by_id(&pool, by_name).await.1.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn id_first_falls_back_to_name(pool: sqlx::PgPool) {
    let id = insert_game(&pool, "Portal 2", None).await;
    let mut conn = pool.acquire().await.expect("acquire failed");

    let rows = update_game(
        &mut conn,
        &bulk_update("620", "Portal 2", Some("9.99")),
        MatchStrategy::IdFirst,
    )
    .await
    .expect("update_game failed");

    assert_eq!(rows, 1);
    let (_, appid, _, price) = fetch_by_id(&pool, id).await;
    assert_eq!(appid.as_deref(), Some("620"));
    assert_eq!(price.as_deref(), Some("9.99"));
}

// ---------------------------------------------------------------------------
// Transactions and reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn rolled_back_update_leaves_row_unchanged(pool: sqlx::PgPool) {
    let id = insert_game(&pool, "Dota 2", Some("570")).await;
    let mut conn = pool.acquire().await.expect("acquire failed");

    let mut tx = conn.begin().await.expect("begin failed");
    let rows = update_game(
        &mut tx,
        &bulk_update("570", "Dota 2", Some("free")),
        MatchStrategy::Either,
    )
    .await
    .expect("update_game failed");
    assert_eq!(rows, 1);
    tx.rollback().await.expect("rollback failed");

    assert!(fetch_by_id(&pool, id).await.3.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_runs_on_table_with_only_catalog_columns(pool: sqlx::PgPool) {
    sqlx::query("ALTER TABLE games DROP COLUMN created_at")
        .execute(&pool)
        .await
        .expect("alter failed");
    let id = insert_game(&pool, "Half-Life 2", Some("220")).await;
    let mut conn = pool.acquire().await.expect("acquire failed");

    for overwrite_name in [false, true] {
        let rows = update_game(
            &mut conn,
            &GameUpdate {
                appid: "220",
                name: "Half-Life 2",
                profile_img: Some("img.jpg"),
                price: Some("9.99"),
                overwrite_name,
            },
            MatchStrategy::IdFirst,
        )
        .await
        .expect("update_game failed");
        assert_eq!(rows, 1);
    }

    assert_eq!(fetch_by_id(&pool, id).await.3.as_deref(), Some("9.99"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn ping_and_migrations_are_idempotent(pool: sqlx::PgPool) {
    let mut conn = pool.acquire().await.expect("acquire failed");
    steamrank_db::ping(&mut conn).await.expect("ping failed");
    let applied = steamrank_db::run_migrations(&mut conn)
        .await
        .expect("run_migrations failed");
    assert_eq!(applied, 0, "sqlx::test already applied every migration");
}
