//! Database operations for the `games` catalog table.
//!
//! Rows are seeded elsewhere; this module only updates them in place. Only
//! the catalog columns are written, so the statement runs against any table
//! that has `name`, `steam_appid`, `profile_img` and `price`.

use sqlx::PgConnection;
use steamrank_core::MatchStrategy;

use crate::DbError;

/// Values written to the matched row(s) for one identifier.
#[derive(Debug, Clone, Copy)]
pub struct GameUpdate<'a> {
    pub appid: &'a str,
    pub name: &'a str,
    pub profile_img: Option<&'a str>,
    pub price: Option<&'a str>,
    /// Also overwrite `name` (retry pass).
    pub overwrite_name: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Predicate {
    IdOrName,
    Id,
    Name,
}

// $1 = appid, $2 = profile_img, $3 = price, $4 = name.
fn update_sql(overwrite_name: bool, predicate: Predicate) -> String {
    let set_clause = if overwrite_name {
        "steam_appid = $1, profile_img = $2, price = $3, name = $4"
    } else {
        "steam_appid = $1, profile_img = $2, price = $3"
    };
    let where_clause = match predicate {
        Predicate::IdOrName => "steam_appid = $1 OR name = $4",
        Predicate::Id => "steam_appid = $1",
        Predicate::Name => "name = $4",
    };
    format!("UPDATE games SET {set_clause} WHERE {where_clause}")
}

/// Whether the statement references `$4`; Postgres rejects surplus binds.
fn binds_name(overwrite_name: bool, predicate: Predicate) -> bool {
    overwrite_name || predicate != Predicate::Id
}

async fn execute_update(
    conn: &mut PgConnection,
    update: &GameUpdate<'_>,
    predicate: Predicate,
) -> Result<u64, DbError> {
    let sql = update_sql(update.overwrite_name, predicate);
    let mut query = sqlx::query(&sql)
        .bind(update.appid)
        .bind(update.profile_img)
        .bind(update.price);
    if binds_name(update.overwrite_name, predicate) {
        query = query.bind(update.name);
    }
    let result = query.execute(&mut *conn).await?;
    Ok(result.rows_affected())
}

/// Updates the catalog row(s) matching an identifier.
///
/// With [`MatchStrategy::Either`] a single statement updates every row whose
/// `steam_appid` equals `update.appid` or whose `name` equals `update.name`.
/// With [`MatchStrategy::IdFirst`] rows are matched by `steam_appid` first and
/// by `name` only if no row carries the id.
///
/// Returns the number of rows affected. Zero is not an error. Runs on the
/// caller's connection, so the caller owns the transaction boundary.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a statement fails.
pub async fn update_game(
    conn: &mut PgConnection,
    update: &GameUpdate<'_>,
    strategy: MatchStrategy,
) -> Result<u64, DbError> {
    match strategy {
        MatchStrategy::Either => execute_update(conn, update, Predicate::IdOrName).await,
        MatchStrategy::IdFirst => {
            let by_id = execute_update(conn, update, Predicate::Id).await?;
            if by_id > 0 {
                return Ok(by_id);
            }
            tracing::debug!(
                appid = update.appid,
                name = update.name,
                "no row carries this appid; matching by name"
            );
            execute_update(conn, update, Predicate::Name).await
        }
    }
}
