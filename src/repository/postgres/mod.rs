//! Postgres-backed repositories: sea-orm for row CRUD, raw sqlx for the
//! aggregation queries and the audit insert.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::{DbErr, prelude::DateTimeWithTimeZone};

use crate::{
    db::{DbPool, OrmConn},
    error::AppError,
};

mod accounts;
mod catalog;
mod categories;
mod products;

#[derive(Clone)]
pub struct PgStore {
    orm: OrmConn,
    pool: DbPool,
}

impl PgStore {
    pub fn new(orm: OrmConn, pool: DbPool) -> Self {
        Self { orm, pool }
    }
}

fn to_utc(value: DateTimeWithTimeZone) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}

fn to_db_time(value: DateTime<Utc>) -> DateTimeWithTimeZone {
    value.into()
}

/// Parses a text column holding one of our enum names.
fn parse_column<T: FromStr>(value: &str, column: &str) -> Result<T, AppError> {
    value
        .parse()
        .map_err(|_| AppError::Internal(anyhow::anyhow!("unexpected {column} value: {value}")))
}

fn update_error(err: DbErr, what: &str, id: i64) -> AppError {
    match err {
        DbErr::RecordNotUpdated => AppError::NotFound(format!("{what} with ID {id} not found")),
        other => other.into(),
    }
}
