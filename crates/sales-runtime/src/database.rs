//! Relational store handle used by the sink.
//!
//! A single [`sqlx::AnyConnection`] opened from a URL.  MySQL / MariaDB and
//! SQLite are supported; the dialect only affects identifier quoting and the
//! column types used when a table is recreated.

use sales_core::models::{ColumnType, Table, Value};
use sales_core::settings::redact_url;
use sales_core::{PipelineError, Result};
use sqlx::{AnyConnection, Connection};
use tracing::debug;

// ── SqlDialect ────────────────────────────────────────────────────────────────

/// SQL flavour spoken by the connected server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    MySql,
    Sqlite,
}

impl SqlDialect {
    /// Pick the dialect from the URL scheme.
    pub fn from_url(url: &str) -> Result<Self> {
        let scheme = url.split(':').next().unwrap_or_default().to_ascii_lowercase();
        match scheme.as_str() {
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(PipelineError::Config(format!(
                "unsupported database URL scheme '{}' (expected mysql, mariadb or sqlite)",
                scheme
            ))),
        }
    }

    /// Quote an identifier, doubling any embedded quote character.
    pub fn quote_ident(self, ident: &str) -> String {
        match self {
            Self::MySql => format!("`{}`", ident.replace('`', "``")),
            Self::Sqlite => format!("\"{}\"", ident.replace('"', "\"\"")),
        }
    }

    /// Column type used when creating a table.
    pub fn column_sql_type(self, kind: ColumnType) -> &'static str {
        match (self, kind) {
            (Self::MySql, ColumnType::Integer) => "BIGINT",
            (Self::MySql, ColumnType::Float) => "DOUBLE",
            (Self::MySql, ColumnType::Text) => "TEXT",
            (Self::MySql, ColumnType::DateTime) => "DATETIME",
            (Self::Sqlite, ColumnType::Integer) => "INTEGER",
            (Self::Sqlite, ColumnType::Float) => "REAL",
            (Self::Sqlite, ColumnType::Text | ColumnType::DateTime) => "TEXT",
        }
    }
}

// ── Database ──────────────────────────────────────────────────────────────────

/// An open connection to the relational store.
///
/// Owned by the caller and passed to the sink; call [`Database::close`] to end
/// the session cleanly.  Dropping it also releases the connection.
pub struct Database {
    conn: AnyConnection,
    dialect: SqlDialect,
}

impl Database {
    /// Open a connection to `url` and verify it with a trivial query.
    ///
    /// Failures are reported as [`PipelineError::Connection`] with the
    /// password masked.
    pub async fn connect(url: &str) -> Result<Self> {
        let dialect = SqlDialect::from_url(url)?;
        sqlx::any::install_default_drivers();

        let connection_error = |e: sqlx::Error| PipelineError::Connection {
            target: redact_url(url),
            message: e.to_string(),
        };

        let mut conn = AnyConnection::connect(url)
            .await
            .map_err(connection_error)?;

        sqlx::query("SELECT 1")
            .execute(&mut conn)
            .await
            .map_err(connection_error)?;

        debug!("Connected to {} ({:?})", redact_url(url), dialect);
        Ok(Self { conn, dialect })
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Replace the table `name` with the contents of `table`.
    ///
    /// Drops any existing table of that name, recreates it with a schema
    /// derived from the column cell types, and inserts every row inside one
    /// transaction.  Returns the number of inserted rows.
    pub async fn replace_table(&mut self, name: &str, table: &Table) -> Result<u64> {
        let write_error = |e: sqlx::Error| PipelineError::Write {
            table: name.to_string(),
            message: e.to_string(),
        };

        let kinds: Vec<ColumnType> = (0..table.columns().len())
            .map(|idx| table.column_type(idx))
            .collect();
        let date_only: Vec<bool> = (0..table.columns().len())
            .map(|idx| table.is_date_only(idx))
            .collect();

        let quoted_table = self.dialect.quote_ident(name);
        let drop_sql = format!("DROP TABLE IF EXISTS {}", quoted_table);
        let create_sql = self.create_table_sql(&quoted_table, table.columns(), &kinds);
        let insert_sql = self.insert_sql(&quoted_table, table.columns());

        let mut tx = self.conn.begin().await.map_err(write_error)?;

        sqlx::query(&drop_sql)
            .execute(&mut *tx)
            .await
            .map_err(write_error)?;
        sqlx::query(&create_sql)
            .execute(&mut *tx)
            .await
            .map_err(write_error)?;

        let mut inserted = 0u64;
        for row in table.rows() {
            let mut query = sqlx::query(&insert_sql);
            for ((cell, kind), date_only) in row.iter().zip(&kinds).zip(&date_only) {
                query = match bind_value(cell, *kind, *date_only) {
                    Bound::Integer(v) => query.bind(v),
                    Bound::Float(v) => query.bind(v),
                    Bound::Text(v) => query.bind(v),
                };
            }
            inserted += query
                .execute(&mut *tx)
                .await
                .map_err(write_error)?
                .rows_affected();
        }

        tx.commit().await.map_err(write_error)?;

        debug!("Replaced table {} with {} rows", quoted_table, inserted);
        Ok(inserted)
    }

    #[cfg(test)]
    pub(crate) fn connection_mut(&mut self) -> &mut AnyConnection {
        &mut self.conn
    }

    /// Close the connection, flushing any pending protocol messages.
    pub async fn close(self) -> Result<()> {
        self.conn.close().await.map_err(|e| PipelineError::Connection {
            target: "(closing)".to_string(),
            message: e.to_string(),
        })
    }

    fn create_table_sql(&self, quoted_table: &str, columns: &[String], kinds: &[ColumnType]) -> String {
        let defs: Vec<String> = columns
            .iter()
            .zip(kinds)
            .map(|(col, kind)| {
                format!(
                    "{} {}",
                    self.dialect.quote_ident(col),
                    self.dialect.column_sql_type(*kind)
                )
            })
            .collect();
        format!("CREATE TABLE {} ({})", quoted_table, defs.join(", "))
    }

    fn insert_sql(&self, quoted_table: &str, columns: &[String]) -> String {
        let names: Vec<String> = columns
            .iter()
            .map(|c| self.dialect.quote_ident(c))
            .collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quoted_table,
            names.join(", "),
            placeholders
        )
    }
}

// ── Binding ───────────────────────────────────────────────────────────────────

/// A cell converted to the parameter type of its column.
#[derive(Debug, PartialEq)]
enum Bound {
    Integer(Option<i64>),
    Float(Option<f64>),
    Text(Option<String>),
}

fn bind_value(cell: &Value, kind: ColumnType, date_only: bool) -> Bound {
    match (kind, cell) {
        (ColumnType::Integer, Value::Integer(i)) => Bound::Integer(Some(*i)),
        (ColumnType::Integer, _) => Bound::Integer(None),
        (ColumnType::Float, Value::Integer(i)) => Bound::Float(Some(*i as f64)),
        (ColumnType::Float, Value::Float(f)) => Bound::Float(Some(*f)),
        (ColumnType::Float, _) => Bound::Float(None),
        (_, Value::Null) => Bound::Text(None),
        (_, other) => Bound::Text(Some(other.render(date_only))),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
