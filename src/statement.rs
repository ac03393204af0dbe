//! SQL generation for single-table CRUD statements.
//!
//! Identifiers are interpolated as given (backtick-quoted where noted) and are
//! expected to be trusted, compile-time-known names. Values only ever travel
//! through the returned [`ParameterSet`]; the single exception is the raw
//! `ORDER BY` expression of [`SelectOptions`].

use std::fmt::Write as _;

use crate::value::ParameterSet;
use crate::Error;

/// Prefix given to update payload placeholders so they never collide with
/// where-clause placeholders for the same column.
pub const UPDATE_PREFIX: &str = "_aggiorna_";

/// SQL text together with the parameters it references.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: ParameterSet,
}

/// Ordering and paging for [`TableQuery::select`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectOptions {
    /// Raw `ORDER BY` expression. Never parameterized.
    pub order_by: Option<String>,
    pub limit: Option<u64>,
    /// Ignored unless `limit` is also set.
    pub offset: Option<u64>,
}

impl SelectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn order_by(mut self, expr: impl Into<String>) -> Self {
        self.order_by = Some(expr.into());
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Builds statements against one table.
///
/// # Examples
///
/// ```
/// use sqlx_table_bind::{params, statement::TableQuery};
///
/// let stmt = TableQuery::new("users").update(&params! { "id" => 5 }, &params! { "status" => "active" })?;
/// assert_eq!(stmt.sql, "UPDATE `users` SET `status`=:_aggiorna_status WHERE `id`=:id");
/// assert_eq!(stmt.params, params! { "id" => 5, "_aggiorna_status" => "active" });
/// # Ok::<(), sqlx_table_bind::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableQuery<'t> {
    table: &'t str,
}

impl<'t> TableQuery<'t> {
    pub const fn new(table: &'t str) -> Self {
        Self { table }
    }

    pub const fn table(&self) -> &'t str {
        self.table
    }

    /// `SELECT <columns> FROM <table> [WHERE ...] [ORDER BY ...] [LIMIT n [OFFSET m]]`
    pub fn select(&self, columns: &str, filter: &ParameterSet, options: &SelectOptions) -> Statement {
        let mut sql = format!("SELECT {columns} FROM `{}`", self.table);
        if !filter.is_empty() {
            let _ = write!(sql, " {}", where_clause(filter));
        }
        if let Some(order_by) = &options.order_by {
            let _ = write!(sql, " ORDER BY {order_by}");
        }
        if let Some(limit) = options.limit {
            let _ = write!(sql, " LIMIT {limit}");
            if let Some(offset) = options.offset {
                let _ = write!(sql, " OFFSET {offset}");
            }
        }
        Statement {
            sql,
            params: filter.clone(),
        }
    }

    /// `SELECT COUNT(*) FROM <table> [WHERE ...]`
    pub fn count(&self, filter: &ParameterSet) -> Statement {
        self.select("COUNT(*)", filter, &SelectOptions::default())
    }

    /// `INSERT INTO <table> (<cols>) VALUES (<:cols>)`
    pub fn insert(&self, row: &ParameterSet) -> Statement {
        self.write_row("INSERT", row)
    }

    /// `REPLACE INTO <table> (<cols>) VALUES (<:cols>)`
    pub fn replace(&self, row: &ParameterSet) -> Statement {
        self.write_row("REPLACE", row)
    }

    /// `UPDATE <table> SET `k`=:_aggiorna_k, ... WHERE ...`
    ///
    /// Payload placeholders carry [`UPDATE_PREFIX`]; where-clause placeholders
    /// keep the column name, so both sides may name the same column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRowData`] if `row` is empty and
    /// [`Error::MissingWhereClause`] if `filter` is empty.
    pub fn update(&self, filter: &ParameterSet, row: &ParameterSet) -> crate::Result<Statement> {
        if row.is_empty() {
            return Err(Error::EmptyRowData { statement: "UPDATE" });
        }
        if filter.is_empty() {
            return Err(Error::MissingWhereClause { statement: "UPDATE" });
        }

        let set = row
            .keys()
            .map(|k| format!("`{k}`=:{UPDATE_PREFIX}{k}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE `{}` SET {set} {}",
            self.table,
            where_clause(filter)
        );

        let mut params = filter.clone();
        params.extend(
            row.iter()
                .map(|(k, v)| (format!("{UPDATE_PREFIX}{k}"), v.clone())),
        );
        Ok(Statement { sql, params })
    }

    /// `DELETE FROM <table> WHERE ...`
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingWhereClause`] if `filter` is empty.
    pub fn delete(&self, filter: &ParameterSet) -> crate::Result<Statement> {
        if filter.is_empty() {
            return Err(Error::MissingWhereClause { statement: "DELETE" });
        }
        Ok(Statement {
            sql: format!("DELETE FROM `{}` {}", self.table, where_clause(filter)),
            params: filter.clone(),
        })
    }

    fn write_row(&self, verb: &str, row: &ParameterSet) -> Statement {
        let columns = row.keys().collect::<Vec<_>>().join(", ");
        let values = row
            .keys()
            .map(|k| format!(":{k}"))
            .collect::<Vec<_>>()
            .join(", ");
        Statement {
            sql: format!("{verb} INTO `{}` ({columns}) VALUES ({values})", self.table),
            params: row.clone(),
        }
    }
}

fn where_clause(filter: &ParameterSet) -> String {
    let conditions = filter
        .keys()
        .map(|k| format!("`{k}`=:{k}"))
        .collect::<Vec<_>>()
        .join(" AND ");
    format!("WHERE {conditions}")
}
