use sqlx::mysql::{MySqlQueryResult, MySqlRow};
use sqlx::FromRow;

use crate::connection::Connection;
use crate::statement::{SelectOptions, Statement, TableQuery};
use crate::value::ParameterSet;

/// CRUD operations on one table through a borrowed [`Connection`].
///
/// Filters and rows are column→value [`ParameterSet`]s; filters are combined
/// with `AND`, and a list value in a filter matches any of its elements.
///
/// # Examples
///
/// ```rust,no_run
/// use sqlx_table_bind::{params, Connection, SelectOptions};
///
/// # async fn example(conn: &mut Connection) -> sqlx_table_bind::Result<()> {
/// let mut users = conn.table("users");
///
/// let id = users.insert(&params! { "name" => "Bob", "status" => "pending" }).await?;
/// users.update(&params! { "id" => id }, &params! { "status" => "active" }).await?;
///
/// let active = users
///     .all(&params! { "status" => "active" }, &SelectOptions::new().order_by("name").limit(20))
///     .await?;
/// let staff = users.count(&params! { "role" => vec!["admin", "editor"] }).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Table<'c> {
    name: String,
    conn: &'c mut Connection,
}

impl<'c> Table<'c> {
    pub fn new(name: impl Into<String>, conn: &'c mut Connection) -> Self {
        Self {
            name: name.into(),
            conn,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn query(&self) -> TableQuery<'_> {
        TableQuery::new(&self.name)
    }

    /// Every row matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn all(&mut self, filter: &ParameterSet, options: &SelectOptions) -> crate::Result<Vec<MySqlRow>> {
        let Statement { sql, params } = self.query().select("*", filter, options);
        self.conn.all(&sql, params).await
    }

    /// Every row matching `filter`, decoded as `R`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails or a row cannot be decoded.
    pub async fn all_as<R>(&mut self, filter: &ParameterSet, options: &SelectOptions) -> crate::Result<Vec<R>>
    where
        for<'row> R: FromRow<'row, MySqlRow> + Send + Unpin,
    {
        let Statement { sql, params } = self.query().select("*", filter, options);
        self.conn.all_as(&sql, params).await
    }

    /// The first row matching `filter`, or `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails; no match is not an error.
    pub async fn one(&mut self, filter: &ParameterSet) -> crate::Result<Option<MySqlRow>> {
        let Statement { sql, params } = self.query().select("*", filter, &SelectOptions::new().limit(1));
        self.conn.first(&sql, params).await
    }

    /// The first row matching `filter` decoded as `R`, or `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails or the row cannot be decoded.
    pub async fn one_as<R>(&mut self, filter: &ParameterSet) -> crate::Result<Option<R>>
    where
        for<'row> R: FromRow<'row, MySqlRow> + Send + Unpin,
    {
        let Statement { sql, params } = self.query().select("*", filter, &SelectOptions::new().limit(1));
        self.conn.first_as(&sql, params).await
    }

    /// Number of rows matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn count(&mut self, filter: &ParameterSet) -> crate::Result<i64> {
        let Statement { sql, params } = self.query().count(filter);
        Ok(self.conn.value::<i64>(&sql, params).await?.unwrap_or(0))
    }

    /// Inserts `row` and returns the id assigned by `AUTO_INCREMENT`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn insert(&mut self, row: &ParameterSet) -> crate::Result<u64> {
        let Statement { sql, params } = self.query().insert(row);
        Ok(self.conn.execute(&sql, params).await?.last_insert_id())
    }

    /// `REPLACE`s `row` and returns the last inserted id.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn replace(&mut self, row: &ParameterSet) -> crate::Result<u64> {
        let Statement { sql, params } = self.query().replace(row);
        Ok(self.conn.execute(&sql, params).await?.last_insert_id())
    }

    /// Sets the columns of `row` on every row matching `filter` and returns the
    /// number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns an error if `filter` or `row` is empty, or if the statement fails.
    pub async fn update(&mut self, filter: &ParameterSet, row: &ParameterSet) -> crate::Result<u64> {
        let Statement { sql, params } = self.query().update(filter, row)?;
        Ok(self.conn.execute(&sql, params).await?.rows_affected())
    }

    /// Deletes every row matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if `filter` is empty or the statement fails.
    pub async fn delete(&mut self, filter: &ParameterSet) -> crate::Result<MySqlQueryResult> {
        let Statement { sql, params } = self.query().delete(filter)?;
        self.conn.execute(&sql, params).await
    }
}
