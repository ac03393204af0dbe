use std::pin::Pin;

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::TryStreamExt;
use sqlx::mysql::{MySqlArguments, MySqlQueryResult, MySqlRow};
use sqlx::{Executor, MySql};

use crate::builder::{bind_arguments, build_query};
use crate::expand::expand;
use crate::value::ParameterSet;

/// Rows produced lazily by [`PreparedQuery::fetch`].
///
/// The underlying cursor stays open until the stream is exhausted or dropped.
pub type RowStream<'e> = Pin<Box<dyn Stream<Item = crate::Result<MySqlRow>> + Send + 'e>>;

/// A query whose named parameters have been expanded and bound.
///
/// `PreparedQuery` runs a template with `:name` placeholders through
/// [`expand`], converts the result to MySQL's positional `?` markers, and binds
/// each value in placeholder order. The SQL string and arguments are owned, and
/// a fresh SQLx `Query` is built from them when the query runs.
///
/// # Examples
///
/// ```rust,no_run
/// use sqlx::MySqlPool;
/// use sqlx_table_bind::{params, PreparedQuery};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let pool = MySqlPool::connect("mysql://localhost/test").await?;
/// let query = PreparedQuery::new(
///     "DELETE FROM users WHERE id IN (:ids)",
///     params! { "ids" => vec![4, 8, 15] },
/// )?;
///
/// let result = query.execute(&pool).await?;
/// println!("Deleted {} rows", result.rows_affected());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    sql: String,
    arguments: MySqlArguments,
}

impl PreparedQuery {
    /// Expands `params` into `template` and binds them.
    ///
    /// An empty parameter set skips expansion and binding entirely; the
    /// template is sent as written.
    ///
    /// # Errors
    ///
    /// Returns an error if a list parameter cannot be expanded, or if the
    /// expanded query names a placeholder with no parameter.
    pub fn new<T>(template: T, params: ParameterSet) -> crate::Result<Self>
    where
        T: Into<String>,
    {
        let template = template.into();
        if params.is_empty() {
            return Ok(Self {
                sql: template,
                arguments: MySqlArguments::default(),
            });
        }

        let expanded = expand(&template, params)?;
        let bound = build_query(&expanded.sql)?;
        let arguments = bind_arguments(&bound.order, &expanded.params)?;
        tracing::debug!(
            sql = %bound.sql,
            placeholders = bound.order.len(),
            "prepared query"
        );
        Ok(Self {
            sql: bound.sql,
            arguments,
        })
    }

    /// The positional SQL sent to the server.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Executes the query using the provided executor.
    ///
    /// Works with any SQLx `Executor`: a `MySqlConnection`, a `MySqlPool` or a
    /// `Transaction`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn execute<'e, E>(self, executor: E) -> crate::Result<MySqlQueryResult>
    where
        E: Executor<'e, Database = MySql>,
    {
        let PreparedQuery { sql, arguments } = self;
        Ok(sqlx::query_with::<MySql, _>(&sql, arguments).execute(executor).await?)
    }

    /// Executes the query and returns the first row, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn fetch_optional<'e, E>(self, executor: E) -> crate::Result<Option<MySqlRow>>
    where
        E: Executor<'e, Database = MySql>,
    {
        let PreparedQuery { sql, arguments } = self;
        Ok(sqlx::query_with::<MySql, _>(&sql, arguments)
            .fetch_optional(executor)
            .await?)
    }

    /// Executes the query and returns all rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn fetch_all<'e, E>(self, executor: E) -> crate::Result<Vec<MySqlRow>>
    where
        E: Executor<'e, Database = MySql>,
    {
        let PreparedQuery { sql, arguments } = self;
        Ok(sqlx::query_with::<MySql, _>(&sql, arguments).fetch_all(executor).await?)
    }

    /// Executes the query and yields rows one at a time.
    ///
    /// The stream is single-pass; it cannot be restarted once consumed.
    pub fn fetch<'e, E>(self, executor: E) -> RowStream<'e>
    where
        E: Executor<'e, Database = MySql> + 'e,
    {
        Box::pin(try_stream! {
            let PreparedQuery { sql, arguments } = self;
            let mut rows = sqlx::query_with::<MySql, _>(&sql, arguments).fetch(executor);
            while let Some(row) = rows.try_next().await? {
                yield row;
            }
        })
    }

    pub(crate) fn into_parts(self) -> (String, MySqlArguments) {
        (self.sql, self.arguments)
    }
}
