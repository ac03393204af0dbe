use std::marker::PhantomData;

use sqlx::mysql::MySqlRow;
use sqlx::{Executor, FromRow, MySql};

use crate::query::PreparedQuery;
use crate::value::ParameterSet;

/// A prepared query that decodes rows into `R` via SQLx's `FromRow`.
///
/// # Examples
///
/// ```rust,no_run
/// use sqlx::{FromRow, MySqlPool};
/// use sqlx_table_bind::{params, PreparedQueryAs};
///
/// #[derive(FromRow)]
/// struct User {
///     id: i32,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let pool = MySqlPool::connect("mysql://localhost/test").await?;
/// let query = PreparedQueryAs::<User>::new(
///     "SELECT id, name FROM users WHERE id IN (:ids)",
///     params! { "ids" => vec![1, 2] },
/// )?;
///
/// for user in query.fetch_all(&pool).await? {
///     println!("User: {} ({})", user.name, user.id);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PreparedQueryAs<R> {
    inner: PreparedQuery,
    _pd: PhantomData<fn() -> R>,
}

impl<R> PreparedQueryAs<R>
where
    for<'row> R: FromRow<'row, MySqlRow> + Send + Unpin,
{
    /// Expands and binds `params` like [`PreparedQuery::new`].
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters cannot be expanded or bound.
    pub fn new<T>(template: T, params: ParameterSet) -> crate::Result<Self>
    where
        T: Into<String>,
    {
        Ok(PreparedQuery::new(template, params)?.into())
    }

    /// Executes the query and returns all matching rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or if any row cannot be converted to type `R`.
    pub async fn fetch_all<'e, E>(self, executor: E) -> crate::Result<Vec<R>>
    where
        E: Executor<'e, Database = MySql>,
    {
        let (sql, arguments) = self.inner.into_parts();
        Ok(sqlx::query_as_with::<MySql, R, _>(&sql, arguments)
            .fetch_all(executor)
            .await?)
    }

    /// Executes the query and returns the first row, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or if the row cannot be converted to type `R`.
    pub async fn fetch_optional<'e, E>(self, executor: E) -> crate::Result<Option<R>>
    where
        E: Executor<'e, Database = MySql>,
    {
        let (sql, arguments) = self.inner.into_parts();
        Ok(sqlx::query_as_with::<MySql, R, _>(&sql, arguments)
            .fetch_optional(executor)
            .await?)
    }

    /// Executes the query and returns exactly one row.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error::RowNotFound` (wrapped) if no row matches.
    pub async fn fetch_one<'e, E>(self, executor: E) -> crate::Result<R>
    where
        E: Executor<'e, Database = MySql>,
    {
        let (sql, arguments) = self.inner.into_parts();
        Ok(sqlx::query_as_with::<MySql, R, _>(&sql, arguments)
            .fetch_one(executor)
            .await?)
    }
}

impl<R> From<PreparedQuery> for PreparedQueryAs<R> {
    fn from(inner: PreparedQuery) -> Self {
        Self {
            inner,
            _pd: PhantomData,
        }
    }
}
