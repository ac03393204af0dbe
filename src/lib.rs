//! # sqlx-table-bind
//!
//! Named parameters with list expansion, and a table-scoped CRUD builder, on top of
//! SQLx's MySQL driver.
//!
//! ## Features
//!
//! - **Named Placeholders**: Use `:param_name` instead of `?` in your SQL queries
//! - **List Expansion**: Bind a `Vec` to `IN (:ids)` or `= :ids` and it becomes `IN (?, ?, ...)`
//! - **Dates**: `chrono` timestamps are sent as `YYYY-MM-DD HH:MM:SS`
//! - **Table Helpers**: `all`, `one`, `count`, `insert`, `replace`, `update`, `delete` from column→value maps
//! - **Scoped Transactions**: commit on `Ok`, roll back on `Err`, panic or drop
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! sqlx = { version = "0.8", features = ["mysql", "runtime-tokio"] }
//! sqlx-table-bind = "0.1"
//! ```
//!
//! ## Examples
//!
//! ### Queries with list parameters
//!
//! ```rust,no_run
//! use sqlx_table_bind::{params, Connection, ConnectionConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut conn = Connection::connect(&ConnectionConfig::new("mysql://localhost/test")).await?;
//!
//! let rows = conn
//!     .all(
//!         "SELECT id, name FROM users WHERE id IN (:ids) AND status = :status",
//!         params! { "ids" => vec![1, 2, 3], "status" => "active" },
//!     )
//!     .await?;
//! println!("Found {} users", rows.len());
//! # Ok(())
//! # }
//! ```
//!
//! ### Table helpers
//!
//! ```rust,no_run
//! use sqlx::FromRow;
//! use sqlx_table_bind::{params, Connection, SelectOptions};
//!
//! #[derive(FromRow)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! # async fn example(conn: &mut Connection) -> sqlx_table_bind::Result<()> {
//! let mut users = conn.table("users");
//!
//! let id = users.insert(&params! { "name" => "Bob" }).await?;
//! let changed = users
//!     .update(&params! { "id" => id }, &params! { "name" => "Robert" })
//!     .await?;
//!
//! let page: Vec<User> = users
//!     .all_as(&params! {}, &SelectOptions::new().order_by("id").limit(10).offset(20))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Using with Transactions
//!
//! ```rust,no_run
//! use sqlx_table_bind::{params, Connection};
//!
//! # async fn example(conn: &mut Connection) -> sqlx_table_bind::Result<()> {
//! conn.transaction(|conn| {
//!     Box::pin(async move {
//!         conn.execute(
//!             "UPDATE accounts SET balance = balance - :amount WHERE id = :id",
//!             params! { "amount" => 100, "id" => 1 },
//!         )
//!         .await?;
//!         conn.execute(
//!             "UPDATE accounts SET balance = balance + :amount WHERE id = :id",
//!             params! { "amount" => 100, "id" => 2 },
//!         )
//!         .await?;
//!         Ok::<_, sqlx_table_bind::Error>(())
//!     })
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## How It Works
//!
//! 1. **Expand**: list parameters are split into one placeholder per element and
//!    the matching `IN (...)` is rewritten ([`expand`](crate::expand::expand))
//! 2. **Convert**: `:name` markers become MySQL's positional `?` and their order
//!    is recorded ([`build_query`](crate::builder::build_query))
//! 3. **Bind**: values are bound in marker order, so a name used twice is bound
//!    twice ([`bind_arguments`](crate::builder::bind_arguments))
//!
//! ## Limitations
//!
//! - Currently only supports MySQL
//! - Placeholder names must match `[a-zA-Z0-9_]+`
//! - Only the first `IN (:name)` / `= :name` of a list parameter is rewritten; quoted text and comments are left alone
//! - Table and column names are interpolated as given; never pass user input as an identifier
//!
//! ## License
//!
//! Licensed under either of Apache License, Version 2.0 or MIT license at your option.

pub mod builder;
pub mod connection;
pub mod error;
pub mod expand;
pub mod query;
pub mod query_as;
pub mod shape;
pub mod statement;
pub mod table;
pub mod value;

pub use connection::{Connection, ConnectionConfig};
pub use error::{Error, Result};
pub use expand::ExpandedQuery;
pub use query::{PreparedQuery, RowStream};
pub use query_as::PreparedQueryAs;
pub use statement::{SelectOptions, Statement, TableQuery};
pub use table::Table;
pub use value::{ParameterSet, ParameterValue, Scalar};

/// Convenience re-exports for common use cases
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::params;
    pub use crate::{Connection, ConnectionConfig, SelectOptions, Table};
    pub use crate::{ParameterSet, ParameterValue, Scalar};
    pub use crate::{PreparedQuery, PreparedQueryAs};
}
