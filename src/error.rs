/// Error types for sqlx-table-bind
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A rewrite pattern for a placeholder could not be compiled
    #[error("Failed to parse SQL template: {0}")]
    Parse(#[from] regex::Error),

    /// Error from SQLx database operations
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Connection settings are missing or malformed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Placeholder was referenced in the query but has no parameter
    #[error("Placeholder '{0}' has no matching parameter")]
    UnboundPlaceholder(String),

    /// A list parameter whose placeholder is neither `IN (:name)` nor `= :name`
    #[error("List parameter ':{0}' is not used as `IN (:{0})` or `= :{0}` in the query")]
    UnsupportedQueryShape(String),

    /// A list element name generated during expansion is already a parameter
    #[error("Generated parameter ':{0}' collides with a supplied parameter")]
    ParameterConflict(String),

    /// UPDATE or DELETE generated without any filter
    #[error("{statement} requires a non-empty where clause")]
    MissingWhereClause {
        /// Statement kind, e.g. `UPDATE`
        statement: &'static str,
    },

    /// UPDATE generated with nothing to set
    #[error("{statement} requires at least one column to set")]
    EmptyRowData {
        /// Statement kind, e.g. `UPDATE`
        statement: &'static str,
    },

    /// A transaction scope was opened while another one is still open
    #[error("A transaction is already open on this connection")]
    NestedTransaction,
}

/// Result type alias for sqlx-table-bind operations
pub type Result<T> = std::result::Result<T, Error>;
