use regex::{Captures, Regex};
use sqlx::mysql::MySqlArguments;
use sqlx::Arguments;

use crate::expand::format_temporal;
use crate::value::{ParameterSet, ParameterValue, Scalar};
use crate::Error;

/// A query with named placeholders converted to positional `?` markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundQuery {
    /// SQL text ready for MySQL
    pub sql: String,
    /// Placeholder names in the order their `?` markers appear
    pub order: Vec<String>,
}

/// Quoted literals, quoted identifiers and comments, in that order of preference.
///
/// Placeholder scanning treats every match of this pattern as opaque text.
pub(crate) const SKIPPED_SPANS: &str = r##"(?s)'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*"|`[^`]*`|/\*.*?\*/|--(?:[ \t\r][^\n]*)?(?:\n|$)|#[^\n]*"##;

/// Converts named placeholders (`:name`) to positional placeholders (`?`) for MySQL.
///
/// Text inside `'...'`, `"..."`, `` `...` `` and comments (`-- `, `#`, `/* */`)
/// is copied verbatim, so a literal such as `'10:30'` is not mistaken for a
/// placeholder.
///
/// # Examples
///
/// ```
/// use sqlx_table_bind::builder::build_query;
///
/// let bound = build_query("SELECT * FROM users WHERE id = :id AND name = :name")?;
/// assert_eq!(bound.sql, "SELECT * FROM users WHERE id = ? AND name = ?");
/// assert_eq!(bound.order, vec!["id", "name"]);
/// # Ok::<(), sqlx_table_bind::Error>(())
/// ```
pub fn build_query(template: &str) -> crate::Result<BoundQuery> {
    let regex = Regex::new(&format!(r"{SKIPPED_SPANS}|:(?P<name>[a-zA-Z0-9_]+)"))?;
    let mut order = Vec::new();
    let sql = regex
        .replace_all(template, |caps: &Captures<'_>| match caps.name("name") {
            Some(name) => {
                order.push(name.as_str().to_owned());
                "?".to_owned()
            }
            None => caps[0].to_owned(),
        })
        .into_owned();

    Ok(BoundQuery { sql, order })
}

/// Binds `params` to the positional markers of a [`BoundQuery`], in `order`.
///
/// A name that appears twice in `order` is bound twice. Parameters that no
/// placeholder refers to are ignored.
///
/// # Errors
///
/// Returns [`Error::UnboundPlaceholder`] if a placeholder has no parameter, and
/// [`Error::UnsupportedQueryShape`] if a list value reaches the binder without
/// having been expanded first.
pub fn bind_arguments(order: &[String], params: &ParameterSet) -> crate::Result<MySqlArguments> {
    let mut arguments = MySqlArguments::default();
    for name in order {
        let value = params
            .get(name)
            .ok_or_else(|| Error::UnboundPlaceholder(name.clone()))?;
        match value {
            ParameterValue::Scalar(scalar) => add_scalar(&mut arguments, scalar)?,
            ParameterValue::Temporal(at) => add(&mut arguments, format_temporal(at))?,
            ParameterValue::Sequence(_) => return Err(Error::UnsupportedQueryShape(name.clone())),
        }
    }
    Ok(arguments)
}

fn add_scalar(arguments: &mut MySqlArguments, scalar: &Scalar) -> crate::Result<()> {
    match scalar {
        Scalar::Null => add(arguments, None::<String>),
        Scalar::Bool(v) => add(arguments, *v),
        Scalar::Int(v) => add(arguments, *v),
        Scalar::UInt(v) => add(arguments, *v),
        Scalar::Float(v) => add(arguments, *v),
        Scalar::Text(v) => add(arguments, v.clone()),
    }
}

fn add<'q, T>(arguments: &mut MySqlArguments, value: T) -> crate::Result<()>
where
    T: sqlx::Encode<'q, sqlx::MySql> + sqlx::Type<sqlx::MySql> + 'q,
{
    arguments.add(value).map_err(sqlx::Error::Encode)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn test_build_query_single_param() {
        let result = build_query("SELECT * FROM users WHERE id = :id").unwrap();
        assert_eq!(result.sql, "SELECT * FROM users WHERE id = ?");
        assert_eq!(result.order, vec!["id"]);
    }

    #[test]
    fn test_build_query_multiple_params() {
        let result = build_query("SELECT * FROM users WHERE id = :id AND name = :name").unwrap();
        assert_eq!(result.sql, "SELECT * FROM users WHERE id = ? AND name = ?");
        assert_eq!(result.order, vec!["id", "name"]);
    }

    #[test]
    fn test_build_query_repeated_params() {
        let result = build_query("SELECT * FROM users WHERE id = :id OR user_id = :id").unwrap();
        assert_eq!(result.sql, "SELECT * FROM users WHERE id = ? OR user_id = ?");
        assert_eq!(result.order, vec!["id", "id"]);
    }

    #[test]
    fn test_build_query_no_params() {
        let result = build_query("SELECT * FROM users").unwrap();
        assert_eq!(result.sql, "SELECT * FROM users");
        assert!(result.order.is_empty());
    }

    #[test]
    fn test_build_query_with_underscores() {
        let result = build_query("UPDATE `users` SET `name`=:_aggiorna_name WHERE `user_id`=:user_id").unwrap();
        assert_eq!(result.sql, "UPDATE `users` SET `name`=? WHERE `user_id`=?");
        assert_eq!(result.order, vec!["_aggiorna_name", "user_id"]);
    }

    #[test]
    fn test_build_query_skips_quoted_text() {
        let result = build_query(
            r#"SELECT '10:30', "a:b", `odd:col`, 'it''s :x', 'esc\':y' FROM t WHERE id = :id"#,
        )
        .unwrap();
        assert_eq!(
            result.sql,
            r#"SELECT '10:30', "a:b", `odd:col`, 'it''s :x', 'esc\':y' FROM t WHERE id = ?"#
        );
        assert_eq!(result.order, vec!["id"]);
    }

    #[test]
    fn test_build_query_skips_comments() {
        let result = build_query(
            "SELECT a -- owner :who\n, b # legacy :old\nFROM t /* :draft\n */ WHERE id = :id AND n = 5--1",
        )
        .unwrap();
        assert_eq!(
            result.sql,
            "SELECT a -- owner :who\n, b # legacy :old\nFROM t /* :draft\n */ WHERE id = ? AND n = 5--1"
        );
        assert_eq!(result.order, vec!["id"]);
    }

    #[test]
    fn test_build_query_lone_colon() {
        let result = build_query("SELECT @a := 1, :n").unwrap();
        assert_eq!(result.sql, "SELECT @a := 1, ?");
        assert_eq!(result.order, vec!["n"]);
    }

    #[test]
    fn test_bind_arguments_counts_repeated_names() {
        let params = params! { "id" => 1, "name" => "x", "unused" => 3 };
        let order = vec!["id".to_owned(), "name".to_owned(), "id".to_owned()];
        let arguments = bind_arguments(&order, &params).unwrap();
        assert_eq!(arguments.len(), 3);
    }

    #[test]
    fn test_bind_arguments_unbound_placeholder() {
        let params = params! { "id" => 1 };
        let order = vec!["id".to_owned(), "missing".to_owned()];
        let result = bind_arguments(&order, &params);
        assert!(matches!(result, Err(Error::UnboundPlaceholder(name)) if name == "missing"));
    }

    #[test]
    fn test_bind_arguments_rejects_unexpanded_list() {
        let params = params! { "ids" => vec![1, 2] };
        let result = bind_arguments(&["ids".to_owned()], &params);
        assert!(matches!(result, Err(Error::UnsupportedQueryShape(_))));
    }
}
