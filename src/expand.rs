use std::collections::HashSet;

use chrono::NaiveDateTime;
use regex::{Captures, Regex};

use crate::builder::SKIPPED_SPANS;
use crate::value::{ParameterSet, ParameterValue, Scalar};

/// Infix between a list parameter's name and the element index (`ids` → `ids_elemento_0`).
pub const ELEMENT_SUFFIX: &str = "_elemento_";

/// Wire format for temporal parameters.
pub const TEMPORAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A query rewritten so that every parameter is a single scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedQuery {
    pub sql: String,
    pub params: ParameterSet,
}

/// Formats a temporal parameter as `YYYY-MM-DD HH:MM:SS`.
pub fn format_temporal(at: &NaiveDateTime) -> String {
    at.format(TEMPORAL_FORMAT).to_string()
}

/// Flattens list parameters into one placeholder per element.
///
/// Temporal values become `YYYY-MM-DD HH:MM:SS` text. For each list parameter
/// `name`, the first occurrence of `IN (:name)` or `= :name` in the query
/// (case-insensitive, whitespace-tolerant) is rewritten to
/// `IN (:name_elemento_0, :name_elemento_1, ...)`, and the list entry is replaced
/// by one entry per element. Later occurrences of the same list placeholder are
/// left untouched. An empty list produces `IN ()`, which matches no row.
/// Quoted text and comments are never rewritten.
///
/// With no parameters the query is returned as is.
///
/// # Errors
///
/// Returns [`Error::UnsupportedQueryShape`](crate::Error::UnsupportedQueryShape)
/// if a list placeholder appears in neither rewritable form, and
/// [`Error::ParameterConflict`](crate::Error::ParameterConflict) if a generated
/// element name is already a parameter.
///
/// # Examples
///
/// ```
/// use sqlx_table_bind::{expand::expand, params};
///
/// let expanded = expand("SELECT * FROM users WHERE id IN (:ids)", params! { "ids" => vec![4, 8] })?;
/// assert_eq!(
///     expanded.sql,
///     "SELECT * FROM users WHERE id IN (:ids_elemento_0, :ids_elemento_1)"
/// );
/// assert_eq!(expanded.params.keys().collect::<Vec<_>>(), vec!["ids_elemento_0", "ids_elemento_1"]);
/// # Ok::<(), sqlx_table_bind::Error>(())
/// ```
pub fn expand(query: &str, params: ParameterSet) -> crate::Result<ExpandedQuery> {
    if params.is_empty() {
        return Ok(ExpandedQuery {
            sql: query.to_owned(),
            params,
        });
    }

    let supplied: HashSet<String> = params.keys().map(str::to_owned).collect();
    let mut sql = query.to_owned();
    let mut kept = ParameterSet::with_capacity(params.len());
    let mut elements = ParameterSet::new();

    for (name, value) in params {
        match value {
            ParameterValue::Scalar(scalar) => {
                kept.insert(name, scalar);
            }
            ParameterValue::Temporal(at) => {
                kept.insert(name, Scalar::Text(format_temporal(&at)));
            }
            ParameterValue::Sequence(items) => {
                let names: Vec<String> = (0..items.len())
                    .map(|i| format!("{name}{ELEMENT_SUFFIX}{i}"))
                    .collect();
                if let Some(taken) = names.iter().find(|n| supplied.contains(n.as_str())) {
                    return Err(crate::Error::ParameterConflict(taken.clone()));
                }
                sql = rewrite_list_placeholder(&sql, &name, &names)?;
                elements.extend(names.into_iter().zip(items));
            }
        }
    }

    kept.extend(elements);
    Ok(ExpandedQuery { sql, params: kept })
}

fn rewrite_list_placeholder(sql: &str, name: &str, elements: &[String]) -> crate::Result<String> {
    let escaped = regex::escape(name);
    // `op` set means `<=`, `>=`, `!=` or `==`, which are not list targets.
    let regex = Regex::new(&format!(
        r"{SKIPPED_SPANS}|(?P<target>(?i:\s+IN\s*\(\s*:{escaped}\s*\)|(?P<op>[<>!=]?)\s*=\s*:{escaped}\b))"
    ))?;

    let list = elements
        .iter()
        .map(|e| format!(":{e}"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut rewritten = false;
    let sql = regex
        .replace_all(sql, |caps: &Captures<'_>| {
            let eligible = caps.name("target").is_some()
                && caps.name("op").map_or(true, |op| op.as_str().is_empty());
            if eligible && !rewritten {
                rewritten = true;
                format!(" IN ({list})")
            } else {
                caps[0].to_owned()
            }
        })
        .into_owned();

    if !rewritten {
        return Err(crate::Error::UnsupportedQueryShape(name.to_owned()));
    }
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .unwrap()
    }

    #[test]
    fn test_expand_empty_params_is_identity() {
        let query = "SELECT * FROM users WHERE id IN (:ids)";
        let expanded = expand(query, ParameterSet::new()).unwrap();
        assert_eq!(expanded.sql, query);
        assert!(expanded.params.is_empty());
    }

    #[test]
    fn test_expand_in_clause() {
        let expanded = expand(
            "SELECT * FROM users WHERE id IN ( :ids ) AND active = :active",
            params! { "ids" => vec![3, 1, 2], "active" => true },
        )
        .unwrap();

        assert_eq!(
            expanded.sql,
            "SELECT * FROM users WHERE id IN (:ids_elemento_0, :ids_elemento_1, :ids_elemento_2) AND active = :active"
        );
        assert_eq!(
            expanded.params,
            params! {
                "active" => true,
                "ids_elemento_0" => 3,
                "ids_elemento_1" => 1,
                "ids_elemento_2" => 2,
            }
        );
        assert!(!expanded.sql.contains(":ids "));
        assert!(!expanded.sql.contains(":ids)"));
    }

    #[test]
    fn test_expand_equals_form() {
        let expanded = expand(
            "DELETE FROM `users` WHERE `status`=:status",
            params! { "status" => vec!["banned", "spam"] },
        )
        .unwrap();

        assert_eq!(
            expanded.sql,
            "DELETE FROM `users` WHERE `status` IN (:status_elemento_0, :status_elemento_1)"
        );
    }

    #[test]
    fn test_expand_is_case_insensitive() {
        let expanded = expand(
            "select * from t where x in(:xs)",
            params! { "xs" => vec![1] },
        )
        .unwrap();
        assert_eq!(expanded.sql, "select * from t where x IN (:xs_elemento_0)");
    }

    #[test]
    fn test_expand_empty_sequence_yields_empty_in_list() {
        let expanded = expand(
            "SELECT * FROM users WHERE id IN (:ids)",
            params! { "ids" => Vec::<i64>::new() },
        )
        .unwrap();

        assert_eq!(expanded.sql, "SELECT * FROM users WHERE id IN ()");
        assert!(expanded.params.is_empty());
    }

    #[test]
    fn test_expand_rewrites_first_occurrence_only() {
        let expanded = expand(
            "SELECT * FROM t WHERE a IN (:ids) OR b IN (:ids)",
            params! { "ids" => vec![7] },
        )
        .unwrap();
        assert_eq!(expanded.sql, "SELECT * FROM t WHERE a IN (:ids_elemento_0) OR b IN (:ids)");
    }

    #[test]
    fn test_expand_does_not_match_longer_placeholder_names() {
        let expanded = expand(
            "SELECT * FROM t WHERE a = :id_list AND b = :id",
            params! { "id_list" => 1, "id" => vec![2, 3] },
        )
        .unwrap();
        assert_eq!(
            expanded.sql,
            "SELECT * FROM t WHERE a = :id_list AND b IN (:id_elemento_0, :id_elemento_1)"
        );
    }

    #[test]
    fn test_expand_ignores_comparison_operators() {
        let result = expand(
            "SELECT * FROM t WHERE a != :ids AND b <= :ids",
            params! { "ids" => vec![1] },
        );
        assert!(matches!(result, Err(crate::Error::UnsupportedQueryShape(name)) if name == "ids"));
    }

    #[test]
    fn test_expand_unsupported_shape() {
        let result = expand(
            "SELECT * FROM t WHERE a > :ids",
            params! { "ids" => vec![1, 2] },
        );
        assert!(matches!(result, Err(crate::Error::UnsupportedQueryShape(_))));
    }

    #[test]
    fn test_expand_skips_quoted_text_and_comments() {
        let expanded = expand(
            "SELECT * FROM t WHERE note <> 'x = :ids' /* id IN (:ids) */ AND id IN (:ids)",
            params! { "ids" => vec![1, 2] },
        )
        .unwrap();
        assert_eq!(
            expanded.sql,
            "SELECT * FROM t WHERE note <> 'x = :ids' /* id IN (:ids) */ AND id IN (:ids_elemento_0, :ids_elemento_1)"
        );

        let query = crate::PreparedQuery::new(
            "SELECT * FROM t WHERE note <> 'x = :ids' AND id IN (:ids)",
            params! { "ids" => vec![1, 2] },
        )
        .unwrap();
        assert_eq!(query.sql(), "SELECT * FROM t WHERE note <> 'x = :ids' AND id IN (?, ?)");
    }

    #[test]
    fn test_expand_only_quoted_placeholder_is_unsupported() {
        let result = expand("SELECT * FROM t WHERE note = ':ids'", params! { "ids" => vec![1] });
        assert!(matches!(result, Err(crate::Error::UnsupportedQueryShape(name)) if name == "ids"));
    }

    #[test]
    fn test_expand_rejects_generated_name_collision() {
        let result = expand(
            "SELECT * FROM t WHERE a = :ids_elemento_0 AND id IN (:ids)",
            params! { "ids_elemento_0" => 99, "ids" => vec![1] },
        );
        assert!(matches!(result, Err(crate::Error::ParameterConflict(name)) if name == "ids_elemento_0"));
    }

    #[test]
    fn test_expand_formats_temporal_values() {
        let expanded = expand(
            "SELECT * FROM t WHERE created_at > :since",
            params! { "since" => at(2024, 1, 2, 3, 4, 5) },
        )
        .unwrap();

        assert_eq!(expanded.sql, "SELECT * FROM t WHERE created_at > :since");
        assert_eq!(expanded.params, params! { "since" => "2024-01-02 03:04:05" });
    }

    #[test]
    fn test_format_temporal_is_zero_padded_24h() {
        assert_eq!(format_temporal(&at(2024, 1, 2, 3, 4, 5)), "2024-01-02 03:04:05");
        assert_eq!(format_temporal(&at(1999, 12, 31, 23, 59, 59)), "1999-12-31 23:59:59");
    }

    #[test]
    fn test_expand_leaves_scalars_alone() {
        let params = params! { "id" => 5, "name" => "Bob", "gone" => None::<String> };
        let expanded = expand("SELECT :id, :name, :gone", params.clone()).unwrap();
        assert_eq!(expanded.sql, "SELECT :id, :name, :gone");
        assert_eq!(expanded.params, params);
    }
}
