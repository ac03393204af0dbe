//! Keying and grouping of fetched rows.
//!
//! ```
//! use sqlx_table_bind::shape::group_by;
//!
//! let groups = group_by(vec![("a", 1), ("b", 2), ("a", 3)], |row| row.0);
//! assert_eq!(groups["a"], vec![("a", 1), ("a", 3)]);
//! ```

use std::collections::BTreeMap;

/// Maps each key to the last row that produced it.
pub fn index_by<T, K, F>(rows: impl IntoIterator<Item = T>, mut key: F) -> BTreeMap<K, T>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    rows.into_iter().map(|row| (key(&row), row)).collect()
}

/// Maps each key to the rows that produced it, in their original order.
pub fn group_by<T, K, F>(rows: impl IntoIterator<Item = T>, mut key: F) -> BTreeMap<K, Vec<T>>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(&row)).or_default().push(row);
    }
    groups
}

/// [`index_by`] with a fallible key, such as `|row: &MySqlRow| row.try_get("id")`.
///
/// # Errors
///
/// Returns the first error produced by `key`.
pub fn try_index_by<T, K, E, F>(rows: impl IntoIterator<Item = T>, mut key: F) -> crate::Result<BTreeMap<K, T>>
where
    K: Ord,
    E: Into<crate::Error>,
    F: FnMut(&T) -> Result<K, E>,
{
    rows.into_iter()
        .map(|row| Ok::<_, crate::Error>((key(&row).map_err(Into::<crate::Error>::into)?, row)))
        .collect()
}

/// [`group_by`] with a fallible key.
///
/// # Errors
///
/// Returns the first error produced by `key`.
pub fn try_group_by<T, K, E, F>(rows: impl IntoIterator<Item = T>, mut key: F) -> crate::Result<BTreeMap<K, Vec<T>>>
where
    K: Ord,
    E: Into<crate::Error>,
    F: FnMut(&T) -> Result<K, E>,
{
    let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(&row).map_err(Into::<crate::Error>::into)?).or_default().push(row);
    }
    Ok(groups)
}
