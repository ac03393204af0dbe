use chrono::{DateTime, NaiveDateTime, TimeZone};

/// A single bindable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

/// A value bound to a named placeholder.
///
/// `Sequence` values are flattened into one placeholder per element by
/// [`expand`](crate::expand::expand); `Temporal` values are sent to the server as
/// `YYYY-MM-DD HH:MM:SS` strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Scalar(Scalar),
    Sequence(Vec<Scalar>),
    Temporal(NaiveDateTime),
}

macro_rules! impl_scalar_from {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(<$target>::from(value))
                }
            }

            impl From<$ty> for ParameterValue {
                fn from(value: $ty) -> Self {
                    ParameterValue::Scalar(Scalar::from(value))
                }
            }
        )*
    };
}

impl_scalar_from! {
    bool => Bool as bool,
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    u8 => UInt as u64,
    u16 => UInt as u64,
    u32 => UInt as u64,
    u64 => UInt as u64,
    f32 => Float as f64,
    f64 => Float as f64,
    String => Text as String,
    &str => Text as String,
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}

impl From<Scalar> for ParameterValue {
    fn from(value: Scalar) -> Self {
        ParameterValue::Scalar(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for ParameterValue {
    fn from(value: Option<T>) -> Self {
        ParameterValue::Scalar(value.into())
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for ParameterValue {
    fn from(values: Vec<T>) -> Self {
        ParameterValue::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Scalar> + Clone> From<&[T]> for ParameterValue {
    fn from(values: &[T]) -> Self {
        ParameterValue::Sequence(values.iter().cloned().map(Into::into).collect())
    }
}

impl From<NaiveDateTime> for ParameterValue {
    fn from(value: NaiveDateTime) -> Self {
        ParameterValue::Temporal(value)
    }
}

/// Zoned timestamps are bound using their local wall-clock time.
impl<Tz: TimeZone> From<DateTime<Tz>> for ParameterValue {
    fn from(value: DateTime<Tz>) -> Self {
        ParameterValue::Temporal(value.naive_local())
    }
}

/// Named parameters in insertion order.
///
/// Names are unique: inserting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    entries: Vec<(String, ParameterValue)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts or replaces `name`, returning the previous value if any.
    pub fn insert<K, V>(&mut self, name: K, value: V) -> Option<ParameterValue>
    where
        K: Into<String>,
        V: Into<ParameterValue>,
    {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == name).then_some(v))
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<ParameterValue> {
        let index = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<ParameterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        set.extend(iter);
        set
    }
}

impl<K, V> Extend<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<ParameterValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, ParameterValue);
    type IntoIter = std::vec::IntoIter<(String, ParameterValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Builds a [`ParameterSet`] from `name => value` pairs.
///
/// ```
/// use sqlx_table_bind::{params, ParameterValue};
///
/// let params = params! { "id" => 5, "tags" => vec!["a", "b"] };
/// assert_eq!(params.len(), 2);
/// assert!(matches!(params.get("tags"), Some(ParameterValue::Sequence(_))));
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::ParameterSet::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut set = $crate::ParameterSet::new();
        $( set.insert($name, $value); )+
        set
    }};
}
