use serde::{Deserialize, Serialize};

/// A movie record as stored in the record store and returned to clients.
///
/// The same type is decoded from HTML form bodies, JSON bodies and BSON
/// documents, so the numeric and list fields accept the loose shapes those
/// sources produce (see [`lenient`]). Unknown fields such as the store's
/// `_id` are ignored on read.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    // ---
    #[serde(default)]
    pub title: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::int"
    )]
    pub year: Option<i32>,

    /// Running time in minutes.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::int"
    )]
    pub runtime: Option<i32>,

    #[serde(default, alias = "genres[]", deserialize_with = "lenient::list")]
    pub genres: Vec<String>,

    #[serde(default, alias = "cast[]", deserialize_with = "lenient::list")]
    pub cast: Vec<String>,
}

impl Movie {
    // ---
    pub fn new(title: impl Into<String>) -> Self {
        // ---
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_runtime(mut self, runtime: i32) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cast<I, S>(mut self, cast: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cast = cast.into_iter().map(Into::into).collect();
        self
    }
}

/// Request body carrying only a title, used by delete and find.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TitleQuery {
    // ---
    #[serde(default)]
    pub title: String,
}

/// Deserializers tolerant of the value shapes produced by forms and BSON.
pub(crate) mod lenient {
    // ---
    use serde::de::{self, Deserializer, SeqAccess, Visitor};
    use std::fmt;

    /// Integer from a number, numeric string, or nothing.
    ///
    /// Empty strings and nulls become `None`. Doubles are truncated.
    pub fn int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IntVisitor)
    }

    /// List of strings from a sequence or a single comma-separated string.
    pub fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ListVisitor)
    }

    struct IntVisitor;

    impl<'de> Visitor<'de> for IntVisitor {
        type Value = Option<i32>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer, a numeric string, or nothing")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            i32::try_from(v)
                .map(Some)
                .map_err(|_| E::custom(format!("integer {v} is out of range")))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i32::try_from(v)
                .map(Some)
                .map_err(|_| E::custom(format!("integer {v} is out of range")))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.is_finite() && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) {
                Ok(Some(v as i32))
            } else {
                Err(E::custom(format!("number {v} is out of range")))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let v = v.trim();
            if v.is_empty() {
                return Ok(None);
            }
            v.parse::<i32>()
                .map(Some)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    struct ListVisitor;

    impl<'de> Visitor<'de> for ListVisitor {
        type Value = Vec<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a list of strings or a comma-separated string")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(item) = seq.next_element::<String>()? {
                items.push(item);
            }
            Ok(items)
        }
    }
}
