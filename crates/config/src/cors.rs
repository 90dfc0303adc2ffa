use std::{fmt, marker::PhantomData, str::FromStr, time::Duration};

use duration_str::deserialize_option_duration;
use http::{HeaderName, HeaderValue, Method};
use serde::{
    Deserialize, Deserializer,
    de::{self, SeqAccess, Visitor},
};

/// Cross-origin settings for the HTTP endpoints.
///
/// Leaving the whole `[server.cors]` table out gives a fully permissive policy,
/// which is what the browser form expects when served from another origin.
#[derive(Clone, Default, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Whether credentials are allowed in cross-origin requests.
    pub allow_credentials: bool,
    /// Origins allowed to call the service.
    pub allow_origins: Option<AnyOrList<HeaderValue>>,
    /// Methods allowed in cross-origin requests.
    pub allow_methods: Option<AnyOrList<Method>>,
    /// Request headers allowed in cross-origin requests.
    pub allow_headers: Option<AnyOrList<HeaderName>>,
    /// How long a preflight answer may be cached by the browser.
    #[serde(deserialize_with = "deserialize_option_duration")]
    pub max_age: Option<Duration>,
}

/// Either the wildcard `"*"` or an explicit list of values.
///
/// A single non-wildcard string is accepted as a one-element list.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyOrList<T> {
    /// Everything is allowed.
    Any,
    /// Only the listed values are allowed.
    Explicit(Vec<T>),
}

impl<'de, T> Deserialize<'de> for AnyOrList<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AnyOrListVisitor(PhantomData))
    }
}

struct AnyOrListVisitor<T>(PhantomData<T>);

impl<T> AnyOrListVisitor<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn parse<E: de::Error>(value: &str) -> Result<T, E> {
        value
            .parse::<T>()
            .map_err(|err| E::custom(format!("invalid value '{value}': {err}")))
    }
}

impl<'de, T> Visitor<'de> for AnyOrListVisitor<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Value = AnyOrList<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("the string \"*\" or an array of strings")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        if value == "*" {
            return Ok(AnyOrList::Any);
        }

        Self::parse(value).map(|value| AnyOrList::Explicit(vec![value]))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or_default());

        while let Some(value) = seq.next_element::<String>()? {
            values.push(Self::parse(&value)?);
        }

        Ok(AnyOrList::Explicit(values))
    }
}
