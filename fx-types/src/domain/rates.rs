//! Rate payloads returned by the upstream provider.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

use super::currency::CurrencyCode;

/// Quotes for a single date, keyed by quote currency.
pub type RateTable = BTreeMap<CurrencyCode, Decimal>;

fn one() -> Decimal {
    Decimal::ONE
}

/// Latest rates or a conversion result for a single date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateSnapshot {
    /// Amount of the base currency the rates are quoted for
    #[serde(default = "one")]
    #[schema(value_type = f64, example = 1.0)]
    pub amount: Decimal,
    pub base: CurrencyCode,
    /// Publication date of the quotes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "2024-01-05")]
    pub date: Option<NaiveDate>,
    #[schema(value_type = Object)]
    pub rates: RateTable,
}

/// Date-keyed quotes in the order the provider returned them.
///
/// Serialized as a JSON object; unlike a sorted map, the entry order of the
/// wire payload is kept as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateSeries(Vec<(NaiveDate, RateTable)>);

impl DateSeries {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&RateTable> {
        self.0.iter().find(|(d, _)| *d == date).map(|(_, t)| t)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().map(|(d, _)| *d)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (NaiveDate, RateTable)> {
        self.0.iter()
    }

    /// Copies out at most `take` entries starting at `skip`.
    pub fn window(&self, skip: usize, take: usize) -> Self {
        Self(self.0.iter().skip(skip).take(take).cloned().collect())
    }
}

impl FromIterator<(NaiveDate, RateTable)> for DateSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, RateTable)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for DateSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (date, table) in &self.0 {
            map.serialize_entry(date, table)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DateSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SeriesVisitor;

        impl<'de> Visitor<'de> for SeriesVisitor {
            type Value = DateSeries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of ISO dates to rate tables")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((date, table)) = access.next_entry::<NaiveDate, RateTable>()? {
                    entries.push((date, table));
                }
                Ok(DateSeries(entries))
            }
        }

        deserializer.deserialize_map(SeriesVisitor)
    }
}

/// Time series of quotes between two dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoricalSeries {
    #[serde(default = "one")]
    #[schema(value_type = f64, example = 1.0)]
    pub amount: Decimal,
    pub base: CurrencyCode,
    #[schema(value_type = String, example = "2024-01-02")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, example = "2024-01-31")]
    pub end_date: NaiveDate,
    #[schema(value_type = Object)]
    pub rates: DateSeries,
}
