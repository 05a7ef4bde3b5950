//! Conversion exclusion policy.

use std::collections::BTreeSet;

use super::currency::CurrencyCode;

/// Currencies that may not take part in a conversion, on either side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionPolicy {
    denied: BTreeSet<CurrencyCode>,
}

impl ExclusionPolicy {
    pub const DEFAULT_DENIED: [&'static str; 4] = ["TRY", "PLN", "THB", "MXN"];

    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            denied: codes.into_iter().map(CurrencyCode::new).collect(),
        }
    }

    /// A policy that allows every pair.
    pub fn allow_all() -> Self {
        Self {
            denied: BTreeSet::new(),
        }
    }

    pub fn is_denied(&self, code: &CurrencyCode) -> bool {
        self.denied.contains(code)
    }

    /// True when the conversion `from -> to` is permitted.
    pub fn permits(&self, from: &CurrencyCode, to: &CurrencyCode) -> bool {
        !self.is_denied(from) && !self.is_denied(to)
    }

    pub fn denied(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.denied.iter()
    }
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DENIED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_denies_listed_currencies() {
        let policy = ExclusionPolicy::default();
        for code in ["TRY", "PLN", "THB", "MXN"] {
            assert!(policy.is_denied(&CurrencyCode::new(code)));
        }
        assert!(!policy.is_denied(&CurrencyCode::new("USD")));
    }

    #[test]
    fn test_either_side_blocks_pair() {
        let policy = ExclusionPolicy::default();
        let usd = CurrencyCode::new("usd");
        let lira = CurrencyCode::new("try");
        assert!(!policy.permits(&lira, &usd));
        assert!(!policy.permits(&usd, &lira));
        assert!(policy.permits(&usd, &CurrencyCode::eur()));
    }

    #[test]
    fn test_custom_list_is_case_insensitive() {
        let policy = ExclusionPolicy::new(["chf"]);
        assert!(policy.is_denied(&CurrencyCode::new("CHF")));
        assert!(ExclusionPolicy::allow_all().permits(&CurrencyCode::new("TRY"), &CurrencyCode::eur()));
    }

    #[test]
    fn test_denied_lists_normalized_codes() {
        let policy = ExclusionPolicy::new([" sek", "chf", "SEK"]);
        let codes: Vec<&str> = policy.denied().map(CurrencyCode::as_str).collect();
        assert_eq!(codes, vec!["CHF", "SEK"]);
    }
}
