use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Currency the user wants prices in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Ils,
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Ils, Currency::Usd, Currency::Eur, Currency::Gbp];

    /// ISO 4217 code, as used by the exchange-rate table
    pub fn code(self) -> &'static str {
        match self {
            Currency::Ils => "ILS",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Ils => "₪",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported currency `{0}`")]
pub struct UnknownCurrency(pub String);

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| UnknownCurrency(s.trim().to_string()))
    }
}

/// Ages of the children travelling, as the rates API expects them.
///
/// Babies (under 2) are sent as age `0`, every other child as age `10`.
/// Serialized as the comma separated list, e.g. `"0,10,10"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChildAges {
    babies: u32,
    older: u32,
}

pub const BABY_AGE: &str = "0";
pub const CHILD_AGE: &str = "10";

impl ChildAges {
    /// Returns `None` when there are more babies than children.
    pub fn from_counts(children: u32, babies: u32) -> Option<Self> {
        let older = children.checked_sub(babies)?;
        Some(Self { babies, older })
    }

    pub fn children(&self) -> u32 {
        self.babies + self.older
    }
}

impl fmt::Display for ChildAges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ages = std::iter::repeat(BABY_AGE)
            .take(self.babies as usize)
            .chain(std::iter::repeat(CHILD_AGE).take(self.older as usize))
            .collect::<Vec<_>>();
        f.write_str(&ages.join(","))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid list of children ages `{0}`")]
pub struct InvalidChildAges(pub String);

impl FromStr for ChildAges {
    type Err = InvalidChildAges;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ages = Self::default();
        for age in s.split(',').map(str::trim).filter(|a| !a.is_empty()) {
            match age.parse::<u32>() {
                Ok(0 | 1) => ages.babies += 1,
                Ok(_) => ages.older += 1,
                Err(_) => return Err(InvalidChildAges(s.to_string())),
            }
        }
        Ok(ages)
    }
}

impl TryFrom<String> for ChildAges {
    type Error = InvalidChildAges;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChildAges> for String {
    fn from(value: ChildAges) -> Self {
        value.to_string()
    }
}

/// What the user is looking for. Immutable for the duration of one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub city: String,
    /// Case-insensitive substring of the hotel name, empty matches everything
    pub wanted_hotel: String,
    pub currency: Currency,
    pub adults: u32,
    pub children: ChildAges,
    #[serde(rename = "chk_in")]
    pub check_in: NaiveDate,
    #[serde(rename = "chk_out")]
    pub check_out: NaiveDate,
}

impl SearchCriteria {
    pub fn matches_hotel(&self, hotel_name: &str) -> bool {
        hotel_name
            .to_lowercase()
            .contains(&self.wanted_hotel.to_lowercase())
    }
}

/// Upper bound on the total stay price, `0` disables the filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetPrice(pub u64);

impl TargetPrice {
    pub const UNLIMITED: TargetPrice = TargetPrice(0);

    pub fn admits(self, total: u64) -> bool {
        self.0 == 0 || total <= self.0
    }
}

impl fmt::Display for TargetPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A lodging returned by the hotel search endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelCandidate {
    pub name: String,
    pub key: String,
    pub url: String,
}

/// One provider's nightly rate, in USD
#[derive(Debug, Clone, PartialEq)]
pub struct RateOffer {
    pub provider: String,
    pub rate: f64,
    pub tax: f64,
}

/// Rates for a single hotel together with the stay dates the provider confirmed
#[derive(Debug, Clone, PartialEq)]
pub struct RateQuote {
    pub offers: Vec<RateOffer>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// A provider offer that passed the target price filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub provider: String,
    /// Whole stay, in the requested currency
    pub total: u64,
}

/// All qualifying deals of one hotel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelDeals {
    pub hotel: String,
    pub link: String,
    pub deals: Vec<Deal>,
}

/// Search criteria plus contact details of a pending notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPreference {
    #[serde(flatten)]
    pub criteria: SearchCriteria,
    pub name: String,
    pub email: String,
    pub target_price: TargetPrice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ils", Currency::Ils ; "lower case")]
    #[test_case(" EUR ", Currency::Eur ; "padded")]
    #[test_case("Gbp", Currency::Gbp ; "mixed case")]
    fn parses_currency_codes(input: &str, expected: Currency) {
        assert_eq!(input.parse::<Currency>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_currency() {
        assert_eq!(
            "JPY".parse::<Currency>(),
            Err(UnknownCurrency("JPY".to_string()))
        );
    }

    #[test]
    fn child_ages_list_babies_first() {
        let ages = ChildAges::from_counts(4, 1).unwrap();
        assert_eq!(ages.to_string(), "0,10,10,10");
        assert_eq!(ChildAges::default().to_string(), "");
    }

    #[test]
    fn child_ages_reject_more_babies_than_children() {
        assert_eq!(ChildAges::from_counts(3, 5), None);
    }

    #[test]
    fn child_ages_parse_back() {
        let ages: ChildAges = "0,0,10".parse().unwrap();
        assert_eq!(ages, ChildAges::from_counts(3, 2).unwrap());
        assert_eq!(ages.children(), 3);
        assert!("0,ten".parse::<ChildAges>().is_err());
    }

    #[test]
    fn target_price_zero_admits_everything() {
        assert!(TargetPrice::UNLIMITED.admits(u64::MAX));
        assert!(TargetPrice(81).admits(81));
        assert!(!TargetPrice(80).admits(81));
    }

    #[test]
    fn hotel_filter_is_case_insensitive_substring() {
        let criteria = SearchCriteria {
            city: "Paris".to_string(),
            wanted_hotel: "ritz".to_string(),
            currency: Currency::Eur,
            adults: 2,
            children: ChildAges::default(),
            check_in: NaiveDate::from_ymd_opt(2027, 3, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2027, 3, 4).unwrap(),
        };
        assert!(criteria.matches_hotel("The RITZ Paris"));
        assert!(!criteria.matches_hotel("Le Meurice"));

        let any = SearchCriteria {
            wanted_hotel: String::new(),
            ..criteria
        };
        assert!(any.matches_hotel("Le Meurice"));
    }
}
