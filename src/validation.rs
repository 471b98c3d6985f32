//! Turns what the user typed into [`SearchCriteria`] and notification
//! contacts. Nothing here touches the network.

use crate::models::{ChildAges, Currency, SavedPreference, SearchCriteria, TargetPrice};
use chrono::{Days, NaiveDate};
use lettre::Address;
use thiserror::Error;

/// Furthest check-in or check-out date accepted, counted from today
const BOOKING_WINDOW_DAYS: u64 = 365;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid city name (letters only).")]
    City,

    #[error("Please enter a valid hotel name (letters and numbers).")]
    HotelName,

    #[error("Please choose one of the supported currencies: ILS, USD, EUR, GBP.")]
    Currency,

    #[error("Please enter a valid number of adults (1 or more).")]
    Adults,

    #[error("Please enter valid numbers for children and babies.")]
    ChildCount,

    #[error("Number of children and babies cannot be negative.")]
    NegativeChildCount,

    #[error("Number of babies cannot exceed the total number of children.")]
    TooManyBabies,

    #[error("Please enter the {0} date as YYYY-MM-DD.")]
    Date(&'static str),

    #[error("Check-in date cannot be in the past.")]
    CheckInPast,

    #[error("Dates must be within a year from today.")]
    OutsideBookingWindow,

    #[error("Check-out date must be after check-in date.")]
    CheckOutBeforeCheckIn,

    #[error("Please enter a valid name (letters only).")]
    Name,

    #[error("Please enter a valid e-mail address.")]
    Email,

    #[error("Please enter a valid target price (non-negative number).")]
    TargetPrice,
}

/// Raw search form fields
#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    pub city: String,
    pub wanted_hotel: String,
    pub currency: String,
    pub adults: String,
    pub children: String,
    pub babies: String,
    pub check_in: String,
    pub check_out: String,
}

impl SearchForm {
    pub fn validate(&self, today: NaiveDate) -> Result<SearchCriteria, ValidationError> {
        let children = children_ages(&self.children, &self.babies)?;

        let city = self.city.trim();
        if !is_city_name(city) {
            return Err(ValidationError::City);
        }

        let wanted_hotel = self.wanted_hotel.trim();
        if !wanted_hotel
            .chars()
            .all(|c| c.is_alphanumeric() || c == ' ')
        {
            return Err(ValidationError::HotelName);
        }

        let currency: Currency = self
            .currency
            .parse()
            .map_err(|_| ValidationError::Currency)?;

        let check_in = parse_date(&self.check_in, "check-in")?;
        let check_out = parse_date(&self.check_out, "check-out")?;
        if check_in < today {
            return Err(ValidationError::CheckInPast);
        }
        let last_day = today
            .checked_add_days(Days::new(BOOKING_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX);
        if check_in > last_day || check_out > last_day {
            return Err(ValidationError::OutsideBookingWindow);
        }
        if check_out <= check_in {
            return Err(ValidationError::CheckOutBeforeCheckIn);
        }

        let adults = parse_digits(&self.adults)
            .filter(|&n| n >= 1)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(ValidationError::Adults)?;

        Ok(SearchCriteria {
            city: city.to_string(),
            wanted_hotel: wanted_hotel.to_string(),
            currency,
            adults,
            children,
            check_in,
            check_out,
        })
    }
}

/// Raw notification form fields
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub target_price: String,
}

impl ContactForm {
    /// Validates the contact and attaches it to the search it was asked for.
    pub fn into_preference(
        self,
        criteria: SearchCriteria,
    ) -> Result<SavedPreference, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() || !name.chars().all(char::is_alphabetic) {
            return Err(ValidationError::Name);
        }

        let email = self.email.trim();
        email
            .parse::<Address>()
            .map_err(|_| ValidationError::Email)?;

        let target_price = parse_digits(&self.target_price)
            .map(TargetPrice)
            .ok_or(ValidationError::TargetPrice)?;

        Ok(SavedPreference {
            criteria,
            name: name.to_string(),
            email: email.to_string(),
            target_price,
        })
    }
}

/// Ages list for `children` children, `babies` of whom are under 2.
pub fn children_ages(children: &str, babies: &str) -> Result<ChildAges, ValidationError> {
    let children: i64 = children
        .trim()
        .parse()
        .map_err(|_| ValidationError::ChildCount)?;
    let babies: i64 = babies
        .trim()
        .parse()
        .map_err(|_| ValidationError::ChildCount)?;

    if children < 0 || babies < 0 {
        return Err(ValidationError::NegativeChildCount);
    }
    if babies > children {
        return Err(ValidationError::TooManyBabies);
    }

    let children = u32::try_from(children).map_err(|_| ValidationError::ChildCount)?;
    let babies = u32::try_from(babies).map_err(|_| ValidationError::ChildCount)?;
    ChildAges::from_counts(children, babies).ok_or(ValidationError::TooManyBabies)
}

/// Letters, words separated by single spaces
fn is_city_name(city: &str) -> bool {
    !city.is_empty()
        && city
            .split(' ')
            .all(|word| !word.is_empty() && word.chars().all(char::is_alphabetic))
}

/// Plain decimal digits only, no sign
fn parse_digits(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn parse_date(raw: &str, field: &'static str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ValidationError::Date(field))
}
