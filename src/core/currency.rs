//! Static country and currency reference data

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;

const COUNTRIES_JSON: &str = include_str!("../../data/countries.json");
const COUNTRY_CURRENCY_JSON: &str = include_str!("../../data/country_currency.json");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Country {
    pub name: String,
    #[serde(rename = "countryCode")]
    pub dial_code: String,
    pub code: String,
}

#[derive(Deserialize)]
struct CountryList {
    #[serde(rename = "CountryCodes")]
    country_codes: Vec<Country>,
}

// The data files are compiled in, a parse failure is a build defect.
static COUNTRIES: LazyLock<Vec<Country>> = LazyLock::new(|| {
    serde_json::from_str::<CountryList>(COUNTRIES_JSON)
        .expect("embedded countries.json is valid")
        .country_codes
});

static COUNTRY_CURRENCY: LazyLock<HashMap<String, String>> = LazyLock::new(|| {
    serde_json::from_str(COUNTRY_CURRENCY_JSON).expect("embedded country_currency.json is valid")
});

/// All selectable countries, in display order.
pub fn countries() -> &'static [Country] {
    &COUNTRIES
}

/// Resolves a country identifier such as `"AU"` to its currency code.
///
/// Empty and unknown identifiers resolve to `None`.
pub fn currency_for_country(country: &str) -> Option<&'static str> {
    if country.is_empty() {
        return None;
    }
    COUNTRY_CURRENCY
        .get(country)
        .map(String::as_str)
        .filter(|code| !code.is_empty())
}
