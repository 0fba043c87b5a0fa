use std::sync::LazyLock;

use regex::Regex;

const LIGHT_PARCEL_MAX_KG: f64 = 1.0;
const MEDIUM_PARCEL_MAX_KG: f64 = 2.0;

const LIGHT_PARCEL_PRICE: u32 = 50;
const MEDIUM_PARCEL_PRICE: u32 = 100;
const HEAVY_PARCEL_PRICE: u32 = 150;

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?")
        .expect("valid leading number pattern")
});

/// Price in Taka for a parcel weight in kg. Tier upper bounds are inclusive.
pub fn price_for_weight(weight_kg: f64) -> u32 {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return 0;
    }

    if weight_kg <= LIGHT_PARCEL_MAX_KG {
        LIGHT_PARCEL_PRICE
    } else if weight_kg <= MEDIUM_PARCEL_MAX_KG {
        MEDIUM_PARCEL_PRICE
    } else {
        HEAVY_PARCEL_PRICE
    }
}

/// Price for the raw text of the weight field; unparsable input prices at 0.
pub fn price_for_input(raw_weight: &str) -> u32 {
    parse_weight(raw_weight).map(price_for_weight).unwrap_or(0)
}

/// Reads the number at the start of the weight text, ignoring whatever
/// follows it, so "1.5kg" reads as 1.5.
pub fn parse_weight(raw_weight: &str) -> Option<f64> {
    let number = LEADING_NUMBER.find(raw_weight)?;
    number
        .as_str()
        .trim_start()
        .parse::<f64>()
        .ok()
        .filter(|weight| weight.is_finite())
}
