use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::engine::pricing::parse_weight;
use crate::models::booking::{BookingFormInput, FormField, ValidatedBooking};

const MIN_PHONE_LENGTH: usize = 10;
const MIN_PARCEL_WEIGHT_KG: f64 = 1.0;

const PHONE_TOO_SHORT: &str = "Phone number must be at least 10 characters long";
const PARCEL_TYPE_REQUIRED: &str = "Parcel type is required";
const RECEIVER_NAME_REQUIRED: &str = "Receiver's name is required";
const DELIVERY_ADDRESS_REQUIRED: &str = "Delivery address is required";
const LATITUDE_INVALID: &str = "Latitude must be a valid decimal number";
const LONGITUDE_INVALID: &str = "Longitude must be a valid decimal number";

static DECIMAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("valid decimal pattern"));

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: FormField,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: FormField, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Inline messages keyed by the field they belong to. At most one per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Replaces whatever was recorded for the field with the given check result.
    pub fn record(&mut self, field: FormField, result: Result<(), ValidationError>) {
        match result {
            Ok(()) => {
                self.0.remove(&field);
            }
            Err(err) => {
                self.0.insert(field, err.message.to_string());
            }
        }
    }

    fn capture<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.0.insert(err.field, err.message.to_string());
                None
            }
        }
    }
}

pub fn validate_field(input: &BookingFormInput, field: FormField) -> Result<(), ValidationError> {
    match field {
        FormField::PhoneNumber => check_phone(field, &input.phone_number),
        FormField::ReceiverPhone => check_phone(field, &input.receiver_phone),
        FormField::ParcelType => check_required(field, &input.parcel_type, PARCEL_TYPE_REQUIRED),
        FormField::ReceiverName => {
            check_required(field, &input.receiver_name, RECEIVER_NAME_REQUIRED)
        }
        FormField::DeliveryAddress => {
            check_required(field, &input.delivery_address, DELIVERY_ADDRESS_REQUIRED)
        }
        FormField::ParcelWeight => check_weight(&input.parcel_weight).map(|_| ()),
        FormField::DeliveryDate => check_date(input.delivery_date).map(|_| ()),
        FormField::DeliveryLatitude => {
            check_coordinate(field, &input.delivery_latitude, LATITUDE_INVALID).map(|_| ())
        }
        FormField::DeliveryLongitude => {
            check_coordinate(field, &input.delivery_longitude, LONGITUDE_INVALID).map(|_| ())
        }
    }
}

/// Runs every field rule. Either every field passes and the parsed booking is
/// returned, or each failing field carries its message.
pub fn validate_form(input: &BookingFormInput) -> Result<ValidatedBooking, FieldErrors> {
    let mut errors = FieldErrors::default();

    let phone_number = errors.capture(check_phone(FormField::PhoneNumber, &input.phone_number));
    let parcel_type = errors.capture(check_required(
        FormField::ParcelType,
        &input.parcel_type,
        PARCEL_TYPE_REQUIRED,
    ));
    let parcel_weight = errors.capture(check_weight(&input.parcel_weight));
    let receiver_name = errors.capture(check_required(
        FormField::ReceiverName,
        &input.receiver_name,
        RECEIVER_NAME_REQUIRED,
    ));
    let receiver_phone = errors.capture(check_phone(FormField::ReceiverPhone, &input.receiver_phone));
    let delivery_address = errors.capture(check_required(
        FormField::DeliveryAddress,
        &input.delivery_address,
        DELIVERY_ADDRESS_REQUIRED,
    ));
    let delivery_date = errors.capture(check_date(input.delivery_date));
    let delivery_lat = errors.capture(check_coordinate(
        FormField::DeliveryLatitude,
        &input.delivery_latitude,
        LATITUDE_INVALID,
    ));
    let delivery_lng = errors.capture(check_coordinate(
        FormField::DeliveryLongitude,
        &input.delivery_longitude,
        LONGITUDE_INVALID,
    ));

    let (
        Some(()),
        Some(()),
        Some(parcel_weight),
        Some(()),
        Some(()),
        Some(()),
        Some(delivery_date),
        Some(delivery_lat),
        Some(delivery_lng),
    ) = (
        phone_number,
        parcel_type,
        parcel_weight,
        receiver_name,
        receiver_phone,
        delivery_address,
        delivery_date,
        delivery_lat,
        delivery_lng,
    )
    else {
        return Err(errors);
    };

    Ok(ValidatedBooking {
        phone_number: input.phone_number.clone(),
        parcel_type: input.parcel_type.clone(),
        parcel_weight,
        receiver_name: input.receiver_name.clone(),
        receiver_phone: input.receiver_phone.clone(),
        delivery_address: input.delivery_address.clone(),
        delivery_date,
        delivery_lat,
        delivery_lng,
    })
}

fn check_phone(field: FormField, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_PHONE_LENGTH {
        return Err(ValidationError::new(field, PHONE_TOO_SHORT));
    }
    Ok(())
}

fn check_required(
    field: FormField,
    value: &str,
    message: &'static str,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(field, message));
    }
    Ok(())
}

fn check_weight(value: &str) -> Result<f64, ValidationError> {
    let field = FormField::ParcelWeight;
    let weight = parse_weight(value)
        .ok_or_else(|| ValidationError::new(field, "Parcel weight must be a number"))?;

    if weight <= 0.0 {
        return Err(ValidationError::new(field, "Parcel weight must be positive"));
    }
    if weight < MIN_PARCEL_WEIGHT_KG {
        return Err(ValidationError::new(field, "Parcel weight must be at least 1kg"));
    }
    Ok(weight)
}

fn check_date(value: Option<NaiveDate>) -> Result<NaiveDate, ValidationError> {
    value.ok_or_else(|| ValidationError::new(FormField::DeliveryDate, "Delivery date is required"))
}

fn check_coordinate(
    field: FormField,
    value: &str,
    message: &'static str,
) -> Result<f64, ValidationError> {
    if !DECIMAL_PATTERN.is_match(value) {
        return Err(ValidationError::new(field, message));
    }

    value
        .parse::<f64>()
        .ok()
        .filter(|coordinate| coordinate.is_finite())
        .ok_or_else(|| ValidationError::new(field, message))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{validate_field, validate_form};
    use crate::models::booking::{BookingFormInput, FormField};

    fn valid_input() -> BookingFormInput {
        BookingFormInput {
            phone_number: "01712345678".to_string(),
            parcel_type: "Electronics".to_string(),
            parcel_weight: "1.5".to_string(),
            receiver_name: "Nadia".to_string(),
            receiver_phone: "01898765432".to_string(),
            delivery_address: "12 Lake Road, Gulshan".to_string(),
            delivery_date: NaiveDate::from_ymd_opt(2026, 11, 2),
            delivery_latitude: "23.5".to_string(),
            delivery_longitude: "90.4".to_string(),
        }
    }

    #[test]
    fn valid_form_parses_numeric_fields() {
        let booking = validate_form(&valid_input()).unwrap();
        assert_eq!(booking.parcel_weight, 1.5);
        assert_eq!(booking.delivery_lat, 23.5);
        assert_eq!(booking.delivery_lng, 90.4);
    }

    #[test]
    fn empty_form_reports_every_field() {
        let errors = validate_form(&BookingFormInput::default()).unwrap_err();
        assert_eq!(errors.len(), FormField::ALL.len());
        assert_eq!(
            errors.get(FormField::DeliveryDate),
            Some("Delivery date is required")
        );
    }

    #[test]
    fn short_phone_numbers_fail_on_their_own_field() {
        for phone in ["", "0", "017123456", "+88017"] {
            let mut input = valid_input();
            input.receiver_phone = phone.to_string();

            let errors = validate_form(&input).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(
                errors.get(FormField::ReceiverPhone),
                Some("Phone number must be at least 10 characters long")
            );
        }
    }

    #[test]
    fn phone_length_counts_characters_not_bytes() {
        let mut input = valid_input();
        input.phone_number = "০১৭১২৩৪৫৬৭৮".to_string();
        assert!(validate_field(&input, FormField::PhoneNumber).is_ok());

        input.phone_number = "০১৭১২৩".to_string();
        assert!(validate_field(&input, FormField::PhoneNumber).is_err());
    }

    #[test]
    fn weight_reports_first_failing_rule() {
        let cases = [
            ("", "Parcel weight must be a number"),
            ("abc", "Parcel weight must be a number"),
            ("0", "Parcel weight must be positive"),
            ("-2", "Parcel weight must be positive"),
            ("0.5", "Parcel weight must be at least 1kg"),
        ];

        for (raw, expected) in cases {
            let mut input = valid_input();
            input.parcel_weight = raw.to_string();
            let err = validate_field(&input, FormField::ParcelWeight).unwrap_err();
            assert_eq!(err.message, expected, "weight {raw:?}");
        }

        let mut input = valid_input();
        input.parcel_weight = "1".to_string();
        assert!(validate_field(&input, FormField::ParcelWeight).is_ok());
    }

    #[test]
    fn coordinates_must_be_plain_signed_decimals() {
        for good in ["23", "-23", "23.5", "-0.000001", "180.0"] {
            let mut input = valid_input();
            input.delivery_latitude = good.to_string();
            assert!(
                validate_field(&input, FormField::DeliveryLatitude).is_ok(),
                "{good:?} should pass"
            );
        }

        for bad in ["", "+23.5", "23.", ".5", "1e3", "23,5", " 23.5", "north", "٢٣"] {
            let mut input = valid_input();
            input.delivery_longitude = bad.to_string();
            let err = validate_field(&input, FormField::DeliveryLongitude).unwrap_err();
            assert_eq!(err.message, "Longitude must be a valid decimal number");
        }
    }

    #[test]
    fn whitespace_only_text_is_not_empty() {
        let mut input = valid_input();
        input.parcel_type = "   ".to_string();
        input.delivery_address = " ".to_string();
        assert!(validate_field(&input, FormField::ParcelType).is_ok());
        assert!(validate_field(&input, FormField::DeliveryAddress).is_ok());

        input.receiver_name = String::new();
        let err = validate_field(&input, FormField::ReceiverName).unwrap_err();
        assert_eq!(err.message, "Receiver's name is required");
    }

    #[test]
    fn each_coordinate_reports_its_own_message() {
        let mut input = valid_input();
        input.delivery_latitude = "23,5".to_string();
        input.delivery_longitude = "east".to_string();

        let errors = validate_form(&input).unwrap_err();
        assert_eq!(
            errors.get(FormField::DeliveryLatitude),
            Some("Latitude must be a valid decimal number")
        );
        assert_eq!(
            errors.get(FormField::DeliveryLongitude),
            Some("Longitude must be a valid decimal number")
        );
    }

    #[test]
    fn weight_with_trailing_unit_is_coerced() {
        let mut input = valid_input();
        input.parcel_weight = "1.5kg".to_string();
        assert_eq!(validate_form(&input).unwrap().parcel_weight, 1.5);

        input.parcel_weight = "0.5 kg".to_string();
        let err = validate_field(&input, FormField::ParcelWeight).unwrap_err();
        assert_eq!(err.message, "Parcel weight must be at least 1kg");
    }
}
