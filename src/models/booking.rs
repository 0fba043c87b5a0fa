use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::session::SessionUser;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    PhoneNumber,
    ParcelType,
    ParcelWeight,
    ReceiverName,
    ReceiverPhone,
    DeliveryAddress,
    DeliveryDate,
    DeliveryLatitude,
    DeliveryLongitude,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::PhoneNumber,
        FormField::ParcelType,
        FormField::ParcelWeight,
        FormField::ReceiverName,
        FormField::ReceiverPhone,
        FormField::DeliveryAddress,
        FormField::DeliveryDate,
        FormField::DeliveryLatitude,
        FormField::DeliveryLongitude,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::PhoneNumber => "phoneNumber",
            FormField::ParcelType => "parcelType",
            FormField::ParcelWeight => "parcelWeight",
            FormField::ReceiverName => "receiverName",
            FormField::ReceiverPhone => "receiverPhone",
            FormField::DeliveryAddress => "deliveryAddress",
            FormField::DeliveryDate => "deliveryDate",
            FormField::DeliveryLatitude => "deliveryLatitude",
            FormField::DeliveryLongitude => "deliveryLongitude",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown form field: {s}"))
    }
}

/// Raw, user-entered form values. Text fields hold exactly what was typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingFormInput {
    pub phone_number: String,
    pub parcel_type: String,
    pub parcel_weight: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub delivery_address: String,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_latitude: String,
    pub delivery_longitude: String,
}

impl BookingFormInput {
    /// Text value of a field. The date has no text slot and returns `None`.
    pub fn text(&self, field: FormField) -> Option<&str> {
        let value = match field {
            FormField::PhoneNumber => &self.phone_number,
            FormField::ParcelType => &self.parcel_type,
            FormField::ParcelWeight => &self.parcel_weight,
            FormField::ReceiverName => &self.receiver_name,
            FormField::ReceiverPhone => &self.receiver_phone,
            FormField::DeliveryAddress => &self.delivery_address,
            FormField::DeliveryLatitude => &self.delivery_latitude,
            FormField::DeliveryLongitude => &self.delivery_longitude,
            FormField::DeliveryDate => return None,
        };
        Some(value.as_str())
    }

    pub(crate) fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::PhoneNumber => Some(&mut self.phone_number),
            FormField::ParcelType => Some(&mut self.parcel_type),
            FormField::ParcelWeight => Some(&mut self.parcel_weight),
            FormField::ReceiverName => Some(&mut self.receiver_name),
            FormField::ReceiverPhone => Some(&mut self.receiver_phone),
            FormField::DeliveryAddress => Some(&mut self.delivery_address),
            FormField::DeliveryLatitude => Some(&mut self.delivery_latitude),
            FormField::DeliveryLongitude => Some(&mut self.delivery_longitude),
            FormField::DeliveryDate => None,
        }
    }
}

/// Form contents after every field rule has passed, with numeric fields parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBooking {
    pub phone_number: String,
    pub parcel_type: String,
    pub parcel_weight: f64,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub delivery_address: String,
    pub delivery_date: NaiveDate,
    pub delivery_lat: f64,
    pub delivery_lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub parcel_type: String,
    pub parcel_weight: f64,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub delivery_address: String,
    pub delivery_lat: f64,
    pub delivery_lng: f64,
    pub price: u32,
    pub requested_delivery_date: NaiveDate,
    pub approximate_delivery_date: NaiveDate,
}

impl BookingPayload {
    pub fn assemble(
        user: &SessionUser,
        booking: ValidatedBooking,
        price: u32,
        approximate_delivery_date: NaiveDate,
    ) -> Self {
        Self {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            user_email: user.email.clone(),
            user_phone: booking.phone_number,
            parcel_type: booking.parcel_type,
            parcel_weight: booking.parcel_weight,
            receiver_name: booking.receiver_name,
            receiver_phone: booking.receiver_phone,
            delivery_address: booking.delivery_address,
            delivery_lat: booking.delivery_lat,
            delivery_lng: booking.delivery_lng,
            price,
            requested_delivery_date: booking.delivery_date,
            approximate_delivery_date,
        }
    }
}
