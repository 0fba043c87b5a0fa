use serde::Serialize;

use crate::models::booking::FormField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Number,
    Date,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Number => "number",
            InputType::Date => "date",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub field: FormField,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub input_type: InputType,
}

const fn text(field: FormField, label: &'static str, placeholder: &'static str) -> FieldSpec {
    FieldSpec {
        field,
        label,
        placeholder,
        input_type: InputType::Text,
    }
}

/// Editable inputs in display order.
pub const FIELD_TABLE: [FieldSpec; 9] = [
    text(FormField::PhoneNumber, "Phone Number", "Enter phone number"),
    text(FormField::ParcelType, "Parcel Type", "Enter parcel type"),
    FieldSpec {
        field: FormField::ParcelWeight,
        label: "Parcel Weight (kg)",
        placeholder: "Enter parcel weight",
        input_type: InputType::Number,
    },
    text(FormField::ReceiverName, "Receiver's Name", "Enter receiver's name"),
    text(
        FormField::ReceiverPhone,
        "Receiver's Phone Number",
        "Enter receiver's phone number",
    ),
    text(FormField::DeliveryAddress, "Delivery Address", "Enter delivery address"),
    text(
        FormField::DeliveryLatitude,
        "Delivery Address Latitude",
        "Enter latitude",
    ),
    text(
        FormField::DeliveryLongitude,
        "Delivery Address Longitude",
        "Enter longitude",
    ),
    FieldSpec {
        field: FormField::DeliveryDate,
        label: "Requested Delivery Date",
        placeholder: "Select a date",
        input_type: InputType::Date,
    },
];
