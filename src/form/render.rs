use crate::form::controller::FormView;
use crate::form::fields::{FieldSpec, InputType, FIELD_TABLE};
use crate::models::notification::{Notification, NotificationVariant};

/// Input names rendered read-only; a posted form carries them back unchanged.
pub const READ_ONLY_INPUTS: [&str; 3] = ["name", "email", "price"];

/// Renders the booking form as an HTML fragment. Every editable input comes
/// from [`FIELD_TABLE`]; name, email and price are read-only. The form posts
/// its fields urlencoded to `/forms/{id}/book`.
pub fn render_form(view: &FormView, notice: Option<&Notification>) -> String {
    let mut html = String::new();

    html.push_str(&format!(
        "<form id=\"booking-form\" method=\"post\" action=\"/forms/{}/book\">\n",
        view.id
    ));
    html.push_str("<h1>Book a Parcel</h1>\n");

    if let Some(notice) = notice {
        html.push_str(&render_notice(notice));
    }

    html.push_str(&read_only("name", "Name", &view.user_name));
    html.push_str(&read_only("email", "Email", &view.user_email));

    for spec in FIELD_TABLE.iter() {
        html.push_str(&render_field(spec, view));
    }

    html.push_str(&read_only("price", "Price (Tk)", &view.price.to_string()));

    let (disabled, caption) = if view.submitting {
        (" disabled", "Booking...")
    } else {
        ("", "Book Parcel")
    };
    html.push_str(&format!(
        "<button type=\"submit\"{disabled}>{caption}</button>\n"
    ));

    html.push_str("</form>\n");
    html
}

fn render_field(spec: &FieldSpec, view: &FormView) -> String {
    let name = spec.field.as_str();
    let value = match spec.input_type {
        InputType::Date => view
            .values
            .delivery_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        _ => view
            .values
            .text(spec.field)
            .unwrap_or_default()
            .to_string(),
    };

    let mut html = format!(
        "<div class=\"field\">\n<label for=\"{name}\">{label}</label>\n\
         <input id=\"{name}\" name=\"{name}\" type=\"{input_type}\" placeholder=\"{placeholder}\" value=\"{value}\">\n",
        label = escape_html(spec.label),
        input_type = spec.input_type.as_str(),
        placeholder = escape_html(spec.placeholder),
        value = escape_html(&value),
    );

    if let Some(message) = view.errors.get(spec.field) {
        html.push_str(&format!(
            "<p class=\"field-error\" data-field=\"{name}\">{}</p>\n",
            escape_html(message)
        ));
    }

    html.push_str("</div>\n");
    html
}

fn render_notice(notice: &Notification) -> String {
    let variant = match notice.variant {
        NotificationVariant::Default => "default",
        NotificationVariant::Destructive => "destructive",
    };
    format!(
        "<div class=\"notice notice-{variant}\" role=\"status\">\n<strong>{}</strong>\n<p>{}</p>\n</div>\n",
        escape_html(&notice.title),
        escape_html(&notice.description)
    )
}

fn read_only(name: &str, label: &str, value: &str) -> String {
    format!(
        "<div class=\"field\">\n<label for=\"{name}\">{}</label>\n\
         <input id=\"{name}\" name=\"{name}\" value=\"{}\" readonly>\n</div>\n",
        escape_html(label),
        escape_html(value)
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::{render_form, READ_ONLY_INPUTS};
    use crate::engine::validation::validate_form;
    use crate::form::controller::FormView;
    use crate::form::fields::FIELD_TABLE;
    use crate::models::booking::BookingFormInput;
    use crate::models::notification::Notification;

    fn view(values: BookingFormInput, submitting: bool) -> FormView {
        FormView {
            id: Uuid::from_u128(7),
            user_name: "Sadia Islam".to_string(),
            user_email: "sadia@example.com".to_string(),
            values,
            errors: Default::default(),
            price: 0,
            submitting,
        }
    }

    #[test]
    fn renders_one_input_per_table_entry() {
        let html = render_form(&view(BookingFormInput::default(), false), None);

        for spec in FIELD_TABLE.iter() {
            assert!(html.contains(&format!("name=\"{}\"", spec.field)));
            assert!(html.contains(spec.placeholder.split('\'').next().unwrap()));
        }
        assert!(html.contains("type=\"number\""));
        assert!(html.contains("type=\"date\""));
        assert!(html.contains("value=\"Sadia Islam\" readonly"));
        assert!(html.contains("<button type=\"submit\">Book Parcel</button>"));
        assert!(!html.contains("class=\"notice"));
    }

    #[test]
    fn form_posts_to_the_book_route_with_named_inputs() {
        let html = render_form(&view(BookingFormInput::default(), false), None);

        assert!(html.contains(&format!("action=\"/forms/{}/book\"", Uuid::from_u128(7))));
        for name in READ_ONLY_INPUTS {
            assert!(html.contains(&format!("name=\"{name}\"")));
            assert!(FIELD_TABLE.iter().all(|spec| spec.field.as_str() != name));
        }
    }

    #[test]
    fn notice_is_shown_above_the_fields() {
        let form = view(BookingFormInput::default(), false);
        let html = render_form(&form, Some(&Notification::booking_failed(form.id)));

        let notice = html.find("notice notice-destructive").unwrap();
        assert!(notice < html.find("name=\"name\"").unwrap());
        assert!(html.contains("<strong>Error</strong>"));
        assert!(html.contains("Failed to book the parcel. Please try again."));
    }

    #[test]
    fn submitting_form_disables_the_button() {
        let html = render_form(&view(BookingFormInput::default(), true), None);
        assert!(html.contains("<button type=\"submit\" disabled>Booking...</button>"));
    }

    #[test]
    fn values_and_errors_are_escaped() {
        let values = BookingFormInput {
            delivery_address: "<b>Road \"7\"</b>".to_string(),
            delivery_date: NaiveDate::from_ymd_opt(2026, 11, 5),
            ..BookingFormInput::default()
        };
        let mut form = view(values.clone(), false);
        form.errors = validate_form(&values).unwrap_err();

        let html = render_form(&form, None);

        assert!(html.contains("value=\"&lt;b&gt;Road &quot;7&quot;&lt;/b&gt;\""));
        assert!(html.contains("value=\"2026-11-05\""));
        assert!(html.contains("Receiver&#39;s name is required"));
        assert!(!html.contains("data-field=\"deliveryAddress\""));
    }
}
