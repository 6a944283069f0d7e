/// Form validation
///
/// Validators collect every offending field before failing, so one
/// response enumerates the full set of problems. Successful validation
/// produces a typed value; handlers never read raw form fields again.
use crate::booking::BookingForm;
use chrono::NaiveDate;
use serde::Serialize;

/// A single field-level validation failure
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Loose email shape check: something@something.something, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Booking form after validation: dates parsed, guest count checked
#[derive(Debug, Clone)]
pub struct ValidBookingForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub id_number: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_guests: i64,
    pub special_requests: String,
}

/// Validate a booking submission against `today`
pub fn validate_booking_form(
    form: &BookingForm,
    today: NaiveDate,
) -> Result<ValidBookingForm, Vec<FieldError>> {
    let mut errors = Vec::new();

    if form.full_name.trim().is_empty() {
        errors.push(FieldError::new("fullName", "Full name is required"));
    }

    if form.email.trim().is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(form.email.trim()) {
        errors.push(FieldError::new("email", "Please enter a valid email"));
    }

    if form.phone.trim().is_empty() {
        errors.push(FieldError::new("phone", "Phone number is required"));
    }

    if form.id_number.trim().is_empty() {
        errors.push(FieldError::new("idNumber", "ID number is required"));
    }

    let check_in = parse_date(&form.check_in_date, "checkInDate", "Check-in", &mut errors);
    let check_out = parse_date(&form.check_out_date, "checkOutDate", "Check-out", &mut errors);

    if let (Some(check_in), Some(check_out)) = (check_in, check_out) {
        if check_in < today {
            errors.push(FieldError::new(
                "checkInDate",
                "Check-in date cannot be in the past",
            ));
        }
        if check_out <= check_in {
            errors.push(FieldError::new(
                "checkOutDate",
                "Check-out date must be after check-in date",
            ));
        }
    }

    if form.number_of_guests < 1 {
        errors.push(FieldError::new(
            "numberOfGuests",
            "Number of guests must be at least 1",
        ));
    }

    match (check_in, check_out) {
        (Some(check_in), Some(check_out)) if errors.is_empty() => Ok(ValidBookingForm {
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            id_number: form.id_number.trim().to_string(),
            check_in,
            check_out,
            number_of_guests: form.number_of_guests,
            special_requests: form.special_requests.clone().unwrap_or_default(),
        }),
        _ => Err(errors),
    }
}

fn parse_date(
    raw: &str,
    field: &str,
    label: &str,
    errors: &mut Vec<FieldError>,
) -> Option<NaiveDate> {
    if raw.trim().is_empty() {
        errors.push(FieldError::new(
            field,
            &format!("{} date is required", label),
        ));
        return None;
    }
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(
                field,
                &format!("{} date must be formatted YYYY-MM-DD", label),
            ));
            None
        }
    }
}
