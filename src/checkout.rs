//! Checkout form validation: one pass over the submitted form that collects
//! every violated rule before returning, so the UI can flag all invalid
//! fields at once. The card section only applies to card payments and the
//! billing section only applies when it differs from shipping; inapplicable
//! sections are skipped entirely, whatever their content.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{BillingAddress, PaymentMethod, ShippingAddress};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid regex")
});
static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/(\d{2})$").expect("valid regex"));
static CVV_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{3,4}$").expect("valid regex"));
static CARD_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{13,19}$").expect("valid regex"));

/// Raw checkout submission as posted by the storefront form. Field names are
/// camelCase on the wire. Missing optional sections deserialize to empty so
/// the validator can report them as field errors rather than reject the body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,

    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub card_name: Option<String>,
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub cvv: Option<String>,

    #[serde(default = "default_same_as_shipping")]
    pub same_as_shipping: bool,
    #[serde(default)]
    pub billing_first_name: Option<String>,
    #[serde(default)]
    pub billing_last_name: Option<String>,
    #[serde(default)]
    pub billing_address: Option<String>,
    #[serde(default)]
    pub billing_city: Option<String>,
    #[serde(default)]
    pub billing_state: Option<String>,
    #[serde(default)]
    pub billing_zip_code: Option<String>,
    #[serde(default)]
    pub billing_country: Option<String>,
}

fn default_same_as_shipping() -> bool {
    true
}

/// A single violated rule, scoped to the offending form field.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Normalized result of a successful validation pass. Card data is checked
/// for format only and deliberately not carried forward; nothing downstream
/// may see it.
#[derive(Debug, Clone)]
pub struct ValidCheckout {
    pub shipping: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub billing: Option<BillingAddress>,
}

/// Validates the whole form in one pass, accumulating every violation.
/// `now` is injected so expiry freshness stays deterministic under test.
pub fn validate(form: &CheckoutForm, now: DateTime<Utc>) -> Result<ValidCheckout, Vec<FieldError>> {
    let mut errors = Vec::new();

    validate_shipping(form, &mut errors);
    match form.payment_method {
        Some(PaymentMethod::Credit) => validate_card(form, now, &mut errors),
        Some(_) => {}
        None => errors.push(FieldError::new(
            "paymentMethod",
            "Payment method is required",
        )),
    }
    if !form.same_as_shipping {
        validate_billing(form, &mut errors);
    }

    // A missing payment method always pushed an error above, so reaching the
    // success arm guarantees `Some`.
    let (Some(payment_method), true) = (form.payment_method, errors.is_empty()) else {
        return Err(errors);
    };

    let billing = (!form.same_as_shipping).then(|| BillingAddress {
        first_name: trimmed(&form.billing_first_name),
        last_name: trimmed(&form.billing_last_name),
        address: trimmed(&form.billing_address),
        city: trimmed(&form.billing_city),
        state: trimmed(&form.billing_state),
        zip_code: trimmed(&form.billing_zip_code),
        country: trimmed(&form.billing_country),
    });

    Ok(ValidCheckout {
        shipping: ShippingAddress {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            address: form.address.trim().to_string(),
            city: form.city.trim().to_string(),
            state: form.state.trim().to_string(),
            zip_code: form.zip_code.trim().to_string(),
            country: form.country.trim().to_string(),
        },
        payment_method,
        billing,
    })
}

fn validate_shipping(form: &CheckoutForm, errors: &mut Vec<FieldError>) {
    if form.first_name.trim().is_empty() {
        errors.push(FieldError::new("firstName", "First name is required"));
    }
    if form.last_name.trim().is_empty() {
        errors.push(FieldError::new("lastName", "Last name is required"));
    }
    if !EMAIL_RE.is_match(form.email.trim()) {
        errors.push(FieldError::new("email", "Valid email is required"));
    }
    if form.phone.trim().len() < 10 {
        errors.push(FieldError::new("phone", "Phone number is required"));
    }
    if form.address.trim().is_empty() {
        errors.push(FieldError::new("address", "Address is required"));
    }
    if form.city.trim().is_empty() {
        errors.push(FieldError::new("city", "City is required"));
    }
    if form.state.trim().is_empty() {
        errors.push(FieldError::new("state", "State is required"));
    }
    if form.zip_code.trim().len() < 5 {
        errors.push(FieldError::new("zipCode", "ZIP code is required"));
    }
    if form.country.trim().is_empty() {
        errors.push(FieldError::new("country", "Country is required"));
    }
}

fn validate_card(form: &CheckoutForm, now: DateTime<Utc>, errors: &mut Vec<FieldError>) {
    if trimmed(&form.card_name).is_empty() {
        errors.push(FieldError::new("cardName", "Name on card is required"));
    }

    let card_number = trimmed(&form.card_number);
    if card_number.is_empty() {
        errors.push(FieldError::new("cardNumber", "Card number is required"));
    } else {
        let digits: String = card_number.chars().filter(|c| !c.is_whitespace()).collect();
        if !CARD_DIGITS_RE.is_match(&digits) {
            errors.push(FieldError::new(
                "cardNumber",
                "Card number must be 13-19 digits",
            ));
        } else if !luhn_valid(&digits) {
            errors.push(FieldError::new("cardNumber", "Invalid card number"));
        }
    }

    let expiry = trimmed(&form.expiry_date);
    if expiry.is_empty() {
        errors.push(FieldError::new("expiryDate", "Expiry date is required"));
    } else {
        match parse_expiry(&expiry) {
            None => errors.push(FieldError::new(
                "expiryDate",
                "Expiry date must be in MM/YY format",
            )),
            Some(boundary) => {
                // The card stays valid through the whole printed month.
                if now.date_naive() >= boundary {
                    errors.push(FieldError::new("expiryDate", "Card has expired"));
                }
            }
        }
    }

    let cvv = trimmed(&form.cvv);
    if cvv.is_empty() {
        errors.push(FieldError::new("cvv", "CVV is required"));
    } else if !CVV_RE.is_match(&cvv) {
        errors.push(FieldError::new("cvv", "CVV must be 3-4 digits"));
    }
}

fn validate_billing(form: &CheckoutForm, errors: &mut Vec<FieldError>) {
    let required: [(&Option<String>, &str, &str); 7] = [
        (
            &form.billing_first_name,
            "billingFirstName",
            "Billing first name is required",
        ),
        (
            &form.billing_last_name,
            "billingLastName",
            "Billing last name is required",
        ),
        (
            &form.billing_address,
            "billingAddress",
            "Billing address is required",
        ),
        (&form.billing_city, "billingCity", "Billing city is required"),
        (
            &form.billing_state,
            "billingState",
            "Billing state is required",
        ),
        (
            &form.billing_zip_code,
            "billingZipCode",
            "Billing ZIP code is required",
        ),
        (
            &form.billing_country,
            "billingCountry",
            "Billing country is required",
        ),
    ];
    for (value, field, message) in required {
        if trimmed(value).is_empty() {
            errors.push(FieldError::new(field, message));
        }
    }
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().trim().to_string()
}

/// Luhn checksum over an all-digit string: from the rightmost digit, double
/// every second digit moving left, subtract 9 from doubles above 9, and the
/// digit sum must be divisible by 10.
fn luhn_valid(digits: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        let mut digit = digit;
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }
    sum % 10 == 0
}

/// Parses an `MM/YY` expiry and returns the first day of the following
/// month, the instant from which the card counts as expired.
fn parse_expiry(expiry: &str) -> Option<NaiveDate> {
    let caps = EXPIRY_RE.captures(expiry)?;
    let month: u32 = caps.get(1)?.as_str().parse().ok()?;
    let year: i32 = 2000 + caps.get(2)?.as_str().parse::<i32>().ok()?;

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
}
