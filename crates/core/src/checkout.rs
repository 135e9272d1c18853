//! Checkout form validation and order creation.
//!
//! Payment is simulated by the storefront; this module only turns a cart and
//! a validated shipping form into an admin order record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::admin::{Order, OrderItem};
use crate::auth::SessionUser;
use crate::cart::Cart;
use crate::types::{AccountId, Email, OrderId, OrderStatus};
use crate::validation::{FieldErrors, ValidationError, ValidationResult, length_between, required};

const MAX_NAME_LENGTH: usize = 100;
const MAX_ADDRESS_LENGTH: usize = 200;
const MAX_NOTES_LENGTH: usize = 500;
const MIN_PHONE_DIGITS: usize = 8;
const MAX_PHONE_DIGITS: usize = 15;
const POSTAL_CODE_DIGITS: usize = 5;

/// Account id recorded for orders placed without signing in.
pub const GUEST_ACCOUNT: &str = "guest";

/// Raw shipping form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub notes: String,
}

/// Validated, trimmed shipping details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub full_name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub notes: Option<String>,
}

impl ShippingDetails {
    /// `address, city postal_code`, as stored on the order.
    #[must_use]
    pub fn one_line_address(&self) -> String {
        format!("{}, {} {}", self.address, self.city, self.postal_code)
    }
}

impl CheckoutForm {
    /// Validate every field, reporting all failures at once.
    ///
    /// # Errors
    ///
    /// Returns the inline messages keyed by form field name.
    pub fn validate(&self) -> Result<ShippingDetails, FieldErrors> {
        let mut errors = FieldErrors::new();

        let full_name = errors.check(length_between(
            "full_name",
            &self.full_name,
            2,
            MAX_NAME_LENGTH,
        ));
        let email = errors.check(validate_email(&self.email));
        let phone = errors.check(validate_phone(&self.phone));
        let address = errors.check(length_between(
            "address",
            &self.address,
            5,
            MAX_ADDRESS_LENGTH,
        ));
        let city = errors.check(length_between("city", &self.city, 2, MAX_NAME_LENGTH));
        let postal_code = errors.check(validate_postal_code(&self.postal_code));
        let notes = self.notes.trim();
        if notes.chars().count() > MAX_NOTES_LENGTH {
            errors.push(&ValidationError::TooLong {
                field: "notes",
                max: MAX_NOTES_LENGTH,
            });
        }

        match (full_name, email, phone, address, city, postal_code) {
            (
                Some(full_name),
                Some(email),
                Some(phone),
                Some(address),
                Some(city),
                Some(postal_code),
            ) if errors.is_empty() => {
                Ok(ShippingDetails {
                    full_name: full_name.to_owned(),
                    email,
                    phone,
                    address: address.to_owned(),
                    city: city.to_owned(),
                    postal_code: postal_code.to_owned(),
                    notes: (!notes.is_empty()).then(|| notes.to_owned()),
                })
            }
            _ => Err(errors),
        }
    }
}

fn validate_email(raw: &str) -> ValidationResult<Email> {
    let raw = required("email", raw)?;
    Email::parse(raw).map_err(|_| ValidationError::InvalidFormat {
        field: "email",
        reason: "must be a valid email address".to_string(),
    })
}

/// 8-15 digits with an optional leading `+`. Spaces and dashes are dropped.
fn validate_phone(raw: &str) -> ValidationResult<String> {
    let raw = required("phone", raw)?;
    let compact: String = raw.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    let valid = digits.chars().all(|c| c.is_ascii_digit())
        && (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len());
    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "phone",
            reason: format!("must have {MIN_PHONE_DIGITS} to {MAX_PHONE_DIGITS} digits"),
        });
    }
    Ok(compact)
}

fn validate_postal_code(raw: &str) -> ValidationResult<&str> {
    let raw = required("postal_code", raw)?;
    if raw.len() != POSTAL_CODE_DIGITS || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "postal_code",
            reason: format!("must be {POSTAL_CODE_DIGITS} digits"),
        });
    }
    Ok(raw)
}

/// A short, human-friendly order number such as `ORD-3F9A1C2B`.
#[must_use]
pub fn new_order_id() -> OrderId {
    let hex = Uuid::new_v4().simple().to_string();
    let short: String = hex.chars().take(8).collect();
    OrderId::new(format!("ORD-{}", short.to_ascii_uppercase()))
}

/// Build the order record for a cart. The customer name is the one on the
/// shipping form; the account is the signed-in user or [`GUEST_ACCOUNT`].
#[must_use]
pub fn place_order(
    cart: &Cart,
    shipping: &ShippingDetails,
    user: Option<&SessionUser>,
    today: NaiveDate,
) -> Order {
    let items = cart
        .items()
        .iter()
        .map(|line| OrderItem {
            product_id: line.product.id,
            product_name: line.product.title.clone(),
            quantity: line.quantity,
            price: line.product.price,
        })
        .collect();

    Order {
        id: new_order_id(),
        user_id: user.map_or_else(|| AccountId::from(GUEST_ACCOUNT), |u| u.id.clone()),
        user_name: shipping.full_name.clone(),
        items,
        total: cart.total_price(),
        status: OrderStatus::Pending,
        date: today,
        shipping_address: shipping.one_line_address(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::authenticate;
    use crate::product::tests::product;
    use crate::types::Price;

    fn form() -> CheckoutForm {
        CheckoutForm {
            full_name: " Siti Rahma ".to_string(),
            email: "siti@example.com".to_string(),
            phone: "+62 812-3456-7890".to_string(),
            address: "Jl. Merdeka No. 10".to_string(),
            city: "Bandung".to_string(),
            postal_code: "40115".to_string(),
            notes: "   ".to_string(),
        }
    }

    #[test]
    fn test_valid_form_is_trimmed() {
        let details = form().validate().unwrap();
        assert_eq!(details.full_name, "Siti Rahma");
        assert_eq!(details.phone, "+6281234567890");
        assert_eq!(details.notes, None);
        assert_eq!(details.one_line_address(), "Jl. Merdeka No. 10, Bandung 40115");
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let errors = CheckoutForm::default().validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(
            fields,
            vec!["full_name", "email", "phone", "address", "city", "postal_code"]
        );
        assert_eq!(errors.get("full_name"), Some("Full name is required"));
    }

    #[test]
    fn test_format_errors() {
        let errors = CheckoutForm {
            email: "siti@localhost".to_string(),
            phone: "12-34".to_string(),
            postal_code: "4011A".to_string(),
            ..form()
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("email"), Some("Email must be a valid email address"));
        assert_eq!(errors.get("phone"), Some("Phone must have 8 to 15 digits"));
        assert_eq!(errors.get("postal_code"), Some("Postal code must be 5 digits"));
    }

    #[test]
    fn test_notes_are_optional_but_bounded() {
        let details = CheckoutForm {
            notes: "Leave at the door".to_string(),
            ..form()
        }
        .validate()
        .unwrap();
        assert_eq!(details.notes.as_deref(), Some("Leave at the door"));

        let errors = CheckoutForm {
            notes: "x".repeat(MAX_NOTES_LENGTH + 1),
            ..form()
        }
        .validate()
        .unwrap_err();
        assert!(errors.get("notes").is_some());
    }

    #[test]
    fn test_place_order_copies_cart_lines() {
        let mut cart = Cart::default();
        cart.add(product(1, "Backpack", 10995, "bags"));
        cart.add(product(2, "Shirt", 2230, "tops"));
        cart.add(product(2, "Shirt", 2230, "tops"));
        let shipping = form().validate().unwrap();
        let user = authenticate("user@example.com", "user123").unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let order = place_order(&cart, &shipping, Some(&user), today);
        assert!(order.id.as_str().starts_with("ORD-"));
        assert_eq!(order.id.as_str().len(), 12);
        assert_eq!(order.user_id, AccountId::from("demo-user"));
        assert_eq!(order.user_name, "Siti Rahma");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[1].quantity, 2);
        assert_eq!(order.total, Price::from_cents(15455));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.date, today);
    }

    #[test]
    fn test_guest_orders() {
        let mut cart = Cart::default();
        cart.add(product(1, "Backpack", 10995, "bags"));
        let shipping = form().validate().unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let order = place_order(&cart, &shipping, None, today);
        assert_eq!(order.user_id, AccountId::from(GUEST_ACCOUNT));
    }
}
