//! Payment form rules and reference normalization.

use rust_decimal::Decimal;

use crate::models::payment::{Currency, PaymentMethod, PaymentRequest, ValidPayment};

pub const MAX_REFERENCE_DIGITS: usize = 6;
pub const MAX_DESCRIPTION_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,

    #[error("A payment method is required")]
    MissingMethod,

    #[error("{0} payments cannot be registered in USD")]
    CurrencyNotAllowed(PaymentMethod),

    #[error("A reference or transaction number is required")]
    MissingReference,

    #[error("The reference cannot contain more than 6 digits")]
    ReferenceTooLong,

    #[error("The reference must contain at least {required} digits for the selected method")]
    ReferenceTooShort { required: usize },

    #[error("A receipt is required for this method")]
    MissingReceipt,

    #[error("The receipt must be an image")]
    ReceiptNotImage,

    #[error("Description cannot exceed 50 characters")]
    DescriptionTooLong,
}

impl PaymentError {
    /// Form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            PaymentError::NonPositiveAmount => "amount",
            PaymentError::MissingMethod => "method",
            PaymentError::CurrencyNotAllowed(_) => "currency",
            PaymentError::MissingReference
            | PaymentError::ReferenceTooLong
            | PaymentError::ReferenceTooShort { .. } => "reference",
            PaymentError::MissingReceipt | PaymentError::ReceiptNotImage => "receipt",
            PaymentError::DescriptionTooLong => "description",
        }
    }
}

/// Digits kept from a reference for each method.
pub fn required_digits(method: PaymentMethod) -> usize {
    match method {
        PaymentMethod::Transfer => 6,
        PaymentMethod::MobilePayment | PaymentMethod::Cash | PaymentMethod::Other => 4,
    }
}

/// Reduce a raw reference to the digits stored for `method`.
///
/// Transfer references carry a trailing check digit, so when more digits than
/// needed are present the six before the last one are kept.
pub fn normalize_reference(raw: &str, method: PaymentMethod) -> Result<String, PaymentError> {
    let raw = raw.trim();
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) && digits.len() > MAX_REFERENCE_DIGITS {
        return Err(PaymentError::ReferenceTooLong);
    }

    let required = required_digits(method);
    if digits.len() < required {
        return Err(PaymentError::ReferenceTooShort { required });
    }

    let end = if method == PaymentMethod::Transfer && digits.len() > required {
        digits.len() - 1
    } else {
        digits.len()
    };
    Ok(digits[end - required..end].to_string())
}

fn is_image(content_type: &str) -> bool {
    content_type.trim().to_ascii_lowercase().starts_with("image/")
}

/// Check a payment form and normalize its reference.
pub fn validate_payment(request: &PaymentRequest) -> Result<ValidPayment, PaymentError> {
    if request.amount <= Decimal::ZERO {
        return Err(PaymentError::NonPositiveAmount);
    }

    let method = request.method.ok_or(PaymentError::MissingMethod)?;
    if method.is_electronic() && request.currency == Currency::Usd {
        return Err(PaymentError::CurrencyNotAllowed(method));
    }

    let raw_reference = request
        .reference
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());
    if method.is_electronic() && raw_reference.is_none() {
        return Err(PaymentError::MissingReference);
    }
    let reference = raw_reference
        .map(|r| normalize_reference(r, method))
        .transpose()?;

    let receipt_url = match &request.receipt {
        Some(receipt) => {
            if let Some(content_type) = receipt.content_type.as_deref().filter(|c| !c.is_empty()) {
                if !is_image(content_type) {
                    return Err(PaymentError::ReceiptNotImage);
                }
            }
            Some(receipt.url.clone())
        }
        None if method.is_electronic() => return Err(PaymentError::MissingReceipt),
        None => None,
    };

    let description = request
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    if description
        .as_ref()
        .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_CHARS)
    {
        return Err(PaymentError::DescriptionTooLong);
    }

    Ok(ValidPayment {
        kind: request.kind,
        amount: request.amount,
        method,
        reference,
        receipt_url,
        description,
        currency: request.currency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payment::{PaymentKind, Receipt};

    fn receipt(content_type: &str) -> Option<Receipt> {
        Some(Receipt {
            url: "https://files.example.org/receipts/1.jpg".into(),
            content_type: Some(content_type.into()),
        })
    }

    fn request(method: PaymentMethod, reference: Option<&str>) -> PaymentRequest {
        PaymentRequest {
            player_id: None,
            kind: PaymentKind::Registration,
            amount: Decimal::new(1500, 2),
            method: Some(method),
            reference: reference.map(str::to_string),
            receipt: receipt("image/jpeg"),
            description: None,
            currency: Currency::Ves,
        }
    }

    #[test]
    fn mobile_payment_keeps_last_four_digits() {
        let valid = validate_payment(&request(PaymentMethod::MobilePayment, Some("ABC-12345678"))).unwrap();
        assert_eq!(valid.reference.as_deref(), Some("5678"));
    }

    #[test]
    fn transfer_drops_trailing_check_digit() {
        let valid = validate_payment(&request(PaymentMethod::Transfer, Some("TRF-000123456789"))).unwrap();
        assert_eq!(valid.reference.as_deref(), Some("345678"));
    }

    #[test]
    fn transfer_with_exactly_six_digits_is_kept() {
        let valid = validate_payment(&request(PaymentMethod::Transfer, Some("123456"))).unwrap();
        assert_eq!(valid.reference.as_deref(), Some("123456"));
    }

    #[test]
    fn purely_numeric_reference_over_six_digits_is_rejected() {
        let err = validate_payment(&request(PaymentMethod::MobilePayment, Some("1234567"))).unwrap_err();
        assert_eq!(err, PaymentError::ReferenceTooLong);
        assert_eq!(err.field(), "reference");
    }

    #[test]
    fn too_few_digits_for_method() {
        let err = validate_payment(&request(PaymentMethod::Transfer, Some("REF-12345"))).unwrap_err();
        assert_eq!(err, PaymentError::ReferenceTooShort { required: 6 });
        let err = normalize_reference("12", PaymentMethod::Cash).unwrap_err();
        assert_eq!(err, PaymentError::ReferenceTooShort { required: 4 });
    }

    #[test]
    fn electronic_methods_need_reference_and_receipt() {
        let err = validate_payment(&request(PaymentMethod::Transfer, None)).unwrap_err();
        assert_eq!(err, PaymentError::MissingReference);

        let mut req = request(PaymentMethod::MobilePayment, Some("0412-5551234"));
        req.receipt = None;
        assert_eq!(validate_payment(&req).unwrap_err(), PaymentError::MissingReceipt);
    }

    #[test]
    fn receipt_must_be_an_image() {
        let mut req = request(PaymentMethod::MobilePayment, Some("5551234x"));
        req.receipt = receipt("application/pdf");
        assert_eq!(validate_payment(&req).unwrap_err(), PaymentError::ReceiptNotImage);
    }

    #[test]
    fn usd_only_for_cash_and_other() {
        let mut req = request(PaymentMethod::Transfer, Some("123456"));
        req.currency = Currency::Usd;
        assert_eq!(
            validate_payment(&req).unwrap_err(),
            PaymentError::CurrencyNotAllowed(PaymentMethod::Transfer)
        );

        let mut cash = request(PaymentMethod::Cash, None);
        cash.currency = Currency::Usd;
        cash.receipt = None;
        let valid = validate_payment(&cash).unwrap();
        assert_eq!(valid.currency, Currency::Usd);
        assert_eq!(valid.reference, None);
        assert_eq!(valid.receipt_url, None);
    }

    #[test]
    fn amount_must_be_positive() {
        let mut req = request(PaymentMethod::Cash, None);
        req.amount = Decimal::ZERO;
        assert_eq!(validate_payment(&req).unwrap_err(), PaymentError::NonPositiveAmount);
    }

    #[test]
    fn method_is_required() {
        let mut req = request(PaymentMethod::Cash, None);
        req.method = None;
        assert_eq!(validate_payment(&req).unwrap_err(), PaymentError::MissingMethod);
    }

    #[test]
    fn description_is_limited() {
        let mut req = request(PaymentMethod::Cash, None);
        req.description = Some("x".repeat(51));
        assert_eq!(validate_payment(&req).unwrap_err(), PaymentError::DescriptionTooLong);
        req.description = Some("ñ".repeat(50));
        assert!(validate_payment(&req).is_ok());
    }
}
