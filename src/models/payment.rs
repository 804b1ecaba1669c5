// src/models/payment.rs
use std::fmt;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("Unknown {}: {}", stringify!($name), other)),
                }
            }
        }
    };
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    Registration,
    Refereeing,
    YellowCard,
    RedCard,
    Other,
}

text_enum!(PaymentKind {
    Registration => "registration",
    Refereeing => "refereeing",
    YellowCard => "yellow_card",
    RedCard => "red_card",
    Other => "other",
});

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Transfer,
    MobilePayment,
    Cash,
    Other,
}

text_enum!(PaymentMethod {
    Transfer => "transfer",
    MobilePayment => "mobile_payment",
    Cash => "cash",
    Other => "other",
});

impl PaymentMethod {
    /// Bank-side methods need a reference and a receipt, and only settle in VES.
    pub fn is_electronic(&self) -> bool {
        matches!(self, PaymentMethod::Transfer | PaymentMethod::MobilePayment)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "VES")]
    Ves,
    #[serde(rename = "USD")]
    Usd,
}

text_enum!(Currency {
    Ves => "VES",
    Usd => "USD",
});

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
}

text_enum!(PaymentStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Payment {
    pub id: Uuid,
    pub player_id: Uuid,
    pub kind: PaymentKind,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub receipt_url: Option<String>,
    pub description: Option<String>,
    pub currency: Currency,
    pub status: PaymentStatus,
    pub rejection_reason: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

/// Uploaded proof of payment. The file itself lives in external storage.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Receipt {
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Payment form. Players submit for themselves; staff set `player_id`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaymentRequest {
    #[serde(default)]
    pub player_id: Option<Uuid>,
    pub kind: PaymentKind,
    pub amount: Decimal,
    pub method: Option<PaymentMethod>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub receipt: Option<Receipt>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub currency: Currency,
}

/// A payment form that passed validation, with its reference normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidPayment {
    pub kind: PaymentKind,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub receipt_url: Option<String>,
    pub description: Option<String>,
    pub currency: Currency,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RejectPaymentRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PaymentFilter {
    pub status: Option<PaymentStatus>,
    pub player_id: Option<Uuid>,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PaymentDashboard {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub archived: i64,
}
