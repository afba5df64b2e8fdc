//! Donation records.
use crate::model::validate::{
    ValidationErrors, check_email, choice, optional_text, positive_amount,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(PaymentStatus::Pending),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// A donation. Donor identity is optional so anonymous gifts are possible.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Donation {
    pub id: i64,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub amount: f64,
    pub is_custom: bool,
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct DonationPayload {
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub amount: Option<f64>,
    pub is_custom: Option<bool>,
    pub payment_status: Option<String>,
    pub transaction_id: Option<String>,
    pub message: Option<String>,
}

/// Validated donation fields; transaction id uniqueness is the store's job.
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub amount: f64,
    pub is_custom: bool,
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub message: Option<String>,
}

impl NewDonation {
    pub fn into_donation(self, id: i64, now: DateTime<Utc>) -> Donation {
        Donation {
            id,
            donor_name: self.donor_name,
            donor_email: self.donor_email,
            amount: self.amount,
            is_custom: self.is_custom,
            payment_status: self.payment_status,
            transaction_id: self.transaction_id,
            message: self.message,
            created_at: now,
            completed_at: None,
            updated_at: now,
        }
    }
}

impl DonationPayload {
    /// # Errors
    /// - `ValidationErrors` listing every missing or malformed field.
    pub fn into_new(self) -> Result<NewDonation, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let donor_name = optional_text(&mut errors, "donor_name", self.donor_name.as_deref(), 100);
        let donor_email =
            optional_text(&mut errors, "donor_email", self.donor_email.as_deref(), 254);
        if let Some(email) = donor_email.as_deref() {
            check_email(&mut errors, "donor_email", email);
        }
        let amount = match self.amount {
            Some(value) => positive_amount(&mut errors, "amount", value),
            None => {
                errors.push("amount", "this field is required");
                None
            }
        };
        let payment_status = match self.payment_status.as_deref() {
            Some(raw) => choice(&mut errors, "payment_status", raw, PaymentStatus::parse),
            None => Some(PaymentStatus::Pending),
        };
        let transaction_id =
            optional_text(&mut errors, "transaction_id", self.transaction_id.as_deref(), 200);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewDonation {
            donor_name,
            donor_email,
            amount: amount.unwrap_or_default(),
            is_custom: self.is_custom.unwrap_or(false),
            payment_status: payment_status.unwrap_or(PaymentStatus::Pending),
            transaction_id,
            message: self.message,
        })
    }

    /// Merge the provided fields into an existing donation.
    pub fn apply_to(self, donation: &mut Donation) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let donor_name = optional_text(&mut errors, "donor_name", self.donor_name.as_deref(), 100);
        let donor_email =
            optional_text(&mut errors, "donor_email", self.donor_email.as_deref(), 254);
        if let Some(email) = donor_email.as_deref() {
            check_email(&mut errors, "donor_email", email);
        }
        let amount = self
            .amount
            .and_then(|value| positive_amount(&mut errors, "amount", value));
        let payment_status = self
            .payment_status
            .as_deref()
            .and_then(|raw| choice(&mut errors, "payment_status", raw, PaymentStatus::parse));
        let transaction_id =
            optional_text(&mut errors, "transaction_id", self.transaction_id.as_deref(), 200);

        if !errors.is_empty() {
            return Err(errors);
        }
        if self.donor_name.is_some() {
            donation.donor_name = donor_name;
        }
        if self.donor_email.is_some() {
            donation.donor_email = donor_email;
        }
        if let Some(amount) = amount {
            donation.amount = amount;
        }
        if let Some(flag) = self.is_custom {
            donation.is_custom = flag;
        }
        if let Some(status) = payment_status {
            donation.payment_status = status;
        }
        if self.transaction_id.is_some() {
            donation.transaction_id = transaction_id;
        }
        if self.message.is_some() {
            donation.message = self.message;
        }
        Ok(())
    }
}

/// Aggregates over completed donations, rounded to cents.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
pub struct DonationStatistics {
    pub total_amount: f64,
    pub total_donations: u64,
    pub average_amount: f64,
    pub currency: &'static str,
}

impl DonationStatistics {
    pub fn from_completed(amounts: &[f64]) -> Self {
        let total: f64 = amounts.iter().sum();
        let count = amounts.len() as u64;
        let average = if count == 0 { 0.0 } else { total / count as f64 };
        DonationStatistics {
            total_amount: round_cents(total),
            total_donations: count,
            average_amount: round_cents(average),
            currency: "USD",
        }
    }
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
