//! Newsletter subscriptions.
//!
//! Email uniqueness is case-insensitive and enforced by the store; the
//! address is kept in the casing the subscriber typed.
use crate::model::validate::{ValidationErrors, check_email, required_text};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Subscription {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
    pub subscribed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct SubscriptionPayload {
    pub email: Option<String>,
}

impl SubscriptionPayload {
    /// # Errors
    /// - `ValidationErrors` when the email is missing or malformed.
    pub fn into_email(self) -> Result<String, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let email = required_text(&mut errors, "email", self.email.as_deref(), 254);
        if let Some(email) = email.as_deref() {
            check_email(&mut errors, "email", email);
        }
        errors.finish(email.unwrap_or_default())
    }

    /// Merge the provided fields into an existing subscription. Uniqueness
    /// of the new address is the store's job.
    pub fn apply_to(self, subscription: &mut Subscription) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let email = match self.email.as_deref() {
            Some(raw) => {
                let value = required_text(&mut errors, "email", Some(raw), 254);
                if let Some(email) = value.as_deref() {
                    check_email(&mut errors, "email", email);
                }
                value
            }
            None => None,
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        if let Some(email) = email {
            subscription.email = email;
        }
        Ok(())
    }
}

impl Subscription {
    pub fn new(id: i64, email: String, now: DateTime<Utc>) -> Self {
        Subscription {
            id,
            email,
            is_active: true,
            subscribed_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive comparison key for uniqueness checks.
    pub fn email_key(email: &str) -> String {
        email.to_lowercase()
    }
}
