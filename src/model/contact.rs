//! Contact messages from the public site form.
use crate::model::validate::{
    ValidationErrors, check_email, choice, optional_text, required_text,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContactSubject {
    Adoption,
    Volunteering,
    Donation,
    Feedback,
    Other,
}

impl ContactSubject {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ContactSubject::Adoption => "adoption",
            ContactSubject::Volunteering => "volunteering",
            ContactSubject::Donation => "donation",
            ContactSubject::Feedback => "feedback",
            ContactSubject::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "adoption" => Some(ContactSubject::Adoption),
            "volunteering" => Some(ContactSubject::Volunteering),
            "donation" => Some(ContactSubject::Donation),
            "feedback" => Some(ContactSubject::Feedback),
            "other" => Some(ContactSubject::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: ContactSubject,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct ContactPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: ContactSubject,
    pub message: String,
}

impl NewContact {
    pub fn into_contact(self, id: i64, now: DateTime<Utc>) -> Contact {
        Contact {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            subject: self.subject,
            message: self.message,
            is_read: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ContactPayload {
    /// # Errors
    /// - `ValidationErrors` listing every missing or malformed field.
    pub fn into_new(self) -> Result<NewContact, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", self.name.as_deref(), 100);
        let email = required_text(&mut errors, "email", self.email.as_deref(), 254);
        if let Some(email) = email.as_deref() {
            check_email(&mut errors, "email", email);
        }
        let phone = optional_text(&mut errors, "phone", self.phone.as_deref(), 20);
        let subject = match self.subject.as_deref() {
            Some(raw) => choice(&mut errors, "subject", raw, ContactSubject::parse),
            None => Some(ContactSubject::Other),
        };
        let message = required_text(&mut errors, "message", self.message.as_deref(), 5000);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewContact {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            phone,
            subject: subject.unwrap_or(ContactSubject::Other),
            message: message.unwrap_or_default(),
        })
    }

    /// Merge the provided fields into an existing message.
    pub fn apply_to(self, contact: &mut Contact) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = match self.name.as_deref() {
            Some(raw) => required_text(&mut errors, "name", Some(raw), 100),
            None => None,
        };
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
        let phone = optional_text(&mut errors, "phone", self.phone.as_deref(), 20);
        let subject = self
            .subject
            .as_deref()
            .and_then(|raw| choice(&mut errors, "subject", raw, ContactSubject::parse));
        let message = match self.message.as_deref() {
            Some(raw) => required_text(&mut errors, "message", Some(raw), 5000),
            None => None,
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        if let Some(name) = name {
            contact.name = name;
        }
        if let Some(email) = email {
            contact.email = email;
        }
        if self.phone.is_some() {
            contact.phone = phone;
        }
        if let Some(subject) = subject {
            contact.subject = subject;
        }
        if let Some(message) = message {
            contact.message = message;
        }
        Ok(())
    }
}
