//! Volunteer applications.
use crate::model::validate::{
    ValidationErrors, check_email, choice, optional_text, required_text,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VolunteerInterest {
    Care,
    Events,
    Admin,
}

impl VolunteerInterest {
    pub const fn as_str(&self) -> &'static str {
        match self {
            VolunteerInterest::Care => "care",
            VolunteerInterest::Events => "events",
            VolunteerInterest::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "care" => Some(VolunteerInterest::Care),
            "events" => Some(VolunteerInterest::Events),
            "admin" => Some(VolunteerInterest::Admin),
            _ => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            VolunteerInterest::Care => "Animal Care",
            VolunteerInterest::Events => "Events",
            VolunteerInterest::Admin => "Administration",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VolunteerStatus {
    Pending,
    Approved,
    Rejected,
}

impl VolunteerStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            VolunteerStatus::Pending => "pending",
            VolunteerStatus::Approved => "approved",
            VolunteerStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(VolunteerStatus::Pending),
            "approved" => Some(VolunteerStatus::Approved),
            "rejected" => Some(VolunteerStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Volunteer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub interest: VolunteerInterest,
    pub bio: Option<String>,
    pub availability: Option<String>,
    pub status: VolunteerStatus,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload; status only moves through the approve/reject actions.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct VolunteerPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub interest: Option<String>,
    pub bio: Option<String>,
    pub availability: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewVolunteer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub interest: VolunteerInterest,
    pub bio: Option<String>,
    pub availability: Option<String>,
}

impl NewVolunteer {
    pub fn into_volunteer(self, id: i64, now: DateTime<Utc>) -> Volunteer {
        Volunteer {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            interest: self.interest,
            bio: self.bio,
            availability: self.availability,
            status: VolunteerStatus::Pending,
            applied_at: now,
            updated_at: now,
        }
    }
}

impl VolunteerPayload {
    /// # Errors
    /// - `ValidationErrors` listing every missing or malformed field.
    pub fn into_new(self) -> Result<NewVolunteer, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", self.name.as_deref(), 100);
        let email = required_text(&mut errors, "email", self.email.as_deref(), 254);
        if let Some(email) = email.as_deref() {
            check_email(&mut errors, "email", email);
        }
        let phone = optional_text(&mut errors, "phone", self.phone.as_deref(), 20);
        let interest = match self.interest.as_deref() {
            Some(raw) => choice(&mut errors, "interest", raw, VolunteerInterest::parse),
            None => {
                errors.push("interest", "this field is required");
                None
            }
        };
        let availability =
            optional_text(&mut errors, "availability", self.availability.as_deref(), 200);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewVolunteer {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            phone,
            interest: interest.unwrap_or(VolunteerInterest::Care),
            bio: self.bio,
            availability,
        })
    }

    /// Merge the provided fields into an existing application.
    pub fn apply_to(self, volunteer: &mut Volunteer) -> Result<(), ValidationErrors> {
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
        let interest = self
            .interest
            .as_deref()
            .and_then(|raw| choice(&mut errors, "interest", raw, VolunteerInterest::parse));
        let availability =
            optional_text(&mut errors, "availability", self.availability.as_deref(), 200);

        if !errors.is_empty() {
            return Err(errors);
        }
        if let Some(name) = name {
            volunteer.name = name;
        }
        if let Some(email) = email {
            volunteer.email = email;
        }
        if self.phone.is_some() {
            volunteer.phone = phone;
        }
        if let Some(interest) = interest {
            volunteer.interest = interest;
        }
        if self.bio.is_some() {
            volunteer.bio = self.bio;
        }
        if self.availability.is_some() {
            volunteer.availability = availability;
        }
        Ok(())
    }
}
