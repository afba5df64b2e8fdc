//! Adoption applications.
//!
//! # Purpose
//! Defines the adoption application entity and its payload. The guarded
//! status machine itself lives in [`crate::model::transitions`].
use crate::model::validate::{ValidationErrors, check_email, optional_text, required_text};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdoptionStatus {
    Pending,
    Approved,
    Completed,
    Rejected,
}

impl AdoptionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AdoptionStatus::Pending => "pending",
            AdoptionStatus::Approved => "approved",
            AdoptionStatus::Completed => "completed",
            AdoptionStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(AdoptionStatus::Pending),
            "approved" => Some(AdoptionStatus::Approved),
            "completed" => Some(AdoptionStatus::Completed),
            "rejected" => Some(AdoptionStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Adoption {
    pub id: i64,
    pub adopter_name: String,
    pub adopter_email: String,
    pub adopter_phone: String,
    pub pet_id: i64,
    pub status: AdoptionStatus,
    pub reason_for_adoption: Option<String>,
    pub home_type: Option<String>,
    pub other_pets: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating or partially updating an application.
///
/// Status is not settable through the payload; it only moves through the
/// approve/reject/complete actions.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct AdoptionPayload {
    pub adopter_name: Option<String>,
    pub adopter_email: Option<String>,
    pub adopter_phone: Option<String>,
    pub pet_id: Option<i64>,
    pub reason_for_adoption: Option<String>,
    pub home_type: Option<String>,
    pub other_pets: Option<String>,
}

/// Validated application fields; `pet_id` existence is checked by the store.
#[derive(Debug, Clone)]
pub struct NewAdoption {
    pub adopter_name: String,
    pub adopter_email: String,
    pub adopter_phone: String,
    pub pet_id: i64,
    pub reason_for_adoption: Option<String>,
    pub home_type: Option<String>,
    pub other_pets: Option<String>,
}

impl NewAdoption {
    pub fn into_adoption(self, id: i64, now: DateTime<Utc>) -> Adoption {
        Adoption {
            id,
            adopter_name: self.adopter_name,
            adopter_email: self.adopter_email,
            adopter_phone: self.adopter_phone,
            pet_id: self.pet_id,
            status: AdoptionStatus::Pending,
            reason_for_adoption: self.reason_for_adoption,
            home_type: self.home_type,
            other_pets: self.other_pets,
            applied_at: now,
            approved_at: None,
            completed_at: None,
            updated_at: now,
        }
    }
}

impl AdoptionPayload {
    /// # Errors
    /// - `ValidationErrors` listing every missing or malformed field.
    pub fn into_new(self) -> Result<NewAdoption, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let adopter_name =
            required_text(&mut errors, "adopter_name", self.adopter_name.as_deref(), 100);
        let adopter_email =
            required_text(&mut errors, "adopter_email", self.adopter_email.as_deref(), 254);
        if let Some(email) = adopter_email.as_deref() {
            check_email(&mut errors, "adopter_email", email);
        }
        let adopter_phone =
            required_text(&mut errors, "adopter_phone", self.adopter_phone.as_deref(), 20);
        let pet_id = match self.pet_id {
            Some(id) => Some(id),
            None => {
                errors.push("pet_id", "this field is required");
                None
            }
        };
        let home_type = optional_text(&mut errors, "home_type", self.home_type.as_deref(), 100);
        let other_pets = optional_text(&mut errors, "other_pets", self.other_pets.as_deref(), 200);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewAdoption {
            adopter_name: adopter_name.unwrap_or_default(),
            adopter_email: adopter_email.unwrap_or_default(),
            adopter_phone: adopter_phone.unwrap_or_default(),
            pet_id: pet_id.unwrap_or_default(),
            reason_for_adoption: self.reason_for_adoption,
            home_type,
            other_pets,
        })
    }

    /// Merge the provided fields into an existing application.
    ///
    /// `pet_id` changes are accepted here; the store verifies the target pet
    /// exists before committing.
    pub fn apply_to(self, adoption: &mut Adoption) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let adopter_name = match self.adopter_name.as_deref() {
            Some(raw) => required_text(&mut errors, "adopter_name", Some(raw), 100),
            None => None,
        };
        let adopter_email = match self.adopter_email.as_deref() {
            Some(raw) => {
                let value = required_text(&mut errors, "adopter_email", Some(raw), 254);
                if let Some(email) = value.as_deref() {
                    check_email(&mut errors, "adopter_email", email);
                }
                value
            }
            None => None,
        };
        let adopter_phone = match self.adopter_phone.as_deref() {
            Some(raw) => required_text(&mut errors, "adopter_phone", Some(raw), 20),
            None => None,
        };
        let home_type = optional_text(&mut errors, "home_type", self.home_type.as_deref(), 100);
        let other_pets = optional_text(&mut errors, "other_pets", self.other_pets.as_deref(), 200);

        if !errors.is_empty() {
            return Err(errors);
        }
        if let Some(name) = adopter_name {
            adoption.adopter_name = name;
        }
        if let Some(email) = adopter_email {
            adoption.adopter_email = email;
        }
        if let Some(phone) = adopter_phone {
            adoption.adopter_phone = phone;
        }
        if let Some(pet_id) = self.pet_id {
            adoption.pet_id = pet_id;
        }
        if self.reason_for_adoption.is_some() {
            adoption.reason_for_adoption = self.reason_for_adoption;
        }
        if self.home_type.is_some() {
            adoption.home_type = home_type;
        }
        if self.other_pets.is_some() {
            adoption.other_pets = other_pets;
        }
        Ok(())
    }
}
