//! Pet records and their creation/update payload.
//!
//! # Purpose
//! Defines the pet entity, its enumerated attributes, and the payload type
//! shared by create and partial-update requests.
use crate::model::validate::{
    ValidationErrors, choice, optional_text, required_text,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PetType {
    Dog,
    Cat,
    Rabbit,
    Bird,
}

impl PetType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PetType::Dog => "dog",
            PetType::Cat => "cat",
            PetType::Rabbit => "rabbit",
            PetType::Bird => "bird",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dog" => Some(PetType::Dog),
            "cat" => Some(PetType::Cat),
            "rabbit" => Some(PetType::Rabbit),
            "bird" => Some(PetType::Bird),
            _ => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            PetType::Dog => "Dog",
            PetType::Cat => "Cat",
            PetType::Rabbit => "Rabbit",
            PetType::Bird => "Bird",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PetAge {
    Baby,
    Young,
    Adult,
}

impl PetAge {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PetAge::Baby => "baby",
            PetAge::Young => "young",
            PetAge::Adult => "adult",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "baby" => Some(PetAge::Baby),
            "young" => Some(PetAge::Young),
            "adult" => Some(PetAge::Adult),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PetGender {
    Male,
    Female,
}

impl PetGender {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PetGender::Male => "male",
            PetGender::Female => "female",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "male" => Some(PetGender::Male),
            "female" => Some(PetGender::Female),
            _ => None,
        }
    }
}

/// Adoption lifecycle state of a pet.
///
/// `Pending` means an approved adoption application is in flight; `Adopted`
/// is set when an adoption completes or an operator overrides it directly.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    Available,
    Pending,
    Adopted,
}

impl PetStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PetStatus::Available => "available",
            PetStatus::Pending => "pending",
            PetStatus::Adopted => "adopted",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(PetStatus::Available),
            "pending" => Some(PetStatus::Pending),
            "adopted" => Some(PetStatus::Adopted),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub pet_type: PetType,
    pub breed: Option<String>,
    pub age: PetAge,
    pub gender: PetGender,
    pub is_vaccinated: bool,
    pub is_neutered_spayed: bool,
    pub health_status: Option<String>,
    pub status: PetStatus,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating or partially updating a pet.
///
/// Enumerated fields arrive as raw strings so invalid choices can be
/// reported per field alongside any other violation.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct PetPayload {
    pub name: Option<String>,
    pub pet_type: Option<String>,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub is_vaccinated: Option<bool>,
    pub is_neutered_spayed: Option<bool>,
    pub health_status: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
}

/// Validated pet fields ready for insertion.
#[derive(Debug, Clone)]
pub struct NewPet {
    pub name: String,
    pub pet_type: PetType,
    pub breed: Option<String>,
    pub age: PetAge,
    pub gender: PetGender,
    pub is_vaccinated: bool,
    pub is_neutered_spayed: bool,
    pub health_status: Option<String>,
    pub status: PetStatus,
    pub description: Option<String>,
}

impl NewPet {
    pub fn into_pet(self, id: i64, now: DateTime<Utc>) -> Pet {
        Pet {
            id,
            name: self.name,
            pet_type: self.pet_type,
            breed: self.breed,
            age: self.age,
            gender: self.gender,
            is_vaccinated: self.is_vaccinated,
            is_neutered_spayed: self.is_neutered_spayed,
            health_status: self.health_status,
            status: self.status,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

impl PetPayload {
    /// Validate the payload as a creation request.
    ///
    /// # Errors
    /// - `ValidationErrors` listing every missing, blank, over-long, or
    ///   out-of-vocabulary field.
    pub fn into_new(self) -> Result<NewPet, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", self.name.as_deref(), 100);
        let pet_type = match self.pet_type.as_deref() {
            Some(raw) => choice(&mut errors, "pet_type", raw, PetType::parse),
            None => {
                errors.push("pet_type", "this field is required");
                None
            }
        };
        let age = match self.age.as_deref() {
            Some(raw) => choice(&mut errors, "age", raw, PetAge::parse),
            None => {
                errors.push("age", "this field is required");
                None
            }
        };
        let gender = match self.gender.as_deref() {
            Some(raw) => choice(&mut errors, "gender", raw, PetGender::parse),
            None => {
                errors.push("gender", "this field is required");
                None
            }
        };
        let status = match self.status.as_deref() {
            Some(raw) => choice(&mut errors, "status", raw, PetStatus::parse),
            None => Some(PetStatus::Available),
        };
        let breed = optional_text(&mut errors, "breed", self.breed.as_deref(), 100);
        let health_status =
            optional_text(&mut errors, "health_status", self.health_status.as_deref(), 500);

        if !errors.is_empty() {
            return Err(errors);
        }
        // The unwraps cannot fire: every None above recorded an error.
        Ok(NewPet {
            name: name.unwrap_or_default(),
            pet_type: pet_type.unwrap_or(PetType::Dog),
            breed,
            age: age.unwrap_or(PetAge::Adult),
            gender: gender.unwrap_or(PetGender::Male),
            is_vaccinated: self.is_vaccinated.unwrap_or(false),
            is_neutered_spayed: self.is_neutered_spayed.unwrap_or(false),
            health_status,
            status: status.unwrap_or(PetStatus::Available),
            description: self.description,
        })
    }

    /// Merge the provided fields into an existing pet, re-validating each.
    ///
    /// Unspecified fields are left untouched; the caller refreshes
    /// `updated_at`.
    pub fn apply_to(self, pet: &mut Pet) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = match self.name.as_deref() {
            Some(raw) => required_text(&mut errors, "name", Some(raw), 100),
            None => None,
        };
        let pet_type = self
            .pet_type
            .as_deref()
            .and_then(|raw| choice(&mut errors, "pet_type", raw, PetType::parse));
        let age = self
            .age
            .as_deref()
            .and_then(|raw| choice(&mut errors, "age", raw, PetAge::parse));
        let gender = self
            .gender
            .as_deref()
            .and_then(|raw| choice(&mut errors, "gender", raw, PetGender::parse));
        let status = self
            .status
            .as_deref()
            .and_then(|raw| choice(&mut errors, "status", raw, PetStatus::parse));
        let breed = optional_text(&mut errors, "breed", self.breed.as_deref(), 100);
        let health_status =
            optional_text(&mut errors, "health_status", self.health_status.as_deref(), 500);

        if !errors.is_empty() {
            return Err(errors);
        }
        if let Some(name) = name {
            pet.name = name;
        }
        if let Some(pet_type) = pet_type {
            pet.pet_type = pet_type;
        }
        if let Some(age) = age {
            pet.age = age;
        }
        if let Some(gender) = gender {
            pet.gender = gender;
        }
        if let Some(status) = status {
            pet.status = status;
        }
        if self.breed.is_some() {
            pet.breed = breed;
        }
        if self.health_status.is_some() {
            pet.health_status = health_status;
        }
        if let Some(flag) = self.is_vaccinated {
            pet.is_vaccinated = flag;
        }
        if let Some(flag) = self.is_neutered_spayed {
            pet.is_neutered_spayed = flag;
        }
        if self.description.is_some() {
            pet.description = self.description;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> PetPayload {
        PetPayload {
            name: Some("Rex".to_string()),
            pet_type: Some("dog".to_string()),
            age: Some("young".to_string()),
            gender: Some("male".to_string()),
            ..PetPayload::default()
        }
    }

    #[test]
    fn create_defaults_status_to_available() {
        let new = valid_payload().into_new().expect("valid");
        assert_eq!(new.status, PetStatus::Available);
        assert!(!new.is_vaccinated);
    }

    #[test]
    fn create_collects_every_violation() {
        let payload = PetPayload {
            pet_type: Some("fish".to_string()),
            ..PetPayload::default()
        };
        let errors = payload.into_new().expect_err("invalid");
        assert_eq!(errors.0["name"], "this field is required");
        assert_eq!(errors.0["pet_type"], "\"fish\" is not a valid choice");
        assert!(errors.0.contains_key("age"));
        assert!(errors.0.contains_key("gender"));
    }

    #[test]
    fn apply_merges_only_provided_fields() {
        let now = Utc::now();
        let mut pet = valid_payload().into_new().expect("valid").into_pet(1, now);
        let patch = PetPayload {
            status: Some("adopted".to_string()),
            breed: Some("Collie".to_string()),
            ..PetPayload::default()
        };
        patch.apply_to(&mut pet).expect("patch");
        assert_eq!(pet.status, PetStatus::Adopted);
        assert_eq!(pet.breed.as_deref(), Some("Collie"));
        assert_eq!(pet.name, "Rex");
    }

    #[test]
    fn apply_rejects_blank_name() {
        let now = Utc::now();
        let mut pet = valid_payload().into_new().expect("valid").into_pet(1, now);
        let patch = PetPayload {
            name: Some("  ".to_string()),
            ..PetPayload::default()
        };
        let errors = patch.apply_to(&mut pet).expect_err("blank name");
        assert_eq!(errors.0["name"], "this field may not be blank");
        assert_eq!(pet.name, "Rex");
    }
}
