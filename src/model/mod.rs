//! Adoption-center data model module.
//!
//! # Purpose
//! Re-exports the six entity models, their request payloads, the shared
//! validation primitives, and the status transition tables used by the API
//! and store layers.
mod adoption;
mod contact;
mod donation;
mod newsletter;
mod pet;
pub mod transitions;
pub mod validate;
mod volunteer;

pub use adoption::{Adoption, AdoptionPayload, AdoptionStatus, NewAdoption};
pub use contact::{Contact, ContactPayload, ContactSubject, NewContact};
pub use donation::{
    Donation, DonationPayload, DonationStatistics, NewDonation, PaymentStatus, round_cents,
};
pub use newsletter::{Subscription, SubscriptionPayload};
pub use pet::{NewPet, Pet, PetAge, PetGender, PetPayload, PetStatus, PetType};
pub use transitions::{AdoptionAction, TransitionError, VolunteerAction};
pub use validate::ValidationErrors;
pub use volunteer::{NewVolunteer, Volunteer, VolunteerInterest, VolunteerPayload, VolunteerStatus};
