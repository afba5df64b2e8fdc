//! OpenAPI schema aggregation for the Pawhaven API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document for docs
//! and client generation.
use crate::api::{
    adoptions, contacts, donations, newsletter, pets, system, volunteers,
    types::{
        ErrorResponse, FeatureFlags, HealthStatus, Paginated, StatusMessage,
        SubscriberCountResponse, SystemInfo,
    },
};
use crate::model::{
    Adoption, AdoptionPayload, AdoptionStatus, Contact, ContactPayload, ContactSubject, Donation,
    DonationPayload, DonationStatistics, PaymentStatus, Pet, PetAge, PetGender, PetPayload,
    PetStatus, PetType, Subscription, SubscriptionPayload, Volunteer, VolunteerInterest,
    VolunteerPayload, VolunteerStatus,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "pawhaven",
        version = "v1",
        description = "Pet adoption center HTTP API"
    ),
    paths(
        system::system_info,
        system::system_health,
        pets::list_pets,
        pets::create_pet,
        pets::get_pet,
        pets::update_pet,
        pets::delete_pet,
        pets::available_pets,
        pets::adopted_pets,
        pets::mark_adopted,
        adoptions::list_adoptions,
        adoptions::create_adoption,
        adoptions::get_adoption,
        adoptions::update_adoption,
        adoptions::delete_adoption,
        adoptions::pending_adoptions,
        adoptions::approve_adoption,
        adoptions::reject_adoption,
        adoptions::complete_adoption,
        contacts::list_contacts,
        contacts::create_contact,
        contacts::get_contact,
        contacts::update_contact,
        contacts::delete_contact,
        contacts::unread_contacts,
        contacts::mark_as_read,
        contacts::mark_as_unread,
        volunteers::list_volunteers,
        volunteers::create_volunteer,
        volunteers::get_volunteer,
        volunteers::update_volunteer,
        volunteers::delete_volunteer,
        volunteers::pending_volunteers,
        volunteers::approved_volunteers,
        volunteers::approve_volunteer,
        volunteers::reject_volunteer,
        donations::list_donations,
        donations::create_donation,
        donations::get_donation,
        donations::update_donation,
        donations::delete_donation,
        donations::completed_donations,
        donations::donation_statistics,
        donations::mark_completed,
        newsletter::list_subscriptions,
        newsletter::subscribe,
        newsletter::get_subscription,
        newsletter::update_subscription,
        newsletter::delete_subscription,
        newsletter::active_subscriptions,
        newsletter::subscriber_count,
        newsletter::unsubscribe
    ),
    components(schemas(
        FeatureFlags,
        SystemInfo,
        HealthStatus,
        ErrorResponse,
        StatusMessage,
        SubscriberCountResponse,
        Pet,
        PetPayload,
        PetType,
        PetAge,
        PetGender,
        PetStatus,
        Paginated<Pet>,
        Adoption,
        AdoptionPayload,
        AdoptionStatus,
        Paginated<Adoption>,
        Contact,
        ContactPayload,
        ContactSubject,
        Paginated<Contact>,
        Volunteer,
        VolunteerPayload,
        VolunteerInterest,
        VolunteerStatus,
        Paginated<Volunteer>,
        Donation,
        DonationPayload,
        PaymentStatus,
        DonationStatistics,
        Paginated<Donation>,
        Subscription,
        SubscriptionPayload,
        Paginated<Subscription>
    )),
    tags(
        (name = "system", description = "System and discovery endpoints"),
        (name = "pets", description = "Pet catalog management"),
        (name = "adoptions", description = "Adoption application workflow"),
        (name = "contacts", description = "Contact message inbox"),
        (name = "volunteers", description = "Volunteer application workflow"),
        (name = "donations", description = "Donation records and statistics"),
        (name = "newsletter", description = "Newsletter subscriptions")
    )
)]
pub struct ApiDoc;
