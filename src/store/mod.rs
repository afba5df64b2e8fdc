use crate::model::transitions::TransitionError;
use crate::model::{
    Adoption, AdoptionAction, AdoptionPayload, AdoptionStatus, Contact, ContactPayload,
    ContactSubject, Donation, DonationPayload, DonationStatistics, PaymentStatus, Pet, PetAge,
    PetGender, PetPayload, PetStatus, PetType, Subscription, SubscriptionPayload,
    ValidationErrors, Volunteer, VolunteerAction, VolunteerInterest, VolunteerPayload,
    VolunteerStatus,
};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A 1-based page request. Out-of-range sizes are clamped, never rejected.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest { page: 1, page_size: DEFAULT_PAGE_SIZE }
    }
}

impl PageRequest {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        PageRequest {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.page_size as usize
    }
}

/// One page of a filtered listing plus the filtered total.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        (self.page as u64) * (self.page_size as u64) < self.total
    }
}

/// Sort field resolved against an entity's allowlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub field: &'static str,
    pub descending: bool,
}

/// Resolve an `ordering` query value (`name` or `-name`) against the allowed
/// fields; anything unrecognized falls back to the entity default.
pub fn resolve_ordering(
    raw: Option<&str>,
    allowed: &[&'static str],
    default: Ordering,
) -> Ordering {
    let Some(raw) = raw else { return default };
    let (descending, field) = match raw.strip_prefix('-') {
        Some(field) => (true, field),
        None => (false, raw),
    };
    match allowed.iter().find(|candidate| **candidate == field) {
        Some(field) => Ordering { field, descending },
        None => default,
    }
}

#[derive(Debug, Clone, Default)]
pub struct PetFilter {
    pub pet_type: Option<PetType>,
    pub age: Option<PetAge>,
    pub gender: Option<PetGender>,
    pub status: Option<PetStatus>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AdoptionFilter {
    pub status: Option<AdoptionStatus>,
    pub pet_id: Option<i64>,
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    pub is_read: Option<bool>,
    pub subject: Option<ContactSubject>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct VolunteerFilter {
    pub status: Option<VolunteerStatus>,
    pub interest: Option<VolunteerInterest>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DonationFilter {
    pub payment_status: Option<PaymentStatus>,
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilter {
    pub is_active: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

/// Outcome of a subscribe call; reactivations reuse the original row.
#[derive(Debug, Clone)]
pub struct SubscribeOutcome {
    pub subscription: Subscription,
    pub reactivated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberCounts {
    pub active_subscribers: u64,
    pub total_subscribers: u64,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
    #[error("already subscribed: {0}")]
    DuplicateSubscription(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        StoreError::Validation(errors)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage behind the adoption-center API.
///
/// Payloads are validated inside the store so every backend enforces the
/// same constraints; transition methods are atomic with respect to the
/// status precondition.
#[async_trait]
pub trait ShelterStore: Send + Sync {
    async fn list_pets(&self, filter: PetFilter, page: PageRequest) -> StoreResult<Page<Pet>>;
    async fn get_pet(&self, id: i64) -> StoreResult<Pet>;
    async fn create_pet(&self, payload: PetPayload) -> StoreResult<Pet>;
    async fn update_pet(&self, id: i64, payload: PetPayload) -> StoreResult<Pet>;
    async fn delete_pet(&self, id: i64) -> StoreResult<()>;
    async fn mark_pet_adopted(&self, id: i64) -> StoreResult<Pet>;

    async fn list_adoptions(
        &self,
        filter: AdoptionFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Adoption>>;
    async fn get_adoption(&self, id: i64) -> StoreResult<Adoption>;
    async fn create_adoption(&self, payload: AdoptionPayload) -> StoreResult<Adoption>;
    async fn update_adoption(&self, id: i64, payload: AdoptionPayload) -> StoreResult<Adoption>;
    async fn delete_adoption(&self, id: i64) -> StoreResult<()>;
    async fn transition_adoption(&self, id: i64, action: AdoptionAction)
    -> StoreResult<Adoption>;

    async fn list_contacts(
        &self,
        filter: ContactFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Contact>>;
    async fn get_contact(&self, id: i64) -> StoreResult<Contact>;
    async fn create_contact(&self, payload: ContactPayload) -> StoreResult<Contact>;
    async fn update_contact(&self, id: i64, payload: ContactPayload) -> StoreResult<Contact>;
    async fn delete_contact(&self, id: i64) -> StoreResult<()>;
    async fn set_contact_read(&self, id: i64, is_read: bool) -> StoreResult<Contact>;

    async fn list_volunteers(
        &self,
        filter: VolunteerFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Volunteer>>;
    async fn get_volunteer(&self, id: i64) -> StoreResult<Volunteer>;
    async fn create_volunteer(&self, payload: VolunteerPayload) -> StoreResult<Volunteer>;
    async fn update_volunteer(&self, id: i64, payload: VolunteerPayload)
    -> StoreResult<Volunteer>;
    async fn delete_volunteer(&self, id: i64) -> StoreResult<()>;
    async fn transition_volunteer(
        &self,
        id: i64,
        action: VolunteerAction,
    ) -> StoreResult<Volunteer>;

    async fn list_donations(
        &self,
        filter: DonationFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Donation>>;
    async fn get_donation(&self, id: i64) -> StoreResult<Donation>;
    async fn create_donation(&self, payload: DonationPayload) -> StoreResult<Donation>;
    async fn update_donation(&self, id: i64, payload: DonationPayload) -> StoreResult<Donation>;
    async fn delete_donation(&self, id: i64) -> StoreResult<()>;
    async fn complete_donation(&self, id: i64) -> StoreResult<Donation>;
    async fn donation_statistics(&self) -> StoreResult<DonationStatistics>;

    async fn list_subscriptions(
        &self,
        filter: SubscriptionFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Subscription>>;
    async fn get_subscription(&self, id: i64) -> StoreResult<Subscription>;
    async fn update_subscription(
        &self,
        id: i64,
        payload: SubscriptionPayload,
    ) -> StoreResult<Subscription>;
    async fn subscribe(&self, payload: SubscriptionPayload) -> StoreResult<SubscribeOutcome>;
    async fn unsubscribe(&self, id: i64) -> StoreResult<Subscription>;
    async fn delete_subscription(&self, id: i64) -> StoreResult<()>;
    async fn subscriber_counts(&self) -> StoreResult<SubscriberCounts>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
