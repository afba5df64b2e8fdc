//! In-memory implementation of the adoption-center store.
//!
//! # Purpose
//! This store implements the `ShelterStore` trait entirely in memory using `HashMap`s guarded
//! by `tokio::sync::RwLock`. It exists for:
//! - local development and tests (no external dependencies)
//! - deployments where durability is not required
//! - as a fallback when a durable backend (e.g., Postgres) is not configured
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - **Single-process consistency**: operations are consistent within one process. We use write locks
//!   for mutations and read locks for reads; status transitions hold the table write lock for the
//!   whole read-check-write, so concurrent conflicting actions resolve to one winner.
//! - **Lock order**: operations that touch both pets and adoptions take the pets lock first.
//!
//! # Performance characteristics
//! - Reads are cheap and concurrent (many readers).
//! - Writes are serialized per table (write lock per structure).
//! - Filtering, search, and ordering scan the whole table; acceptable for the small
//!   in-memory dev workloads this backend targets.
//!
//! # Metrics
//! This store updates a small set of gauges/counters to keep observability behavior consistent with
//! durable backends.
use super::{
    AdoptionFilter, ContactFilter, DonationFilter, Ordering, Page, PageRequest, PetFilter,
    ShelterStore, StoreError, StoreResult, SubscribeOutcome, SubscriberCounts, SubscriptionFilter,
    VolunteerFilter, resolve_ordering,
};
use crate::model::transitions::{adoption_target, pet_status_after, volunteer_target};
use crate::model::{
    Adoption, AdoptionAction, AdoptionPayload, Contact, ContactPayload, Donation,
    DonationPayload, DonationStatistics, PaymentStatus, Pet, PetPayload, PetStatus, Subscription,
    SubscriptionPayload, ValidationErrors, Volunteer, VolunteerAction, VolunteerPayload,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const PET_ORDER_FIELDS: &[&str] = &["created_at", "name"];
const ADOPTION_ORDER_FIELDS: &[&str] = &["applied_at", "status"];
const CONTACT_ORDER_FIELDS: &[&str] = &["created_at"];
const VOLUNTEER_ORDER_FIELDS: &[&str] = &["applied_at", "status"];
const DONATION_ORDER_FIELDS: &[&str] = &["created_at", "amount"];
const SUBSCRIPTION_ORDER_FIELDS: &[&str] = &["subscribed_at"];

const CREATED_DESC: Ordering = Ordering { field: "created_at", descending: true };
const APPLIED_DESC: Ordering = Ordering { field: "applied_at", descending: true };
const SUBSCRIBED_DESC: Ordering = Ordering { field: "subscribed_at", descending: true };

/// One entity table: monotonic id assignment plus the authoritative rows.
///
/// Ids are never reused, so a deleted record's id stays dead. That matches
/// the durable backend's sequence behavior.
#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: HashMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { next_id: 0, rows: HashMap::new() }
    }
}

impl<T> Table<T> {
    fn insert(&mut self, make: impl FnOnce(i64) -> T) -> i64 {
        self.next_id += 1;
        let id = self.next_id;
        self.rows.insert(id, make(id));
        id
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn paginate<T>(mut items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let start = page.offset().min(items.len());
    let end = (start + page.page_size as usize).min(items.len());
    let items = items.drain(start..end).collect();
    Page { items, total, page: page.page, page_size: page.page_size }
}

/// In-memory adoption-center store.
///
/// Each table is wrapped in `Arc<RwLock<...>>` so the store can be cloned
/// and shared across async request handlers while writes stay serialized.
#[derive(Default)]
pub struct InMemoryStore {
    pets: Arc<RwLock<Table<Pet>>>,
    adoptions: Arc<RwLock<Table<Adoption>>>,
    contacts: Arc<RwLock<Table<Contact>>>,
    volunteers: Arc<RwLock<Table<Volunteer>>>,
    donations: Arc<RwLock<Table<Donation>>>,
    subscriptions: Arc<RwLock<Table<Subscription>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate_transaction_id(
    donations: &Table<Donation>,
    transaction_id: &str,
    exclude_id: Option<i64>,
) -> bool {
    donations.rows.values().any(|donation| {
        Some(donation.id) != exclude_id
            && donation.transaction_id.as_deref() == Some(transaction_id)
    })
}

fn transaction_id_taken_error() -> StoreError {
    let mut errors = ValidationErrors::new();
    errors.push("transaction_id", "donation with this transaction_id already exists");
    StoreError::Validation(errors)
}

fn email_taken_error() -> StoreError {
    let mut errors = ValidationErrors::new();
    errors.push("email", "subscription with this email already exists");
    StoreError::Validation(errors)
}

#[async_trait]
impl ShelterStore for InMemoryStore {
    async fn list_pets(&self, filter: PetFilter, page: PageRequest) -> StoreResult<Page<Pet>> {
        let search = filter.search.as_deref().map(str::to_lowercase);
        let mut items: Vec<Pet> = self
            .pets
            .read()
            .await
            .rows
            .values()
            .filter(|pet| {
                filter.pet_type.is_none_or(|wanted| pet.pet_type == wanted)
                    && filter.age.is_none_or(|wanted| pet.age == wanted)
                    && filter.gender.is_none_or(|wanted| pet.gender == wanted)
                    && filter.status.is_none_or(|wanted| pet.status == wanted)
                    && search.as_deref().is_none_or(|needle| {
                        contains_ci(&pet.name, needle)
                            || pet.breed.as_deref().is_some_and(|breed| contains_ci(breed, needle))
                            || pet
                                .description
                                .as_deref()
                                .is_some_and(|description| contains_ci(description, needle))
                    })
            })
            .cloned()
            .collect();
        let ordering =
            resolve_ordering(filter.ordering.as_deref(), PET_ORDER_FIELDS, CREATED_DESC);
        match ordering.field {
            "name" => items.sort_by(|a, b| {
                a.name.to_lowercase().cmp(&b.name.to_lowercase()).then(a.id.cmp(&b.id))
            }),
            _ => items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))),
        }
        if ordering.descending {
            items.reverse();
        }
        Ok(paginate(items, page))
    }

    async fn get_pet(&self, id: i64) -> StoreResult<Pet> {
        self.pets
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("pet".into()))
    }

    async fn create_pet(&self, payload: PetPayload) -> StoreResult<Pet> {
        let new = payload.into_new()?;
        let now = Utc::now();
        let mut pets = self.pets.write().await;
        let id = pets.insert(|id| new.into_pet(id, now));
        metrics::gauge!("pawhaven_pets_total").set(pets.rows.len() as f64);
        Ok(pets.rows[&id].clone())
    }

    async fn update_pet(&self, id: i64, payload: PetPayload) -> StoreResult<Pet> {
        let mut pets = self.pets.write().await;
        let pet = pets
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("pet".into()))?;
        payload.apply_to(pet)?;
        pet.updated_at = Utc::now();
        Ok(pet.clone())
    }

    async fn delete_pet(&self, id: i64) -> StoreResult<()> {
        let mut pets = self.pets.write().await;
        if pets.rows.remove(&id).is_none() {
            return Err(StoreError::NotFound("pet".into()));
        }
        metrics::gauge!("pawhaven_pets_total").set(pets.rows.len() as f64);
        // Cascading delete: a pet's applications go with it.
        let mut adoptions = self.adoptions.write().await;
        adoptions.rows.retain(|_, adoption| adoption.pet_id != id);
        metrics::gauge!("pawhaven_adoptions_total").set(adoptions.rows.len() as f64);
        Ok(())
    }

    async fn mark_pet_adopted(&self, id: i64) -> StoreResult<Pet> {
        // Direct operator override: no precondition, and in-flight
        // applications are left untouched.
        let mut pets = self.pets.write().await;
        let pet = pets
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("pet".into()))?;
        pet.status = PetStatus::Adopted;
        pet.updated_at = Utc::now();
        Ok(pet.clone())
    }

    async fn list_adoptions(
        &self,
        filter: AdoptionFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Adoption>> {
        let mut items: Vec<Adoption> = self
            .adoptions
            .read()
            .await
            .rows
            .values()
            .filter(|adoption| {
                filter.status.is_none_or(|wanted| adoption.status == wanted)
                    && filter.pet_id.is_none_or(|wanted| adoption.pet_id == wanted)
            })
            .cloned()
            .collect();
        let ordering =
            resolve_ordering(filter.ordering.as_deref(), ADOPTION_ORDER_FIELDS, APPLIED_DESC);
        match ordering.field {
            "status" => items.sort_by(|a, b| {
                a.status.as_str().cmp(b.status.as_str()).then(a.id.cmp(&b.id))
            }),
            _ => items.sort_by(|a, b| a.applied_at.cmp(&b.applied_at).then(a.id.cmp(&b.id))),
        }
        if ordering.descending {
            items.reverse();
        }
        Ok(paginate(items, page))
    }

    async fn get_adoption(&self, id: i64) -> StoreResult<Adoption> {
        self.adoptions
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("adoption".into()))
    }

    async fn create_adoption(&self, payload: AdoptionPayload) -> StoreResult<Adoption> {
        let new = payload.into_new()?;
        let pets = self.pets.read().await;
        if !pets.rows.contains_key(&new.pet_id) {
            return Err(StoreError::NotFound("pet".into()));
        }
        let now = Utc::now();
        let mut adoptions = self.adoptions.write().await;
        let id = adoptions.insert(|id| new.into_adoption(id, now));
        metrics::gauge!("pawhaven_adoptions_total").set(adoptions.rows.len() as f64);
        Ok(adoptions.rows[&id].clone())
    }

    async fn update_adoption(&self, id: i64, payload: AdoptionPayload) -> StoreResult<Adoption> {
        let pets = self.pets.read().await;
        let mut adoptions = self.adoptions.write().await;
        let adoption = adoptions
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("adoption".into()))?;
        if let Some(pet_id) = payload.pet_id
            && !pets.rows.contains_key(&pet_id)
        {
            return Err(StoreError::NotFound("pet".into()));
        }
        payload.apply_to(adoption)?;
        adoption.updated_at = Utc::now();
        Ok(adoption.clone())
    }

    async fn delete_adoption(&self, id: i64) -> StoreResult<()> {
        let mut adoptions = self.adoptions.write().await;
        if adoptions.rows.remove(&id).is_none() {
            return Err(StoreError::NotFound("adoption".into()));
        }
        metrics::gauge!("pawhaven_adoptions_total").set(adoptions.rows.len() as f64);
        Ok(())
    }

    async fn transition_adoption(
        &self,
        id: i64,
        action: AdoptionAction,
    ) -> StoreResult<Adoption> {
        // Both locks are held for the whole check-and-write so the status
        // precondition and the pet side effect move together.
        let mut pets = self.pets.write().await;
        let mut adoptions = self.adoptions.write().await;
        let adoption = adoptions
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("adoption".into()))?;
        let target = adoption_target(adoption.status, action)?;
        let now = Utc::now();
        adoption.status = target;
        adoption.updated_at = now;
        match action {
            AdoptionAction::Approve => adoption.approved_at = Some(now),
            AdoptionAction::Complete => adoption.completed_at = Some(now),
            AdoptionAction::Reject => {}
        }
        if let Some(pet_status) = pet_status_after(action)
            && let Some(pet) = pets.rows.get_mut(&adoption.pet_id)
        {
            pet.status = pet_status;
            pet.updated_at = now;
        }
        metrics::counter!("pawhaven_adoption_transitions_total", "action" => action.label())
            .increment(1);
        Ok(adoption.clone())
    }

    async fn list_contacts(
        &self,
        filter: ContactFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Contact>> {
        let search = filter.search.as_deref().map(str::to_lowercase);
        let mut items: Vec<Contact> = self
            .contacts
            .read()
            .await
            .rows
            .values()
            .filter(|contact| {
                filter.is_read.is_none_or(|wanted| contact.is_read == wanted)
                    && filter.subject.is_none_or(|wanted| contact.subject == wanted)
                    && search.as_deref().is_none_or(|needle| {
                        contains_ci(&contact.name, needle)
                            || contains_ci(&contact.email, needle)
                            || contains_ci(&contact.message, needle)
                    })
            })
            .cloned()
            .collect();
        // Single allowed field, so only the direction can vary.
        let ordering =
            resolve_ordering(filter.ordering.as_deref(), CONTACT_ORDER_FIELDS, CREATED_DESC);
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        if ordering.descending {
            items.reverse();
        }
        Ok(paginate(items, page))
    }

    async fn get_contact(&self, id: i64) -> StoreResult<Contact> {
        self.contacts
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("contact".into()))
    }

    async fn create_contact(&self, payload: ContactPayload) -> StoreResult<Contact> {
        let new = payload.into_new()?;
        let now = Utc::now();
        let mut contacts = self.contacts.write().await;
        let id = contacts.insert(|id| new.into_contact(id, now));
        metrics::gauge!("pawhaven_contacts_total").set(contacts.rows.len() as f64);
        Ok(contacts.rows[&id].clone())
    }

    async fn update_contact(&self, id: i64, payload: ContactPayload) -> StoreResult<Contact> {
        let mut contacts = self.contacts.write().await;
        let contact = contacts
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("contact".into()))?;
        payload.apply_to(contact)?;
        contact.updated_at = Utc::now();
        Ok(contact.clone())
    }

    async fn delete_contact(&self, id: i64) -> StoreResult<()> {
        let mut contacts = self.contacts.write().await;
        if contacts.rows.remove(&id).is_none() {
            return Err(StoreError::NotFound("contact".into()));
        }
        metrics::gauge!("pawhaven_contacts_total").set(contacts.rows.len() as f64);
        Ok(())
    }

    async fn set_contact_read(&self, id: i64, is_read: bool) -> StoreResult<Contact> {
        let mut contacts = self.contacts.write().await;
        let contact = contacts
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("contact".into()))?;
        contact.is_read = is_read;
        contact.updated_at = Utc::now();
        Ok(contact.clone())
    }

    async fn list_volunteers(
        &self,
        filter: VolunteerFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Volunteer>> {
        let search = filter.search.as_deref().map(str::to_lowercase);
        let mut items: Vec<Volunteer> = self
            .volunteers
            .read()
            .await
            .rows
            .values()
            .filter(|volunteer| {
                filter.status.is_none_or(|wanted| volunteer.status == wanted)
                    && filter.interest.is_none_or(|wanted| volunteer.interest == wanted)
                    && search.as_deref().is_none_or(|needle| {
                        contains_ci(&volunteer.name, needle)
                            || contains_ci(&volunteer.email, needle)
                    })
            })
            .cloned()
            .collect();
        let ordering =
            resolve_ordering(filter.ordering.as_deref(), VOLUNTEER_ORDER_FIELDS, APPLIED_DESC);
        match ordering.field {
            "status" => items.sort_by(|a, b| {
                a.status.as_str().cmp(b.status.as_str()).then(a.id.cmp(&b.id))
            }),
            _ => items.sort_by(|a, b| a.applied_at.cmp(&b.applied_at).then(a.id.cmp(&b.id))),
        }
        if ordering.descending {
            items.reverse();
        }
        Ok(paginate(items, page))
    }

    async fn get_volunteer(&self, id: i64) -> StoreResult<Volunteer> {
        self.volunteers
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("volunteer".into()))
    }

    async fn create_volunteer(&self, payload: VolunteerPayload) -> StoreResult<Volunteer> {
        let new = payload.into_new()?;
        let now = Utc::now();
        let mut volunteers = self.volunteers.write().await;
        let id = volunteers.insert(|id| new.into_volunteer(id, now));
        metrics::gauge!("pawhaven_volunteers_total").set(volunteers.rows.len() as f64);
        Ok(volunteers.rows[&id].clone())
    }

    async fn update_volunteer(
        &self,
        id: i64,
        payload: VolunteerPayload,
    ) -> StoreResult<Volunteer> {
        let mut volunteers = self.volunteers.write().await;
        let volunteer = volunteers
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("volunteer".into()))?;
        payload.apply_to(volunteer)?;
        volunteer.updated_at = Utc::now();
        Ok(volunteer.clone())
    }

    async fn delete_volunteer(&self, id: i64) -> StoreResult<()> {
        let mut volunteers = self.volunteers.write().await;
        if volunteers.rows.remove(&id).is_none() {
            return Err(StoreError::NotFound("volunteer".into()));
        }
        metrics::gauge!("pawhaven_volunteers_total").set(volunteers.rows.len() as f64);
        Ok(())
    }

    async fn transition_volunteer(
        &self,
        id: i64,
        action: VolunteerAction,
    ) -> StoreResult<Volunteer> {
        let mut volunteers = self.volunteers.write().await;
        let volunteer = volunteers
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("volunteer".into()))?;
        volunteer.status = volunteer_target(volunteer.status, action)?;
        volunteer.updated_at = Utc::now();
        metrics::counter!("pawhaven_volunteer_transitions_total", "action" => action.label())
            .increment(1);
        Ok(volunteer.clone())
    }

    async fn list_donations(
        &self,
        filter: DonationFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Donation>> {
        let mut items: Vec<Donation> = self
            .donations
            .read()
            .await
            .rows
            .values()
            .filter(|donation| {
                filter
                    .payment_status
                    .is_none_or(|wanted| donation.payment_status == wanted)
            })
            .cloned()
            .collect();
        let ordering =
            resolve_ordering(filter.ordering.as_deref(), DONATION_ORDER_FIELDS, CREATED_DESC);
        match ordering.field {
            "amount" => items.sort_by(|a, b| {
                a.amount
                    .partial_cmp(&b.amount)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.id.cmp(&b.id))
            }),
            _ => items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))),
        }
        if ordering.descending {
            items.reverse();
        }
        Ok(paginate(items, page))
    }

    async fn get_donation(&self, id: i64) -> StoreResult<Donation> {
        self.donations
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("donation".into()))
    }

    async fn create_donation(&self, payload: DonationPayload) -> StoreResult<Donation> {
        let new = payload.into_new()?;
        let now = Utc::now();
        let mut donations = self.donations.write().await;
        if let Some(transaction_id) = new.transaction_id.as_deref()
            && duplicate_transaction_id(&donations, transaction_id, None)
        {
            return Err(transaction_id_taken_error());
        }
        let id = donations.insert(|id| new.into_donation(id, now));
        metrics::gauge!("pawhaven_donations_total").set(donations.rows.len() as f64);
        Ok(donations.rows[&id].clone())
    }

    async fn update_donation(&self, id: i64, payload: DonationPayload) -> StoreResult<Donation> {
        let mut donations = self.donations.write().await;
        if !donations.rows.contains_key(&id) {
            return Err(StoreError::NotFound("donation".into()));
        }
        if let Some(transaction_id) = payload.transaction_id.as_deref()
            && duplicate_transaction_id(&donations, transaction_id, Some(id))
        {
            return Err(transaction_id_taken_error());
        }
        let donation = donations
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("donation".into()))?;
        payload.apply_to(donation)?;
        donation.updated_at = Utc::now();
        Ok(donation.clone())
    }

    async fn delete_donation(&self, id: i64) -> StoreResult<()> {
        let mut donations = self.donations.write().await;
        if donations.rows.remove(&id).is_none() {
            return Err(StoreError::NotFound("donation".into()));
        }
        metrics::gauge!("pawhaven_donations_total").set(donations.rows.len() as f64);
        Ok(())
    }

    async fn complete_donation(&self, id: i64) -> StoreResult<Donation> {
        // Unconditional: payment webhooks may replay, and completion must win.
        let mut donations = self.donations.write().await;
        let donation = donations
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("donation".into()))?;
        let now = Utc::now();
        donation.payment_status = PaymentStatus::Completed;
        donation.completed_at = Some(now);
        donation.updated_at = now;
        Ok(donation.clone())
    }

    async fn donation_statistics(&self) -> StoreResult<DonationStatistics> {
        let amounts: Vec<f64> = self
            .donations
            .read()
            .await
            .rows
            .values()
            .filter(|donation| donation.payment_status == PaymentStatus::Completed)
            .map(|donation| donation.amount)
            .collect();
        Ok(DonationStatistics::from_completed(&amounts))
    }

    async fn list_subscriptions(
        &self,
        filter: SubscriptionFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Subscription>> {
        let search = filter.search.as_deref().map(str::to_lowercase);
        let mut items: Vec<Subscription> = self
            .subscriptions
            .read()
            .await
            .rows
            .values()
            .filter(|subscription| {
                filter
                    .is_active
                    .is_none_or(|wanted| subscription.is_active == wanted)
                    && search
                        .as_deref()
                        .is_none_or(|needle| contains_ci(&subscription.email, needle))
            })
            .cloned()
            .collect();
        let ordering = resolve_ordering(
            filter.ordering.as_deref(),
            SUBSCRIPTION_ORDER_FIELDS,
            SUBSCRIBED_DESC,
        );
        items.sort_by(|a, b| a.subscribed_at.cmp(&b.subscribed_at).then(a.id.cmp(&b.id)));
        if ordering.descending {
            items.reverse();
        }
        Ok(paginate(items, page))
    }

    async fn get_subscription(&self, id: i64) -> StoreResult<Subscription> {
        self.subscriptions
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("subscription".into()))
    }

    async fn update_subscription(
        &self,
        id: i64,
        payload: SubscriptionPayload,
    ) -> StoreResult<Subscription> {
        let mut subscriptions = self.subscriptions.write().await;
        let current = subscriptions
            .rows
            .get(&id)
            .ok_or_else(|| StoreError::NotFound("subscription".into()))?;
        let mut updated = current.clone();
        payload.apply_to(&mut updated)?;
        let key = Subscription::email_key(&updated.email);
        let taken = subscriptions
            .rows
            .values()
            .any(|other| other.id != id && Subscription::email_key(&other.email) == key);
        if taken {
            return Err(email_taken_error());
        }
        updated.updated_at = Utc::now();
        subscriptions.rows.insert(id, updated.clone());
        Ok(updated)
    }

    async fn subscribe(&self, payload: SubscriptionPayload) -> StoreResult<SubscribeOutcome> {
        let email = payload.into_email()?;
        let key = Subscription::email_key(&email);
        let mut subscriptions = self.subscriptions.write().await;
        let existing = subscriptions
            .rows
            .values_mut()
            .find(|subscription| Subscription::email_key(&subscription.email) == key);
        if let Some(subscription) = existing {
            if subscription.is_active {
                return Err(StoreError::DuplicateSubscription(email));
            }
            // Reactivation keeps the original row and subscription date.
            subscription.is_active = true;
            subscription.updated_at = Utc::now();
            return Ok(SubscribeOutcome { subscription: subscription.clone(), reactivated: true });
        }
        let now = Utc::now();
        let id = subscriptions.insert(|id| Subscription::new(id, email, now));
        metrics::gauge!("pawhaven_subscriptions_total").set(subscriptions.rows.len() as f64);
        Ok(SubscribeOutcome { subscription: subscriptions.rows[&id].clone(), reactivated: false })
    }

    async fn unsubscribe(&self, id: i64) -> StoreResult<Subscription> {
        let mut subscriptions = self.subscriptions.write().await;
        let subscription = subscriptions
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("subscription".into()))?;
        subscription.is_active = false;
        subscription.updated_at = Utc::now();
        Ok(subscription.clone())
    }

    async fn delete_subscription(&self, id: i64) -> StoreResult<()> {
        let mut subscriptions = self.subscriptions.write().await;
        if subscriptions.rows.remove(&id).is_none() {
            return Err(StoreError::NotFound("subscription".into()));
        }
        metrics::gauge!("pawhaven_subscriptions_total").set(subscriptions.rows.len() as f64);
        Ok(())
    }

    async fn subscriber_counts(&self) -> StoreResult<SubscriberCounts> {
        let subscriptions = self.subscriptions.read().await;
        let total_subscribers = subscriptions.rows.len() as u64;
        let active_subscribers = subscriptions
            .rows
            .values()
            .filter(|subscription| subscription.is_active)
            .count() as u64;
        Ok(SubscriberCounts { active_subscribers, total_subscribers })
    }

    async fn health_check(&self) -> StoreResult<()> {
        // In-memory backend is always "healthy" if the process is running.
        // Durable backends probe connectivity instead.
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AdoptionStatus;

    fn pet_payload(name: &str) -> PetPayload {
        PetPayload {
            name: Some(name.to_string()),
            pet_type: Some("dog".to_string()),
            age: Some("young".to_string()),
            gender: Some("female".to_string()),
            ..PetPayload::default()
        }
    }

    fn adoption_payload(pet_id: i64) -> AdoptionPayload {
        AdoptionPayload {
            adopter_name: Some("Dana Reed".to_string()),
            adopter_email: Some("dana@example.com".to_string()),
            adopter_phone: Some("555-0101".to_string()),
            pet_id: Some(pet_id),
            ..AdoptionPayload::default()
        }
    }

    fn donation_payload(amount: f64) -> DonationPayload {
        DonationPayload { amount: Some(amount), ..DonationPayload::default() }
    }

    #[tokio::test]
    async fn adoption_lifecycle_updates_pet() {
        let store = InMemoryStore::new();
        let pet = store.create_pet(pet_payload("Luna")).await.expect("pet");
        assert_eq!(pet.status, PetStatus::Available);
        let adoption = store
            .create_adoption(adoption_payload(pet.id))
            .await
            .expect("adoption");
        assert_eq!(adoption.status, AdoptionStatus::Pending);

        let approved = store
            .transition_adoption(adoption.id, AdoptionAction::Approve)
            .await
            .expect("approve");
        assert_eq!(approved.status, AdoptionStatus::Approved);
        assert!(approved.approved_at.is_some());
        assert_eq!(store.get_pet(pet.id).await.expect("pet").status, PetStatus::Pending);

        let completed = store
            .transition_adoption(adoption.id, AdoptionAction::Complete)
            .await
            .expect("complete");
        assert_eq!(completed.status, AdoptionStatus::Completed);
        assert!(completed.completed_at.is_some());
        assert_eq!(store.get_pet(pet.id).await.expect("pet").status, PetStatus::Adopted);
    }

    #[tokio::test]
    async fn second_approve_is_rejected() {
        let store = InMemoryStore::new();
        let pet = store.create_pet(pet_payload("Max")).await.expect("pet");
        let adoption = store
            .create_adoption(adoption_payload(pet.id))
            .await
            .expect("adoption");
        store
            .transition_adoption(adoption.id, AdoptionAction::Approve)
            .await
            .expect("first approve");
        let err = store
            .transition_adoption(adoption.id, AdoptionAction::Approve)
            .await
            .expect_err("second approve");
        assert!(matches!(err, StoreError::InvalidTransition(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_approves_have_one_winner() {
        let store = Arc::new(InMemoryStore::new());
        let pet = store.create_pet(pet_payload("Rio")).await.expect("pet");
        let adoption = store
            .create_adoption(adoption_payload(pet.id))
            .await
            .expect("adoption");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let id = adoption.id;
            handles.push(tokio::spawn(async move {
                store.transition_adoption(id, AdoptionAction::Approve).await
            }));
        }
        let mut successes = 0;
        for handle in handles {
            if handle.await.expect("join").is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn deleting_a_pet_removes_its_applications() {
        let store = InMemoryStore::new();
        let pet = store.create_pet(pet_payload("Ivy")).await.expect("pet");
        let other = store.create_pet(pet_payload("Olly")).await.expect("pet");
        let doomed = store
            .create_adoption(adoption_payload(pet.id))
            .await
            .expect("adoption");
        let kept = store
            .create_adoption(adoption_payload(other.id))
            .await
            .expect("adoption");

        store.delete_pet(pet.id).await.expect("delete");
        let err = store.get_adoption(doomed.id).await.expect_err("cascaded");
        assert!(matches!(err, StoreError::NotFound(_)));
        store.get_adoption(kept.id).await.expect("unaffected");
    }

    #[tokio::test]
    async fn adoption_requires_existing_pet() {
        let store = InMemoryStore::new();
        let err = store
            .create_adoption(adoption_payload(999))
            .await
            .expect_err("missing pet");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn mark_adopted_leaves_pending_applications() {
        let store = InMemoryStore::new();
        let pet = store.create_pet(pet_payload("Juno")).await.expect("pet");
        let adoption = store
            .create_adoption(adoption_payload(pet.id))
            .await
            .expect("adoption");

        let marked = store.mark_pet_adopted(pet.id).await.expect("mark");
        assert_eq!(marked.status, PetStatus::Adopted);
        // The direct override does not touch the application.
        let untouched = store.get_adoption(adoption.id).await.expect("adoption");
        assert_eq!(untouched.status, AdoptionStatus::Pending);
    }

    #[tokio::test]
    async fn pet_listing_filters_searches_and_orders() {
        let store = InMemoryStore::new();
        store.create_pet(pet_payload("Ziggy")).await.expect("pet");
        let mut cat = pet_payload("Arrow");
        cat.pet_type = Some("cat".to_string());
        cat.breed = Some("Maine Coon".to_string());
        store.create_pet(cat).await.expect("pet");

        let cats = store
            .list_pets(
                PetFilter {
                    pet_type: Some(crate::model::PetType::Cat),
                    ..PetFilter::default()
                },
                PageRequest::default(),
            )
            .await
            .expect("list");
        assert_eq!(cats.total, 1);
        assert_eq!(cats.items[0].name, "Arrow");

        let by_breed = store
            .list_pets(
                PetFilter { search: Some("coon".to_string()), ..PetFilter::default() },
                PageRequest::default(),
            )
            .await
            .expect("search");
        assert_eq!(by_breed.total, 1);

        let by_name = store
            .list_pets(
                PetFilter { ordering: Some("name".to_string()), ..PetFilter::default() },
                PageRequest::default(),
            )
            .await
            .expect("order");
        assert_eq!(by_name.items[0].name, "Arrow");
        assert_eq!(by_name.items[1].name, "Ziggy");
    }

    #[tokio::test]
    async fn pagination_counts_the_filtered_total() {
        let store = InMemoryStore::new();
        for i in 0..25 {
            store.create_pet(pet_payload(&format!("Pet {i:02}"))).await.expect("pet");
        }
        let page = store
            .list_pets(PetFilter::default(), PageRequest::new(Some(3), Some(10)))
            .await
            .expect("page");
        assert_eq!(page.total, 25);
        assert_eq!(page.items.len(), 5);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[tokio::test]
    async fn duplicate_transaction_id_is_a_field_error() {
        let store = InMemoryStore::new();
        let mut first = donation_payload(25.0);
        first.transaction_id = Some("txn-1".to_string());
        store.create_donation(first.clone()).await.expect("donation");
        let err = store.create_donation(first).await.expect_err("duplicate");
        match err {
            StoreError::Validation(errors) => {
                assert!(errors.0.contains_key("transaction_id"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn statistics_cover_completed_donations_only() {
        let store = InMemoryStore::new();
        for amount in [25.0, 50.0, 100.0] {
            let donation = store
                .create_donation(donation_payload(amount))
                .await
                .expect("donation");
            store.complete_donation(donation.id).await.expect("complete");
        }
        store.create_donation(donation_payload(999.0)).await.expect("pending");

        let stats = store.donation_statistics().await.expect("stats");
        assert_eq!(stats.total_amount, 175.0);
        assert_eq!(stats.total_donations, 3);
        assert_eq!(stats.average_amount, 58.33);
    }

    #[tokio::test]
    async fn subscribe_unsubscribe_reactivate() {
        let store = InMemoryStore::new();
        let payload = SubscriptionPayload { email: Some("pat@example.com".to_string()) };
        let created = store.subscribe(payload.clone()).await.expect("subscribe");
        assert!(!created.reactivated);
        assert!(created.subscription.is_active);

        let err = store.subscribe(payload.clone()).await.expect_err("duplicate");
        assert!(matches!(err, StoreError::DuplicateSubscription(_)));

        // Case variants hit the same row.
        let shouted = SubscriptionPayload { email: Some("PAT@EXAMPLE.COM".to_string()) };
        let err = store.subscribe(shouted).await.expect_err("case duplicate");
        assert!(matches!(err, StoreError::DuplicateSubscription(_)));

        let off = store.unsubscribe(created.subscription.id).await.expect("unsubscribe");
        assert!(!off.is_active);

        let back = store.subscribe(payload).await.expect("reactivate");
        assert!(back.reactivated);
        assert_eq!(back.subscription.id, created.subscription.id);
        assert_eq!(back.subscription.subscribed_at, created.subscription.subscribed_at);

        let counts = store.subscriber_counts().await.expect("counts");
        assert_eq!(counts, SubscriberCounts { active_subscribers: 1, total_subscribers: 1 });
    }

    #[tokio::test]
    async fn update_subscription_enforces_email_uniqueness() {
        let store = InMemoryStore::new();
        let pat = store
            .subscribe(SubscriptionPayload { email: Some("pat@example.com".to_string()) })
            .await
            .expect("pat");
        store
            .subscribe(SubscriptionPayload { email: Some("sam@example.com".to_string()) })
            .await
            .expect("sam");

        let moved = store
            .update_subscription(
                pat.subscription.id,
                SubscriptionPayload { email: Some("pat@new.example.com".to_string()) },
            )
            .await
            .expect("update");
        assert_eq!(moved.email, "pat@new.example.com");
        assert_eq!(moved.id, pat.subscription.id);

        // Taking another subscriber's address is a field error, case-insensitively.
        let err = store
            .update_subscription(
                pat.subscription.id,
                SubscriptionPayload { email: Some("SAM@EXAMPLE.COM".to_string()) },
            )
            .await
            .expect_err("taken");
        match err {
            StoreError::Validation(errors) => {
                assert_eq!(errors.0["email"], "subscription with this email already exists");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Re-submitting the current address is not a conflict with itself.
        let same = store
            .update_subscription(
                pat.subscription.id,
                SubscriptionPayload { email: Some("pat@new.example.com".to_string()) },
            )
            .await
            .expect("same address");
        assert_eq!(same.email, "pat@new.example.com");

        let err = store
            .update_subscription(999, SubscriptionPayload::default())
            .await
            .expect_err("missing");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn contact_read_flag_round_trip() {
        let store = InMemoryStore::new();
        let contact = store
            .create_contact(ContactPayload {
                name: Some("Sam".to_string()),
                email: Some("sam@example.com".to_string()),
                message: Some("Hello".to_string()),
                ..ContactPayload::default()
            })
            .await
            .expect("contact");
        assert!(!contact.is_read);
        let read = store.set_contact_read(contact.id, true).await.expect("read");
        assert!(read.is_read);
        let unread = store.set_contact_read(contact.id, false).await.expect("unread");
        assert!(!unread.is_read);
    }

    #[tokio::test]
    async fn volunteer_transitions_are_guarded() {
        let store = InMemoryStore::new();
        let volunteer = store
            .create_volunteer(VolunteerPayload {
                name: Some("Jo".to_string()),
                email: Some("jo@example.com".to_string()),
                interest: Some("care".to_string()),
                ..VolunteerPayload::default()
            })
            .await
            .expect("volunteer");
        store
            .transition_volunteer(volunteer.id, VolunteerAction::Approve)
            .await
            .expect("approve");
        let err = store
            .transition_volunteer(volunteer.id, VolunteerAction::Reject)
            .await
            .expect_err("already decided");
        assert!(matches!(err, StoreError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = InMemoryStore::new();
        let first = store.create_pet(pet_payload("One")).await.expect("pet");
        store.delete_pet(first.id).await.expect("delete");
        let second = store.create_pet(pet_payload("Two")).await.expect("pet");
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn backend_health_and_identity() {
        let store = InMemoryStore::new();
        store.health_check().await.expect("health");
        assert!(!store.is_durable());
        assert_eq!(store.backend_name(), "memory");
    }
}
