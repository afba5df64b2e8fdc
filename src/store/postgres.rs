//! Postgres-backed implementation of the adoption-center store.
//!
//! # What this module is
//! This module implements the `ShelterStore` trait using Postgres (via `sqlx`) as the durable
//! backing store for the six entity tables.
//!
//! # Key invariants
//! - Each table's `id` comes from a Postgres sequence: monotonic, never reused.
//! - Status transitions are conditional `UPDATE ... WHERE status = <required>` statements inside
//!   one transaction, so two racing actions resolve to one winner at the database.
//! - Pet deletion cascades to adoptions through the foreign key.
//! - Uniqueness (donation transaction ids, subscription emails) is enforced by unique indexes;
//!   violation code 23505 is mapped back to domain errors.
//!
//! # Concurrency model
//! - The store is shared across async handlers; `sqlx::PgPool` manages concurrency.
//! - Each method acquires a pooled connection; pool sizing controls throughput.
//!
//! # Operational notes
//! - Migrations are executed at startup via `sqlx::migrate!("./migrations")` to ensure the schema
//!   is present and compatible before serving API requests.
//! - Connection pooling/timeouts are explicitly configured because hanging forever on DB failures
//!   is unacceptable in production.
//! - Database URLs may contain credentials; avoid logging them.
//! - Dynamic SQL is limited to ORDER BY clauses built from the fixed per-entity allowlists.
use super::{
    AdoptionFilter, ContactFilter, DonationFilter, Ordering, Page, PageRequest, PetFilter,
    ShelterStore, StoreError, StoreResult, SubscribeOutcome, SubscriberCounts, SubscriptionFilter,
    VolunteerFilter, resolve_ordering,
};
use crate::config::PostgresConfig;
use crate::model::transitions::{adoption_required, pet_status_after};
use crate::model::{
    Adoption, AdoptionAction, AdoptionPayload, AdoptionStatus, Contact, ContactPayload,
    ContactSubject, Donation, DonationPayload, DonationStatistics, PaymentStatus, Pet, PetAge,
    PetGender, PetPayload, PetStatus, PetType, Subscription, SubscriptionPayload,
    ValidationErrors, Volunteer, VolunteerAction, VolunteerInterest, VolunteerPayload,
    VolunteerStatus, round_cents, transitions,
};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::str::FromStr;
use std::time::Duration;

const PET_ORDER_FIELDS: &[&str] = &["created_at", "name"];
const ADOPTION_ORDER_FIELDS: &[&str] = &["applied_at", "status"];
const CONTACT_ORDER_FIELDS: &[&str] = &["created_at"];
const VOLUNTEER_ORDER_FIELDS: &[&str] = &["applied_at", "status"];
const DONATION_ORDER_FIELDS: &[&str] = &["created_at", "amount"];
const SUBSCRIPTION_ORDER_FIELDS: &[&str] = &["subscribed_at"];

const PET_COLUMNS: &str = "id, name, pet_type, breed, age, gender, is_vaccinated, \
     is_neutered_spayed, health_status, status, description, created_at, updated_at";
const ADOPTION_COLUMNS: &str = "id, adopter_name, adopter_email, adopter_phone, pet_id, status, \
     reason_for_adoption, home_type, other_pets, applied_at, approved_at, completed_at, updated_at";
const CONTACT_COLUMNS: &str =
    "id, name, email, phone, subject, message, is_read, created_at, updated_at";
const VOLUNTEER_COLUMNS: &str =
    "id, name, email, phone, interest, bio, availability, status, applied_at, updated_at";
const DONATION_COLUMNS: &str = "id, donor_name, donor_email, amount, is_custom, payment_status, \
     transaction_id, message, created_at, completed_at, updated_at";
const SUBSCRIPTION_COLUMNS: &str = "id, email, is_active, subscribed_at, updated_at";

/// Durable adoption-center store backed by Postgres.
///
/// # Errors
/// - Connection and query failures are surfaced as [`StoreError::Unexpected`].
///
/// # Example
/// ```rust,no_run
/// use pawhaven::config::PostgresConfig;
/// use pawhaven::store::postgres::PostgresStore;
///
/// async fn open(pg: PostgresConfig) {
///     let _ = PostgresStore::connect(&pg).await;
/// }
/// ```
pub struct PostgresStore {
    pool: PgPool,
}

/// Row shape for the `pets` table.
///
/// DB-facing structs are kept separate from domain types to isolate schema
/// details and make it explicit where string enums become domain enums.
#[derive(Debug, Clone, FromRow)]
struct DbPet {
    id: i64,
    name: String,
    pet_type: String,
    breed: Option<String>,
    age: String,
    gender: String,
    is_vaccinated: bool,
    is_neutered_spayed: bool,
    health_status: Option<String>,
    status: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct DbAdoption {
    id: i64,
    adopter_name: String,
    adopter_email: String,
    adopter_phone: String,
    pet_id: i64,
    status: String,
    reason_for_adoption: Option<String>,
    home_type: Option<String>,
    other_pets: Option<String>,
    applied_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct DbContact {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    subject: String,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct DbVolunteer {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    interest: String,
    bio: Option<String>,
    availability: Option<String>,
    status: String,
    applied_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct DbDonation {
    id: i64,
    donor_name: Option<String>,
    donor_email: Option<String>,
    amount: f64,
    is_custom: bool,
    payment_status: String,
    transaction_id: Option<String>,
    message: Option<String>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct DbSubscription {
    id: i64,
    email: String,
    is_active: bool,
    subscribed_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostgresStore {
    /// Connect to Postgres and run embedded migrations.
    ///
    /// Migrations run *before* serving requests so handlers can assume the
    /// schema exists; if they fail we fail startup rather than serve
    /// partially functional endpoints.
    ///
    /// # Errors
    /// - Connection, migration, or pool setup failures.
    pub async fn connect(pg: &PostgresConfig) -> StoreResult<Self> {
        // Pool tuning:
        // - `max_connections` caps concurrent DB work and protects the DB from overload.
        // - `acquire_timeout` bounds how long a request waits for a pooled connection.
        let connect_options = PgConnectOptions::from_str(&pg.url).map_err(anyhow::Error::from)?;
        let pool = PgPoolOptions::new()
            .max_connections(pg.max_connections)
            .acquire_timeout(Duration::from_millis(pg.acquire_timeout_ms))
            .connect_with(connect_options)
            .await
            .map_err(anyhow::Error::from)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(anyhow::Error::from)?;

        Ok(Self { pool })
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().map(|code| code == "23505").unwrap_or(false);
    }
    false
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

fn order_direction(ordering: Ordering) -> &'static str {
    if ordering.descending { "DESC" } else { "ASC" }
}

// The needle must match literally, so LIKE metacharacters are escaped
// before wrapping in wildcards.
fn like_pattern(search: Option<&str>) -> Option<String> {
    search.map(|needle| {
        let escaped = needle
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{escaped}%")
    })
}

fn parse_pet_status(value: &str) -> StoreResult<PetStatus> {
    PetStatus::parse(value).ok_or_else(|| StoreError::Unexpected(anyhow!("invalid pet status {value}")))
}

fn parse_adoption_status(value: &str) -> StoreResult<AdoptionStatus> {
    AdoptionStatus::parse(value)
        .ok_or_else(|| StoreError::Unexpected(anyhow!("invalid adoption status {value}")))
}

fn pet_from_db(row: DbPet) -> StoreResult<Pet> {
    Ok(Pet {
        id: row.id,
        name: row.name,
        pet_type: PetType::parse(&row.pet_type)
            .ok_or_else(|| StoreError::Unexpected(anyhow!("invalid pet type {}", row.pet_type)))?,
        breed: row.breed,
        age: PetAge::parse(&row.age)
            .ok_or_else(|| StoreError::Unexpected(anyhow!("invalid pet age {}", row.age)))?,
        gender: PetGender::parse(&row.gender)
            .ok_or_else(|| StoreError::Unexpected(anyhow!("invalid pet gender {}", row.gender)))?,
        is_vaccinated: row.is_vaccinated,
        is_neutered_spayed: row.is_neutered_spayed,
        health_status: row.health_status,
        status: parse_pet_status(&row.status)?,
        description: row.description,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn adoption_from_db(row: DbAdoption) -> StoreResult<Adoption> {
    Ok(Adoption {
        id: row.id,
        adopter_name: row.adopter_name,
        adopter_email: row.adopter_email,
        adopter_phone: row.adopter_phone,
        pet_id: row.pet_id,
        status: parse_adoption_status(&row.status)?,
        reason_for_adoption: row.reason_for_adoption,
        home_type: row.home_type,
        other_pets: row.other_pets,
        applied_at: row.applied_at,
        approved_at: row.approved_at,
        completed_at: row.completed_at,
        updated_at: row.updated_at,
    })
}

fn contact_from_db(row: DbContact) -> StoreResult<Contact> {
    Ok(Contact {
        id: row.id,
        name: row.name,
        email: row.email,
        phone: row.phone,
        subject: ContactSubject::parse(&row.subject)
            .ok_or_else(|| StoreError::Unexpected(anyhow!("invalid subject {}", row.subject)))?,
        message: row.message,
        is_read: row.is_read,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn volunteer_from_db(row: DbVolunteer) -> StoreResult<Volunteer> {
    Ok(Volunteer {
        id: row.id,
        name: row.name,
        email: row.email,
        phone: row.phone,
        interest: VolunteerInterest::parse(&row.interest)
            .ok_or_else(|| StoreError::Unexpected(anyhow!("invalid interest {}", row.interest)))?,
        bio: row.bio,
        availability: row.availability,
        status: VolunteerStatus::parse(&row.status).ok_or_else(|| {
            StoreError::Unexpected(anyhow!("invalid volunteer status {}", row.status))
        })?,
        applied_at: row.applied_at,
        updated_at: row.updated_at,
    })
}

fn donation_from_db(row: DbDonation) -> StoreResult<Donation> {
    Ok(Donation {
        id: row.id,
        donor_name: row.donor_name,
        donor_email: row.donor_email,
        amount: row.amount,
        is_custom: row.is_custom,
        payment_status: PaymentStatus::parse(&row.payment_status).ok_or_else(|| {
            StoreError::Unexpected(anyhow!("invalid payment status {}", row.payment_status))
        })?,
        transaction_id: row.transaction_id,
        message: row.message,
        created_at: row.created_at,
        completed_at: row.completed_at,
        updated_at: row.updated_at,
    })
}

fn subscription_from_db(row: DbSubscription) -> Subscription {
    Subscription {
        id: row.id,
        email: row.email,
        is_active: row.is_active,
        subscribed_at: row.subscribed_at,
        updated_at: row.updated_at,
    }
}

async fn pet_exists(tx: &mut Transaction<'_, Postgres>, pet_id: i64) -> StoreResult<bool> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pets WHERE id = $1")
        .bind(pet_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(anyhow::Error::from)?;
    Ok(count > 0)
}

#[async_trait]
impl ShelterStore for PostgresStore {
    async fn list_pets(&self, filter: PetFilter, page: PageRequest) -> StoreResult<Page<Pet>> {
        let ordering =
            resolve_ordering(filter.ordering.as_deref(), PET_ORDER_FIELDS, Ordering {
                field: "created_at",
                descending: true,
            });
        let dir = order_direction(ordering);
        // ORDER BY fields come from the fixed allowlist above, never from input.
        let order_clause = match ordering.field {
            "name" => format!("LOWER(name) {dir}, id {dir}"),
            _ => format!("created_at {dir}, id {dir}"),
        };
        let where_clause = "($1::text IS NULL OR pet_type = $1) \
             AND ($2::text IS NULL OR age = $2) \
             AND ($3::text IS NULL OR gender = $3) \
             AND ($4::text IS NULL OR status = $4) \
             AND ($5::text IS NULL OR name ILIKE $5 OR breed ILIKE $5 OR description ILIKE $5)";
        let search = like_pattern(filter.search.as_deref());

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM pets WHERE {where_clause}"
        ))
        .bind(filter.pet_type.map(|value| value.as_str()))
        .bind(filter.age.map(|value| value.as_str()))
        .bind(filter.gender.map(|value| value.as_str()))
        .bind(filter.status.map(|value| value.as_str()))
        .bind(search.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        let rows = sqlx::query_as::<_, DbPet>(&format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE {where_clause} \
             ORDER BY {order_clause} LIMIT $6 OFFSET $7"
        ))
        .bind(filter.pet_type.map(|value| value.as_str()))
        .bind(filter.age.map(|value| value.as_str()))
        .bind(filter.gender.map(|value| value.as_str()))
        .bind(filter.status.map(|value| value.as_str()))
        .bind(search.as_deref())
        .bind(page.page_size as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        let items = rows.into_iter().map(pet_from_db).collect::<StoreResult<Vec<_>>>()?;
        Ok(Page { items, total: total as u64, page: page.page, page_size: page.page_size })
    }

    async fn get_pet(&self, id: i64) -> StoreResult<Pet> {
        let row = sqlx::query_as::<_, DbPet>(&format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("pet".into()))?;
        pet_from_db(row)
    }

    async fn create_pet(&self, payload: PetPayload) -> StoreResult<Pet> {
        let new = payload.into_new()?;
        let row = sqlx::query_as::<_, DbPet>(&format!(
            "INSERT INTO pets (name, pet_type, breed, age, gender, is_vaccinated, \
             is_neutered_spayed, health_status, status, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {PET_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(new.pet_type.as_str())
        .bind(&new.breed)
        .bind(new.age.as_str())
        .bind(new.gender.as_str())
        .bind(new.is_vaccinated)
        .bind(new.is_neutered_spayed)
        .bind(&new.health_status)
        .bind(new.status.as_str())
        .bind(&new.description)
        .fetch_one(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;
        pet_from_db(row)
    }

    async fn update_pet(&self, id: i64, payload: PetPayload) -> StoreResult<Pet> {
        // Read-merge-write under FOR UPDATE so concurrent partial updates
        // don't clobber each other's fields.
        let mut tx = self.pool.begin().await.map_err(anyhow::Error::from)?;
        let row = sqlx::query_as::<_, DbPet>(&format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("pet".into()))?;
        let mut pet = pet_from_db(row)?;
        payload.apply_to(&mut pet)?;

        let row = sqlx::query_as::<_, DbPet>(&format!(
            "UPDATE pets SET name = $2, pet_type = $3, breed = $4, age = $5, gender = $6, \
             is_vaccinated = $7, is_neutered_spayed = $8, health_status = $9, status = $10, \
             description = $11, updated_at = now() WHERE id = $1 RETURNING {PET_COLUMNS}"
        ))
        .bind(id)
        .bind(&pet.name)
        .bind(pet.pet_type.as_str())
        .bind(&pet.breed)
        .bind(pet.age.as_str())
        .bind(pet.gender.as_str())
        .bind(pet.is_vaccinated)
        .bind(pet.is_neutered_spayed)
        .bind(&pet.health_status)
        .bind(pet.status.as_str())
        .bind(&pet.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(anyhow::Error::from)?;
        tx.commit().await.map_err(anyhow::Error::from)?;
        pet_from_db(row)
    }

    async fn delete_pet(&self, id: i64) -> StoreResult<()> {
        // The adoptions FK is ON DELETE CASCADE; one statement removes both.
        let result = sqlx::query("DELETE FROM pets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(anyhow::Error::from)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("pet".into()));
        }
        Ok(())
    }

    async fn mark_pet_adopted(&self, id: i64) -> StoreResult<Pet> {
        // Operator override: unconditional, applications untouched.
        let row = sqlx::query_as::<_, DbPet>(&format!(
            "UPDATE pets SET status = 'adopted', updated_at = now() WHERE id = $1 \
             RETURNING {PET_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("pet".into()))?;
        pet_from_db(row)
    }

    async fn list_adoptions(
        &self,
        filter: AdoptionFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Adoption>> {
        let ordering =
            resolve_ordering(filter.ordering.as_deref(), ADOPTION_ORDER_FIELDS, Ordering {
                field: "applied_at",
                descending: true,
            });
        let dir = order_direction(ordering);
        let order_clause = match ordering.field {
            "status" => format!("status {dir}, id {dir}"),
            _ => format!("applied_at {dir}, id {dir}"),
        };
        let where_clause =
            "($1::text IS NULL OR status = $1) AND ($2::bigint IS NULL OR pet_id = $2)";

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM adoptions WHERE {where_clause}"
        ))
        .bind(filter.status.map(|value| value.as_str()))
        .bind(filter.pet_id)
        .fetch_one(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        let rows = sqlx::query_as::<_, DbAdoption>(&format!(
            "SELECT {ADOPTION_COLUMNS} FROM adoptions WHERE {where_clause} \
             ORDER BY {order_clause} LIMIT $3 OFFSET $4"
        ))
        .bind(filter.status.map(|value| value.as_str()))
        .bind(filter.pet_id)
        .bind(page.page_size as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        let items = rows
            .into_iter()
            .map(adoption_from_db)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Page { items, total: total as u64, page: page.page, page_size: page.page_size })
    }

    async fn get_adoption(&self, id: i64) -> StoreResult<Adoption> {
        let row = sqlx::query_as::<_, DbAdoption>(&format!(
            "SELECT {ADOPTION_COLUMNS} FROM adoptions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("adoption".into()))?;
        adoption_from_db(row)
    }

    async fn create_adoption(&self, payload: AdoptionPayload) -> StoreResult<Adoption> {
        let new = payload.into_new()?;
        let mut tx = self.pool.begin().await.map_err(anyhow::Error::from)?;
        if !pet_exists(&mut tx, new.pet_id).await? {
            return Err(StoreError::NotFound("pet".into()));
        }
        let row = sqlx::query_as::<_, DbAdoption>(&format!(
            "INSERT INTO adoptions (adopter_name, adopter_email, adopter_phone, pet_id, \
             reason_for_adoption, home_type, other_pets) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {ADOPTION_COLUMNS}"
        ))
        .bind(&new.adopter_name)
        .bind(&new.adopter_email)
        .bind(&new.adopter_phone)
        .bind(new.pet_id)
        .bind(&new.reason_for_adoption)
        .bind(&new.home_type)
        .bind(&new.other_pets)
        .fetch_one(&mut *tx)
        .await
        .map_err(anyhow::Error::from)?;
        tx.commit().await.map_err(anyhow::Error::from)?;
        adoption_from_db(row)
    }

    async fn update_adoption(&self, id: i64, payload: AdoptionPayload) -> StoreResult<Adoption> {
        let mut tx = self.pool.begin().await.map_err(anyhow::Error::from)?;
        let row = sqlx::query_as::<_, DbAdoption>(&format!(
            "SELECT {ADOPTION_COLUMNS} FROM adoptions WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("adoption".into()))?;
        let mut adoption = adoption_from_db(row)?;
        if let Some(pet_id) = payload.pet_id
            && !pet_exists(&mut tx, pet_id).await?
        {
            return Err(StoreError::NotFound("pet".into()));
        }
        payload.apply_to(&mut adoption)?;

        let row = sqlx::query_as::<_, DbAdoption>(&format!(
            "UPDATE adoptions SET adopter_name = $2, adopter_email = $3, adopter_phone = $4, \
             pet_id = $5, reason_for_adoption = $6, home_type = $7, other_pets = $8, \
             updated_at = now() WHERE id = $1 RETURNING {ADOPTION_COLUMNS}"
        ))
        .bind(id)
        .bind(&adoption.adopter_name)
        .bind(&adoption.adopter_email)
        .bind(&adoption.adopter_phone)
        .bind(adoption.pet_id)
        .bind(&adoption.reason_for_adoption)
        .bind(&adoption.home_type)
        .bind(&adoption.other_pets)
        .fetch_one(&mut *tx)
        .await
        .map_err(anyhow::Error::from)?;
        tx.commit().await.map_err(anyhow::Error::from)?;
        adoption_from_db(row)
    }

    async fn delete_adoption(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM adoptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(anyhow::Error::from)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("adoption".into()));
        }
        Ok(())
    }

    async fn transition_adoption(
        &self,
        id: i64,
        action: AdoptionAction,
    ) -> StoreResult<Adoption> {
        let mut tx = self.pool.begin().await.map_err(anyhow::Error::from)?;
        // The status precondition is enforced by the database: the UPDATE
        // matches zero rows when another request got there first.
        let query = match action {
            AdoptionAction::Approve => format!(
                "UPDATE adoptions SET status = 'approved', approved_at = now(), \
                 updated_at = now() WHERE id = $1 AND status = 'pending' \
                 RETURNING {ADOPTION_COLUMNS}"
            ),
            AdoptionAction::Reject => format!(
                "UPDATE adoptions SET status = 'rejected', updated_at = now() \
                 WHERE id = $1 AND status = 'pending' RETURNING {ADOPTION_COLUMNS}"
            ),
            AdoptionAction::Complete => format!(
                "UPDATE adoptions SET status = 'completed', completed_at = now(), \
                 updated_at = now() WHERE id = $1 AND status = 'approved' \
                 RETURNING {ADOPTION_COLUMNS}"
            ),
        };
        let row = sqlx::query_as::<_, DbAdoption>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(anyhow::Error::from)?;

        let Some(row) = row else {
            // Distinguish a missing row from a precondition failure.
            let actual = sqlx::query_scalar::<_, String>(
                "SELECT status FROM adoptions WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(anyhow::Error::from)?
            .ok_or_else(|| StoreError::NotFound("adoption".into()))?;
            return Err(StoreError::InvalidTransition(transitions::TransitionError {
                action: action.label(),
                required: adoption_required(action).as_str(),
                actual: parse_adoption_status(&actual)?.as_str(),
            }));
        };

        let adoption = adoption_from_db(row)?;
        if let Some(pet_status) = pet_status_after(action) {
            sqlx::query("UPDATE pets SET status = $2, updated_at = now() WHERE id = $1")
                .bind(adoption.pet_id)
                .bind(pet_status.as_str())
                .execute(&mut *tx)
                .await
                .map_err(anyhow::Error::from)?;
        }
        tx.commit().await.map_err(anyhow::Error::from)?;
        metrics::counter!("pawhaven_adoption_transitions_total", "action" => action.label())
            .increment(1);
        Ok(adoption)
    }

    async fn list_contacts(
        &self,
        filter: ContactFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Contact>> {
        let ordering =
            resolve_ordering(filter.ordering.as_deref(), CONTACT_ORDER_FIELDS, Ordering {
                field: "created_at",
                descending: true,
            });
        let dir = order_direction(ordering);
        let order_clause = format!("created_at {dir}, id {dir}");
        let where_clause = "($1::boolean IS NULL OR is_read = $1) \
             AND ($2::text IS NULL OR subject = $2) \
             AND ($3::text IS NULL OR name ILIKE $3 OR email ILIKE $3 OR message ILIKE $3)";
        let search = like_pattern(filter.search.as_deref());

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM contacts WHERE {where_clause}"
        ))
        .bind(filter.is_read)
        .bind(filter.subject.map(|value| value.as_str()))
        .bind(search.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        let rows = sqlx::query_as::<_, DbContact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE {where_clause} \
             ORDER BY {order_clause} LIMIT $4 OFFSET $5"
        ))
        .bind(filter.is_read)
        .bind(filter.subject.map(|value| value.as_str()))
        .bind(search.as_deref())
        .bind(page.page_size as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        let items = rows
            .into_iter()
            .map(contact_from_db)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Page { items, total: total as u64, page: page.page, page_size: page.page_size })
    }

    async fn get_contact(&self, id: i64) -> StoreResult<Contact> {
        let row = sqlx::query_as::<_, DbContact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("contact".into()))?;
        contact_from_db(row)
    }

    async fn create_contact(&self, payload: ContactPayload) -> StoreResult<Contact> {
        let new = payload.into_new()?;
        let row = sqlx::query_as::<_, DbContact>(&format!(
            "INSERT INTO contacts (name, email, phone, subject, message) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(new.subject.as_str())
        .bind(&new.message)
        .fetch_one(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;
        contact_from_db(row)
    }

    async fn update_contact(&self, id: i64, payload: ContactPayload) -> StoreResult<Contact> {
        let mut tx = self.pool.begin().await.map_err(anyhow::Error::from)?;
        let row = sqlx::query_as::<_, DbContact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("contact".into()))?;
        let mut contact = contact_from_db(row)?;
        payload.apply_to(&mut contact)?;

        let row = sqlx::query_as::<_, DbContact>(&format!(
            "UPDATE contacts SET name = $2, email = $3, phone = $4, subject = $5, \
             message = $6, updated_at = now() WHERE id = $1 RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(contact.subject.as_str())
        .bind(&contact.message)
        .fetch_one(&mut *tx)
        .await
        .map_err(anyhow::Error::from)?;
        tx.commit().await.map_err(anyhow::Error::from)?;
        contact_from_db(row)
    }

    async fn delete_contact(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(anyhow::Error::from)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("contact".into()));
        }
        Ok(())
    }

    async fn set_contact_read(&self, id: i64, is_read: bool) -> StoreResult<Contact> {
        let row = sqlx::query_as::<_, DbContact>(&format!(
            "UPDATE contacts SET is_read = $2, updated_at = now() WHERE id = $1 \
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id)
        .bind(is_read)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("contact".into()))?;
        contact_from_db(row)
    }

    async fn list_volunteers(
        &self,
        filter: VolunteerFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Volunteer>> {
        let ordering =
            resolve_ordering(filter.ordering.as_deref(), VOLUNTEER_ORDER_FIELDS, Ordering {
                field: "applied_at",
                descending: true,
            });
        let dir = order_direction(ordering);
        let order_clause = match ordering.field {
            "status" => format!("status {dir}, id {dir}"),
            _ => format!("applied_at {dir}, id {dir}"),
        };
        let where_clause = "($1::text IS NULL OR status = $1) \
             AND ($2::text IS NULL OR interest = $2) \
             AND ($3::text IS NULL OR name ILIKE $3 OR email ILIKE $3)";
        let search = like_pattern(filter.search.as_deref());

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM volunteers WHERE {where_clause}"
        ))
        .bind(filter.status.map(|value| value.as_str()))
        .bind(filter.interest.map(|value| value.as_str()))
        .bind(search.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        let rows = sqlx::query_as::<_, DbVolunteer>(&format!(
            "SELECT {VOLUNTEER_COLUMNS} FROM volunteers WHERE {where_clause} \
             ORDER BY {order_clause} LIMIT $4 OFFSET $5"
        ))
        .bind(filter.status.map(|value| value.as_str()))
        .bind(filter.interest.map(|value| value.as_str()))
        .bind(search.as_deref())
        .bind(page.page_size as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        let items = rows
            .into_iter()
            .map(volunteer_from_db)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Page { items, total: total as u64, page: page.page, page_size: page.page_size })
    }

    async fn get_volunteer(&self, id: i64) -> StoreResult<Volunteer> {
        let row = sqlx::query_as::<_, DbVolunteer>(&format!(
            "SELECT {VOLUNTEER_COLUMNS} FROM volunteers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("volunteer".into()))?;
        volunteer_from_db(row)
    }

    async fn create_volunteer(&self, payload: VolunteerPayload) -> StoreResult<Volunteer> {
        let new = payload.into_new()?;
        let row = sqlx::query_as::<_, DbVolunteer>(&format!(
            "INSERT INTO volunteers (name, email, phone, interest, bio, availability) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {VOLUNTEER_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(new.interest.as_str())
        .bind(&new.bio)
        .bind(&new.availability)
        .fetch_one(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;
        volunteer_from_db(row)
    }

    async fn update_volunteer(
        &self,
        id: i64,
        payload: VolunteerPayload,
    ) -> StoreResult<Volunteer> {
        let mut tx = self.pool.begin().await.map_err(anyhow::Error::from)?;
        let row = sqlx::query_as::<_, DbVolunteer>(&format!(
            "SELECT {VOLUNTEER_COLUMNS} FROM volunteers WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("volunteer".into()))?;
        let mut volunteer = volunteer_from_db(row)?;
        payload.apply_to(&mut volunteer)?;

        let row = sqlx::query_as::<_, DbVolunteer>(&format!(
            "UPDATE volunteers SET name = $2, email = $3, phone = $4, interest = $5, \
             bio = $6, availability = $7, updated_at = now() WHERE id = $1 \
             RETURNING {VOLUNTEER_COLUMNS}"
        ))
        .bind(id)
        .bind(&volunteer.name)
        .bind(&volunteer.email)
        .bind(&volunteer.phone)
        .bind(volunteer.interest.as_str())
        .bind(&volunteer.bio)
        .bind(&volunteer.availability)
        .fetch_one(&mut *tx)
        .await
        .map_err(anyhow::Error::from)?;
        tx.commit().await.map_err(anyhow::Error::from)?;
        volunteer_from_db(row)
    }

    async fn delete_volunteer(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM volunteers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(anyhow::Error::from)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("volunteer".into()));
        }
        Ok(())
    }

    async fn transition_volunteer(
        &self,
        id: i64,
        action: VolunteerAction,
    ) -> StoreResult<Volunteer> {
        let target = match action {
            VolunteerAction::Approve => "approved",
            VolunteerAction::Reject => "rejected",
        };
        let row = sqlx::query_as::<_, DbVolunteer>(&format!(
            "UPDATE volunteers SET status = $2, updated_at = now() \
             WHERE id = $1 AND status = 'pending' RETURNING {VOLUNTEER_COLUMNS}"
        ))
        .bind(id)
        .bind(target)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        let Some(row) = row else {
            let actual =
                sqlx::query_scalar::<_, String>("SELECT status FROM volunteers WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(anyhow::Error::from)?
                    .ok_or_else(|| StoreError::NotFound("volunteer".into()))?;
            let actual = VolunteerStatus::parse(&actual).ok_or_else(|| {
                StoreError::Unexpected(anyhow!("invalid volunteer status {actual}"))
            })?;
            return Err(StoreError::InvalidTransition(transitions::TransitionError {
                action: action.label(),
                required: VolunteerStatus::Pending.as_str(),
                actual: actual.as_str(),
            }));
        };
        metrics::counter!("pawhaven_volunteer_transitions_total", "action" => action.label())
            .increment(1);
        volunteer_from_db(row)
    }

    async fn list_donations(
        &self,
        filter: DonationFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Donation>> {
        let ordering =
            resolve_ordering(filter.ordering.as_deref(), DONATION_ORDER_FIELDS, Ordering {
                field: "created_at",
                descending: true,
            });
        let dir = order_direction(ordering);
        let order_clause = match ordering.field {
            "amount" => format!("amount {dir}, id {dir}"),
            _ => format!("created_at {dir}, id {dir}"),
        };
        let where_clause = "($1::text IS NULL OR payment_status = $1)";

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM donations WHERE {where_clause}"
        ))
        .bind(filter.payment_status.map(|value| value.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        let rows = sqlx::query_as::<_, DbDonation>(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE {where_clause} \
             ORDER BY {order_clause} LIMIT $2 OFFSET $3"
        ))
        .bind(filter.payment_status.map(|value| value.as_str()))
        .bind(page.page_size as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        let items = rows
            .into_iter()
            .map(donation_from_db)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Page { items, total: total as u64, page: page.page, page_size: page.page_size })
    }

    async fn get_donation(&self, id: i64) -> StoreResult<Donation> {
        let row = sqlx::query_as::<_, DbDonation>(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("donation".into()))?;
        donation_from_db(row)
    }

    async fn create_donation(&self, payload: DonationPayload) -> StoreResult<Donation> {
        let new = payload.into_new()?;
        let insert = sqlx::query_as::<_, DbDonation>(&format!(
            "INSERT INTO donations (donor_name, donor_email, amount, is_custom, \
             payment_status, transaction_id, message) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {DONATION_COLUMNS}"
        ))
        .bind(&new.donor_name)
        .bind(&new.donor_email)
        .bind(new.amount)
        .bind(new.is_custom)
        .bind(new.payment_status.as_str())
        .bind(&new.transaction_id)
        .bind(&new.message)
        .fetch_one(&self.pool)
        .await;
        match insert {
            Ok(row) => donation_from_db(row),
            Err(err) if is_unique_violation(&err) => Err(transaction_id_taken_error()),
            Err(err) => Err(StoreError::Unexpected(err.into())),
        }
    }

    async fn update_donation(&self, id: i64, payload: DonationPayload) -> StoreResult<Donation> {
        let mut tx = self.pool.begin().await.map_err(anyhow::Error::from)?;
        let row = sqlx::query_as::<_, DbDonation>(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("donation".into()))?;
        let mut donation = donation_from_db(row)?;
        payload.apply_to(&mut donation)?;

        let update = sqlx::query_as::<_, DbDonation>(&format!(
            "UPDATE donations SET donor_name = $2, donor_email = $3, amount = $4, \
             is_custom = $5, payment_status = $6, transaction_id = $7, message = $8, \
             updated_at = now() WHERE id = $1 RETURNING {DONATION_COLUMNS}"
        ))
        .bind(id)
        .bind(&donation.donor_name)
        .bind(&donation.donor_email)
        .bind(donation.amount)
        .bind(donation.is_custom)
        .bind(donation.payment_status.as_str())
        .bind(&donation.transaction_id)
        .bind(&donation.message)
        .fetch_one(&mut *tx)
        .await;
        let row = match update {
            Ok(row) => row,
            Err(err) if is_unique_violation(&err) => return Err(transaction_id_taken_error()),
            Err(err) => return Err(StoreError::Unexpected(err.into())),
        };
        tx.commit().await.map_err(anyhow::Error::from)?;
        donation_from_db(row)
    }

    async fn delete_donation(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM donations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(anyhow::Error::from)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("donation".into()));
        }
        Ok(())
    }

    async fn complete_donation(&self, id: i64) -> StoreResult<Donation> {
        let row = sqlx::query_as::<_, DbDonation>(&format!(
            "UPDATE donations SET payment_status = 'completed', completed_at = now(), \
             updated_at = now() WHERE id = $1 RETURNING {DONATION_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("donation".into()))?;
        donation_from_db(row)
    }

    async fn donation_statistics(&self) -> StoreResult<DonationStatistics> {
        let (total, count, average) = sqlx::query_as::<_, (f64, i64, f64)>(
            "SELECT COALESCE(SUM(amount), 0), COUNT(*), COALESCE(AVG(amount), 0) \
             FROM donations WHERE payment_status = 'completed'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;
        Ok(DonationStatistics {
            total_amount: round_cents(total),
            total_donations: count as u64,
            average_amount: round_cents(average),
            currency: "USD",
        })
    }

    async fn list_subscriptions(
        &self,
        filter: SubscriptionFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Subscription>> {
        let ordering = resolve_ordering(
            filter.ordering.as_deref(),
            SUBSCRIPTION_ORDER_FIELDS,
            Ordering { field: "subscribed_at", descending: true },
        );
        let dir = order_direction(ordering);
        let order_clause = format!("subscribed_at {dir}, id {dir}");
        let where_clause =
            "($1::boolean IS NULL OR is_active = $1) AND ($2::text IS NULL OR email ILIKE $2)";
        let search = like_pattern(filter.search.as_deref());

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM newsletter_subscriptions WHERE {where_clause}"
        ))
        .bind(filter.is_active)
        .bind(search.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        let rows = sqlx::query_as::<_, DbSubscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM newsletter_subscriptions WHERE {where_clause} \
             ORDER BY {order_clause} LIMIT $3 OFFSET $4"
        ))
        .bind(filter.is_active)
        .bind(search.as_deref())
        .bind(page.page_size as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        let items = rows.into_iter().map(subscription_from_db).collect();
        Ok(Page { items, total: total as u64, page: page.page, page_size: page.page_size })
    }

    async fn get_subscription(&self, id: i64) -> StoreResult<Subscription> {
        let row = sqlx::query_as::<_, DbSubscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM newsletter_subscriptions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("subscription".into()))?;
        Ok(subscription_from_db(row))
    }

    async fn update_subscription(
        &self,
        id: i64,
        payload: SubscriptionPayload,
    ) -> StoreResult<Subscription> {
        let mut tx = self.pool.begin().await.map_err(anyhow::Error::from)?;
        let row = sqlx::query_as::<_, DbSubscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM newsletter_subscriptions WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("subscription".into()))?;
        let mut subscription = subscription_from_db(row);
        payload.apply_to(&mut subscription)?;

        // The LOWER(email) unique index turns a stolen address into a 23505.
        let update = sqlx::query_as::<_, DbSubscription>(&format!(
            "UPDATE newsletter_subscriptions SET email = $2, updated_at = now() \
             WHERE id = $1 RETURNING {SUBSCRIPTION_COLUMNS}"
        ))
        .bind(id)
        .bind(&subscription.email)
        .fetch_one(&mut *tx)
        .await;
        let row = match update {
            Ok(row) => row,
            Err(err) if is_unique_violation(&err) => return Err(email_taken_error()),
            Err(err) => return Err(StoreError::Unexpected(err.into())),
        };
        tx.commit().await.map_err(anyhow::Error::from)?;
        Ok(subscription_from_db(row))
    }

    async fn subscribe(&self, payload: SubscriptionPayload) -> StoreResult<SubscribeOutcome> {
        let email = payload.into_email()?;
        let mut tx = self.pool.begin().await.map_err(anyhow::Error::from)?;
        // Lock any existing row for this address so a concurrent subscribe
        // serializes behind us; the LOWER(email) unique index backs this up.
        let existing = sqlx::query_as::<_, DbSubscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM newsletter_subscriptions \
             WHERE LOWER(email) = LOWER($1) FOR UPDATE"
        ))
        .bind(&email)
        .fetch_optional(&mut *tx)
        .await
        .map_err(anyhow::Error::from)?;

        if let Some(row) = existing {
            if row.is_active {
                return Err(StoreError::DuplicateSubscription(email));
            }
            let row = sqlx::query_as::<_, DbSubscription>(&format!(
                "UPDATE newsletter_subscriptions SET is_active = TRUE, updated_at = now() \
                 WHERE id = $1 RETURNING {SUBSCRIPTION_COLUMNS}"
            ))
            .bind(row.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(anyhow::Error::from)?;
            tx.commit().await.map_err(anyhow::Error::from)?;
            return Ok(SubscribeOutcome {
                subscription: subscription_from_db(row),
                reactivated: true,
            });
        }

        let insert = sqlx::query_as::<_, DbSubscription>(&format!(
            "INSERT INTO newsletter_subscriptions (email) VALUES ($1) \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        ))
        .bind(&email)
        .fetch_one(&mut *tx)
        .await;
        let row = match insert {
            Ok(row) => row,
            Err(err) if is_unique_violation(&err) => {
                return Err(StoreError::DuplicateSubscription(email));
            }
            Err(err) => return Err(StoreError::Unexpected(err.into())),
        };
        tx.commit().await.map_err(anyhow::Error::from)?;
        Ok(SubscribeOutcome { subscription: subscription_from_db(row), reactivated: false })
    }

    async fn unsubscribe(&self, id: i64) -> StoreResult<Subscription> {
        let row = sqlx::query_as::<_, DbSubscription>(&format!(
            "UPDATE newsletter_subscriptions SET is_active = FALSE, updated_at = now() \
             WHERE id = $1 RETURNING {SUBSCRIPTION_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(|| StoreError::NotFound("subscription".into()))?;
        Ok(subscription_from_db(row))
    }

    async fn delete_subscription(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM newsletter_subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(anyhow::Error::from)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("subscription".into()));
        }
        Ok(())
    }

    async fn subscriber_counts(&self) -> StoreResult<SubscriberCounts> {
        let (total, active) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_active) FROM newsletter_subscriptions",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;
        Ok(SubscriberCounts {
            active_subscribers: active as u64,
            total_subscribers: total as u64,
        })
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(anyhow::Error::from)?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
