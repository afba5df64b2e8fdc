mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::read_json;
use http_helpers::{delete, get, json_request, post};
use pawhaven::app::{AppState, build_router};
use pawhaven::model::{
    Adoption, AdoptionAction, AdoptionPayload, Contact, ContactPayload, Donation, DonationPayload,
    DonationStatistics, Pet, PetPayload, Subscription, SubscriptionPayload, Volunteer,
    VolunteerAction, VolunteerPayload,
};
use pawhaven::store::memory::InMemoryStore;
use pawhaven::store::{
    AdoptionFilter, ContactFilter, DonationFilter, Page, PageRequest, PetFilter, ShelterStore,
    StoreError, StoreResult, SubscribeOutcome, SubscriberCounts, SubscriptionFilter,
    VolunteerFilter,
};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> axum::routing::RouterIntoService<axum::body::Body, ()> {
    let state = AppState::new(Arc::new(InMemoryStore::new()));
    build_router(state).into_service()
}

fn pet_payload(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "pet_type": "dog",
        "age": "young",
        "gender": "male"
    })
}

#[tokio::test]
async fn system_endpoints_report_identity_and_health() {
    let app = app();

    let response = app.clone().oneshot(get("/system/info/")).await.expect("info");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["service"], "pawhaven");
    assert_eq!(payload["api_version"], "v1");
    assert_eq!(payload["features"]["durable_storage"], false);

    let response = app.clone().oneshot(get("/system/health/")).await.expect("health");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["status"], "ok");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app();
    let response = app.clone().oneshot(get("/openapi.json")).await.expect("openapi");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["info"]["title"], "pawhaven");
    assert!(payload["paths"]["/pets/"].is_object());
}

#[tokio::test]
async fn pets_crud_smoke() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/pets/", pet_payload("Rex")))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    let pet = read_json(response).await;
    let id = pet["id"].as_i64().expect("id");
    assert_eq!(pet["status"], "available");

    let response = app.clone().oneshot(get(&format!("/pets/{id}/"))).await.expect("get");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/pets/{id}/"),
            serde_json::json!({"breed": "Collie"}),
        ))
        .await
        .expect("patch");
    assert_eq!(response.status(), StatusCode::OK);
    let pet = read_json(response).await;
    assert_eq!(pet["breed"], "Collie");
    assert_eq!(pet["name"], "Rex");

    let response = app.clone().oneshot(get("/pets/")).await.expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["count"], 1);
    assert!(payload["next"].is_null());

    let response = app
        .clone()
        .oneshot(delete(&format!("/pets/{id}/")))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(get(&format!("/pets/{id}/"))).await.expect("missing");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "not_found");
    assert_eq!(payload["message"], "Pet not found");
}

#[tokio::test]
async fn pet_validation_failures_list_every_field() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/pets/", serde_json::json!({"pet_type": "fish"})))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "validation_error");
    assert_eq!(payload["message"], "Invalid input.");
    assert_eq!(payload["errors"]["name"], "this field is required");
    assert_eq!(payload["errors"]["pet_type"], "\"fish\" is not a valid choice");
}

#[tokio::test]
async fn pet_shortcut_listings_pin_status() {
    let app = app();
    for name in ["A", "B"] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/pets/", pet_payload(name)))
            .await
            .expect("create");
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let response = app
        .clone()
        .oneshot(post("/pets/1/mark_adopted/"))
        .await
        .expect("mark adopted");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["status"], "Pet marked as adopted");

    let response = app.clone().oneshot(get("/pets/available/")).await.expect("available");
    let payload = read_json(response).await;
    assert_eq!(payload["count"], 1);

    // A conflicting status filter in the query must not override the pin.
    let response = app
        .clone()
        .oneshot(get("/pets/adopted/?status=available"))
        .await
        .expect("adopted");
    let payload = read_json(response).await;
    assert_eq!(payload["count"], 1);
    assert_eq!(payload["results"][0]["status"], "adopted");
}

#[tokio::test]
async fn pagination_envelope_carries_relative_links() {
    let app = app();
    for i in 0..25 {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/pets/", pet_payload(&format!("Pet{i}"))))
            .await
            .expect("create");
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let response = app
        .clone()
        .oneshot(get("/pets/?page=2&page_size=10"))
        .await
        .expect("page 2");
    let payload = read_json(response).await;
    assert_eq!(payload["count"], 25);
    assert_eq!(payload["results"].as_array().unwrap().len(), 10);
    assert_eq!(payload["next"], "/pets/?page_size=10&page=3");
    assert_eq!(payload["previous"], "/pets/?page_size=10&page=1");
}

#[tokio::test]
async fn adoption_workflow_approve_then_complete() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/pets/", pet_payload("Luna")))
        .await
        .expect("pet");
    let pet = read_json(response).await;
    let pet_id = pet["id"].as_i64().expect("id");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/adoptions/",
            serde_json::json!({
                "adopter_name": "Sam",
                "adopter_email": "sam@example.com",
                "pet_id": pet_id
            }),
        ))
        .await
        .expect("apply");
    assert_eq!(response.status(), StatusCode::CREATED);
    let adoption = read_json(response).await;
    let adoption_id = adoption["id"].as_i64().expect("id");
    assert_eq!(adoption["status"], "pending");

    let response = app
        .clone()
        .oneshot(post(&format!("/adoptions/{adoption_id}/approve/")))
        .await
        .expect("approve");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["status"], "Adoption application approved");

    let response = app.clone().oneshot(get(&format!("/pets/{pet_id}/"))).await.expect("pet");
    let pet = read_json(response).await;
    assert_eq!(pet["status"], "pending");

    // Approving twice violates the pending precondition.
    let response = app
        .clone()
        .oneshot(post(&format!("/adoptions/{adoption_id}/approve/")))
        .await
        .expect("approve again");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "invalid_transition");
    assert!(payload["message"].as_str().unwrap().contains("requires status \"pending\""));

    let response = app
        .clone()
        .oneshot(post(&format!("/adoptions/{adoption_id}/complete/")))
        .await
        .expect("complete");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["status"], "Adoption completed");

    let response = app.clone().oneshot(get(&format!("/pets/{pet_id}/"))).await.expect("pet");
    let pet = read_json(response).await;
    assert_eq!(pet["status"], "adopted");

    let response = app
        .clone()
        .oneshot(get(&format!("/adoptions/{adoption_id}/")))
        .await
        .expect("adoption");
    let adoption = read_json(response).await;
    assert_eq!(adoption["status"], "completed");
    assert!(!adoption["approved_at"].is_null());
    assert!(!adoption["completed_at"].is_null());
}

#[tokio::test]
async fn adoption_for_unknown_pet_is_404() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/adoptions/",
            serde_json::json!({
                "adopter_name": "Sam",
                "adopter_email": "sam@example.com",
                "pet_id": 99
            }),
        ))
        .await
        .expect("apply");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json(response).await;
    assert_eq!(payload["message"], "Pet not found");
}

#[tokio::test]
async fn adoption_reject_flow() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/pets/", pet_payload("Max")))
        .await
        .expect("pet");
    let pet_id = read_json(response).await["id"].as_i64().expect("id");
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/adoptions/",
            serde_json::json!({
                "adopter_name": "Kim",
                "adopter_email": "kim@example.com",
                "pet_id": pet_id
            }),
        ))
        .await
        .expect("apply");
    let adoption_id = read_json(response).await["id"].as_i64().expect("id");

    let response = app.clone().oneshot(get("/adoptions/pending/")).await.expect("pending");
    let payload = read_json(response).await;
    assert_eq!(payload["count"], 1);

    let response = app
        .clone()
        .oneshot(post(&format!("/adoptions/{adoption_id}/reject/")))
        .await
        .expect("reject");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["status"], "Adoption application rejected");

    // The pet stays available after a rejection.
    let response = app.clone().oneshot(get(&format!("/pets/{pet_id}/"))).await.expect("pet");
    assert_eq!(read_json(response).await["status"], "available");
}

#[tokio::test]
async fn contacts_inbox_flow() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/contacts/",
            serde_json::json!({
                "name": "Pat",
                "email": "pat@example.com",
                "message": "Do you have any rabbits?"
            }),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    let contact = read_json(response).await;
    let id = contact["id"].as_i64().expect("id");
    assert_eq!(contact["subject"], "other");
    assert_eq!(contact["is_read"], false);

    let response = app.clone().oneshot(get("/contacts/unread/")).await.expect("unread");
    assert_eq!(read_json(response).await["count"], 1);

    let response = app
        .clone()
        .oneshot(post(&format!("/contacts/{id}/mark_as_read/")))
        .await
        .expect("mark read");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["status"], "Message marked as read");

    let response = app.clone().oneshot(get("/contacts/unread/")).await.expect("unread");
    assert_eq!(read_json(response).await["count"], 0);

    let response = app
        .clone()
        .oneshot(post(&format!("/contacts/{id}/mark_as_unread/")))
        .await
        .expect("mark unread");
    let payload = read_json(response).await;
    assert_eq!(payload["status"], "Message marked as unread");
}

#[tokio::test]
async fn volunteer_workflow() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/volunteers/",
            serde_json::json!({
                "name": "Lee",
                "email": "lee@example.com",
                "interest": "care"
            }),
        ))
        .await
        .expect("apply");
    assert_eq!(response.status(), StatusCode::CREATED);
    let volunteer = read_json(response).await;
    let id = volunteer["id"].as_i64().expect("id");
    assert_eq!(volunteer["status"], "pending");

    let response = app
        .clone()
        .oneshot(post(&format!("/volunteers/{id}/approve/")))
        .await
        .expect("approve");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["status"], "Volunteer approved");

    let response = app.clone().oneshot(get("/volunteers/approved/")).await.expect("approved");
    assert_eq!(read_json(response).await["count"], 1);

    let response = app
        .clone()
        .oneshot(post(&format!("/volunteers/{id}/reject/")))
        .await
        .expect("reject approved");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "invalid_transition");
}

#[tokio::test]
async fn donation_statistics_cover_completed_only() {
    let app = app();
    for (amount, status) in [(25.0, "completed"), (50.0, "completed"), (100.0, "completed")] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/donations/",
                serde_json::json!({"amount": amount, "payment_status": status}),
            ))
            .await
            .expect("donate");
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let response = app
        .clone()
        .oneshot(json_request("POST", "/donations/", serde_json::json!({"amount": 999.0})))
        .await
        .expect("pending donation");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get("/donations/statistics/"))
        .await
        .expect("statistics");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["total_amount"], 175.0);
    assert_eq!(payload["total_donations"], 3);
    assert_eq!(payload["average_amount"], 58.33);
    assert_eq!(payload["currency"], "USD");

    let response = app.clone().oneshot(get("/donations/completed/")).await.expect("completed");
    assert_eq!(read_json(response).await["count"], 3);
}

#[tokio::test]
async fn donation_mark_completed_updates_statistics() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/donations/", serde_json::json!({"amount": 10.0})))
        .await
        .expect("donate");
    let id = read_json(response).await["id"].as_i64().expect("id");

    let response = app
        .clone()
        .oneshot(post(&format!("/donations/{id}/mark_completed/")))
        .await
        .expect("complete");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["status"], "Donation marked as completed");

    let response = app.clone().oneshot(get("/donations/statistics/")).await.expect("stats");
    let payload = read_json(response).await;
    assert_eq!(payload["total_donations"], 1);
    assert_eq!(payload["total_amount"], 10.0);
}

#[tokio::test]
async fn donation_requires_positive_amount() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/donations/", serde_json::json!({"amount": -5.0})))
        .await
        .expect("donate");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["errors"]["amount"], "ensure this value is greater than 0");
}

#[tokio::test]
async fn newsletter_subscribe_unsubscribe_resubscribe() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/newsletter/",
            serde_json::json!({"email": "news@example.com"}),
        ))
        .await
        .expect("subscribe");
    assert_eq!(response.status(), StatusCode::CREATED);
    let subscription = read_json(response).await;
    let id = subscription["id"].as_i64().expect("id");
    assert_eq!(subscription["is_active"], true);

    // An active duplicate is rejected, case-insensitively.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/newsletter/",
            serde_json::json!({"email": "News@Example.com"}),
        ))
        .await
        .expect("duplicate");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["message"], "Email already subscribed");

    let response = app
        .clone()
        .oneshot(post(&format!("/newsletter/{id}/unsubscribe/")))
        .await
        .expect("unsubscribe");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["status"], "Successfully unsubscribed");

    let response = app.clone().oneshot(get("/newsletter/count/")).await.expect("count");
    let payload = read_json(response).await;
    assert_eq!(payload["active_subscribers"], 0);
    assert_eq!(payload["total_subscribers"], 1);

    // Resubscribing reactivates the original row with a 200.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/newsletter/",
            serde_json::json!({"email": "news@example.com"}),
        ))
        .await
        .expect("resubscribe");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["id"], id);
    assert_eq!(payload["is_active"], true);

    let response = app.clone().oneshot(get("/newsletter/active/")).await.expect("active");
    assert_eq!(read_json(response).await["count"], 1);
}

#[tokio::test]
async fn newsletter_update_changes_email_but_rejects_taken_address() {
    let app = app();
    for email in ["pat@example.com", "sam@example.com"] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/newsletter/", serde_json::json!({"email": email})))
            .await
            .expect("subscribe");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/newsletter/1/",
            serde_json::json!({"email": "pat@new.example.com"}),
        ))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["id"], 1);
    assert_eq!(payload["email"], "pat@new.example.com");

    // PATCH shares the handler; stealing another subscriber's address is a
    // field error, case-insensitively.
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/newsletter/1/",
            serde_json::json!({"email": "SAM@EXAMPLE.COM"}),
        ))
        .await
        .expect("conflict");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "validation_error");
    assert_eq!(payload["errors"]["email"], "subscription with this email already exists");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/newsletter/99/",
            serde_json::json!({"email": "ghost@example.com"}),
        ))
        .await
        .expect("missing");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json(response).await;
    assert_eq!(payload["message"], "Subscription not found");
}

#[tokio::test]
async fn newsletter_rejects_malformed_email() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/newsletter/", serde_json::json!({"email": "nope"})))
        .await
        .expect("subscribe");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["errors"]["email"], "enter a valid email address");
}

/// Store whose every operation fails, for exercising the 500 path.
struct FailingStore;

fn boom() -> StoreError {
    StoreError::Unexpected(anyhow::anyhow!("backend down"))
}

#[async_trait]
impl ShelterStore for FailingStore {
    async fn list_pets(&self, _: PetFilter, _: PageRequest) -> StoreResult<Page<Pet>> {
        Err(boom())
    }
    async fn get_pet(&self, _: i64) -> StoreResult<Pet> {
        Err(boom())
    }
    async fn create_pet(&self, _: PetPayload) -> StoreResult<Pet> {
        Err(boom())
    }
    async fn update_pet(&self, _: i64, _: PetPayload) -> StoreResult<Pet> {
        Err(boom())
    }
    async fn delete_pet(&self, _: i64) -> StoreResult<()> {
        Err(boom())
    }
    async fn mark_pet_adopted(&self, _: i64) -> StoreResult<Pet> {
        Err(boom())
    }
    async fn list_adoptions(
        &self,
        _: AdoptionFilter,
        _: PageRequest,
    ) -> StoreResult<Page<Adoption>> {
        Err(boom())
    }
    async fn get_adoption(&self, _: i64) -> StoreResult<Adoption> {
        Err(boom())
    }
    async fn create_adoption(&self, _: AdoptionPayload) -> StoreResult<Adoption> {
        Err(boom())
    }
    async fn update_adoption(&self, _: i64, _: AdoptionPayload) -> StoreResult<Adoption> {
        Err(boom())
    }
    async fn delete_adoption(&self, _: i64) -> StoreResult<()> {
        Err(boom())
    }
    async fn transition_adoption(&self, _: i64, _: AdoptionAction) -> StoreResult<Adoption> {
        Err(boom())
    }
    async fn list_contacts(&self, _: ContactFilter, _: PageRequest) -> StoreResult<Page<Contact>> {
        Err(boom())
    }
    async fn get_contact(&self, _: i64) -> StoreResult<Contact> {
        Err(boom())
    }
    async fn create_contact(&self, _: ContactPayload) -> StoreResult<Contact> {
        Err(boom())
    }
    async fn update_contact(&self, _: i64, _: ContactPayload) -> StoreResult<Contact> {
        Err(boom())
    }
    async fn delete_contact(&self, _: i64) -> StoreResult<()> {
        Err(boom())
    }
    async fn set_contact_read(&self, _: i64, _: bool) -> StoreResult<Contact> {
        Err(boom())
    }
    async fn list_volunteers(
        &self,
        _: VolunteerFilter,
        _: PageRequest,
    ) -> StoreResult<Page<Volunteer>> {
        Err(boom())
    }
    async fn get_volunteer(&self, _: i64) -> StoreResult<Volunteer> {
        Err(boom())
    }
    async fn create_volunteer(&self, _: VolunteerPayload) -> StoreResult<Volunteer> {
        Err(boom())
    }
    async fn update_volunteer(&self, _: i64, _: VolunteerPayload) -> StoreResult<Volunteer> {
        Err(boom())
    }
    async fn delete_volunteer(&self, _: i64) -> StoreResult<()> {
        Err(boom())
    }
    async fn transition_volunteer(&self, _: i64, _: VolunteerAction) -> StoreResult<Volunteer> {
        Err(boom())
    }
    async fn list_donations(
        &self,
        _: DonationFilter,
        _: PageRequest,
    ) -> StoreResult<Page<Donation>> {
        Err(boom())
    }
    async fn get_donation(&self, _: i64) -> StoreResult<Donation> {
        Err(boom())
    }
    async fn create_donation(&self, _: DonationPayload) -> StoreResult<Donation> {
        Err(boom())
    }
    async fn update_donation(&self, _: i64, _: DonationPayload) -> StoreResult<Donation> {
        Err(boom())
    }
    async fn delete_donation(&self, _: i64) -> StoreResult<()> {
        Err(boom())
    }
    async fn complete_donation(&self, _: i64) -> StoreResult<Donation> {
        Err(boom())
    }
    async fn donation_statistics(&self) -> StoreResult<DonationStatistics> {
        Err(boom())
    }
    async fn list_subscriptions(
        &self,
        _: SubscriptionFilter,
        _: PageRequest,
    ) -> StoreResult<Page<Subscription>> {
        Err(boom())
    }
    async fn get_subscription(&self, _: i64) -> StoreResult<Subscription> {
        Err(boom())
    }
    async fn update_subscription(&self, _: i64, _: SubscriptionPayload) -> StoreResult<Subscription> {
        Err(boom())
    }
    async fn subscribe(&self, _: SubscriptionPayload) -> StoreResult<SubscribeOutcome> {
        Err(boom())
    }
    async fn unsubscribe(&self, _: i64) -> StoreResult<Subscription> {
        Err(boom())
    }
    async fn delete_subscription(&self, _: i64) -> StoreResult<()> {
        Err(boom())
    }
    async fn subscriber_counts(&self) -> StoreResult<SubscriberCounts> {
        Err(boom())
    }
    async fn health_check(&self) -> StoreResult<()> {
        Err(boom())
    }
    fn is_durable(&self) -> bool {
        true
    }
    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

#[tokio::test]
async fn storage_failures_surface_as_500() {
    let state = AppState::new(Arc::new(FailingStore));
    let app = build_router(state).into_service();

    for uri in ["/pets/", "/donations/statistics/", "/newsletter/count/"] {
        let response = app.clone().oneshot(get(uri)).await.expect("request");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        let payload = read_json(response).await;
        assert_eq!(payload["code"], "internal");
        assert_eq!(payload["message"], "storage backend failure");
    }

    let response = app.clone().oneshot(get("/system/health/")).await.expect("health");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json(response).await;
    assert_eq!(payload["message"], "storage unavailable");
}
