//! End-to-end tests for the NyaySetu API
//!
//! Each test runs the full router against a fresh in-memory database.
//!
//! Test categories:
//! - Accounts and caller identity
//! - Complaint intake and ownership
//! - Lawyer profiles, service cities and case counters
//! - Directory filters and top listing
//! - Contact requests
//! - Case search

#[cfg(test)]
mod api_tests {
    use std::sync::Arc;

    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use sqlx::sqlite::SqlitePoolOptions;

    use crate::app;
    use crate::auth::ACCOUNT_HEADER;
    use crate::config::ProfileActionPolicy;
    use crate::state::AppState;

    async fn server_with(policy: ProfileActionPolicy) -> TestServer {
        // One connection that never expires keeps the in-memory database alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let state = AppState::with_pool(pool, policy).await.unwrap();
        TestServer::new(app(Arc::new(state))).unwrap()
    }

    async fn server() -> TestServer {
        server_with(ProfileActionPolicy::OwnerOnly).await
    }

    fn header() -> HeaderName {
        HeaderName::from_static(ACCOUNT_HEADER)
    }

    fn as_account(id: i64) -> HeaderValue {
        HeaderValue::from_str(&id.to_string()).unwrap()
    }

    async fn account(server: &TestServer, username: &str, first: &str, last: &str) -> i64 {
        let response = server
            .post("/api/accounts")
            .json(&json!({ "username": username, "first_name": first, "last_name": last }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["id"].as_i64().unwrap()
    }

    async fn city(server: &TestServer, caller: i64, name: &str) -> i64 {
        let response = server
            .post("/api/cities")
            .add_header(header(), as_account(caller))
            .json(&json!({ "name": name }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["id"].as_i64().unwrap()
    }

    async fn profile(server: &TestServer, caller: i64, body: Value) -> Value {
        let response = server
            .post("/api/lawyers")
            .add_header(header(), as_account(caller))
            .json(&body)
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()
    }

    fn complaint_body(title: &str, incident_city: &str, residential_city: &str) -> Value {
        json!({
            "full_name": "Asha Verma",
            "contact_number": "9876543210",
            "govt_id": "XXXX-1234",
            "dob": "1990-04-12",
            "title": title,
            "description": "Phone snatched near the market gate.",
            "incident_datetime": "2024-03-01T18:30:00Z",
            "privacy_option": "PUBLIC_ANONYMOUS",
            "residential_address": {
                "house_number": "12B",
                "city": residential_city,
                "state": "State",
                "pincode": "110001"
            },
            "incident_location": {
                "city": incident_city,
                "state": "State",
                "location": "Market gate"
            }
        })
    }

    async fn complaint(server: &TestServer, caller: i64, body: Value) -> Value {
        let response = server
            .post("/api/complaints")
            .add_header(header(), as_account(caller))
            .json(&body)
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()
    }

    fn city_names(profile: &Value) -> Vec<String> {
        profile["service_cities"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect()
    }

    // ---- Accounts and caller identity ----

    #[tokio::test]
    async fn test_health() {
        let server = server().await;
        let response = server.get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_missing_caller_is_unauthorized() {
        let server = server().await;
        server
            .get("/api/complaints")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .get("/api/complaints")
            .add_header(header(), as_account(999))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let server = server().await;
        account(&server, "asha", "Asha", "Verma").await;
        server
            .post("/api/accounts")
            .json(&json!({ "username": "asha" }))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_account_delete_cascades() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let citizen = account(&server, "asha", "Asha", "Verma").await;
        let p = profile(&server, lawyer, json!({ "license_number": "D/1/2010" })).await;
        let pid = p["id"].as_i64().unwrap();
        complaint(&server, citizen, complaint_body("Theft", "Delhi", "Delhi")).await;
        server
            .post(&format!("/api/lawyers/{}/contact", pid))
            .add_header(header(), as_account(citizen))
            .json(&json!({ "message": "Please help" }))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .delete("/api/accounts/me")
            .add_header(header(), as_account(lawyer))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get(&format!("/api/lawyers/{}", pid))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // License number is free again once the profile is gone
        let lawyer2 = account(&server, "rk2", "Ravi", "Kumar").await;
        let p2 = profile(&server, lawyer2, json!({ "license_number": "D/1/2010" })).await;
        assert_eq!(p2["license_number"], "D/1/2010");

        server
            .delete("/api/accounts/me")
            .add_header(header(), as_account(citizen))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get("/api/complaints")
            .add_header(header(), as_account(citizen))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    // ---- Complaints ----

    #[tokio::test]
    async fn test_complaint_with_nested_locations() {
        let server = server().await;
        let citizen = account(&server, "asha", "Asha", "Verma").await;
        let created = complaint(&server, citizen, complaint_body("Theft", "Delhi", "Noida")).await;

        assert_eq!(created["user"], citizen);
        assert_eq!(created["privacy_option"], "PUBLIC_ANONYMOUS");
        let incident_id = created["incident_location"].as_i64().unwrap();

        let location = server
            .get(&format!("/api/incident-locations/{}", incident_id))
            .add_header(header(), as_account(citizen))
            .await;
        location.assert_status_ok();
        assert_eq!(location.json::<Value>()["city"], "Delhi");

        let mine = server
            .get("/api/complaints")
            .add_header(header(), as_account(citizen))
            .await
            .json::<Value>();
        assert_eq!(mine.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_complaint_defaults_privacy_and_accepts_description_alias() {
        let server = server().await;
        let citizen = account(&server, "asha", "Asha", "Verma").await;
        let created = complaint(
            &server,
            citizen,
            json!({
                "full_name": "Asha Verma",
                "contact_number": "9876543210",
                "govt_id": "XXXX-1234",
                "dob": "1990-04-12",
                "title": "Fraud",
                "crime_description": "Fake payment link.",
                "incident_datetime": "2024-03-01T18:30:00Z"
            }),
        )
        .await;
        assert_eq!(created["privacy_option"], "LAWYERS_ONLY");
        assert_eq!(created["description"], "Fake payment link.");
        assert_eq!(created["incident_location"], Value::Null);
    }

    #[tokio::test]
    async fn test_complaint_validation_reports_field() {
        let server = server().await;
        let citizen = account(&server, "asha", "Asha", "Verma").await;
        let mut body = complaint_body("Theft", "Delhi", "Delhi");
        body["incident_location"]["location"] = json!("");

        let response = server
            .post("/api/complaints")
            .add_header(header(), as_account(citizen))
            .json(&body)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["field"], "incident_location.location");
    }

    #[tokio::test]
    async fn test_complaint_unknown_location_id_rolls_back() {
        let server = server().await;
        let citizen = account(&server, "asha", "Asha", "Verma").await;
        let mut body = complaint_body("Theft", "Delhi", "Delhi");
        body.as_object_mut().unwrap().remove("residential_address");
        body["residential_address_id"] = json!(77);

        let response = server
            .post("/api/complaints")
            .add_header(header(), as_account(citizen))
            .json(&body)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["field"], "residential_address_id");

        let mine = server
            .get("/api/complaints")
            .add_header(header(), as_account(citizen))
            .await
            .json::<Value>();
        assert_eq!(mine, json!([]));
    }

    #[tokio::test]
    async fn test_complaint_visible_only_to_submitter() {
        let server = server().await;
        let citizen = account(&server, "asha", "Asha", "Verma").await;
        let other = account(&server, "bob", "Bob", "Singh").await;
        let created = complaint(&server, citizen, complaint_body("Theft", "Delhi", "Delhi")).await;
        let path = format!("/api/complaints/{}", created["id"]);

        server
            .get(&path)
            .add_header(header(), as_account(citizen))
            .await
            .assert_status_ok();
        server
            .get(&path)
            .add_header(header(), as_account(other))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    // ---- Lawyer profiles ----

    #[tokio::test]
    async fn test_fresh_profile_has_zero_win_rate() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let p = profile(&server, lawyer, json!({ "license_number": "D/1/2010" })).await;
        assert_eq!(p["total_cases"], 0);
        assert_eq!(p["win_rate"], 0.0);
        assert_eq!(p["specialization"], "other");
        assert_eq!(p["user"], lawyer);
    }

    #[tokio::test]
    async fn test_second_profile_for_same_account_conflicts() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        profile(&server, lawyer, json!({ "license_number": "D/1/2010" })).await;

        let response = server
            .post("/api/lawyers")
            .add_header(header(), as_account(lawyer))
            .json(&json!({ "license_number": "D/2/2011" }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(
            response.json::<Value>()["error"],
            "Profile already exists for this user."
        );
    }

    #[tokio::test]
    async fn test_duplicate_license_conflicts() {
        let server = server().await;
        let a = account(&server, "rk", "Ravi", "Kumar").await;
        let b = account(&server, "ps", "Priya", "Shah").await;
        profile(&server, a, json!({ "license_number": "D/1/2010" })).await;
        server
            .post("/api/lawyers")
            .add_header(header(), as_account(b))
            .json(&json!({ "license_number": "D/1/2010" }))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_exactly_four_cities_accepted_five_rejected() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let mut ids = Vec::new();
        for name in ["Delhi", "Mumbai", "Pune", "Jaipur", "Lucknow"] {
            ids.push(city(&server, lawyer, name).await);
        }

        let response = server
            .post("/api/lawyers")
            .add_header(header(), as_account(lawyer))
            .json(&json!({ "license_number": "D/1/2010", "service_city_ids": &ids }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["field"], "service_city_ids");

        let p = profile(
            &server,
            lawyer,
            json!({ "license_number": "D/1/2010", "service_city_ids": &ids[..4] }),
        )
        .await;
        assert_eq!(p["service_cities"].as_array().unwrap().len(), 4);

        // add-city respects the same ceiling
        let response = server
            .post(&format!("/api/lawyers/{}/add-city", p["id"]))
            .add_header(header(), as_account(lawyer))
            .json(&json!({ "city_id": ids[4] }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["field"], "city_id");

        // Re-adding a served city at the ceiling is still a no-op
        server
            .post(&format!("/api/lawyers/{}/add-city", p["id"]))
            .add_header(header(), as_account(lawyer))
            .json(&json!({ "city_id": ids[0] }))
            .await
            .assert_status_ok();
        let current = server.get(&format!("/api/lawyers/{}", p["id"])).await.json::<Value>();
        assert_eq!(current["service_cities"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_add_and_remove_city_round_trip() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let delhi = city(&server, lawyer, "Delhi").await;
        let mumbai = city(&server, lawyer, "Mumbai").await;
        let p = profile(
            &server,
            lawyer,
            json!({ "license_number": "D/1/2010", "service_city_ids": [delhi] }),
        )
        .await;
        let pid = p["id"].as_i64().unwrap();

        let added = server
            .post(&format!("/api/lawyers/{}/add-city", pid))
            .add_header(header(), as_account(lawyer))
            .json(&json!({ "city_id": mumbai.to_string() }))
            .await;
        added.assert_status_ok();
        assert_eq!(added.json::<Value>()["status"], "added");

        let current = server.get(&format!("/api/lawyers/{}", pid)).await.json::<Value>();
        assert_eq!(city_names(&current), vec!["Delhi", "Mumbai"]);

        let removed = server
            .post(&format!("/api/lawyers/{}/remove-city", pid))
            .add_header(header(), as_account(lawyer))
            .json(&json!({ "city_id": mumbai }))
            .await;
        removed.assert_status_ok();
        assert_eq!(removed.json::<Value>()["status"], "removed");

        let current = server.get(&format!("/api/lawyers/{}", pid)).await.json::<Value>();
        assert_eq!(city_names(&current), vec!["Delhi"]);

        // Removing a city that is not served is a no-op
        server
            .post(&format!("/api/lawyers/{}/remove-city", pid))
            .add_header(header(), as_account(lawyer))
            .json(&json!({ "city_id": mumbai }))
            .await
            .assert_status_ok();
        let current = server.get(&format!("/api/lawyers/{}", pid)).await.json::<Value>();
        assert_eq!(city_names(&current), vec!["Delhi"]);
    }

    #[tokio::test]
    async fn test_city_action_requires_city_id() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let p = profile(&server, lawyer, json!({ "license_number": "D/1/2010" })).await;

        let response = server
            .post(&format!("/api/lawyers/{}/add-city", p["id"]))
            .add_header(header(), as_account(lawyer))
            .json(&json!({}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "city_id is required.");

        server
            .post(&format!("/api/lawyers/{}/add-city", p["id"]))
            .add_header(header(), as_account(lawyer))
            .json(&json!({ "city_id": 404 }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_increment_cases_counts_wins() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let p = profile(&server, lawyer, json!({ "license_number": "D/1/2010" })).await;
        let path = format!("/api/lawyers/{}/increment-cases", p["id"]);

        let first = server
            .post(&path)
            .add_header(header(), as_account(lawyer))
            .json(&json!({ "won": true }))
            .await;
        first.assert_status_ok();
        assert_eq!(
            first.json::<Value>(),
            json!({ "total_cases": 1, "won_cases": 1, "win_rate": 100.0 })
        );

        let second = server
            .post(&path)
            .add_header(header(), as_account(lawyer))
            .json(&json!({ "won": "false" }))
            .await;
        assert_eq!(
            second.json::<Value>(),
            json!({ "total_cases": 2, "won_cases": 1, "win_rate": 50.0 })
        );

        // No body counts as a loss
        let third = server
            .post(&path)
            .add_header(header(), as_account(lawyer))
            .await;
        third.assert_status_ok();
        assert_eq!(third.json::<Value>()["total_cases"], 3);
        assert_eq!(third.json::<Value>()["win_rate"], 33.33);
    }

    #[tokio::test]
    async fn test_increment_cases_rejects_malformed_body() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let p = profile(&server, lawyer, json!({ "license_number": "D/1/2010" })).await;
        let path = format!("/api/lawyers/{}/increment-cases", p["id"]);

        let truncated = server
            .post(&path)
            .add_header(header(), as_account(lawyer))
            .text(r#"{"won": true"#)
            .content_type("application/json")
            .await;
        truncated.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(truncated.json::<Value>()["field"], "body");

        server
            .post(&path)
            .add_header(header(), as_account(lawyer))
            .text("won=true")
            .content_type("application/x-www-form-urlencoded")
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        // Neither rejected request touched the counters
        let current = server.get(&format!("/api/lawyers/{}", p["id"])).await.json::<Value>();
        assert_eq!(current["total_cases"], 0);
        assert_eq!(current["won_cases"], 0);
    }

    #[tokio::test]
    async fn test_profile_actions_owner_only_by_default() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let other = account(&server, "bob", "Bob", "Singh").await;
        let p = profile(&server, lawyer, json!({ "license_number": "D/1/2010" })).await;

        server
            .post(&format!("/api/lawyers/{}/increment-cases", p["id"]))
            .add_header(header(), as_account(other))
            .json(&json!({ "won": true }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_profile_actions_open_to_any_caller_when_configured() {
        let server = server_with(ProfileActionPolicy::AnyAuthenticated).await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let other = account(&server, "bob", "Bob", "Singh").await;
        let p = profile(&server, lawyer, json!({ "license_number": "D/1/2010" })).await;

        server
            .post(&format!("/api/lawyers/{}/increment-cases", p["id"]))
            .add_header(header(), as_account(other))
            .json(&json!({ "won": true }))
            .await
            .assert_status_ok();

        // Profile edits stay owner-only regardless
        server
            .patch(&format!("/api/lawyers/{}", p["id"]))
            .add_header(header(), as_account(other))
            .json(&json!({ "bio": "hijacked" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_put_requires_license_patch_does_not() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let p = profile(&server, lawyer, json!({ "license_number": "D/1/2010" })).await;
        let path = format!("/api/lawyers/{}", p["id"]);

        server
            .put(&path)
            .add_header(header(), as_account(lawyer))
            .json(&json!({ "bio": "Criminal defence" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let patched = server
            .patch(&path)
            .add_header(header(), as_account(lawyer))
            .json(&json!({ "bio": "Criminal defence", "total_cases": 99 }))
            .await;
        patched.assert_status_ok();
        let patched = patched.json::<Value>();
        assert_eq!(patched["bio"], "Criminal defence");
        assert_eq!(patched["license_number"], "D/1/2010");
        assert_eq!(patched["total_cases"], 0);

        let cleared = server
            .patch(&path)
            .add_header(header(), as_account(lawyer))
            .json(&json!({ "bio": null }))
            .await;
        cleared.assert_status_ok();
        assert_eq!(cleared.json::<Value>()["bio"], Value::Null);
    }

    #[tokio::test]
    async fn test_me_upsert_creates_then_updates() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;

        server
            .get("/api/lawyers/me")
            .add_header(header(), as_account(lawyer))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .put("/api/lawyers/me")
            .add_header(header(), as_account(lawyer))
            .json(&json!({ "license_number": "D/1/2010", "experience_years": 3 }))
            .await
            .assert_status(StatusCode::CREATED);

        let updated = server
            .patch("/api/lawyers/me")
            .add_header(header(), as_account(lawyer))
            .json(&json!({ "experience_years": 4 }))
            .await;
        updated.assert_status_ok();
        assert_eq!(updated.json::<Value>()["experience_years"], 4);
    }

    // ---- Directory ----

    #[tokio::test]
    async fn test_directory_filters_by_specialization_and_experience() {
        let server = server().await;
        let a = account(&server, "rk", "Ravi", "Kumar").await;
        let b = account(&server, "ps", "Priya", "Shah").await;
        let c = account(&server, "am", "Anil", "Mehta").await;
        profile(
            &server,
            a,
            json!({ "license_number": "L1", "specialization": "criminal", "experience_years": 5 }),
        )
        .await;
        profile(
            &server,
            b,
            json!({ "license_number": "L2", "specialization": "criminal", "experience_years": 2 }),
        )
        .await;
        profile(
            &server,
            c,
            json!({ "license_number": "L3", "specialization": "family", "experience_years": 10 }),
        )
        .await;

        let found = server
            .get("/api/lawyers")
            .add_query_param("specialization", "criminal")
            .add_query_param("min_experience", "3")
            .await
            .json::<Value>();
        let found = found.as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["license_number"], "L1");

        // Non-numeric minimum is ignored
        let all_criminal = server
            .get("/api/lawyers")
            .add_query_param("specialization", "criminal")
            .add_query_param("min_experience", "lots")
            .await
            .json::<Value>();
        assert_eq!(all_criminal.as_array().unwrap().len(), 2);

        server
            .get("/api/lawyers")
            .add_query_param("specialization", "astrology")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_directory_city_and_text_filters() {
        let server = server().await;
        let a = account(&server, "rk", "Ravi", "Kumar").await;
        let b = account(&server, "ps", "Priya", "Shah").await;
        let delhi = city(&server, a, "Delhi").await;
        let mumbai = city(&server, a, "Mumbai").await;
        profile(
            &server,
            a,
            json!({ "license_number": "L1", "service_city_ids": [delhi, mumbai], "bio": "Bail matters" }),
        )
        .await;
        profile(
            &server,
            b,
            json!({ "license_number": "L2", "service_city_ids": [mumbai] }),
        )
        .await;

        // A profile serving several matching cities appears once
        let by_name = server
            .get("/api/lawyers")
            .add_query_param("city", "mumbai")
            .await
            .json::<Value>();
        assert_eq!(by_name.as_array().unwrap().len(), 2);

        let by_id = server
            .get("/api/lawyers")
            .add_query_param("city", delhi.to_string())
            .await
            .json::<Value>();
        assert_eq!(by_id.as_array().unwrap().len(), 1);

        let by_text = server
            .get("/api/lawyers")
            .add_query_param("q", "BAIL")
            .await
            .json::<Value>();
        assert_eq!(by_text.as_array().unwrap().len(), 1);

        let by_surname = server
            .get("/api/lawyers")
            .add_query_param("q", "shah")
            .await
            .json::<Value>();
        assert_eq!(by_surname[0]["license_number"], "L2");

        // Wildcards in the term are literal
        let wildcard = server
            .get("/api/lawyers")
            .add_query_param("q", "%")
            .await
            .json::<Value>();
        assert_eq!(wildcard, json!([]));
    }

    #[tokio::test]
    async fn test_top_orders_by_rating_then_wins() {
        let server = server().await;
        let a = account(&server, "rk", "Ravi", "Kumar").await;
        let b = account(&server, "ps", "Priya", "Shah").await;
        let c = account(&server, "am", "Anil", "Mehta").await;
        profile(&server, a, json!({ "license_number": "L1", "rating": 4.0 })).await;
        let pb = profile(&server, b, json!({ "license_number": "L2", "rating": 4.5 })).await;
        let pc = profile(&server, c, json!({ "license_number": "L3", "rating": 4.5 })).await;

        server
            .post(&format!("/api/lawyers/{}/increment-cases", pc["id"]))
            .add_header(header(), as_account(c))
            .json(&json!({ "won": true }))
            .await
            .assert_status_ok();

        let top = server.get("/api/lawyers/top").await.json::<Value>();
        let order: Vec<i64> = top
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect();
        assert_eq!(order[0], pc["id"].as_i64().unwrap());
        assert_eq!(order[1], pb["id"].as_i64().unwrap());
        assert_eq!(order.len(), 3);
    }

    #[tokio::test]
    async fn test_top_is_capped_at_ten() {
        let server = server().await;
        for i in 0..12i32 {
            let caller = account(&server, &format!("lawyer{}", i), "Lawyer", "Test").await;
            profile(
                &server,
                caller,
                json!({ "license_number": format!("L{}", i), "rating": f64::from(i) * 0.4 }),
            )
            .await;
        }

        let top = server.get("/api/lawyers/top").await.json::<Value>();
        let top = top.as_array().unwrap();
        assert_eq!(top.len(), 10);
        assert_eq!(top[0]["license_number"], "L11");
        assert_eq!(top[9]["license_number"], "L2");
    }

    #[tokio::test]
    async fn test_text_search_matches_non_ascii_letters() {
        let server = server().await;
        let lawyer = account(&server, "ed", "Élodie", "Dsouza").await;
        profile(&server, lawyer, json!({ "license_number": "L1" })).await;

        let found = server
            .get("/api/lawyers")
            .add_query_param("q", "ÉLODIE")
            .await
            .json::<Value>();
        assert_eq!(found.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_specializations_listed() {
        let server = server().await;
        let list = server.get("/api/lawyers/specializations").await.json::<Value>();
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 30);
        assert!(list
            .iter()
            .any(|e| e["key"] == "criminal" && e["label"].is_string()));
    }

    // ---- Contact requests ----

    #[tokio::test]
    async fn test_contact_request_only_once() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let citizen = account(&server, "asha", "Asha", "Verma").await;
        let p = profile(&server, lawyer, json!({ "license_number": "D/1/2010" })).await;
        let path = format!("/api/lawyers/{}/contact", p["id"]);

        let first = server
            .post(&path)
            .add_header(header(), as_account(citizen))
            .json(&json!({ "message": "Need advice on a theft case" }))
            .await;
        first.assert_status(StatusCode::CREATED);
        let first = first.json::<Value>();
        assert_eq!(first["status"], "pending");
        assert_eq!(first["user"], citizen);

        let second = server
            .post(&path)
            .add_header(header(), as_account(citizen))
            .json(&json!({ "message": "Again" }))
            .await;
        second.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(second.json::<Value>()["error"], "Request already sent.");

        let inbox = server
            .get("/api/lawyers/me/contact-requests")
            .add_header(header(), as_account(lawyer))
            .await
            .json::<Value>();
        assert_eq!(inbox.as_array().unwrap().len(), 1);
        assert_eq!(inbox[0]["message"], "Need advice on a theft case");
    }

    #[tokio::test]
    async fn test_malformed_contact_does_not_use_up_request() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let citizen = account(&server, "asha", "Asha", "Verma").await;
        let p = profile(&server, lawyer, json!({ "license_number": "D/1/2010" })).await;
        let path = format!("/api/lawyers/{}/contact", p["id"]);

        server
            .post(&path)
            .add_header(header(), as_account(citizen))
            .text(r#"{"message": "help me""#)
            .content_type("application/json")
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let retry = server
            .post(&path)
            .add_header(header(), as_account(citizen))
            .json(&json!({ "message": "help me" }))
            .await;
        retry.assert_status(StatusCode::CREATED);
        assert_eq!(retry.json::<Value>()["message"], "help me");
    }

    #[tokio::test]
    async fn test_contact_unknown_lawyer_not_found() {
        let server = server().await;
        let citizen = account(&server, "asha", "Asha", "Verma").await;
        server
            .post("/api/lawyers/42/contact")
            .add_header(header(), as_account(citizen))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    // ---- Case search ----

    #[tokio::test]
    async fn test_search_cases_mixes_names_and_ids() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let citizen = account(&server, "asha", "Asha", "Verma").await;
        city(&server, lawyer, "Delhi").await;
        let mumbai = city(&server, lawyer, "Mumbai").await;
        profile(&server, lawyer, json!({ "license_number": "D/1/2010" })).await;

        complaint(&server, citizen, complaint_body("Delhi theft", "Delhi", "Noida")).await;
        complaint(&server, citizen, complaint_body("Mumbai fraud", "Thane", "Mumbai")).await;
        complaint(&server, citizen, complaint_body("Pune assault", "Pune", "Pune")).await;

        let found = server
            .get("/api/lawyers/search-cases")
            .add_header(header(), as_account(lawyer))
            .add_query_param("cities", format!("Delhi,{}", mumbai))
            .await;
        found.assert_status_ok();
        let found = found.json::<Value>();
        let found = found.as_array().unwrap();

        let titles: Vec<&str> = found.iter().map(|c| c["title"].as_str().unwrap()).collect();
        assert_eq!(titles, vec!["Mumbai fraud", "Delhi theft"]);

        for case in found {
            assert!(case.get("full_name").is_none());
            assert!(case.get("govt_id").is_none());
            assert!(case.get("description").is_none());
        }
    }

    #[tokio::test]
    async fn test_cases_are_newest_first() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let citizen = account(&server, "asha", "Asha", "Verma").await;
        let delhi = city(&server, lawyer, "Delhi").await;
        profile(
            &server,
            lawyer,
            json!({ "license_number": "D/1/2010", "service_city_ids": [delhi] }),
        )
        .await;
        for title in ["first", "second", "third"] {
            complaint(&server, citizen, complaint_body(title, "Delhi", "Delhi")).await;
        }

        let titles = |cases: Value| -> Vec<String> {
            cases
                .as_array()
                .unwrap()
                .iter()
                .map(|c| c["title"].as_str().unwrap().to_string())
                .collect()
        };

        let searched = server
            .get("/api/lawyers/search-cases")
            .add_header(header(), as_account(lawyer))
            .add_query_param("cities", "Delhi")
            .await
            .json::<Value>();
        assert_eq!(titles(searched), vec!["third", "second", "first"]);

        let mine = server
            .get("/api/lawyers/cases")
            .add_header(header(), as_account(lawyer))
            .await
            .json::<Value>();
        assert_eq!(titles(mine), vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_search_cases_requires_cities() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let response = server
            .get("/api/lawyers/search-cases")
            .add_header(header(), as_account(lawyer))
            .add_query_param("cities", " , ")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["field"], "cities");
    }

    #[tokio::test]
    async fn test_my_cases_follow_service_cities() {
        let server = server().await;
        let lawyer = account(&server, "rk", "Ravi", "Kumar").await;
        let citizen = account(&server, "asha", "Asha", "Verma").await;
        let delhi = city(&server, lawyer, "Delhi").await;

        server
            .get("/api/lawyers/cases")
            .add_header(header(), as_account(citizen))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        profile(
            &server,
            lawyer,
            json!({ "license_number": "D/1/2010", "service_city_ids": [delhi] }),
        )
        .await;
        complaint(&server, citizen, complaint_body("Delhi theft", "Delhi", "Delhi")).await;
        complaint(&server, citizen, complaint_body("Pune assault", "Pune", "Pune")).await;

        let cases = server
            .get("/api/lawyers/cases")
            .add_header(header(), as_account(lawyer))
            .await
            .json::<Value>();
        let cases = cases.as_array().unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0]["title"], "Delhi theft");
    }
}
