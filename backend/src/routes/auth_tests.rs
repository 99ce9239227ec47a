//! Router-level tests for the auth surface
//!
//! These run the real router over the in-memory credential store, so the
//! whole chain - extractor, codec, gates, handlers - is exercised without
//! a database.

#[cfg(test)]
mod tests {
    use crate::auth::{PasswordService, Role};
    use crate::config::AppConfig;
    use crate::repositories::credentials::testing::InMemoryCredentialStore;
    use crate::repositories::{AccountStatus, CredentialStore};
    use crate::routes::create_router;
    use crate::state::AppState;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// State over an empty in-memory store (cheap; for header/gate tests)
    fn empty_state() -> AppState {
        AppState::new(
            Arc::new(InMemoryCredentialStore::new()),
            AppConfig::default(),
        )
        .unwrap()
    }

    /// State seeded with an active admin and a regular user
    fn seeded_state() -> (AppState, Arc<InMemoryCredentialStore>) {
        let store = Arc::new(InMemoryCredentialStore::new());
        let admin_hash = PasswordService::hash("admin123").unwrap();
        store.seed("admin@vet.com", &admin_hash, Role::Admin, AccountStatus::Active);
        let user_hash = PasswordService::hash("user1234").unwrap();
        store.seed("tech@vet.com", &user_hash, Role::User, AccountStatus::Active);

        let state = AppState::new(store.clone(), AppConfig::default()).unwrap();
        (state, store)
    }

    async fn send(
        app: Router,
        method: &str,
        path: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(auth) = auth {
            builder = builder.header("Authorization", auth);
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn login(app: Router, email: &str, password: &str) -> (StatusCode, Value) {
        send(
            app,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({"email": email, "password": password})),
        )
        .await
    }

    #[tokio::test]
    async fn login_returns_token_and_public_user() {
        let (state, _) = seeded_state();
        let app = create_router(state);

        let (status, body) = login(app, "admin@vet.com", "admin123").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(!body["data"]["token"].as_str().unwrap().is_empty());
        assert_eq!(body["data"]["user"]["email"], "admin@vet.com");
        assert_eq!(body["data"]["user"]["role"], "admin");
        // The hash never leaves the store
        let raw = body.to_string();
        assert!(!raw.contains("password"));
        assert!(!raw.contains("$2b$"));
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_responses_are_byte_identical() {
        let (state, _) = seeded_state();

        let (status_a, body_a) =
            login(create_router(state.clone()), "nobody@vet.com", "admin123").await;
        let (status_b, body_b) =
            login(create_router(state), "admin@vet.com", "wrong-pass").await;

        assert_eq!(status_a, StatusCode::UNAUTHORIZED);
        assert_eq!(status_a, status_b);
        assert_eq!(body_a, body_b);
        assert_eq!(body_a["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn login_with_missing_fields_is_400() {
        let (state, _) = seeded_state();
        let app = create_router(state);

        let (status, body) = send(
            app,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "admin@vet.com"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn verify_round_trips_identity() {
        let (state, _) = seeded_state();
        let (_, body) = login(create_router(state.clone()), "tech@vet.com", "user1234").await;
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let (status, body) = send(
            create_router(state),
            "GET",
            "/api/v1/auth/verify",
            Some(&format!("Bearer {}", token)),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user"]["email"], "tech@vet.com");
        assert_eq!(body["data"]["user"]["role"], "user");
    }

    #[tokio::test]
    async fn missing_header_and_wrong_scheme_get_distinct_401_messages() {
        let state = empty_state();

        let (status, body) = send(
            create_router(state.clone()),
            "GET",
            "/api/v1/auth/verify",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Access token not provided");

        let (status, body) = send(
            create_router(state),
            "GET",
            "/api/v1/auth/verify",
            Some("Token abc"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token format");
    }

    #[tokio::test]
    async fn expired_and_tampered_tokens_get_distinct_401_messages() {
        let (state, store) = seeded_state();
        let admin = store.find_by_email("admin@vet.com").await.unwrap().unwrap();

        let expired = state
            .jwt()
            .issue_with_ttl(admin.id, &admin.email, admin.role, -60)
            .unwrap();
        let (status, body) = send(
            create_router(state.clone()),
            "GET",
            "/api/v1/auth/verify",
            Some(&format!("Bearer {}", expired)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Token expired");

        let valid = state.jwt().issue(admin.id, &admin.email, admin.role).unwrap();
        let mut tampered = valid.clone();
        tampered.pop();
        tampered.push(if valid.ends_with('A') { 'B' } else { 'A' });
        let (status, body) = send(
            create_router(state),
            "GET",
            "/api/v1/auth/verify",
            Some(&format!("Bearer {}", tampered)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token");
    }

    #[tokio::test]
    async fn deleted_subject_fails_strict_verification_despite_valid_token() {
        let (state, store) = seeded_state();
        let tech = store.find_by_email("tech@vet.com").await.unwrap().unwrap();
        let token = state.jwt().issue(tech.id, &tech.email, tech.role).unwrap();

        store.remove(tech.id);

        let (status, _) = send(
            create_router(state),
            "GET",
            "/api/v1/auth/verify",
            Some(&format!("Bearer {}", token)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn inactive_subject_fails_strict_verification() {
        let (state, store) = seeded_state();
        let id = store.seed(
            "retired@vet.com",
            "$2b$10$irrelevant",
            Role::User,
            AccountStatus::Inactive,
        );
        let token = state.jwt().issue(id, "retired@vet.com", Role::User).unwrap();

        let (status, _) = send(
            create_router(state),
            "GET",
            "/api/v1/auth/verify",
            Some(&format!("Bearer {}", token)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_token_passes_gates_user_token_gets_403() {
        let (state, _) = seeded_state();

        let (_, body) = login(create_router(state.clone()), "admin@vet.com", "admin123").await;
        let admin_token = body["data"]["token"].as_str().unwrap().to_string();
        let (_, body) = login(create_router(state.clone()), "tech@vet.com", "user1234").await;
        let user_token = body["data"]["token"].as_str().unwrap().to_string();

        // Admin role gate on GET /users
        let (status, _) = send(
            create_router(state.clone()),
            "GET",
            "/api/v1/users",
            Some(&format!("Bearer {}", admin_token)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            create_router(state.clone()),
            "GET",
            "/api/v1/users",
            Some(&format!("Bearer {}", user_token)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Manage permission gate on POST /users
        let new_user = json!({"email": "nurse@vet.com", "password": "secret123"});
        let (status, _) = send(
            create_router(state.clone()),
            "POST",
            "/api/v1/users",
            Some(&format!("Bearer {}", user_token)),
            Some(new_user.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            create_router(state.clone()),
            "POST",
            "/api/v1/users",
            Some(&format!("Bearer {}", admin_token)),
            Some(new_user.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["email"], "nurse@vet.com");

        // Duplicate email is a conflict
        let (status, _) = send(
            create_router(state),
            "POST",
            "/api/v1/users",
            Some(&format!("Bearer {}", admin_token)),
            Some(new_user),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    /// Generate random invalid tokens
    fn invalid_token_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("".to_string()),
            // Random string (not a valid JWT)
            "[a-zA-Z0-9]{10,50}".prop_map(|s| s),
            // Malformed JWT (wrong number of parts)
            "[a-zA-Z0-9]{10}\\.[a-zA-Z0-9]{10}".prop_map(|s| s),
            // Valid format but invalid signature
            "[a-zA-Z0-9_-]{20}\\.[a-zA-Z0-9_-]{20}\\.[a-zA-Z0-9_-]{20}".prop_map(|s| s),
        ]
    }

    /// Generate random authorization header formats
    fn auth_header_strategy() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            // No header
            Just(None),
            // Missing Bearer prefix
            invalid_token_strategy().prop_map(Some),
            // Wrong scheme
            invalid_token_strategy().prop_map(|t| Some(format!("Basic {}", t))),
            // Bearer with invalid token
            invalid_token_strategy().prop_map(|t| Some(format!("Bearer {}", t))),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: no malformed credential ever gets past the extractor
        #[test]
        fn prop_unauthenticated_requests_return_401(
            auth_header in auth_header_strategy()
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let app = create_router(empty_state());

                let mut request_builder = Request::builder()
                    .uri("/api/v1/auth/verify")
                    .method("GET");

                if let Some(header) = auth_header {
                    request_builder = request_builder.header("Authorization", header);
                }

                let request = request_builder.body(Body::empty()).unwrap();
                let response = app.oneshot(request).await.unwrap();

                prop_assert_eq!(
                    response.status(),
                    StatusCode::UNAUTHORIZED,
                    "Expected 401 for unauthenticated request"
                );

                Ok(())
            })?;
        }
    }
}
