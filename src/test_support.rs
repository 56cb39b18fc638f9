//! Shared fixtures for unit and router tests

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::Value;
use tower::ServiceExt;

use crate::application::{create_event_bus, AnalyticsService, ComplaintService, UserService};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::user::{User, UserRole};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::database::test_connection;
use crate::interfaces::{create_api_router, ApiDependencies};

pub(crate) const TEST_PASSWORD: &str = "password1";

/// Repositories over a fresh in-memory database
pub(crate) async fn test_repositories() -> Arc<dyn RepositoryProvider> {
    Arc::new(SeaOrmRepositoryProvider::new(test_connection().await))
}

/// Full API router over a fresh in-memory database
pub(crate) struct TestApp {
    pub users: Arc<UserService>,
    router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = test_connection().await;
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let event_bus = create_event_bus();

        // Cost 4 keeps hashing fast
        let users = Arc::new(UserService::new(
            repos.clone(),
            JwtConfig::new("test-secret", 3600),
            4,
        ));
        let complaints = Arc::new(ComplaintService::new(repos.clone(), event_bus.clone()));
        let analytics = Arc::new(AnalyticsService::new(repos));

        let router = create_api_router(ApiDependencies {
            db,
            users: users.clone(),
            complaints,
            analytics,
            event_bus,
            metrics: PrometheusBuilder::new().build_recorder().handle(),
            cors_origins: Vec::new(),
        });

        Self { users, router }
    }

    /// Create an account named `name` with `role` and sign it in.
    ///
    /// The email is `<name lowercased>@example.com`, the password [`TEST_PASSWORD`].
    pub async fn user(&self, name: &str, role: UserRole) -> (User, String) {
        let email = format!("{}@example.com", name.to_lowercase());
        let user = match role {
            UserRole::Customer => {
                self.users
                    .register(name, &email, TEST_PASSWORD)
                    .await
                    .unwrap()
                    .user
            }
            staff => self
                .users
                .create_staff(name, &email, TEST_PASSWORD, staff.as_str())
                .await
                .unwrap(),
        };
        let token = self.users.login(&email, TEST_PASSWORD).await.unwrap().token;
        (user, token)
    }

    /// Send one request through the router; the body is parsed as JSON, `Null` otherwise.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}
