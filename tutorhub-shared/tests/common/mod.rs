//! Shared fixtures for integration tests
//!
//! Every test gets its own in-memory SQLite database with migrations applied.
//! The pool holds a single connection, so code under test must never use the
//! pool while it holds a transaction.

#![allow(dead_code)]

use sqlx::SqlitePool;
use tutorhub_shared::auth::password::HashingConfig;
use tutorhub_shared::db::migrations::run_migrations;
use tutorhub_shared::db::pool::{create_pool, DatabaseConfig};
use tutorhub_shared::models::business::Business;
use tutorhub_shared::models::package::Package;
use tutorhub_shared::models::user::User;
use tutorhub_shared::services::businesses::NewBusiness;
use tutorhub_shared::services::packages::NewPackage;
use tutorhub_shared::services::users::NewUser;
use tutorhub_shared::services::Services;

pub const PASSWORD: &str = "s3cret-password";

pub struct TestContext {
    pub pool: SqlitePool,
    pub services: Services,
}

impl TestContext {
    pub async fn new() -> Self {
        let pool = create_pool(DatabaseConfig::in_memory())
            .await
            .expect("Failed to create in-memory pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let services = Services::new(pool.clone(), HashingConfig::minimal());
        Self { pool, services }
    }

    pub async fn business(&self, name: &str, email: &str) -> Business {
        self.services
            .businesses
            .create(new_business(name, email))
            .await
            .expect("Failed to create business")
    }

    pub async fn user(&self, email: &str, role: &str) -> User {
        self.services
            .users
            .create_user(NewUser {
                name: "Test User".to_string(),
                email: email.to_string(),
                phone: "555-0100".to_string(),
                password: PASSWORD.to_string(),
                role: role.to_string(),
                status: None,
            })
            .await
            .expect("Failed to create user")
    }

    pub async fn package(&self, name: &str) -> Package {
        self.services
            .packages
            .create(NewPackage {
                name: name.to_string(),
                price: 49.0,
                validation_period_days: 30,
                description: Some("Monthly plan".to_string()),
                status: None,
            })
            .await
            .expect("Failed to create package")
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows")
    }
}

pub fn new_business(name: &str, email: &str) -> NewBusiness {
    NewBusiness {
        owner_name: "Owner".to_string(),
        name: name.to_string(),
        slug: None,
        email: email.to_string(),
        phone: "555-0100".to_string(),
        location: "Springfield".to_string(),
        password: PASSWORD.to_string(),
        package_id: None,
    }
}
