//! # TutorHub Shared Library
//!
//! Domain core of the TutorHub admin backend: the data layer, the business
//! lifecycle with its mirrored user account, slug allocation, the role
//! hierarchy and the dependent teacher/student profiles.
//!
//! ## Module Organization
//!
//! - `db`: connection pool, migrations, transaction helper
//! - `models`: table models and CRUD
//! - `services`: domain operations (validation, mirroring, transactions)
//! - `slug`: business slug normalization and allocation
//! - `auth`: password hashing, JWT, role hierarchy
//! - `error`: domain error type

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod slug;

/// Current version of the TutorHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
