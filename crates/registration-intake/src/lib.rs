//! Registration Intake - professional pre-registration service.
//!
//! Accepts the sign-up form of a construction services marketplace:
//! - Sanitizes and validates the submitted fields
//! - Applies profession-specific specialty rules
//! - Deduplicates by email and persists to MongoDB

pub mod api;
pub mod config;
pub mod error;
pub mod registration;
pub mod store;

pub use config::Config;
pub use error::IntakeError;
pub use registration::{Profession, Registration, RegistrationForm, ValidationError};
pub use store::{MemoryStore, MongoStore, RegistrationStore, Store, StoreError};
