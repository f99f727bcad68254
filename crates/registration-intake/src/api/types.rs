//! API response types.

use crate::registration::{Profession, Registration};
use chrono::{DateTime, Utc};
use serde::Serialize;

const CREATED_MESSAGE: &str = "Pré-cadastro realizado com sucesso!";

/// Response after a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub data: RegistrationData,
}

/// Echoed subset of the created record.
#[derive(Debug, Serialize)]
pub struct RegistrationData {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "profissao")]
    pub profession: Profession,
    #[serde(rename = "especialidades")]
    pub specialties: Vec<String>,
    #[serde(rename = "dataRegistro")]
    pub registered_at: DateTime<Utc>,
}

impl RegisterResponse {
    pub fn created(id: String, registration: &Registration) -> Self {
        Self {
            success: true,
            message: CREATED_MESSAGE.to_string(),
            data: RegistrationData {
                id,
                name: registration.name.clone(),
                email: registration.email.clone(),
                profession: registration.profession,
                specialties: registration.specialties.clone(),
                registered_at: registration.registered_at,
            },
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// `ok`, `unavailable` or `unconfigured`
    pub database: String,
}
