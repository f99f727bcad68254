//! Payload sanitation and validation.

use super::Profession;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use validator::ValidateEmail;

/// Maximum length, in characters, of free-text fields.
pub const MAX_TEXT_LEN: usize = 100;

/// Reasons a submitted form is rejected.
///
/// The `Display` text is returned to the caller verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Todos os campos obrigatórios devem ser preenchidos.")]
    MissingRequiredFields,

    #[error("Email inválido.")]
    InvalidEmail,

    #[error("Telefone inválido.")]
    InvalidPhone,

    #[error("Profissão inválida.")]
    InvalidProfession,

    #[error("O campo {0} deve ter no máximo 100 caracteres.")]
    TooLong(&'static str),

    #[error("Prestadores devem selecionar pelo menos uma especialidade.")]
    ContractorSpecialtyRequired,

    #[error("Engenheiros devem selecionar uma especialidade.")]
    EngineerSpecialtyRequired,

    #[error("Engenheiros devem selecionar apenas uma especialidade.")]
    EngineerSingleSpecialty,

    #[error("Especialidades inválidas para a profissão selecionada.")]
    InvalidSpecialties,
}

/// Raw registration payload as posted by the form.
///
/// Fields stay loosely typed until [`RegistrationForm::validate`] coerces them.
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(rename = "nome", default)]
    pub name: Value,

    #[serde(rename = "profissao", default)]
    pub profession: Value,

    #[serde(rename = "especialidades", default)]
    pub specialties: Value,

    #[serde(rename = "empresa", default)]
    pub company: Value,

    #[serde(rename = "telefone", default)]
    pub phone: Value,

    #[serde(default)]
    pub email: Value,

    #[serde(rename = "cidade", default)]
    pub city: Value,
}

/// Sanitized, validated form fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRegistration {
    pub name: String,
    pub profession: Profession,
    pub specialties: Vec<String>,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub city: String,
}

impl RegistrationForm {
    /// Parse a request body. Anything that is not a JSON object yields an
    /// empty form, which then fails the required-field check.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// Sanitize every field and apply the validation rules in order:
    /// required fields, email syntax, phone digits, profession, field
    /// lengths, then profession-specific specialties.
    pub fn validate(&self) -> Result<ValidRegistration, ValidationError> {
        let name = trimmed(&self.name);
        let profession = trimmed(&self.profession);
        let company = trimmed(&self.company);
        let phone = trimmed(&self.phone);
        let email = trimmed(&self.email).to_lowercase();
        let city = trimmed(&self.city);
        let specialties = normalize_specialties(&self.specialties);

        if [&name, &profession, &phone, &email, &city]
            .iter()
            .any(|field| field.is_empty())
        {
            return Err(ValidationError::MissingRequiredFields);
        }

        if !email.validate_email() || !has_public_domain(&email) {
            return Err(ValidationError::InvalidEmail);
        }

        let phone_digits = phone.chars().filter(char::is_ascii_digit).count();
        if !(10..=11).contains(&phone_digits) {
            return Err(ValidationError::InvalidPhone);
        }

        let profession: Profession = profession.parse()?;

        check_length("nome", &name)?;
        check_length("empresa", &company)?;
        check_length("cidade", &city)?;

        profession.check_specialties(&specialties)?;

        Ok(ValidRegistration {
            name,
            profession,
            specialties,
            company,
            phone,
            email,
            city,
        })
    }
}

/// Coerce a loosely-typed JSON value to text.
///
/// Strings pass through, non-zero numbers render in decimal, `true` becomes
/// `"true"`, arrays join their elements with commas. Zero, `false`, null and
/// objects coerce to the empty string.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Array(items) => items.iter().map(coerce_text).collect::<Vec<_>>().join(","),
        Value::Bool(false) | Value::Null | Value::Object(_) => String::new(),
    }
}

/// Normalize the specialties field to trimmed, non-empty entries.
///
/// Accepts a sequence or a comma-separated string; anything else (including
/// an absent field) yields an empty list.
pub fn normalize_specialties(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(_) | Value::Bool(_) => Some(item.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// The domain must carry a top-level domain and must not be an IP literal.
fn has_public_domain(email: &str) -> bool {
    match email.rsplit_once('@') {
        Some((_, domain)) => {
            !domain.starts_with('[')
                && domain.contains('.')
                && domain.parse::<std::net::IpAddr>().is_err()
        }
        None => false,
    }
}

fn trimmed(value: &Value) -> String {
    coerce_text(value).trim().to_string()
}

fn check_length(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong(field));
    }
    Ok(())
}
