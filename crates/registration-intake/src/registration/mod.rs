//! Registration record model and professional categories.

mod metadata;
mod validation;

pub use metadata::{ClientMetadata, UNKNOWN};
pub use validation::{
    coerce_text, normalize_specialties, RegistrationForm, ValidRegistration, ValidationError,
    MAX_TEXT_LEN,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Specialties a contractor may select.
pub const CONTRACTOR_SPECIALTIES: &[&str] = &[
    "pedreiro",
    "eletricista",
    "encanador",
    "gesseiro",
    "pintor",
    "instalador-pisos",
];

/// Specialties an engineer may select (exactly one).
pub const ENGINEER_SPECIALTIES: &[&str] = &["projetista", "gerenciamento-obras", "orcamentista"];

/// Professional category of a registrant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Profession {
    #[serde(rename = "arquiteto")]
    Architect,
    #[serde(rename = "engenheiro")]
    Engineer,
    #[serde(rename = "prestador")]
    Contractor,
    #[serde(rename = "fornecedor")]
    Supplier,
    #[serde(rename = "construtor")]
    Builder,
    #[serde(rename = "designer")]
    Designer,
    #[serde(rename = "outro")]
    Other,
}

impl Profession {
    /// All professions, in form order.
    pub const ALL: [Profession; 7] = [
        Profession::Architect,
        Profession::Engineer,
        Profession::Contractor,
        Profession::Supplier,
        Profession::Builder,
        Profession::Designer,
        Profession::Other,
    ];

    /// Wire tag used in requests, responses and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Profession::Architect => "arquiteto",
            Profession::Engineer => "engenheiro",
            Profession::Contractor => "prestador",
            Profession::Supplier => "fornecedor",
            Profession::Builder => "construtor",
            Profession::Designer => "designer",
            Profession::Other => "outro",
        }
    }

    /// Check a normalized specialty list against this profession's rules.
    ///
    /// Contractors need at least one specialty, all from
    /// [`CONTRACTOR_SPECIALTIES`]. Engineers need exactly one, from
    /// [`ENGINEER_SPECIALTIES`]. Everyone else is unconstrained.
    pub fn check_specialties(&self, specialties: &[String]) -> Result<(), ValidationError> {
        match self {
            Profession::Contractor => {
                if specialties.is_empty() {
                    return Err(ValidationError::ContractorSpecialtyRequired);
                }
                if !specialties
                    .iter()
                    .all(|s| CONTRACTOR_SPECIALTIES.contains(&s.as_str()))
                {
                    return Err(ValidationError::InvalidSpecialties);
                }
                Ok(())
            }
            Profession::Engineer => match specialties {
                [] => Err(ValidationError::EngineerSpecialtyRequired),
                [only] if ENGINEER_SPECIALTIES.contains(&only.as_str()) => Ok(()),
                [_] => Err(ValidationError::InvalidSpecialties),
                _ => Err(ValidationError::EngineerSingleSpecialty),
            },
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profession {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profession::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or(ValidationError::InvalidProfession)
    }
}

/// A validated registration ready to be persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Registration {
    pub name: String,
    pub profession: Profession,
    pub specialties: Vec<String>,
    pub company: String,
    pub phone: String,
    /// Trimmed and lowercased; the uniqueness key
    pub email: String,
    pub city: String,
    /// Server clock at creation
    pub registered_at: DateTime<Utc>,
    pub client_ip: String,
    pub user_agent: String,
}

impl Registration {
    /// Stamp validated fields with the creation time and client metadata.
    pub fn new(valid: ValidRegistration, metadata: ClientMetadata) -> Self {
        Self {
            name: valid.name,
            profession: valid.profession,
            specialties: valid.specialties,
            company: valid.company,
            phone: valid.phone,
            email: valid.email,
            city: valid.city,
            registered_at: Utc::now(),
            client_ip: metadata.ip,
            user_agent: metadata.user_agent,
        }
    }

    /// Specialties rendered for log lines, e.g. ` (pedreiro, pintor)`.
    pub fn specialties_suffix(&self) -> String {
        if self.specialties.is_empty() {
            String::new()
        } else {
            format!(" ({})", self.specialties.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_profession_round_trip_tags() {
        for profession in Profession::ALL {
            assert_eq!(profession.as_str().parse::<Profession>().unwrap(), profession);
        }
        assert!("astronauta".parse::<Profession>().is_err());
        assert!("Engenheiro".parse::<Profession>().is_err());
    }

    #[test]
    fn test_profession_serialization() {
        let json = serde_json::to_string(&Profession::Contractor).unwrap();
        assert_eq!(json, "\"prestador\"");

        let json = serde_json::to_string(&Profession::Engineer).unwrap();
        assert_eq!(json, "\"engenheiro\"");
    }

    #[test]
    fn test_contractor_specialties() {
        let contractor = Profession::Contractor;

        assert_eq!(
            contractor.check_specialties(&[]),
            Err(ValidationError::ContractorSpecialtyRequired)
        );
        assert!(contractor.check_specialties(&list(&["pedreiro"])).is_ok());
        assert!(contractor
            .check_specialties(&list(&["pintor", "instalador-pisos"]))
            .is_ok());
        assert_eq!(
            contractor.check_specialties(&list(&["pedreiro", "astronauta"])),
            Err(ValidationError::InvalidSpecialties)
        );
    }

    #[test]
    fn test_engineer_specialties() {
        let engineer = Profession::Engineer;

        assert_eq!(
            engineer.check_specialties(&[]),
            Err(ValidationError::EngineerSpecialtyRequired)
        );
        assert!(engineer.check_specialties(&list(&["orcamentista"])).is_ok());
        assert_eq!(
            engineer.check_specialties(&list(&["pedreiro"])),
            Err(ValidationError::InvalidSpecialties)
        );
        assert_eq!(
            engineer.check_specialties(&list(&["projetista", "orcamentista"])),
            Err(ValidationError::EngineerSingleSpecialty)
        );
    }

    #[test]
    fn test_other_professions_unconstrained() {
        for profession in [
            Profession::Architect,
            Profession::Supplier,
            Profession::Builder,
            Profession::Designer,
            Profession::Other,
        ] {
            assert!(profession.check_specialties(&[]).is_ok());
            assert!(profession
                .check_specialties(&list(&["anything", "goes"]))
                .is_ok());
        }
    }
}
