//! MongoDB-backed registration store.

use super::{RegistrationStore, StoreError};
use crate::config::DatabaseConfig;
use crate::registration::Registration;
use async_trait::async_trait;
use mongodb::{
    bson::{doc, Bson, DateTime as BsonDateTime, Document},
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions},
    Client, Collection, Database, IndexModel,
};
use secrecy::ExposeSecret;
use tracing::debug;

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

const EMAIL_INDEX_NAME: &str = "email_unique";

const APP_NAME: &str = "registration-intake";

/// Registration records in a MongoDB collection with a unique index on `email`.
pub struct MongoStore {
    database: Database,
    collection: Collection<Document>,
}

impl MongoStore {
    /// Connect and make sure the unique email index exists.
    ///
    /// Index creation is idempotent and doubles as the connectivity check.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let uri = config.uri.as_ref().ok_or(StoreError::NotConfigured)?;

        let mut options = ClientOptions::parse(uri.expose_secret())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        options.server_selection_timeout = Some(config.server_selection_timeout);
        options.max_pool_size = Some(config.max_pool_size);
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options)?;
        let database = client.database(&config.name);
        let collection = database.collection::<Document>(&config.collection);

        let mut index_options = IndexOptions::default();
        index_options.name = Some(EMAIL_INDEX_NAME.to_string());
        index_options.unique = Some(true);
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(index_options)
            .build();
        collection.create_index(index).await?;
        debug!(collection = %config.collection, "Unique email index ensured");

        Ok(Self {
            database,
            collection,
        })
    }
}

#[async_trait]
impl RegistrationStore for MongoStore {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let found = self.collection.find_one(doc! { "email": email }).await?;
        Ok(found.is_some())
    }

    async fn insert(&self, registration: &Registration) -> Result<String, StoreError> {
        let result = self
            .collection
            .insert_one(to_document(registration))
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    StoreError::DuplicateEmail(registration.email.clone())
                } else {
                    e.into()
                }
            })?;

        Ok(match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s,
            other => other.to_string(),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

/// Storage layout of a registration record.
fn to_document(registration: &Registration) -> Document {
    let registered_at = BsonDateTime::from_millis(registration.registered_at.timestamp_millis());

    doc! {
        "nome": registration.name.as_str(),
        "profissao": registration.profession.as_str(),
        "especialidades": registration.specialties.clone(),
        "empresa": registration.company.as_str(),
        "telefone": registration.phone.as_str(),
        "email": registration.email.as_str(),
        "cidade": registration.city.as_str(),
        "dataRegistro": registered_at,
        "ip": registration.client_ip.as_str(),
        "userAgent": registration.user_agent.as_str(),
        "createdAt": registered_at,
        "updatedAt": registered_at,
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        match e.kind.as_ref() {
            ErrorKind::Io(_)
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::Authentication { .. } => StoreError::Connection(e.to_string()),
            _ => StoreError::Backend(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::{ClientMetadata, Profession, ValidRegistration};

    #[test]
    fn test_document_layout() {
        let registration = Registration::new(
            ValidRegistration {
                name: "Ana Reis".into(),
                profession: Profession::Engineer,
                specialties: vec!["orcamentista".into()],
                company: "Reis Engenharia".into(),
                phone: "31987654321".into(),
                email: "ana@example.com".into(),
                city: "Belo Horizonte".into(),
            },
            ClientMetadata {
                ip: "203.0.113.9".into(),
                user_agent: "Mozilla/5.0".into(),
            },
        );

        let document = to_document(&registration);

        assert_eq!(document.get_str("email").unwrap(), "ana@example.com");
        assert_eq!(document.get_str("profissao").unwrap(), "engenheiro");
        assert_eq!(document.get_str("ip").unwrap(), "203.0.113.9");
        assert_eq!(
            document.get_array("especialidades").unwrap(),
            &vec![Bson::String("orcamentista".into())]
        );
        assert_eq!(
            document.get_datetime("dataRegistro").unwrap().timestamp_millis(),
            registration.registered_at.timestamp_millis()
        );
        assert!(!document.contains_key("_id"));
    }

    #[tokio::test]
    async fn test_connect_without_uri() {
        let result = MongoStore::connect(&DatabaseConfig::default()).await;
        assert!(matches!(result, Err(StoreError::NotConfigured)));
    }
}
