use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::{
    options::{ClientOptions, FindOneAndUpdateOptions, IndexOptions, ResolverConfig, ReturnDocument},
    Client, Cursor, Database, IndexModel,
};
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::config::MongoConfig;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

pub const USERS: &str = "users";
pub const PROFILES: &str = "profiles";
pub const FAVORITES: &str = "favorites";
pub const SAVED_SEARCHES: &str = "saved_searches";
pub const NOTIFICATION_PREFERENCES: &str = "notification_preferences";
pub const INQUIRIES: &str = "inquiries";
pub const INTAKE_FORMS: &str = "client_intake_forms";
pub const PREMIUM_CONTENT: &str = "premium_content";
pub const PREMIUM_DOCUMENTS: &str = "premium_documents";
pub const DOCUMENT_ACCESS_LOGS: &str = "document_access_logs";
pub const WEBINARS: &str = "webinars";
pub const WEBINAR_REGISTRATIONS: &str = "webinar_registrations";

const APP_NAME: &str = "domy-backend";

/// Open one client for the whole process and hand out its database.
pub async fn connect(config: &MongoConfig) -> Result<Database, mongodb::error::Error> {
    let mut client_options =
        ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare()).await?;
    client_options.app_name = Some(APP_NAME.to_string());
    client_options.max_pool_size = Some(config.max_pool_size);
    client_options.connect_timeout = Some(std::time::Duration::from_secs(config.connect_timeout_secs));
    let client = Client::with_options(client_options)?;
    info!("MongoDB client created for database {}", config.database);
    Ok(client.database(&config.database))
}

/// Unique indexes backing the one-per-user and one-per-pair rules.
pub async fn ensure_indexes(db: &Database) -> RepositoryResult<()> {
    let unique = |keys: Document| {
        IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build()
    };

    let specs = [
        (USERS, unique(doc! { "email": 1 })),
        (FAVORITES, unique(doc! { "user_id": 1, "listing_id": 1 })),
        (NOTIFICATION_PREFERENCES, unique(doc! { "user_id": 1 })),
        (INTAKE_FORMS, unique(doc! { "user_id": 1 })),
        (WEBINAR_REGISTRATIONS, unique(doc! { "webinar_id": 1, "user_id": 1 })),
    ];

    for (collection, index) in specs {
        if let Err(e) = db.collection::<Document>(collection).create_index(index, None).await {
            error!("Failed to create index on {}: {}", collection, e);
            return Err(RepositoryError::from(e));
        }
    }
    info!("MongoDB indexes ensured");
    Ok(())
}

pub async fn collect<T>(cursor: Cursor<T>) -> RepositoryResult<Vec<T>>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    cursor
        .try_collect()
        .await
        .map_err(|e| RepositoryError::database(format!("Failed to read cursor: {}", e)))
}

pub fn return_updated() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build()
}

/// Serialize a record into a `$set` body, leaving the identity alone.
pub fn set_document<T: serde::Serialize>(value: &T) -> RepositoryResult<Document> {
    let mut document = bson::to_document(value)?;
    document.remove("_id");
    Ok(doc! { "$set": document })
}
