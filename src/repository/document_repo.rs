use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use mongodb::{options::FindOptions, Collection, Database};
use tracing::{error, info};

use crate::model::document::{DocumentAccessLog, PremiumDocument};
use crate::repository::mongo::{collect, DOCUMENT_ACCESS_LOGS, PREMIUM_DOCUMENTS};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Club document metadata plus the access log kept beside it.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn list(&self) -> RepositoryResult<Vec<PremiumDocument>>;
    async fn find(&self, id: &ObjectId) -> RepositoryResult<Option<PremiumDocument>>;
    async fn insert(&self, document: PremiumDocument) -> RepositoryResult<PremiumDocument>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool>;
    async fn log_access(&self, log: DocumentAccessLog) -> RepositoryResult<DocumentAccessLog>;
    async fn count_access_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64>;
}

pub struct MongoDocumentRepository {
    documents: Collection<PremiumDocument>,
    access_logs: Collection<DocumentAccessLog>,
}

impl MongoDocumentRepository {
    pub fn new(db: &Database) -> Self {
        MongoDocumentRepository {
            documents: db.collection::<PremiumDocument>(PREMIUM_DOCUMENTS),
            access_logs: db.collection::<DocumentAccessLog>(DOCUMENT_ACCESS_LOGS),
        }
    }
}

#[async_trait]
impl DocumentRepository for MongoDocumentRepository {
    async fn list(&self) -> RepositoryResult<Vec<PremiumDocument>> {
        let options = FindOptions::builder().sort(doc! { "uploaded_at": -1 }).build();
        let cursor = self
            .documents
            .find(None, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list documents: {}", e)))?;
        collect(cursor).await
    }

    async fn find(&self, id: &ObjectId) -> RepositoryResult<Option<PremiumDocument>> {
        self.documents
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find document: {}", e)))
    }

    async fn insert(&self, mut document: PremiumDocument) -> RepositoryResult<PremiumDocument> {
        document.id = Some(ObjectId::new());
        document.uploaded_at = Some(Utc::now());
        match self.documents.insert_one(document.clone(), None).await {
            Ok(_) => {
                info!("Document '{}' registered", document.name);
                Ok(document)
            }
            Err(e) => {
                error!("Failed to insert document: {}", e);
                Err(RepositoryError::database(format!("Failed to insert document: {}", e)))
            }
        }
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let result = self
            .documents
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to delete document: {}", e)))?;
        Ok(result.deleted_count > 0)
    }

    async fn log_access(&self, mut log: DocumentAccessLog) -> RepositoryResult<DocumentAccessLog> {
        log.id = Some(ObjectId::new());
        log.created_at = Some(Utc::now());
        self.access_logs
            .insert_one(log.clone(), None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to log document access: {}", e)))?;
        Ok(log)
    }

    async fn count_access_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        self.access_logs
            .count_documents(doc! { "user_id": user_id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count document accesses: {}", e)))
    }
}
