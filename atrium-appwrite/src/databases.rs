use serde::Serialize;
use serde_json::json;

use crate::client::AppwriteClient;
use crate::error::PlatformError;
use crate::models::{Collection, Document};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocument<'a, T: ?Sized> {
    document_id: &'a str,
    data: &'a T,
    permissions: &'a [String],
}

/// `/databases` endpoints.
#[derive(Debug, Clone)]
pub struct Databases {
    client: AppwriteClient,
}

impl Databases {
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    pub async fn create_document<T: Serialize + ?Sized>(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &T,
        permissions: &[String],
    ) -> Result<Document, PlatformError> {
        self.client
            .post(
                &format!("databases/{database_id}/collections/{collection_id}/documents"),
                &CreateDocument {
                    document_id,
                    data,
                    permissions,
                },
            )
            .await
    }

    pub async fn create_collection(
        &self,
        database_id: &str,
        collection_id: &str,
        name: &str,
        permissions: &[String],
        document_security: bool,
    ) -> Result<Collection, PlatformError> {
        self.client
            .post(
                &format!("databases/{database_id}/collections"),
                &json!({
                    "collectionId": collection_id,
                    "name": name,
                    "permissions": permissions,
                    "documentSecurity": document_security,
                }),
            )
            .await
    }
}
