//! Persistence API seam
//!
//! The store talks to the backend only through [`RestrictionApi`]. The browser
//! build implements it on top of `fetch`; tests use an in-memory fake.

use crate::error::Result;
use async_trait::async_trait;
use redaction_types::{CreateRestrictionBody, DocumentRecord, RestrictionRecord};

/// Restriction persistence endpoints.
///
/// Futures are not `Send`: everything runs on the browser's event loop.
#[async_trait(?Send)]
pub trait RestrictionApi {
    /// `GET /documents/documents/{id}/restrictions`
    async fn list_restrictions(&self, document_id: &str) -> Result<Vec<RestrictionRecord>>;

    /// `POST /documents/documents/{id}/restrictions_new`
    async fn create_restriction(
        &self,
        document_id: &str,
        body: &CreateRestrictionBody,
    ) -> Result<()>;

    /// `DELETE /documents/documents/{id}/restrictions/{restriction_id}`
    ///
    /// A restriction that no longer exists yields `RestrictionError::NotFound`.
    async fn delete_restriction(&self, document_id: &str, restriction_id: &str) -> Result<()>;

    /// `GET /documents/documents/{id}`
    async fn fetch_document(&self, document_id: &str) -> Result<DocumentRecord>;
}

/// Endpoint paths
pub mod routes {
    fn join(base: &str, path: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    pub fn document(base: &str, document_id: &str) -> String {
        join(base, &format!("documents/documents/{}", document_id))
    }

    pub fn restrictions(base: &str, document_id: &str) -> String {
        join(
            base,
            &format!("documents/documents/{}/restrictions", document_id),
        )
    }

    pub fn create_restriction(base: &str, document_id: &str) -> String {
        join(
            base,
            &format!("documents/documents/{}/restrictions_new", document_id),
        )
    }

    pub fn restriction(base: &str, document_id: &str, restriction_id: &str) -> String {
        join(
            base,
            &format!(
                "documents/documents/{}/restrictions/{}",
                document_id, restriction_id
            ),
        )
    }

}
