//! In-memory stand-in for the documents API

use async_trait::async_trait;
use redaction_core::redaction_types::{
    Collaborator, CreateRestrictionBody, DocumentRecord, RestrictedType, RestrictionRecord,
};
use redaction_core::{RestrictionApi, RestrictionError};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tokio::sync::oneshot;

#[derive(Default)]
pub struct FakeApi {
    restrictions: RefCell<HashMap<String, Vec<RestrictionRecord>>>,
    documents: RefCell<HashMap<String, DocumentRecord>>,
    next_id: Cell<u64>,
    /// Every request, as "METHOD doc[/id]"
    pub calls: RefCell<Vec<String>>,
    /// Fail the next list request with a server error
    pub fail_next_list: Cell<bool>,
    /// Fail every create request with a network error
    pub fail_creates: Cell<bool>,
    /// Requests keyed "METHOD doc" wait until the matching sender fires
    gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(100),
            ..Self::default()
        }
    }

    pub fn with_document(self, id: &str, collaborators: Vec<Collaborator>) -> Self {
        self.documents.borrow_mut().insert(
            id.to_string(),
            DocumentRecord {
                id: id.to_string(),
                title: format!("Document {}", id),
                image_url: Some(format!("https://cdn.example.com/{}.png", id)),
                status: Some("Approved".to_string()),
                collaborators: Some(collaborators),
                ocr_fields: Some(vec!["Full Name".to_string(), "SSN".to_string()]),
                comments: None,
                rejection_reason: None,
                owner_id: Some("1".to_string()),
            },
        );
        self
    }

    pub fn seed(&self, document_id: &str, record: RestrictionRecord) {
        self.restrictions
            .borrow_mut()
            .entry(document_id.to_string())
            .or_default()
            .push(record);
    }

    /// Hold the next `method` request for `document_id` until the returned
    /// sender fires
    pub fn hold(&self, method: &str, document_id: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .borrow_mut()
            .insert(format!("{} {}", method, document_id), rx);
        tx
    }

    pub fn gate_list(&self, document_id: &str) -> oneshot::Sender<()> {
        self.hold("LIST", document_id)
    }

    async fn pass_gate(&self, method: &str, document_id: &str) {
        let gate = self
            .gates
            .borrow_mut()
            .remove(&format!("{} {}", method, document_id));
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    pub fn stored(&self, document_id: &str) -> Vec<RestrictionRecord> {
        self.restrictions
            .borrow()
            .get(document_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

#[async_trait(?Send)]
impl RestrictionApi for FakeApi {
    async fn list_restrictions(
        &self,
        document_id: &str,
    ) -> redaction_core::Result<Vec<RestrictionRecord>> {
        self.calls.borrow_mut().push(format!("LIST {}", document_id));
        self.pass_gate("LIST", document_id).await;

        if self.fail_next_list.replace(false) {
            return Err(RestrictionError::Server {
                status: 500,
                message: "database unavailable".to_string(),
            });
        }
        Ok(self.stored(document_id))
    }

    async fn create_restriction(
        &self,
        document_id: &str,
        body: &CreateRestrictionBody,
    ) -> redaction_core::Result<()> {
        self.calls.borrow_mut().push(format!("CREATE {}", document_id));
        self.pass_gate("CREATE", document_id).await;
        if self.fail_creates.get() {
            return Err(RestrictionError::Network("connection reset".to_string()));
        }

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let is_open = body.restricted_type == RestrictedType::Open;
        self.seed(
            document_id,
            RestrictionRecord {
                id: id.to_string(),
                document_id: Some(document_id.to_string()),
                field: Some(body.field.clone()),
                reason: Some(body.reason.clone()),
                user_id: body.user_id.clone(),
                user_role: Some(body.user_role.clone()),
                restricted_type: Some(body.restricted_type),
                xaxis: Some(if is_open { body.xaxis } else { 0.0 }),
                yaxis: Some(if is_open { body.yaxis } else { 0.0 }),
                width: Some(if is_open { body.width } else { 0.0 }),
                height: Some(if is_open { body.height } else { 0.0 }),
                created_by: Some("1".to_string()),
                created_date: Some("2024-05-01T12:00:00Z".to_string()),
            },
        );
        Ok(())
    }

    async fn delete_restriction(
        &self,
        document_id: &str,
        restriction_id: &str,
    ) -> redaction_core::Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("DELETE {}/{}", document_id, restriction_id));
        self.pass_gate("DELETE", document_id).await;

        // let a concurrent request run first
        tokio::task::yield_now().await;

        let mut all = self.restrictions.borrow_mut();
        let list = all.entry(document_id.to_string()).or_default();
        let before = list.len();
        list.retain(|r| r.id != restriction_id);
        if list.len() == before {
            return Err(RestrictionError::NotFound(restriction_id.to_string()));
        }
        Ok(())
    }

    async fn fetch_document(&self, document_id: &str) -> redaction_core::Result<DocumentRecord> {
        self.calls.borrow_mut().push(format!("DOC {}", document_id));
        self.documents
            .borrow()
            .get(document_id)
            .cloned()
            .ok_or_else(|| RestrictionError::DocumentNotFound(document_id.to_string()))
    }
}

pub fn field_record(id: &str, field: &str, user_id: &str) -> RestrictionRecord {
    RestrictionRecord {
        id: id.to_string(),
        document_id: None,
        field: Some(field.to_string()),
        reason: Some("PII".to_string()),
        user_id: user_id.to_string(),
        user_role: Some("Viewer".to_string()),
        restricted_type: Some(RestrictedType::Field),
        xaxis: Some(0.0),
        yaxis: Some(0.0),
        width: Some(0.0),
        height: Some(0.0),
        created_by: None,
        created_date: None,
    }
}

pub fn area_record(id: &str, user_id: &str, rect: [f64; 4]) -> RestrictionRecord {
    RestrictionRecord {
        id: id.to_string(),
        document_id: None,
        field: Some("Custom Area".to_string()),
        reason: Some("Signature".to_string()),
        user_id: user_id.to_string(),
        user_role: Some("Viewer".to_string()),
        restricted_type: Some(RestrictedType::Open),
        xaxis: Some(rect[0]),
        yaxis: Some(rect[1]),
        width: Some(rect[2]),
        height: Some(rect[3]),
        created_by: None,
        created_date: None,
    }
}
