//! Client-side restriction store
//!
//! Holds the restriction list of the open document, annotated with
//! collaborator names, and keeps it in sync with the server:
//!
//! - mutations are never applied optimistically; every successful (or
//!   "already gone") mutation re-fetches the restrictions and the document
//! - responses are applied only while the store is still showing the
//!   document they were requested for, so a slow fetch for a previous
//!   document cannot overwrite the current one
//! - a failed fetch keeps the previous list

use crate::api::RestrictionApi;
use crate::config::PanelConfig;
use crate::error::{RestrictionError, Result, ValidationError};
use redaction_types::{
    Collaborator, CreateRestrictionBody, DocumentRecord, NaturalSize, NewRestriction, Restriction,
    SessionContext,
};
use serde::Serialize;
use std::cell::RefCell;
use tracing::{debug, error, warn};

/// A restriction with its collaborator's display name joined in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedRestriction {
    #[serde(flatten)]
    pub restriction: Restriction,
    pub collaborator_name: String,
}

/// Transient banner message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Whether a response was applied or dropped as stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied(usize),
    Stale,
}

#[derive(Debug, Default)]
struct StoreState {
    document_id: Option<String>,
    generation: u64,
    restrictions: Vec<AnnotatedRestriction>,
    collaborators: Vec<Collaborator>,
    document: Option<DocumentRecord>,
    image_size: Option<NaturalSize>,
    notice: Option<Notice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket(u64);

pub struct RestrictionStore<A> {
    api: A,
    session: Option<SessionContext>,
    unknown_user_label: String,
    state: RefCell<StoreState>,
}

impl<A: RestrictionApi> RestrictionStore<A> {
    pub fn new(api: A, config: &PanelConfig) -> Self {
        Self {
            api,
            session: None,
            unknown_user_label: config.unknown_user_label.clone(),
            state: RefCell::new(StoreState::default()),
        }
    }

    /// Gate mutations on the signed-in user's role
    pub fn with_session(mut self, session: SessionContext) -> Self {
        self.session = Some(session);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> Option<&SessionContext> {
        self.session.as_ref()
    }

    /// Start showing a document. Drops the previous list and makes any
    /// in-flight response for another document stale.
    pub fn open_document(&self, document_id: &str, collaborators: Vec<Collaborator>) {
        let mut state = self.state.borrow_mut();
        state.generation += 1;
        state.document_id = Some(document_id.to_string());
        state.restrictions.clear();
        state.document = None;
        state.image_size = None;
        state.notice = None;
        state.collaborators = collaborators;
        debug!(document_id, generation = state.generation, "document opened");
    }

    pub fn close(&self) {
        let mut state = self.state.borrow_mut();
        state.generation += 1;
        *state = StoreState {
            generation: state.generation,
            ..StoreState::default()
        };
    }

    pub fn active_document(&self) -> Option<String> {
        self.state.borrow().document_id.clone()
    }

    /// Natural size of the page image, once it has loaded
    pub fn set_image_size(&self, size: NaturalSize) {
        self.state.borrow_mut().image_size = (!size.is_degenerate()).then_some(size);
    }

    pub fn set_collaborators(&self, collaborators: Vec<Collaborator>) {
        let mut state = self.state.borrow_mut();
        state.collaborators = collaborators;
        let StoreState {
            restrictions,
            collaborators,
            ..
        } = &mut *state;
        for entry in restrictions.iter_mut() {
            entry.collaborator_name =
                display_name(collaborators, &entry.restriction.user_id, &self.unknown_user_label);
        }
    }

    pub fn restrictions(&self) -> Vec<AnnotatedRestriction> {
        self.state.borrow().restrictions.clone()
    }

    /// Restrictions on named fields
    pub fn field_restrictions(&self) -> Vec<AnnotatedRestriction> {
        self.state
            .borrow()
            .restrictions
            .iter()
            .filter(|r| !r.restriction.is_area())
            .cloned()
            .collect()
    }

    /// Restrictions on custom areas
    pub fn area_restrictions(&self) -> Vec<AnnotatedRestriction> {
        self.state
            .borrow()
            .restrictions
            .iter()
            .filter(|r| r.restriction.is_area())
            .cloned()
            .collect()
    }

    pub fn collaborators(&self) -> Vec<Collaborator> {
        self.state.borrow().collaborators.clone()
    }

    pub fn document(&self) -> Option<DocumentRecord> {
        self.state.borrow().document.clone()
    }

    /// OCR field names offered by the field picker
    pub fn field_names(&self) -> Vec<String> {
        self.state
            .borrow()
            .document
            .as_ref()
            .map(DocumentRecord::field_names)
            .unwrap_or_default()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.state.borrow().notice.clone()
    }

    pub fn take_notice(&self) -> Option<Notice> {
        self.state.borrow_mut().notice.take()
    }

    fn ticket(&self) -> Ticket {
        Ticket(self.state.borrow().generation)
    }

    fn is_current(&self, ticket: Ticket, document_id: &str) -> bool {
        let state = self.state.borrow();
        state.generation == ticket.0 && state.document_id.as_deref() == Some(document_id)
    }

    fn set_notice(&self, ticket: Ticket, document_id: &str, notice: Notice) {
        if self.is_current(ticket, document_id) {
            self.state.borrow_mut().notice = Some(notice);
        }
    }

    /// Load the restriction list of `document_id`
    pub async fn fetch_restrictions(&self, document_id: &str) -> Result<FetchOutcome> {
        let ticket = self.ticket();
        let result = self.api.list_restrictions(document_id).await;

        if !self.is_current(ticket, document_id) {
            debug!(document_id, "dropping stale restriction list");
            return Ok(FetchOutcome::Stale);
        }

        let records = match result {
            Ok(records) => records,
            Err(e) => {
                error!(document_id, error = %e, "failed to fetch restrictions");
                self.set_notice(ticket, document_id, Notice::Error(e.user_message()));
                return Err(e);
            }
        };

        let mut restrictions = Vec::with_capacity(records.len());
        for record in records {
            match record.into_restriction(document_id) {
                Ok(r) => restrictions.push(r),
                Err(e) => warn!(document_id, error = %e, "skipping invalid restriction"),
            }
        }

        let mut state = self.state.borrow_mut();
        let annotated: Vec<_> = restrictions
            .into_iter()
            .map(|restriction| AnnotatedRestriction {
                collaborator_name: display_name(
                    &state.collaborators,
                    &restriction.user_id,
                    &self.unknown_user_label,
                ),
                restriction,
            })
            .collect();
        let count = annotated.len();
        state.restrictions = annotated;
        debug!(document_id, count, "restrictions loaded");
        Ok(FetchOutcome::Applied(count))
    }

    /// Load the owning document. Its collaborator list, when present,
    /// replaces the one given to [`open_document`](Self::open_document).
    pub async fn fetch_document(&self, document_id: &str) -> Result<FetchOutcome> {
        let ticket = self.ticket();
        let result = self.api.fetch_document(document_id).await;

        if !self.is_current(ticket, document_id) {
            debug!(document_id, "dropping stale document");
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(mut document) => {
                if let Some(collaborators) = document.collaborators.take() {
                    self.set_collaborators(collaborators.clone());
                    document.collaborators = Some(collaborators);
                }
                self.state.borrow_mut().document = Some(document);
                Ok(FetchOutcome::Applied(1))
            }
            Err(e) => {
                error!(document_id, error = %e, "failed to fetch document");
                self.set_notice(ticket, document_id, Notice::Error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Re-fetch the document and its restrictions
    pub async fn refresh(&self, document_id: &str) -> Result<()> {
        let document = self.fetch_document(document_id).await;
        let restrictions = self.fetch_restrictions(document_id).await;
        document?;
        restrictions?;
        Ok(())
    }

    fn check_permission(&self) -> Result<()> {
        match &self.session {
            Some(session) if !session.can_manage_restrictions() => {
                Err(RestrictionError::Forbidden)
            }
            _ => Ok(()),
        }
    }

    /// Final gate before a create request goes out
    fn check_new(&self, new: &NewRestriction) -> std::result::Result<(), ValidationError> {
        if new.reason.trim().is_empty() {
            return Err(ValidationError::MissingReason);
        }
        if new.collaborator.user_id.trim().is_empty() {
            return Err(ValidationError::MissingCollaborator);
        }
        if let Some(area) = new.target.area() {
            if !area.has_positive_area() {
                return Err(ValidationError::EmptyArea);
            }
            // without the natural size the area cannot be trusted to be in image pixels
            let size = self
                .state
                .borrow()
                .image_size
                .ok_or(ValidationError::ImageNotLoaded)?;
            if !area.fits_within(size) {
                return Err(ValidationError::AreaOutOfBounds);
            }
        }
        Ok(())
    }

    /// Create a restriction, then re-fetch.
    ///
    /// Returns `Stale` when another document was opened while the request was
    /// in flight; the caller must then leave its own state alone.
    pub async fn create_restriction(
        &self,
        document_id: &str,
        new: &NewRestriction,
    ) -> Result<FetchOutcome> {
        let ticket = self.ticket();
        let gate = self
            .check_permission()
            .and_then(|_| self.check_new(new).map_err(RestrictionError::from));
        if let Err(e) = gate {
            self.set_notice(ticket, document_id, Notice::Error(e.user_message()));
            return Err(e);
        }

        let body = CreateRestrictionBody::from(new);
        if let Err(e) = self.api.create_restriction(document_id, &body).await {
            error!(document_id, error = %e, "failed to create restriction");
            self.set_notice(ticket, document_id, Notice::Error(e.user_message()));
            return Err(e);
        }

        debug!(document_id, field = %body.field, "restriction created");
        self.set_notice(
            ticket,
            document_id,
            Notice::Success("Restriction added".to_string()),
        );
        Ok(self.refresh_if_current(ticket, document_id).await)
    }

    /// Delete a restriction, then re-fetch.
    ///
    /// If the server no longer has it, the list is re-fetched anyway and
    /// `NotFound` is returned for the caller to report. `Stale` means another
    /// document was opened meanwhile.
    pub async fn remove_restriction(
        &self,
        document_id: &str,
        restriction_id: &str,
    ) -> Result<FetchOutcome> {
        let ticket = self.ticket();
        if let Err(e) = self.check_permission() {
            self.set_notice(ticket, document_id, Notice::Error(e.user_message()));
            return Err(e);
        }

        match self.api.delete_restriction(document_id, restriction_id).await {
            Ok(()) => {
                debug!(document_id, restriction_id, "restriction removed");
                self.set_notice(
                    ticket,
                    document_id,
                    Notice::Success("Restriction removed".to_string()),
                );
                Ok(self.refresh_if_current(ticket, document_id).await)
            }
            Err(e) if e.is_not_found() => {
                warn!(document_id, restriction_id, "restriction already removed");
                self.set_notice(ticket, document_id, Notice::Error(e.user_message()));
                self.refresh_if_current(ticket, document_id).await;
                Err(e)
            }
            Err(e) => {
                error!(document_id, restriction_id, error = %e, "failed to remove restriction");
                self.set_notice(ticket, document_id, Notice::Error(e.user_message()));
                Err(e)
            }
        }
    }

    async fn refresh_if_current(&self, ticket: Ticket, document_id: &str) -> FetchOutcome {
        if !self.is_current(ticket, document_id) {
            debug!(document_id, "document switched during mutation, skipping refresh");
            return FetchOutcome::Stale;
        }
        // failures are already logged and surfaced as a notice
        let _ = self.refresh(document_id).await;
        FetchOutcome::Applied(self.state.borrow().restrictions.len())
    }
}

fn display_name(collaborators: &[Collaborator], user_id: &str, fallback: &str) -> String {
    collaborators
        .iter()
        .find(|c| c.id == user_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| fallback.to_string())
}
