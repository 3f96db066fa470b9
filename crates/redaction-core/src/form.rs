//! Restriction form state and validation
//!
//! The form decides what may be submitted. Nothing leaves the client unless
//! [`RestrictionForm::validate`] succeeds.

use crate::error::ValidationError;
use redaction_types::{CollaboratorRef, NaturalRect, NewRestriction, RestrictionTarget};
use serde::{Deserialize, Serialize};

/// What the restriction targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    #[default]
    Field,
    CustomArea,
}

impl TargetMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "field" => Some(TargetMode::Field),
            "custom_area" | "custom-area" | "area" | "open" => Some(TargetMode::CustomArea),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestrictionForm {
    mode: TargetMode,
    field: Option<String>,
    collaborator: Option<CollaboratorRef>,
    reason: String,
    selection: Option<NaturalRect>,
}

impl RestrictionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> TargetMode {
        self.mode
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn collaborator(&self) -> Option<&CollaboratorRef> {
        self.collaborator.as_ref()
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn selection(&self) -> Option<NaturalRect> {
        self.selection
    }

    /// Switch between field and custom-area targeting.
    ///
    /// Returns true when leaving custom-area mode discarded a selection; the
    /// caller must then clear its selector too.
    pub fn set_mode(&mut self, mode: TargetMode) -> bool {
        let discarded = self.mode == TargetMode::CustomArea
            && mode != TargetMode::CustomArea
            && self.selection.is_some();
        if mode != TargetMode::CustomArea {
            self.selection = None;
        }
        self.mode = mode;
        discarded
    }

    pub fn set_field(&mut self, field: Option<String>) {
        self.field = field.filter(|f| !f.trim().is_empty());
    }

    pub fn set_collaborator(&mut self, collaborator: Option<CollaboratorRef>) {
        self.collaborator = collaborator.filter(|c| !c.user_id.trim().is_empty());
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = reason.into();
    }

    /// Store a confirmed selection. Ignored outside custom-area mode.
    pub fn set_selection(&mut self, selection: Option<NaturalRect>) {
        if self.mode == TargetMode::CustomArea {
            self.selection = selection;
        }
    }

    /// Build the restriction to create, or say why it cannot be created
    pub fn validate(&self) -> Result<NewRestriction, ValidationError> {
        let target = match self.mode {
            TargetMode::Field => RestrictionTarget::Field {
                name: self
                    .field
                    .as_deref()
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .ok_or(ValidationError::MissingTarget)?
                    .to_string(),
            },
            TargetMode::CustomArea => {
                let rect = self.selection.ok_or(ValidationError::MissingArea)?;
                if !rect.has_positive_area() {
                    return Err(ValidationError::EmptyArea);
                }
                RestrictionTarget::Area { rect }
            }
        };

        let collaborator = self
            .collaborator
            .clone()
            .ok_or(ValidationError::MissingCollaborator)?;

        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::MissingReason);
        }

        Ok(NewRestriction {
            target,
            reason: reason.to_string(),
            collaborator,
        })
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    /// Back to a blank form after a successful submission
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
