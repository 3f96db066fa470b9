//! Restriction data model
//!
//! A restriction limits one collaborator's access to either a named OCR
//! field or a rectangular region of the rendered page.

use crate::geometry::NaturalRect;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field name sent for area restrictions
pub const CUSTOM_AREA_FIELD: &str = "Custom Area";

/// Wire discriminator for a restriction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictedType {
    /// A named data field, wherever it appears on the page
    Field,
    /// An arbitrary rectangle of the rendered page
    Open,
}

impl RestrictedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestrictedType::Field => "field",
            RestrictedType::Open => "open",
        }
    }
}

/// What a restriction covers.
///
/// Coordinates only exist for area restrictions, so a field restriction
/// with stray coordinates cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RestrictionTarget {
    Field { name: String },
    Area { rect: NaturalRect },
}

impl RestrictionTarget {
    pub fn restricted_type(&self) -> RestrictedType {
        match self {
            RestrictionTarget::Field { .. } => RestrictedType::Field,
            RestrictionTarget::Area { .. } => RestrictedType::Open,
        }
    }

    /// Value of the `Field` column
    pub fn field_label(&self) -> &str {
        match self {
            RestrictionTarget::Field { name } => name,
            RestrictionTarget::Area { .. } => CUSTOM_AREA_FIELD,
        }
    }

    pub fn area(&self) -> Option<NaturalRect> {
        match self {
            RestrictionTarget::Area { rect } => Some(*rect),
            RestrictionTarget::Field { .. } => None,
        }
    }
}

/// The collaborator (and role) a restriction applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorRef {
    pub user_id: String,
    pub role: String,
}

impl CollaboratorRef {
    pub fn new(user_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: role.into(),
        }
    }
}

/// A persisted restriction, validated at the API boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restriction {
    pub id: String,
    pub document_id: String,
    pub target: RestrictionTarget,
    pub reason: String,
    pub user_id: String,
    pub user_role: Option<String>,
    pub created_by: Option<String>,
    pub created_date: Option<String>,
}

impl Restriction {
    pub fn restricted_type(&self) -> RestrictedType {
        self.target.restricted_type()
    }

    pub fn field(&self) -> &str {
        self.target.field_label()
    }

    pub fn is_area(&self) -> bool {
        matches!(self.target, RestrictionTarget::Area { .. })
    }

    /// Creation timestamp, when the server sent an RFC 3339 date
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_date
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// A restriction about to be created; produced by a validated form
#[derive(Debug, Clone, PartialEq)]
pub struct NewRestriction {
    pub target: RestrictionTarget,
    pub reason: String,
    pub collaborator: CollaboratorRef,
}
