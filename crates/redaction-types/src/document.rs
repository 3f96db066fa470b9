//! Document and collaborator records as served by the documents API

use crate::wire::{opaque_id, opaque_id_opt};
use serde::{Deserialize, Serialize};

/// A user granted access to a specific document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    #[serde(rename = "CollaboratorID", alias = "collaboratorId", with = "opaque_id")]
    pub id: String,
    #[serde(rename = "CollaboratorName", alias = "collaboratorName")]
    pub name: String,
    #[serde(rename = "Role", alias = "role", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Collaborator {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: None,
        }
    }
}

/// The owning document of a restriction list.
///
/// Only the fields the restriction panel reads are modelled; anything else
/// the server sends is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(rename = "ID", alias = "id", with = "opaque_id")]
    pub id: String,
    #[serde(rename = "Title", alias = "title", default)]
    pub title: String,
    /// Rendered page image
    #[serde(rename = "ImageURL", alias = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "Status", alias = "status", default)]
    pub status: Option<String>,
    #[serde(rename = "Collaborators", alias = "collaborators", default)]
    pub collaborators: Option<Vec<Collaborator>>,
    /// Named fields from the document's OCR template
    #[serde(rename = "OcrFields", alias = "ocrFields", default)]
    pub ocr_fields: Option<Vec<String>>,
    #[serde(rename = "Comments", alias = "comments", default)]
    pub comments: Option<String>,
    #[serde(rename = "RejectionReason", alias = "rejectionReason", default)]
    pub rejection_reason: Option<String>,
    #[serde(
        rename = "OwnerID",
        alias = "ownerId",
        default,
        with = "opaque_id_opt"
    )]
    pub owner_id: Option<String>,
}

impl DocumentRecord {
    /// OCR field names, in template order, without blanks or duplicates
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.ocr_fields.iter().flatten() {
            let name = name.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}
