//! JSON wire schema for the documents API
//!
//! The server's responses are loosely shaped: ids arrive as numbers or
//! strings, optional columns may be absent or `null`, and older rows lack a
//! `restrictedType`. Everything is normalized here so the rest of the crate
//! only ever sees validated [`Restriction`] values.

use crate::geometry::NaturalRect;
use crate::restriction::{NewRestriction, RestrictedType, Restriction, RestrictionTarget};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A record that could not be turned into a [`Restriction`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Restriction {id}: missing {column}")]
    MissingColumn { id: String, column: &'static str },

    #[error("Restriction {id}: area restriction without a positive area")]
    EmptyArea { id: String },

    #[error("Restriction {id}: area lies outside the image")]
    AreaOutOfBounds { id: String },

    #[error("Response reported success without data")]
    MissingData,
}

/// Ids are opaque to the client. The server sends integers for most tables
/// and strings for a few, so both are accepted and kept as strings.
pub(crate) mod opaque_id {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(id: &str, serializer: S) -> Result<S::Ok, S::Error> {
        match id.parse::<u64>() {
            Ok(n) if !id.starts_with('0') || id == "0" => serializer.serialize_u64(n),
            _ => serializer.serialize_str(id),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_any(IdVisitor)
    }

    pub(super) struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer or string id")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            if v.fract() == 0.0 && v.is_finite() {
                Ok(format!("{}", v as i64))
            } else {
                Err(E::custom(format!("non-integer id {}", v)))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }
    }
}

pub(crate) mod opaque_id_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => super::opaque_id::serialize(id, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "super::opaque_id")] String);

        let value: Option<Wrapper> = Option::deserialize(deserializer)?;
        Ok(value.map(|Wrapper(id)| id))
    }
}

/// Coordinates sometimes come back as numeric strings
mod lenient_f64 {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(f64),
        Str(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let value: Option<NumOrString> = Option::deserialize(deserializer)?;
        Ok(match value {
            Some(NumOrString::Num(n)) => Some(n),
            Some(NumOrString::Str(s)) => s.trim().parse().ok(),
            None => None,
        })
    }
}

/// Response envelope shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `success: false` from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub message: Option<String>,
}

impl Rejection {
    pub fn is_not_found(&self) -> bool {
        self.message
            .as_deref()
            .map(|m| m.to_ascii_lowercase().contains("not found"))
            .unwrap_or(false)
    }
}

impl<T> ApiEnvelope<T> {
    pub fn into_result(self) -> Result<Option<T>, Rejection> {
        if self.success {
            Ok(self.data)
        } else {
            Err(Rejection {
                message: self.message,
            })
        }
    }
}

/// A restriction row as returned by `GET .../restrictions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictionRecord {
    #[serde(rename = "ID", alias = "id", with = "opaque_id")]
    pub id: String,
    #[serde(rename = "DocumentID", alias = "documentId", default, with = "opaque_id_opt")]
    pub document_id: Option<String>,
    #[serde(rename = "Field", alias = "field", default)]
    pub field: Option<String>,
    #[serde(rename = "Reason", alias = "reason", default)]
    pub reason: Option<String>,
    #[serde(rename = "UserID", alias = "userId", with = "opaque_id")]
    pub user_id: String,
    #[serde(rename = "UserRole", alias = "userRole", default)]
    pub user_role: Option<String>,
    #[serde(rename = "restrictedType", alias = "RestrictedType", default)]
    pub restricted_type: Option<RestrictedType>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub xaxis: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub yaxis: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub width: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub height: Option<f64>,
    #[serde(rename = "CreatedBy", alias = "createdBy", default, with = "opaque_id_opt")]
    pub created_by: Option<String>,
    #[serde(rename = "CreatedDate", alias = "createdDate", default)]
    pub created_date: Option<String>,
}

impl RestrictionRecord {
    fn area(&self) -> NaturalRect {
        NaturalRect::new(
            self.xaxis.unwrap_or(0.0),
            self.yaxis.unwrap_or(0.0),
            self.width.unwrap_or(0.0),
            self.height.unwrap_or(0.0),
        )
    }

    /// Legacy rows carry no `restrictedType`; a positive area means `open`
    fn effective_type(&self) -> RestrictedType {
        match self.restricted_type {
            Some(t) => t,
            None if self.area().has_positive_area() => RestrictedType::Open,
            None => RestrictedType::Field,
        }
    }

    /// Validate and convert into the domain type.
    ///
    /// `document_id` fills in rows that omit their owning document.
    pub fn into_restriction(self, document_id: &str) -> Result<Restriction, SchemaError> {
        let target = match self.effective_type() {
            RestrictedType::Field => {
                let name = self
                    .field
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| SchemaError::MissingColumn {
                        id: self.id.clone(),
                        column: "Field",
                    })?;
                RestrictionTarget::Field {
                    name: name.to_string(),
                }
            }
            RestrictedType::Open => {
                let rect = self.area();
                if !rect.has_positive_area() {
                    return Err(SchemaError::EmptyArea { id: self.id });
                }
                if rect.x < 0.0 || rect.y < 0.0 {
                    return Err(SchemaError::AreaOutOfBounds { id: self.id });
                }
                RestrictionTarget::Area { rect }
            }
        };

        Ok(Restriction {
            document_id: self.document_id.unwrap_or_else(|| document_id.to_string()),
            target,
            reason: self.reason.unwrap_or_default(),
            user_id: self.user_id,
            user_role: self.user_role,
            created_by: self.created_by,
            created_date: self.created_date,
            id: self.id,
        })
    }
}

/// Body of `POST .../restrictions_new`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRestrictionBody {
    #[serde(rename = "Field")]
    pub field: String,
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "UserID", with = "opaque_id")]
    pub user_id: String,
    #[serde(rename = "UserRole")]
    pub user_role: String,
    #[serde(rename = "restrictedType")]
    pub restricted_type: RestrictedType,
    pub xaxis: f64,
    pub yaxis: f64,
    pub width: f64,
    pub height: f64,
}

impl From<&NewRestriction> for CreateRestrictionBody {
    fn from(new: &NewRestriction) -> Self {
        let rect = new.target.area().unwrap_or_else(NaturalRect::zero);
        Self {
            field: new.target.field_label().to_string(),
            reason: new.reason.trim().to_string(),
            user_id: new.collaborator.user_id.clone(),
            user_role: new.collaborator.role.clone(),
            restricted_type: new.target.restricted_type(),
            xaxis: rect.x,
            yaxis: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}
