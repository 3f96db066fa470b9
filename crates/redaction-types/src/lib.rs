//! Shared types for the restriction (redaction) panel
//!
//! Coordinate spaces, the restriction data model, document/collaborator
//! records and the JSON wire schema spoken by the documents API.

pub mod document;
pub mod geometry;
pub mod restriction;
pub mod session;
pub mod wire;

pub use document::{Collaborator, DocumentRecord};
pub use geometry::{
    DisplayPoint, DisplayRect, DisplaySize, DisplaySpace, NaturalRect, NaturalSize, NaturalSpace,
    Point, Rect, Size, Space,
};
pub use restriction::{
    CollaboratorRef, NewRestriction, Restriction, RestrictedType, RestrictionTarget,
    CUSTOM_AREA_FIELD,
};
pub use session::{Role, SessionContext};
pub use wire::{ApiEnvelope, CreateRestrictionBody, Rejection, RestrictionRecord, SchemaError};
