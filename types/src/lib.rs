//! Shared domain types for herdguard.
//!
//! Everything the engines exchange lives here: identifiers, enrolled subjects
//! and their tags, grazing routes, coordinates, and the verification record
//! appended to the audit trail.

pub mod geo;
pub mod id;
pub mod route;
pub mod subject;
pub mod tag;
pub mod time;
pub mod verification;

pub use geo::Coordinate;
pub use id::{ActorId, RouteId, SubjectId, TagId};
pub use route::{Route, RouteStatus};
pub use subject::{BiometricTemplate, Modality, Subject, SubjectStatus, SubjectView};
pub use tag::{Tag, TagView};
pub use time::{Clock, SystemClock, Timestamp};
pub use verification::{
    ModalityOutcome, OutcomeSet, RiskLevel, VerificationKind, VerificationRecord,
    VerificationStatus,
};
