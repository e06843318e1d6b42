// Row types mirrored from the hosted backend tables.
//
// Rows are deserialized verbatim: unknown columns are ignored and optional
// columns fall back to their defaults.

pub mod assessment;
pub mod litige;
pub mod profile;
pub mod session;
pub mod shop;

pub use assessment::{Answer, Assessment, AssessmentStatus, NewAssessment};
pub use litige::{Litige, NewLitige};
pub use profile::{Profile, Role, UserContext};
pub use session::{AuthSession, Credentials, SessionUser};
pub use shop::{Airport, Shop};
