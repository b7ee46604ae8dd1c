//! Schema-driven form engine.
//!
//! - [`schema`]: the declarative form definition fetched from the service
//! - [`value`]: answers and validation messages keyed by field id
//! - [`field`]: the closed set of field kinds (control + format rule per kind)
//! - [`validate`]: pure per-section validation
//! - [`session`]: the state machine sequencing edits, navigation and submit
//! - [`submission`]: the final payload and the sinks that receive it
pub mod field;
pub mod identity;
pub mod schema;
pub mod session;
pub mod submission;
pub mod validate;
pub mod value;

pub use field::{DEFAULT_LINE_CAP, Edit, FieldKind, FormatRule, LineFormat};
pub use identity::{IdentityError, ROLL_NUMBER_CAP, SessionIdentity};
pub use schema::{FieldDef, FieldOption, FieldType, FormResponse, FormSchema, Section};
pub use session::{FormSession, SessionError};
pub use submission::{FileSink, LogSink, SinkChain, Submission, SubmissionSink};
pub use validate::validate_section;
pub use value::{ErrorMap, FieldValue, ValueMap, ValueShape};
