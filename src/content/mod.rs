//! Record validation
//!
//! Records are validated against a content type reflected fresh from the
//! store. A successful validation yields a [`ValidatedRecord`], the only
//! input the DML generator accepts.

mod errors;
mod validator;

pub use errors::{ContentError, ContentResult};
pub use validator::{validate_record, ValidatedRecord, MAX_TEXT_LEN};
