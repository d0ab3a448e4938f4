//! Domain entities representing core business objects.

pub mod user_record;

pub use user_record::{SendState, TransientState, UserRecord};
