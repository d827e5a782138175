mod error;
mod validator;

pub mod prelude {
    pub use crate::error::HdrLogError;
    pub use crate::validator::{
        check, validate, HdrLogSummary, EXPECTED_HEADERS, TAG_PREFIX, TOLERANCE_S,
    };
}
