mod error;
mod hdr_logging;
mod tools;
mod user_profile;
mod write_and_validate;

pub mod prelude {
    pub use crate::error::ValidationFailed;
    pub use crate::hdr_logging::{hdr_logging, DEFAULT_HDR_LOG_FILE_NAME};
    pub use crate::tools::StressTools;
    pub use crate::user_profile::{
        every_user_type, profile_path, user_profile_round_trip, SUPPORTED_TYPES,
    };
    pub use crate::write_and_validate::write_and_validate;
}
