//! `teamforge-accounts`: account lifecycle on top of the session core.

pub mod otp;
pub mod service;
pub mod store;

pub use otp::{OTP_DIGITS, OTP_VALIDITY_SECS, OtpCode, generate_code};
pub use service::{AccountService, OtpIssued, SignUp};
pub use store::{DirectoryStore, OrganizationCharter};
