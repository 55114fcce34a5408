//! One-time verification codes.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use teamforge_core::{AccountId, Entity, OtpId};

pub const OTP_DIGITS: usize = 6;

/// Codes are valid for one hour after issuance.
pub const OTP_VALIDITY_SECS: i64 = 3600;

/// Uniform, zero-padded decimal code of `OTP_DIGITS` digits.
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    let n: u32 = rng.gen_range(0..1_000_000);
    format!("{n:0width$}", width = OTP_DIGITS)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpCode {
    pub id: OtpId,
    pub account_id: AccountId,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    /// Set once the code is used, or when a newer code supersedes it.
    pub consumed: bool,
}

impl OtpCode {
    pub fn issue<R: Rng + ?Sized>(account_id: AccountId, now: DateTime<Utc>, rng: &mut R) -> Self {
        Self {
            id: OtpId::new(),
            account_id,
            code: generate_code(rng),
            expires_at: now + Duration::seconds(OTP_VALIDITY_SECS),
            consumed: false,
        }
    }

    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.consumed && now <= self.expires_at
    }
}

impl Entity for OtpCode {
    type Id = OtpId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn fresh_code_is_usable_for_an_hour() {
        let now = Utc::now();
        let otp = OtpCode::issue(AccountId::new(), now, &mut rand::thread_rng());
        assert!(otp.is_usable(now));
        assert!(otp.is_usable(now + Duration::seconds(OTP_VALIDITY_SECS)));
        assert!(!otp.is_usable(now + Duration::seconds(OTP_VALIDITY_SECS + 1)));
    }

    #[test]
    fn consumed_code_is_not_usable() {
        let now = Utc::now();
        let mut otp = OtpCode::issue(AccountId::new(), now, &mut rand::thread_rng());
        otp.consumed = true;
        assert!(!otp.is_usable(now));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: codes are always exactly six ASCII digits.
            #[test]
            fn codes_are_six_digits(seed in any::<u64>()) {
                let mut rng = StdRng::seed_from_u64(seed);
                let code = generate_code(&mut rng);
                prop_assert_eq!(code.len(), OTP_DIGITS);
                prop_assert!(code.bytes().all(|b| b.is_ascii_digit()));
            }
        }
    }
}
