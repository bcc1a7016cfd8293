//! Consignment ID generation.
//!
//! Format: `DA` + `YYMMDD` + six characters drawn independently from
//! `[A-Za-z0-9]`, e.g. `DA251018k3Xa9Q`.

use chrono::{NaiveDate, Utc};
use common::ConsignmentId;
use rand::Rng;
use rand::distributions::Alphanumeric;

pub const CONSIGNMENT_PREFIX: &str = "DA";
pub const RANDOM_SUFFIX_LEN: usize = 6;

/// Source of fresh consignment IDs.
pub trait ConsignmentIdSource: Send + Sync {
    fn next_id(&self) -> ConsignmentId;
}

/// Generates IDs from today's UTC date and the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomConsignmentIds;

impl ConsignmentIdSource for RandomConsignmentIds {
    fn next_id(&self) -> ConsignmentId {
        generate_consignment_id()
    }
}

/// Generates a consignment ID for the current UTC date.
pub fn generate_consignment_id() -> ConsignmentId {
    generate_consignment_id_for(Utc::now().date_naive(), &mut rand::thread_rng())
}

/// Generates a consignment ID for `date` using `rng` for the suffix.
pub fn generate_consignment_id_for<R: Rng>(date: NaiveDate, rng: &mut R) -> ConsignmentId {
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect();

    ConsignmentId::new(format!(
        "{CONSIGNMENT_PREFIX}{}{suffix}",
        date.format("%y%m%d")
    ))
}
