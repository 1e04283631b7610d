// ### `src/telemetry/counters.rs`

//! telemetry/counters.rs
//! Per-request counters, converted into a `TelemetrySnapshot` at the end.

use serde::{Deserialize, Serialize};

use crate::credentials::{CollectedCredentials, Resolution};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub declarations: u64,
    pub credentials_resolved: u64,
    pub resolution_failures: u64,
    pub invalid_declarations: u64,
    pub decrypt_attempts: u64,
    pub bytes_in: u64,
    pub bytes_decrypted: u64,
    pub bytes_out: u64,
}

impl TelemetryCounters {
    /// Record the outcome of credential collection.
    pub fn add_collection(&mut self, collected: &CollectedCredentials) {
        for outcome in collected.outcomes() {
            self.declarations += 1;
            match outcome.resolution {
                Resolution::Resolved(_) => self.credentials_resolved += 1,
                Resolution::Failed(_) => self.resolution_failures += 1,
                Resolution::Invalid(_) => self.invalid_declarations += 1,
                Resolution::Empty => {}
            }
        }
    }

    pub fn add_decrypt(&mut self, attempts: usize, plaintext_len: usize) {
        self.decrypt_attempts += attempts as u64;
        self.bytes_decrypted += plaintext_len as u64;
    }
}
