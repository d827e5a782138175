use rand::Rng;

/// `20240101_00h00m00s`
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%Hh%Mm%Ss";

const PRIMARY_PREFIX: &str = "ks_cassandra";
const SECONDARY_PREFIX: &str = "ks_cqlstress";
const MAX_RANDOM_COMPONENT: u32 = 100_000;

/// A pair of keyspace names that isolate the data written during one scenario run.
///
/// Uniqueness comes from a random component and a second-resolution timestamp, so two runs in the
/// same second can collide. That risk is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyspacePair {
    /// Populated by the reference tool, `ks_cassandra_<r>_<timestamp>`.
    pub primary: String,
    /// Populated by the reimplementation, `ks_cqlstress_<r>_<timestamp>`.
    pub secondary: String,
}

#[derive(Debug, Clone)]
pub struct KeyspaceNamer {
    timestamp_format: String,
}

impl Default for KeyspaceNamer {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl KeyspaceNamer {
    pub fn with_timestamp_format(timestamp_format: impl Into<String>) -> Self {
        Self {
            timestamp_format: timestamp_format.into(),
        }
    }

    /// Generate a fresh pair from a random number and the current local time.
    pub fn generate(&self) -> KeyspacePair {
        let random = rand::thread_rng().gen_range(0..=MAX_RANDOM_COMPONENT);
        let now = chrono::Local::now()
            .format(&self.timestamp_format)
            .to_string();

        let pair = Self::pair_from(random, &now);
        log::debug!(
            "Generated keyspaces '{}' and '{}'",
            pair.primary,
            pair.secondary
        );
        pair
    }

    pub fn pair_from(random: u32, timestamp: &str) -> KeyspacePair {
        KeyspacePair {
            primary: format!("{PRIMARY_PREFIX}_{random}_{timestamp}"),
            secondary: format!("{SECONDARY_PREFIX}_{random}_{timestamp}"),
        }
    }
}
