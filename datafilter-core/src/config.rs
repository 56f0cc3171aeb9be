use serde::{Deserialize, Serialize};
use tracing::warn;

/// Limits and execution knobs shared by the executors and the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFilterConfig {
    /// Upper bound for `pageSize` on paginated requests. `None` leaves it
    /// unbounded.
    pub max_page_size: Option<u32>,

    /// Upper bound for `pageSize` on autocomplete requests.
    pub autocomplete_max_page_size: u32,

    /// Issue the page fetch and the total count concurrently. Disable for
    /// sources that cannot serve two independent reads at once.
    pub concurrent_count: bool,
}

impl Default for DataFilterConfig {
    fn default() -> Self {
        Self {
            max_page_size: None,
            autocomplete_max_page_size: 500,
            concurrent_count: true,
        }
    }
}

impl DataFilterConfig {
    /// Load from the `DATAFILTER_CONFIG` JSON variable, then apply per-field
    /// environment overrides, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("DATAFILTER_CONFIG") {
            Some(raw) => match serde_json::from_str::<DataFilterConfig>(&raw) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(target: "datafilter::config", error = %err, "ignoring malformed DATAFILTER_CONFIG");
                    DataFilterConfig::default()
                }
            },
            None => DataFilterConfig::default(),
        };

        if let Some(raw) = lookup("DATAFILTER_MAX_PAGE_SIZE") {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
                config.max_page_size = None;
            } else {
                match trimmed.parse::<u32>() {
                    Ok(val) if val > 0 => config.max_page_size = Some(val),
                    _ => warn!(target: "datafilter::config", value = %raw, "ignoring invalid DATAFILTER_MAX_PAGE_SIZE"),
                }
            }
        }

        if let Some(raw) = lookup("DATAFILTER_AUTOCOMPLETE_MAX_PAGE_SIZE") {
            match raw.trim().parse::<u32>() {
                Ok(val) if val > 0 => config.autocomplete_max_page_size = val,
                _ => warn!(target: "datafilter::config", value = %raw, "ignoring invalid DATAFILTER_AUTOCOMPLETE_MAX_PAGE_SIZE"),
            }
        }

        if let Some(raw) = lookup("DATAFILTER_CONCURRENT_COUNT") {
            if matches_ignore_ascii_case(&raw, ["1", "true", "yes"]) {
                config.concurrent_count = true;
            } else if matches_ignore_ascii_case(&raw, ["0", "false", "no"]) {
                config.concurrent_count = false;
            } else {
                warn!(target: "datafilter::config", value = %raw, "ignoring invalid DATAFILTER_CONCURRENT_COUNT");
            }
        }

        config
    }
}

fn matches_ignore_ascii_case<const N: usize>(value: &str, candidates: [&str; N]) -> bool {
    let value = value.trim();
    candidates
        .iter()
        .any(|candidate| value.eq_ignore_ascii_case(candidate))
}
