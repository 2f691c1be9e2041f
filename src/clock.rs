//! Hour-of-day extraction from epoch seconds.
//!
//! The hourly report buckets records by the civil hour of their timestamp.
//! Which calendar that hour is read in is a deployment choice: the process
//! local zone by default, or UTC when reports must not depend on the host.

use chrono::{DateTime, Local, Timelike};
use serde::Deserialize;

use crate::error::ContractError;

/// Calendar used to read the hour of a timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Clock {
    /// The process's local time zone.
    #[default]
    Local,
    Utc,
}

impl Clock {
    /// The config and CLI spelling of this calendar.
    pub fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Utc => "utc",
        }
    }

    /// Hour of day (0..=23) of `epoch_secs` in this calendar.
    pub fn hour_of_day(self, epoch_secs: i64) -> Result<u32, ContractError> {
        let utc = DateTime::from_timestamp(epoch_secs, 0)
            .ok_or(ContractError::TimestampOutOfRange(epoch_secs))?;
        Ok(match self {
            Self::Local => utc.with_timezone(&Local).hour(),
            Self::Utc => utc.hour(),
        })
    }
}
