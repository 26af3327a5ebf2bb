//! Wa entry model for persistence.
//!
//! Maps to the `was` table and is used by WaRepository.

use chrono::{DateTime, Utc};

/// A "wa" message: a reply that cheers at another message.
#[derive(Debug, Clone)]
pub struct WaEntry {
    /// Id of the wa message itself.
    pub id: i64,
    /// Id of the message the wa replies to.
    pub wa_to: i64,
    /// User id of the sender.
    pub waer: i64,
    /// Display name of the sender (nick name or full name).
    pub waer_name: String,
    /// When the wa was sent.
    pub time: DateTime<Utc>,
}
