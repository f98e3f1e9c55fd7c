//! Process runner channel models.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An independent serialization channel for external-process execution.
///
/// Each channel owns its own runner: requests on the same channel never
/// run concurrently, while the two channels may each have a process active
/// at the same time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    /// User-triggered actions (wizard steps, build dispatch).
    Foreground,

    /// Detection polling and run listing.
    Background,
}

impl Channel {
    pub fn name(self) -> &'static str {
        match self {
            Channel::Foreground => "foreground",
            Channel::Background => "background",
        }
    }
}
