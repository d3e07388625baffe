//! Backend document shapes and per-seat package resolution.
//!
//! The transports themselves (document-store point reads and push
//! subscriptions, the HTTP control endpoint) stay outside this crate; what
//! lives here is their wire shape and the rules for turning a document
//! into the one [`FramePackage`] that applies to a seat. The scheduler
//! never sees a malformed package: resolution either yields a valid one or
//! nothing.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::Result;
use crate::types::{ColorFrame, FramePackage};

/// Document key for one seat: `user_{row}_{seat}`.
pub fn user_key(row: u32, seat: u32) -> String {
    format!("user_{row}_{seat}")
}

/// Per-seat entry inside an animation document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFrames {
    /// Ordered colors for this seat.
    pub colors: Vec<ColorFrame>,

    /// Seat-level start-time override; the document's start time applies
    /// when absent.
    #[serde(default)]
    pub start_time: Option<String>,

    /// Seat-level frame count, where present. The actual color list is
    /// authoritative.
    #[serde(default)]
    pub frame_count: Option<usize>,
}

/// One animation document as stored in the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationDocument {
    pub animation_id: String,

    /// Playback rate in frames per second, shared by all seats.
    pub frame_rate: u32,

    /// Advertised frame count; the per-seat color lists are authoritative.
    pub frame_count: usize,

    /// Wall-clock start time shared by all seats, unless a seat overrides
    /// it. May be absent in configs that carry the start time at the
    /// envelope level.
    #[serde(default)]
    pub start_time: String,

    /// Document kind discriminator, e.g. `color_animation`.
    #[serde(rename = "type", default)]
    pub animation_kind: String,

    /// Per-seat frame sequences keyed by [`user_key`].
    #[serde(default)]
    pub users: HashMap<String, UserFrames>,
}

impl AnimationDocument {
    /// Resolve the frame package for one seat.
    ///
    /// An unknown seat or an empty color list is a valid "no animation"
    /// answer, not an error. A frame count that disagrees with the actual
    /// color list is logged; the list wins.
    pub fn package_for(&self, user_key: &str) -> Result<Option<FramePackage>> {
        let Some(user) = self.users.get(user_key) else {
            debug!(user_key, animation_id = %self.animation_id, "no animation data for user");
            return Ok(None);
        };
        if user.colors.is_empty() {
            debug!(user_key, animation_id = %self.animation_id, "empty color list for user");
            return Ok(None);
        }

        let advertised = user.frame_count.unwrap_or(self.frame_count);
        if advertised != user.colors.len() {
            warn!(
                user_key,
                advertised,
                actual = user.colors.len(),
                "frame count disagrees with color list, using the list"
            );
        }

        let start_time = user
            .start_time
            .clone()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.start_time.clone());

        FramePackage::new(user.colors.clone(), self.frame_rate, start_time).map(Some)
    }
}

/// Payload of the control endpoint's "active configuration" response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveConfig {
    /// Wall-clock start time for the whole configuration.
    pub animation_start_time: String,

    pub event_type: String,

    pub animation_type: String,

    /// Lifecycle status; only `active` configurations are played.
    pub status: String,

    /// The animation document this configuration activates.
    pub animation_data: AnimationDocument,
}

impl ActiveConfig {
    /// Whether this configuration should be played at all.
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    /// Resolve the package for one seat, filling in the envelope-level
    /// start time when the document carries none.
    pub fn package_for(&self, user_key: &str) -> Result<Option<FramePackage>> {
        match self.animation_data.package_for(user_key)? {
            Some(mut package) => {
                if package.start_time.is_empty() {
                    package.start_time = self.animation_start_time.clone();
                }
                Ok(Some(package))
            }
            None => Ok(None),
        }
    }
}

/// Trait for animation package sources.
///
/// Implementations own the transport (document-store reads, push
/// subscriptions, the HTTP control endpoint) and the fallback order
/// between them; the scheduler only cares about the resolved package
/// shape.
#[async_trait::async_trait]
pub trait PackageSource: Send + 'static {
    /// Resolve the animation package that currently applies to one seat.
    ///
    /// Returns:
    /// - `Ok(Some(package))` - a playable (possibly already expired) package
    /// - `Ok(None)` - nothing scheduled for this seat
    /// - `Err(e)` - transport or document-shape failure
    async fn active_package(&mut self, user_key: &str) -> Result<Option<FramePackage>>;
}
