// SPDX-License-Identifier: MIT OR Apache-2.0
//! Contracts consumed from the surrounding engine.
//!
//! The train never talks to the engine directly; it calls these traits.
//! The application implements them on its own engine, tests implement
//! them with recording fakes.

use crate::ramp::SpeedRamp;

/// Handle to a named scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u32);

/// Animation channels of the train armature.
///
/// The two channels run concurrently and never reset each other: the
/// section channel replays the current track section, the wheel channel
/// loops the rolling-wheel action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Per-section path clip; finishing it means a section boundary.
    Section,
    /// Continuous wheel motion, cyclic.
    Wheels,
}

/// Channel selector for operations that may address every channel at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSel {
    /// A single channel.
    One(Channel),
    /// Every channel of the target.
    All,
}

impl From<Channel> for ChannelSel {
    fn from(channel: Channel) -> Self {
        Self::One(channel)
    }
}

/// What a channel does when its clip reaches the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishBehavior {
    /// Hold the last frame and stop playing.
    Stop,
    /// Wrap around and keep playing.
    Loop,
}

/// Whether finishing a clip raises a completion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishNotify {
    /// Finish silently.
    None,
    /// Raise a section-end event carrying the clip name.
    SectionEnd,
}

/// Token identifying a scheduled speed ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RampHandle(pub u64);

/// Clip playback on scene objects.
pub trait AnimationDriver {
    /// Load `clip` into `channel`, replacing whatever was applied there.
    fn apply(&mut self, target: ObjectId, clip: &str, channel: Channel);

    /// Set the playback rate on the selected channels. Negative rates
    /// play backward.
    fn set_playback_rate(&mut self, target: ObjectId, rate: f32, channels: ChannelSel);

    /// Start playback on the selected channels and arm `notify` on them.
    fn play(&mut self, target: ObjectId, notify: FinishNotify, channels: ChannelSel);

    /// Stop playback on the selected channels.
    fn stop(&mut self, target: ObjectId, channels: ChannelSel);

    /// Whether any channel of `target` is currently playing.
    fn is_playing(&self, target: ObjectId) -> bool;

    /// Name of the clip applied to `channel`, if any.
    fn current_clip_name(&self, target: ObjectId, channel: Channel) -> Option<String>;

    /// Seek `channel` to an absolute frame.
    fn seek_frame(&mut self, target: ObjectId, frame: u32, channel: Channel);

    /// Length in frames of the clip applied to `channel`.
    fn clip_length_frames(&self, target: ObjectId, channel: Channel) -> u32;

    /// Configure end-of-clip behavior for `channel`.
    fn set_finish_behavior(&mut self, target: ObjectId, behavior: FinishBehavior, channel: Channel);
}

/// Speaker playback.
pub trait SoundDriver {
    /// Start the speaker.
    fn play(&mut self, speaker: ObjectId);

    /// Silence the speaker.
    fn stop(&mut self, speaker: ObjectId);

    /// Whether the speaker is currently sounding.
    fn is_playing(&self, speaker: ObjectId) -> bool;

    /// Pitch/speed multiplier for the speaker.
    fn set_playback_rate(&mut self, speaker: ObjectId, rate: f32);
}

/// Scene object lookup and ambient effects.
///
/// The host engine exposes both on its scene module, so they travel
/// together here as well.
pub trait SceneDriver {
    /// Resolve a scene object by name.
    fn find_by_name(&self, name: &str) -> Option<ObjectId>;

    /// Set the ambient wind strength.
    fn set_wind_strength(&mut self, value: f32);
}

/// Timed-interpolation scheduling.
pub trait Scheduler {
    /// Start `ramp`. Ticks are delivered back to the owning train until
    /// the ramp completes or the handle is cancelled.
    fn schedule_ramp(&mut self, ramp: SpeedRamp) -> RampHandle;

    /// Discard a scheduled ramp; no tick from `handle` fires afterwards.
    /// Cancelling an already-completed handle is a no-op.
    fn cancel(&mut self, handle: RampHandle);
}
