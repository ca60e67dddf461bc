// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame-stepped animation channels.
//!
//! Each (object, channel) pair holds one applied clip and a float frame
//! position. Playback advances by `rate * fps * dt`; a clip reaching its
//! boundary in the play direction either wraps (cyclic) or stops, and a
//! stopped clip with an armed notification produces a completion event.

use super::EngineEvent;
use express_train::{Channel, ChannelSel, FinishBehavior, FinishNotify, ObjectId};
use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct ChannelState {
    clip: Option<String>,
    frames: u32,
    rate: f32,
    frame: f32,
    playing: bool,
    behavior: FinishBehavior,
    notify: FinishNotify,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            clip: None,
            frames: 0,
            rate: 1.0,
            frame: 0.0,
            playing: false,
            behavior: FinishBehavior::Stop,
            notify: FinishNotify::None,
        }
    }
}

/// Animation state for every object the engine knows about.
pub(crate) struct AnimationState {
    clips: HashMap<String, u32>,
    channels: IndexMap<(ObjectId, Channel), ChannelState>,
}

fn selected(sel: ChannelSel) -> &'static [Channel] {
    match sel {
        ChannelSel::One(Channel::Section) => &[Channel::Section],
        ChannelSel::One(Channel::Wheels) => &[Channel::Wheels],
        ChannelSel::All => &[Channel::Section, Channel::Wheels],
    }
}

impl AnimationState {
    pub(crate) fn new() -> Self {
        Self {
            clips: HashMap::new(),
            channels: IndexMap::new(),
        }
    }

    /// Declare a clip and its length in frames.
    pub(crate) fn register_clip(&mut self, name: &str, frames: u32) {
        self.clips.insert(name.to_owned(), frames);
    }

    pub(crate) fn apply(&mut self, target: ObjectId, clip: &str, channel: Channel) {
        let frames = match self.clips.get(clip) {
            Some(&frames) => frames,
            None => {
                tracing::warn!(clip, "applying unregistered clip, assuming zero length");
                0
            }
        };
        let state = self.channels.entry((target, channel)).or_default();
        state.clip = Some(clip.to_owned());
        state.frames = frames;
        state.frame = 0.0;
        state.playing = false;
    }

    pub(crate) fn set_rate(&mut self, target: ObjectId, rate: f32, sel: ChannelSel) {
        for &channel in selected(sel) {
            if let Some(state) = self.channels.get_mut(&(target, channel)) {
                state.rate = rate;
            }
        }
    }

    pub(crate) fn play(&mut self, target: ObjectId, notify: FinishNotify, sel: ChannelSel) {
        for &channel in selected(sel) {
            if let Some(state) = self.channels.get_mut(&(target, channel)) {
                state.playing = true;
                state.notify = notify;
            }
        }
    }

    pub(crate) fn stop(&mut self, target: ObjectId, sel: ChannelSel) {
        for &channel in selected(sel) {
            if let Some(state) = self.channels.get_mut(&(target, channel)) {
                state.playing = false;
            }
        }
    }

    pub(crate) fn is_playing(&self, target: ObjectId) -> bool {
        self.channels
            .iter()
            .any(|(&(t, _), state)| t == target && state.playing)
    }

    pub(crate) fn clip_name(&self, target: ObjectId, channel: Channel) -> Option<String> {
        self.channels.get(&(target, channel))?.clip.clone()
    }

    pub(crate) fn seek(&mut self, target: ObjectId, frame: u32, channel: Channel) {
        if let Some(state) = self.channels.get_mut(&(target, channel)) {
            state.frame = frame.min(state.frames) as f32;
        }
    }

    pub(crate) fn clip_frames(&self, target: ObjectId, channel: Channel) -> u32 {
        self.channels
            .get(&(target, channel))
            .map_or(0, |state| state.frames)
    }

    pub(crate) fn set_behavior(
        &mut self,
        target: ObjectId,
        behavior: FinishBehavior,
        channel: Channel,
    ) {
        self.channels
            .entry((target, channel))
            .or_default()
            .behavior = behavior;
    }

    /// Step every playing channel and collect completion events.
    ///
    /// Completion is edge-triggered: the channel stops before its event
    /// is pushed, so one finished clip raises exactly one event.
    pub(crate) fn advance(&mut self, dt_s: f32, fps: f32, events: &mut Vec<EngineEvent>) {
        for (&(target, channel), state) in &mut self.channels {
            if !state.playing || state.rate == 0.0 {
                continue;
            }
            let len = state.frames as f32;
            state.frame += state.rate * fps * dt_s;

            let finished = if state.rate > 0.0 {
                state.frame >= len
            } else {
                state.frame <= 0.0
            };
            if !finished {
                continue;
            }

            match state.behavior {
                FinishBehavior::Loop => {
                    state.frame = if len > 0.0 {
                        state.frame.rem_euclid(len)
                    } else {
                        0.0
                    };
                }
                FinishBehavior::Stop => {
                    state.frame = if state.rate > 0.0 { len } else { 0.0 };
                    state.playing = false;
                    if state.notify == FinishNotify::SectionEnd {
                        if let Some(clip) = &state.clip {
                            events.push(EngineEvent::ClipFinished {
                                target,
                                channel,
                                clip: clip.clone(),
                            });
                        }
                    }
                }
            }
        }
    }
}
