// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless engine backing the driver contracts.
//!
//! This module provides:
//! - A scene object registry and the ambient wind parameter
//! - Frame-stepped animation channels with finish behaviors
//! - Speaker state tracking with an optional rodio backend
//! - A ramp scheduler on the engine clock
//!
//! One [`EngineHandle`] implements every driver contract the train
//! consumes; the application keeps a clone for itself and steps the
//! engine with [`EngineHandle::advance`], which returns the batch of
//! events to dispatch. Events are therefore always delivered after the
//! driver call that caused them has returned, never re-entrantly.

mod animation;
mod scene;
mod scheduler;
mod sound;

pub(crate) use sound::SourceSpec;

use animation::AnimationState;
use express_train::{
    AnimationDriver, Channel, ChannelSel, FinishBehavior, FinishNotify, ObjectId, RampHandle,
    SceneDriver, Scheduler, SoundDriver, SpeedRamp,
};
use parking_lot::Mutex;
use scene::SceneRegistry;
use scheduler::RampTable;
use sound::SoundBank;
use std::sync::Arc;

/// Event produced by one engine step.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EngineEvent {
    /// A clip with an armed completion notification reached its end.
    ClipFinished {
        /// Object the clip was playing on.
        target: ObjectId,
        /// Channel that finished.
        channel: Channel,
        /// Name of the finished clip.
        clip: String,
    },
    /// One interpolation step of a scheduled ramp.
    RampTick {
        /// Handle of the ramp.
        handle: RampHandle,
        /// Interpolated value at this step.
        value: f32,
        /// Whether the ramp completed with this tick.
        finished: bool,
    },
}

struct EngineState {
    scene: SceneRegistry,
    anim: AnimationState,
    sound: SoundBank,
    ramps: RampTable,
    fps: f32,
}

/// Clone-able handle onto the engine, implementing every driver
/// contract.
#[derive(Clone)]
pub(crate) struct EngineHandle {
    state: Arc<Mutex<EngineState>>,
}

impl EngineHandle {
    pub(crate) fn new(fps: f32) -> Self {
        Self {
            state: Arc::new(Mutex::new(EngineState {
                scene: SceneRegistry::new(),
                anim: AnimationState::new(),
                sound: SoundBank::new(),
                ramps: RampTable::new(),
                fps,
            })),
        }
    }

    pub(crate) fn register_object(&self, name: &str) -> ObjectId {
        self.state.lock().scene.register(name)
    }

    pub(crate) fn register_clip(&self, name: &str, frames: u32) {
        self.state.lock().anim.register_clip(name, frames);
    }

    pub(crate) fn register_sound(&self, speaker: ObjectId, spec: SourceSpec) {
        self.state.lock().sound.register(speaker, spec);
    }

    /// Step the engine by `dt_ms` and return the events this produced.
    pub(crate) fn advance(&self, dt_ms: f32) -> Vec<EngineEvent> {
        let mut state = self.state.lock();
        let mut events = Vec::new();
        state.ramps.advance(dt_ms, &mut events);
        let fps = state.fps;
        state.anim.advance(dt_ms / 1000.0, fps, &mut events);
        state.sound.advance(dt_ms);
        events
    }

    pub(crate) fn wind_strength(&self) -> f32 {
        self.state.lock().scene.wind()
    }

    #[cfg(test)]
    fn active_ramps(&self) -> usize {
        self.state.lock().ramps.active_count()
    }
}

impl AnimationDriver for EngineHandle {
    fn apply(&mut self, target: ObjectId, clip: &str, channel: Channel) {
        self.state.lock().anim.apply(target, clip, channel);
    }

    fn set_playback_rate(&mut self, target: ObjectId, rate: f32, channels: ChannelSel) {
        self.state.lock().anim.set_rate(target, rate, channels);
    }

    fn play(&mut self, target: ObjectId, notify: FinishNotify, channels: ChannelSel) {
        self.state.lock().anim.play(target, notify, channels);
    }

    fn stop(&mut self, target: ObjectId, channels: ChannelSel) {
        self.state.lock().anim.stop(target, channels);
    }

    fn is_playing(&self, target: ObjectId) -> bool {
        self.state.lock().anim.is_playing(target)
    }

    fn current_clip_name(&self, target: ObjectId, channel: Channel) -> Option<String> {
        self.state.lock().anim.clip_name(target, channel)
    }

    fn seek_frame(&mut self, target: ObjectId, frame: u32, channel: Channel) {
        self.state.lock().anim.seek(target, frame, channel);
    }

    fn clip_length_frames(&self, target: ObjectId, channel: Channel) -> u32 {
        self.state.lock().anim.clip_frames(target, channel)
    }

    fn set_finish_behavior(&mut self, target: ObjectId, behavior: FinishBehavior, channel: Channel) {
        self.state.lock().anim.set_behavior(target, behavior, channel);
    }
}

impl SoundDriver for EngineHandle {
    fn play(&mut self, speaker: ObjectId) {
        self.state.lock().sound.play(speaker);
    }

    fn stop(&mut self, speaker: ObjectId) {
        self.state.lock().sound.stop(speaker);
    }

    fn is_playing(&self, speaker: ObjectId) -> bool {
        self.state.lock().sound.is_playing(speaker)
    }

    fn set_playback_rate(&mut self, speaker: ObjectId, rate: f32) {
        self.state.lock().sound.set_rate(speaker, rate);
    }
}

impl SceneDriver for EngineHandle {
    fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.state.lock().scene.find(name)
    }

    fn set_wind_strength(&mut self, value: f32) {
        self.state.lock().scene.set_wind(value);
    }
}

impl Scheduler for EngineHandle {
    fn schedule_ramp(&mut self, ramp: SpeedRamp) -> RampHandle {
        self.state.lock().ramps.schedule(ramp)
    }

    fn cancel(&mut self, handle: RampHandle) {
        self.state.lock().ramps.cancel(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_engine(behavior: FinishBehavior, rate: f32) -> (EngineHandle, ObjectId) {
        let engine = EngineHandle::new(10.0);
        let target = engine.register_object("loco.armature");
        engine.register_clip("path.section.1", 10);
        let mut driver = engine.clone();
        driver.apply(target, "path.section.1", Channel::Section);
        driver.set_finish_behavior(target, behavior, Channel::Section);
        AnimationDriver::set_playback_rate(
            &mut driver,
            target,
            rate,
            ChannelSel::One(Channel::Section),
        );
        AnimationDriver::play(
            &mut driver,
            target,
            FinishNotify::SectionEnd,
            ChannelSel::One(Channel::Section),
        );
        (engine, target)
    }

    #[test]
    fn test_clip_finishes_exactly_once() {
        let (engine, target) = playing_engine(FinishBehavior::Stop, 1.0);
        // 10 frames at 10 fps and rate 1: done after one second.
        let events = engine.advance(1000.0);
        assert_eq!(
            events,
            vec![EngineEvent::ClipFinished {
                target,
                channel: Channel::Section,
                clip: "path.section.1".to_owned(),
            }]
        );
        let driver = engine.clone();
        assert!(!AnimationDriver::is_playing(&driver, target));
        assert!(engine.advance(1000.0).is_empty());
    }

    #[test]
    fn test_unarmed_finish_is_silent() {
        let (engine, target) = playing_engine(FinishBehavior::Stop, 1.0);
        let mut driver = engine.clone();
        AnimationDriver::play(
            &mut driver,
            target,
            FinishNotify::None,
            ChannelSel::One(Channel::Section),
        );
        assert!(engine.advance(1000.0).is_empty());
    }

    #[test]
    fn test_cyclic_clip_wraps_without_event() {
        let (engine, target) = playing_engine(FinishBehavior::Loop, 1.0);
        assert!(engine.advance(1500.0).is_empty());
        let driver = engine.clone();
        assert!(AnimationDriver::is_playing(&driver, target));
    }

    #[test]
    fn test_backward_playback_finishes_at_clip_start() {
        let (engine, target) = playing_engine(FinishBehavior::Stop, -1.0);
        let mut driver = engine.clone();
        driver.seek_frame(target, 5, Channel::Section);
        let events = engine.advance(600.0);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            EngineEvent::ClipFinished { channel: Channel::Section, .. }
        ));
    }

    #[test]
    fn test_ramp_ticks_and_completion() {
        let engine = EngineHandle::new(24.0);
        let mut scheduler = engine.clone();
        let handle = scheduler.schedule_ramp(SpeedRamp::new(0.0, 2.0, 1000.0));

        let events = engine.advance(250.0);
        assert_eq!(
            events,
            vec![EngineEvent::RampTick {
                handle,
                value: 0.5,
                finished: false,
            }]
        );

        let events = engine.advance(1000.0);
        assert_eq!(
            events,
            vec![EngineEvent::RampTick {
                handle,
                value: 2.0,
                finished: true,
            }]
        );
        assert_eq!(engine.active_ramps(), 0);
        assert!(engine.advance(100.0).is_empty());
    }

    #[test]
    fn test_cancelled_ramp_never_ticks_again() {
        let engine = EngineHandle::new(24.0);
        let mut scheduler = engine.clone();
        let handle = scheduler.schedule_ramp(SpeedRamp::new(0.0, 5.0, 1000.0));
        assert_eq!(engine.advance(100.0).len(), 1);

        scheduler.cancel(handle);
        assert!(engine.advance(100.0).is_empty());
        // Cancelling again is a no-op.
        scheduler.cancel(handle);
    }

    #[test]
    fn test_one_shot_sound_expires() {
        let engine = EngineHandle::new(24.0);
        let horn = engine.register_object("loco.horn.speaker");
        engine.register_sound(
            horn,
            SourceSpec {
                looping: false,
                duration_ms: 500.0,
                clip: None,
            },
        );
        let mut driver = engine.clone();
        SoundDriver::play(&mut driver, horn);
        assert!(SoundDriver::is_playing(&driver, horn));
        engine.advance(600.0);
        assert!(!SoundDriver::is_playing(&driver, horn));
    }
}
