// SPDX-License-Identifier: MIT OR Apache-2.0
//! The train motion controller.
//!
//! This module handles:
//! - Placing the train on a section clip at a fractional offset
//! - Immediate speed changes and their sound/wind side effects
//! - Cancellable acceleration ramps
//! - Section hops when a path clip finishes playing

use crate::clips;
use crate::drivers::{
    AnimationDriver, Channel, ChannelSel, FinishBehavior, FinishNotify, ObjectId, RampHandle,
    SceneDriver, Scheduler, SoundDriver,
};
use crate::ramp::SpeedRamp;
use express_track::{Direction, SectionId, TrackGraph};

/// Milliseconds of ramp time per unit of speed difference.
const RAMP_MS_PER_SPEED: f32 = 500.0;

/// Wind strength per unit of speed.
const WIND_PER_SPEED: f32 = 0.05;

/// Floor for the wheel sound playback rate.
const MIN_WHEEL_SOUND_RATE: f32 = 0.8;

/// Errors raised while constructing a train.
#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    /// A required scene object is missing from the loaded scene.
    #[error("scene object not found: {0}")]
    ObjectNotFound(String),
}

/// Resolves the section a train enters after finishing one.
pub trait RouteResolver {
    /// Next section when leaving `from` heading `direction`.
    fn next_section(&self, from: SectionId, direction: Direction) -> SectionId;
}

impl RouteResolver for TrackGraph {
    fn next_section(&self, from: SectionId, direction: Direction) -> SectionId {
        TrackGraph::next_section(self, from, direction)
    }
}

/// An in-flight acceleration ramp.
#[derive(Debug, Clone, Copy)]
struct ActiveRamp {
    handle: RampHandle,
    target: f32,
}

/// The train: current section, signed speed, and the driver handles it
/// steers.
///
/// Position is parameterized purely by replay offset into the current
/// section clip. The controller is stopped at speed 0 and moving
/// otherwise; while moving, the section channel carries a completion
/// notification that hops the train onto the next section.
pub struct Train {
    anim: Box<dyn AnimationDriver>,
    sfx: Box<dyn SoundDriver>,
    scene: Box<dyn SceneDriver>,
    scheduler: Box<dyn Scheduler>,
    armature: ObjectId,
    wheel_speaker: ObjectId,
    horn_speaker: ObjectId,
    section: SectionId,
    offset: f32,
    speed: f32,
    active_ramp: Option<ActiveRamp>,
}

impl Train {
    /// Resolve the train's scene objects and prepare both animation
    /// channels: the section channel stops on finish, the wheel channel
    /// cycles.
    ///
    /// A missing scene object is fatal and propagates to the caller.
    pub fn new(
        mut anim: Box<dyn AnimationDriver>,
        sfx: Box<dyn SoundDriver>,
        scene: Box<dyn SceneDriver>,
        scheduler: Box<dyn Scheduler>,
    ) -> Result<Self, TrainError> {
        let armature = lookup(scene.as_ref(), clips::ARMATURE_OBJECT)?;
        let wheel_speaker = lookup(scene.as_ref(), clips::WHEEL_SPEAKER_OBJECT)?;
        let horn_speaker = lookup(scene.as_ref(), clips::HORN_SPEAKER_OBJECT)?;

        let section = SectionId(1);
        anim.apply(armature, &clips::section_clip(section), Channel::Section);
        anim.set_finish_behavior(armature, FinishBehavior::Stop, Channel::Section);
        anim.apply(armature, clips::WHEEL_CLIP, Channel::Wheels);
        anim.set_finish_behavior(armature, FinishBehavior::Loop, Channel::Wheels);

        Ok(Self {
            anim,
            sfx,
            scene,
            scheduler,
            armature,
            wheel_speaker,
            horn_speaker,
            section,
            offset: 0.0,
            speed: 0.0,
            active_ramp: None,
        })
    }

    /// Place the train on `section` at fractional `offset` (0 = start).
    ///
    /// While moving, the completion notification is re-armed before the
    /// seek lands, so a boundary-adjacent offset cannot lose its
    /// end-of-clip event.
    pub fn set_position(&mut self, section: SectionId, offset: f32) {
        self.anim
            .apply(self.armature, &clips::section_clip(section), Channel::Section);
        if self.speed != 0.0 {
            self.anim
                .set_playback_rate(self.armature, self.speed, Channel::Section.into());
            self.anim
                .play(self.armature, FinishNotify::SectionEnd, Channel::Section.into());
        }
        let frames = self.anim.clip_length_frames(self.armature, Channel::Section);
        let frame = (frames as f32 * offset).floor() as u32 + 1;
        self.anim.seek_frame(self.armature, frame, Channel::Section);
        self.section = section;
        self.offset = offset;
        tracing::debug!(section = %section, offset, "train positioned");
    }

    /// Set the speed immediately.
    ///
    /// Zero silences the wheels and the wind and halts both channels.
    /// Non-zero scales playback and the wheel sound, refreshes the wind,
    /// and starts everything up if the armature was standing still.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        if speed == 0.0 {
            if self.anim.is_playing(self.armature) {
                self.anim.stop(self.armature, ChannelSel::All);
                self.sfx.stop(self.wheel_speaker);
            }
            self.scene.set_wind_strength(0.0);
        } else {
            self.anim
                .set_playback_rate(self.armature, speed, ChannelSel::All);
            self.sfx
                .set_playback_rate(self.wheel_speaker, wheel_sound_rate(speed));
            self.scene.set_wind_strength(speed * WIND_PER_SPEED);
            if !self.anim.is_playing(self.armature) {
                self.anim
                    .play(self.armature, FinishNotify::None, ChannelSel::All);
                self.anim
                    .play(self.armature, FinishNotify::SectionEnd, Channel::Section.into());
                self.sfx.play(self.wheel_speaker);
            }
        }
    }

    /// Ramp to `target` over a duration proportional to the speed gap.
    ///
    /// A new ramp supersedes any in-flight one; its first scheduled tick
    /// reaches [`Train::set_speed`] through the event loop. No-op when
    /// already settled at `target` or already ramping toward it.
    pub fn accelerate_to(&mut self, target: f32) {
        match &self.active_ramp {
            Some(active) if active.target == target => return,
            None if self.speed == target => return,
            _ => {}
        }
        if let Some(active) = self.active_ramp.take() {
            self.scheduler.cancel(active.handle);
        }
        let duration_ms = (self.speed - target).abs() * RAMP_MS_PER_SPEED;
        let handle = self
            .scheduler
            .schedule_ramp(SpeedRamp::new(self.speed, target, duration_ms));
        self.active_ramp = Some(ActiveRamp { handle, target });
        tracing::debug!(from = self.speed, to = target, duration_ms, "speed ramp started");
    }

    /// Ramp down to a standstill.
    pub fn stop(&mut self) {
        self.accelerate_to(0.0);
    }

    /// Deliver one scheduler tick.
    ///
    /// Ticks from a handle other than the active ramp are stale and
    /// ignored.
    pub fn on_ramp_tick(&mut self, handle: RampHandle, value: f32, finished: bool) {
        match &self.active_ramp {
            Some(active) if active.handle == handle => {}
            _ => return,
        }
        if finished {
            self.active_ramp = None;
        }
        self.set_speed(value);
    }

    /// React to a finished clip on the section channel.
    ///
    /// Clip names outside the section naming convention are ignored and
    /// the train holds its last commanded state. Otherwise the router
    /// picks the next section, entered at its start when moving forward
    /// and at its end when moving backward.
    pub fn on_section_end(&mut self, router: &dyn RouteResolver, clip_name: &str) {
        let Some(section) = clips::parse_section_clip(clip_name) else {
            tracing::debug!(clip = clip_name, "finished clip is not a section, ignoring");
            return;
        };
        let direction = Direction::from_speed(self.speed);
        let next = router.next_section(section, direction);
        let entry_offset = if self.speed >= 0.0 { 0.0 } else { 1.0 };
        tracing::debug!(from = %section, to = %next, ?direction, "section boundary crossed");
        self.set_position(next, entry_offset);
    }

    /// Sound the horn unless it is already sounding.
    pub fn blow_horn(&mut self) {
        if !self.sfx.is_playing(self.horn_speaker) {
            self.sfx.play(self.horn_speaker);
        }
    }

    /// Current signed speed.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Section the train is currently consuming.
    pub fn section(&self) -> SectionId {
        self.section
    }

    /// Last commanded fractional offset into the current section.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Whether an acceleration ramp is in flight.
    pub fn is_ramping(&self) -> bool {
        self.active_ramp.is_some()
    }
}

fn lookup(scene: &dyn SceneDriver, name: &str) -> Result<ObjectId, TrainError> {
    scene
        .find_by_name(name)
        .ok_or_else(|| TrainError::ObjectNotFound(name.to_owned()))
}

/// Wheel sound rate grows logarithmically with speed, floored so slow
/// rolling still sounds like rolling.
fn wheel_sound_rate(speed: f32) -> f32 {
    (1.0 + speed.abs().ln()).max(MIN_WHEEL_SOUND_RATE)
}
