// SPDX-License-Identifier: MIT OR Apache-2.0
//! Train motion controller for the railway express demo.
//!
//! This crate drives the train:
//! - Driver contracts consumed from the surrounding engine
//! - Clip and scene object naming shared with the authored assets
//! - Cancellable timed speed ramps
//! - The `Train` state machine reacting to clip-completion events
//!
//! ## Architecture
//!
//! The controller owns no engine state. The four driver contracts
//! (animation, sound, scene, scheduler) are injected at construction and
//! everything else happens in reaction to events the surrounding event
//! loop dispatches: a finished section clip hops the train to the next
//! section, a scheduler tick moves an in-flight speed ramp forward.

pub mod clips;
pub mod drivers;
pub mod ramp;
pub mod train;

pub use drivers::{
    AnimationDriver, Channel, ChannelSel, FinishBehavior, FinishNotify, ObjectId, RampHandle,
    SceneDriver, Scheduler, SoundDriver,
};
pub use ramp::SpeedRamp;
pub use train::{RouteResolver, Train, TrainError};
