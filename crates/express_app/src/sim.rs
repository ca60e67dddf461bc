// SPDX-License-Identifier: MIT OR Apache-2.0
//! Simulation wiring and the demo event loop.
//!
//! This module handles:
//! - Building the headless engine from the configuration
//! - Constructing the track graph and the train with injected drivers
//! - Stepping the engine and dispatching its events into the train
//! - Firing the timed demo script

use crate::config::{AppConfig, ScriptAction, ScriptedAction};
use crate::engine::{EngineEvent, EngineHandle, SourceSpec};
use express_track::{SectionId, TopologyError, TrackGraph};
use express_train::{clips, Train, TrainError};

/// Errors fatal to simulation startup.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The configured topology does not validate.
    #[error(transparent)]
    Topology(#[from] TopologyError),
    /// The train could not be constructed.
    #[error(transparent)]
    Train(#[from] TrainError),
}

/// The running demo: engine, graph, train, and the remaining script.
pub struct Simulation {
    engine: EngineHandle,
    graph: TrackGraph,
    train: Train,
    script: Vec<ScriptedAction>,
    next_action: usize,
    clock_ms: f32,
    timestep_ms: f32,
    run_for_ms: f32,
}

impl Simulation {
    /// Build the engine scene, the track graph, and the train.
    pub fn new(config: &AppConfig) -> Result<Self, SimError> {
        let engine = EngineHandle::new(config.frame_rate);

        engine.register_object(clips::ARMATURE_OBJECT);
        let wheel = engine.register_object(clips::WHEEL_SPEAKER_OBJECT);
        let horn = engine.register_object(clips::HORN_SPEAKER_OBJECT);
        engine.register_sound(
            wheel,
            SourceSpec {
                looping: true,
                duration_ms: 0.0,
                clip: config.sounds.get(clips::WHEEL_SPEAKER_OBJECT).cloned(),
            },
        );
        engine.register_sound(
            horn,
            SourceSpec {
                looping: false,
                duration_ms: config.horn_ms,
                clip: config.sounds.get(clips::HORN_SPEAKER_OBJECT).cloned(),
            },
        );

        for &section in config.topology.routing.keys() {
            engine.register_clip(&clips::section_clip(section), config.section_frames);
        }
        engine.register_clip(clips::WHEEL_CLIP, config.wheel_frames);

        let graph = TrackGraph::from_topology(&config.topology)?;
        let mut train = Train::new(
            Box::new(engine.clone()),
            Box::new(engine.clone()),
            Box::new(engine.clone()),
            Box::new(engine.clone()),
        )?;
        train.set_position(SectionId(config.initial_section), config.initial_offset);
        train.set_speed(0.0);

        let mut script = config.script.clone();
        script.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));

        Ok(Self {
            engine,
            graph,
            train,
            script,
            next_action: 0,
            clock_ms: 0.0,
            timestep_ms: config.timestep_ms,
            run_for_ms: config.run_for_ms,
        })
    }

    /// Run the scripted demo to the configured end time.
    pub fn run(&mut self) {
        while self.clock_ms < self.run_for_ms {
            self.step();
        }
        tracing::info!(
            section = %self.train.section(),
            speed = self.train.speed(),
            "simulation finished"
        );
    }

    /// One timestep: fire due script actions, step the engine, dispatch
    /// its events.
    pub fn step(&mut self) {
        while self.next_action < self.script.len()
            && self.script[self.next_action].at_ms <= self.clock_ms
        {
            let action = self.script[self.next_action].action;
            self.next_action += 1;
            self.apply(action);
        }
        for event in self.engine.advance(self.timestep_ms) {
            self.dispatch(event);
        }
        self.clock_ms += self.timestep_ms;
    }

    fn apply(&mut self, action: ScriptAction) {
        match action {
            ScriptAction::AccelerateTo(speed) => {
                tracing::info!(speed, "accelerating");
                self.train.accelerate_to(speed);
            }
            ScriptAction::Stop => {
                tracing::info!("stopping");
                self.train.stop();
            }
            ScriptAction::BlowHorn => self.train.blow_horn(),
            ScriptAction::ToggleJunction => {
                self.graph.toggle_junction();
                tracing::info!("junction toggled");
            }
        }
    }

    fn dispatch(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::ClipFinished { clip, .. } => {
                self.train.on_section_end(&self.graph, &clip);
            }
            EngineEvent::RampTick {
                handle,
                value,
                finished,
            } => self.train.on_ramp_tick(handle, value, finished),
        }
    }

    /// The train under simulation.
    pub fn train(&self) -> &Train {
        &self.train
    }

    /// Current simulated time in milliseconds.
    pub fn clock_ms(&self) -> f32 {
        self.clock_ms
    }

    /// Handle onto the engine, for inspection.
    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }
}
