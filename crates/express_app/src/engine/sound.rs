// SPDX-License-Identifier: MIT OR Apache-2.0
//! Speaker state tracking and the optional audio backend.
//!
//! Playback state (playing, rate) is always tracked so the core's
//! `is_playing` queries behave the same with or without audible output.
//! Actual output goes through rodio when the `audio` feature is enabled
//! and a clip path is registered for the speaker; otherwise the backend
//! is a silent stand-in.

use express_train::ObjectId;
use indexmap::IndexMap;
use std::path::PathBuf;

/// How a registered speaker behaves when played.
#[derive(Debug, Clone, Default)]
pub(crate) struct SourceSpec {
    /// Loop until explicitly stopped.
    pub(crate) looping: bool,
    /// One-shot length in milliseconds; ignored for looping sources.
    pub(crate) duration_ms: f32,
    /// Audio file backing the speaker, if any.
    pub(crate) clip: Option<PathBuf>,
}

struct SourceState {
    spec: SourceSpec,
    playing: bool,
    rate: f32,
    elapsed_ms: f32,
}

/// All registered speakers.
pub(crate) struct SoundBank {
    sources: IndexMap<u32, SourceState>,
    backend: backend::SoundBackend,
}

impl SoundBank {
    pub(crate) fn new() -> Self {
        Self {
            sources: IndexMap::new(),
            backend: backend::SoundBackend::new(),
        }
    }

    pub(crate) fn register(&mut self, speaker: ObjectId, spec: SourceSpec) {
        self.sources.insert(
            speaker.0,
            SourceState {
                spec,
                playing: false,
                rate: 1.0,
                elapsed_ms: 0.0,
            },
        );
    }

    pub(crate) fn play(&mut self, speaker: ObjectId) {
        let Some(state) = self.sources.get_mut(&speaker.0) else {
            return;
        };
        state.playing = true;
        state.elapsed_ms = 0.0;
        self.backend.play(
            speaker,
            state.spec.clip.as_deref(),
            state.rate,
            state.spec.looping,
        );
    }

    pub(crate) fn stop(&mut self, speaker: ObjectId) {
        if let Some(state) = self.sources.get_mut(&speaker.0) {
            state.playing = false;
        }
        self.backend.stop(speaker);
    }

    pub(crate) fn is_playing(&self, speaker: ObjectId) -> bool {
        self.sources
            .get(&speaker.0)
            .is_some_and(|state| state.playing)
    }

    pub(crate) fn set_rate(&mut self, speaker: ObjectId, rate: f32) {
        if let Some(state) = self.sources.get_mut(&speaker.0) {
            state.rate = rate;
        }
        self.backend.set_rate(speaker, rate);
    }

    /// Expire one-shot sources that have run their length.
    pub(crate) fn advance(&mut self, dt_ms: f32) {
        for state in self.sources.values_mut() {
            if state.playing && !state.spec.looping {
                state.elapsed_ms += dt_ms;
                if state.elapsed_ms >= state.spec.duration_ms {
                    state.playing = false;
                }
            }
        }
    }
}

#[cfg(feature = "audio")]
mod backend {
    use express_train::ObjectId;
    use rodio::source::Source;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use std::collections::HashMap;
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;

    /// Real playback through rodio. Speakers without a registered clip
    /// path stay silent.
    pub(crate) struct SoundBackend {
        _stream: Option<OutputStream>,
        handle: Option<OutputStreamHandle>,
        sinks: HashMap<u32, Sink>,
    }

    impl SoundBackend {
        pub(crate) fn new() -> Self {
            match OutputStream::try_default() {
                Ok((stream, handle)) => {
                    tracing::info!("audio output initialized");
                    Self {
                        _stream: Some(stream),
                        handle: Some(handle),
                        sinks: HashMap::new(),
                    }
                }
                Err(e) => {
                    tracing::warn!("failed to initialize audio output: {e}; running silent");
                    Self {
                        _stream: None,
                        handle: None,
                        sinks: HashMap::new(),
                    }
                }
            }
        }

        pub(crate) fn play(
            &mut self,
            speaker: ObjectId,
            clip: Option<&Path>,
            rate: f32,
            looping: bool,
        ) {
            let (Some(handle), Some(path)) = (&self.handle, clip) else {
                return;
            };
            let file = match File::open(path) {
                Ok(file) => file,
                Err(e) => {
                    tracing::warn!("failed to open sound clip {path:?}: {e}");
                    return;
                }
            };
            let source = match Decoder::new(BufReader::new(file)) {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!("failed to decode sound clip {path:?}: {e}");
                    return;
                }
            };
            let sink = match Sink::try_new(handle) {
                Ok(sink) => sink,
                Err(e) => {
                    tracing::warn!("failed to create audio sink: {e}");
                    return;
                }
            };
            sink.set_speed(rate.max(0.05));
            if looping {
                sink.append(source.repeat_infinite());
            } else {
                sink.append(source);
            }
            if let Some(old) = self.sinks.insert(speaker.0, sink) {
                old.stop();
            }
        }

        pub(crate) fn stop(&mut self, speaker: ObjectId) {
            if let Some(sink) = self.sinks.remove(&speaker.0) {
                sink.stop();
            }
        }

        pub(crate) fn set_rate(&mut self, speaker: ObjectId, rate: f32) {
            if let Some(sink) = self.sinks.get(&speaker.0) {
                sink.set_speed(rate.max(0.05));
            }
        }
    }
}

#[cfg(not(feature = "audio"))]
mod backend {
    use express_train::ObjectId;
    use std::path::Path;

    /// Silent stand-in used when the `audio` feature is disabled.
    pub(crate) struct SoundBackend {
        noted: bool,
    }

    impl SoundBackend {
        pub(crate) fn new() -> Self {
            Self { noted: false }
        }

        pub(crate) fn play(
            &mut self,
            _speaker: ObjectId,
            clip: Option<&Path>,
            _rate: f32,
            _looping: bool,
        ) {
            if clip.is_some() && !self.noted {
                tracing::info!("sound clips configured but built without --features audio");
                self.noted = true;
            }
        }

        pub(crate) fn stop(&mut self, _speaker: ObjectId) {}

        pub(crate) fn set_rate(&mut self, _speaker: ObjectId, _rate: f32) {}
    }
}
