use bevy::prelude::*;

/// Where the clock takes its time from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClockSource {
    /// Real elapsed time reported by the host each frame.
    #[default]
    Host,
    /// Time only moves when advanced by hand. Used for headless runs and tests.
    Synthetic,
}

/// Monotonic elapsed-time counter read once per tick.
#[derive(Resource, Debug, Default)]
pub struct FrameClock {
    elapsed: f32,
    source: ClockSource,
    pending: f32,
}

impl FrameClock {
    pub fn synthetic() -> Self {
        Self {
            source: ClockSource::Synthetic,
            ..default()
        }
    }

    pub fn source(&self) -> ClockSource {
        self.source
    }

    /// Seconds since the clock was created, as of the last tick.
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed
    }

    /// Queue synthetic time for the next tick. Host clocks ignore this.
    pub fn advance(&mut self, secs: f32) {
        if self.source == ClockSource::Synthetic && secs > 0.0 {
            self.pending += secs;
        }
    }

    /// Move the clock forward and return the new elapsed time.
    ///
    /// Never goes backwards: a host value lower than the last reading is
    /// ignored.
    pub fn tick(&mut self, host_elapsed: f32) -> f32 {
        let candidate = match self.source {
            ClockSource::Host => host_elapsed,
            ClockSource::Synthetic => self.elapsed + std::mem::take(&mut self.pending),
        };
        if candidate > self.elapsed {
            self.elapsed = candidate;
        }
        self.elapsed
    }
}

pub fn advance_frame_clock(time: Res<Time<Real>>, mut clock: ResMut<FrameClock>) {
    clock.tick(time.elapsed_secs());
}
