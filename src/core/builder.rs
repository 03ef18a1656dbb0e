use std::fmt::Display;

use crate::{
    config::Config,
    events::Bus,
    policies::ReleasePolicy,
    work::WorkRef,
};

use super::{gate::GateCoordinator, preempt::PreemptCoordinator, runner::Emitter};

/// Wires config and bus into an [`Emitter`].
///
/// Without a shared bus the coordinator gets a private one sized from config.
fn emitter(cfg: &Config, bus: Option<Bus>) -> Emitter {
    let bus = bus.unwrap_or_else(|| Bus::new(cfg.bus_capacity_clamped()));
    Emitter::new(&cfg.name, bus)
}

/// Builder for [`PreemptCoordinator`].
pub struct PreemptBuilder<I, T, E> {
    work: WorkRef<I, T, E>,
    cfg: Config,
    bus: Option<Bus>,
}

impl<I, T, E> PreemptBuilder<I, T, E>
where
    I: Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    /// Creates a builder with default config and no shared bus.
    pub fn new(work: WorkRef<I, T, E>) -> Self {
        Self {
            work,
            cfg: Config::default(),
            bus: None,
        }
    }

    /// Sets name, timeout and bus capacity.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Publishes events to a shared bus (e.g. [`Monitor::bus`](crate::Monitor::bus)).
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Builds the coordinator.
    pub fn build(self) -> PreemptCoordinator<I, T, E> {
        let emitter = emitter(&self.cfg, self.bus);
        PreemptCoordinator::from_parts(self.work, emitter, self.cfg.invocation_timeout())
    }
}

/// Builder for [`GateCoordinator`].
pub struct GateBuilder<I, T, E> {
    work: WorkRef<I, T, E>,
    cfg: Config,
    bus: Option<Bus>,
    release: ReleasePolicy,
}

impl<I, T, E> GateBuilder<I, T, E>
where
    I: Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    /// Creates a builder with default config, [`ReleasePolicy::Auto`] and no shared bus.
    pub fn new(work: WorkRef<I, T, E>) -> Self {
        Self {
            work,
            cfg: Config::default(),
            bus: None,
            release: ReleasePolicy::default(),
        }
    }

    /// Sets name, timeout and bus capacity.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Publishes events to a shared bus.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Chooses what re-opens the gate.
    pub fn with_release(mut self, release: ReleasePolicy) -> Self {
        self.release = release;
        self
    }

    /// Builds the coordinator.
    pub fn build(self) -> GateCoordinator<I, T, E> {
        let emitter = emitter(&self.cfg, self.bus);
        GateCoordinator::from_parts(
            self.work,
            emitter,
            self.cfg.invocation_timeout(),
            self.release,
        )
    }
}

impl<I, T, E> PreemptCoordinator<I, T, E>
where
    I: Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    /// Creates a builder for constructing a coordinator with fluent API.
    pub fn builder(work: WorkRef<I, T, E>) -> PreemptBuilder<I, T, E> {
        PreemptBuilder::new(work)
    }
}

impl<I, T, E> GateCoordinator<I, T, E>
where
    I: Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    /// Creates a builder for constructing a gate with fluent API.
    pub fn builder(work: WorkRef<I, T, E>) -> GateBuilder<I, T, E> {
        GateBuilder::new(work)
    }
}
