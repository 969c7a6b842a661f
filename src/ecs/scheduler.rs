//! Ordered per-frame system execution

use anyhow::{Context, Result};

use super::EcsWorld;

/// A stateful per-frame procedure over store queries
///
/// Systems are built once with their collaborators before the first tick.
pub trait System {
    fn name(&self) -> &'static str;

    fn execute(&mut self, world: &mut EcsWorld, delta: f32, elapsed: f32) -> Result<()>;
}

/// Runs its systems in insertion order, once per tick
#[derive(Default)]
pub struct Scheduler {
    systems: Vec<Box<dyn System>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_system(&mut self, system: Box<dyn System>) {
        tracing::debug!(system = system.name(), order = self.systems.len(), "registered system");
        self.systems.push(system);
    }

    pub fn with_system<S: System + 'static>(mut self, system: S) -> Self {
        self.add_system(Box::new(system));
        self
    }

    /// Names in execution order
    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    /// Run one frame; the first failing system aborts the rest of the frame
    pub fn tick(&mut self, world: &mut EcsWorld, delta: f32, elapsed: f32) -> Result<()> {
        for system in &mut self.systems {
            let name = system.name();
            system
                .execute(world, delta, elapsed)
                .with_context(|| format!("{name} failed; frame aborted"))?;
        }
        Ok(())
    }
}

/// Elapsed-time accumulator for the frame loop
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    elapsed: f32,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta` seconds and return the new elapsed time
    pub fn advance(&mut self, delta: f32) -> f32 {
        self.elapsed += delta;
        self.frames += 1;
        self.elapsed
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Recorder {
        name: &'static str,
        log: CallLog,
        fail: bool,
    }

    impl System for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn execute(&mut self, _world: &mut EcsWorld, delta: f32, elapsed: f32) -> Result<()> {
            self.log.lock().push((self.name, delta, elapsed));
            if self.fail {
                anyhow::bail!("boom");
            }
            Ok(())
        }
    }

    type CallLog = Arc<Mutex<Vec<(&'static str, f32, f32)>>>;

    fn recorder(name: &'static str, log: &CallLog, fail: bool) -> Recorder {
        Recorder {
            name,
            log: log.clone(),
            fail,
        }
    }

    #[test]
    fn test_tick_runs_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler = Scheduler::new()
            .with_system(recorder("first", &log, false))
            .with_system(recorder("second", &log, false));
        let mut world = EcsWorld::new();

        scheduler.tick(&mut world, 0.5, 1.5).unwrap();

        assert_eq!(*log.lock(), vec![("first", 0.5, 1.5), ("second", 0.5, 1.5)]);
        assert_eq!(scheduler.system_names(), vec!["first", "second"]);
    }

    #[test]
    fn test_failure_aborts_frame() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler = Scheduler::new()
            .with_system(recorder("first", &log, true))
            .with_system(recorder("second", &log, false));
        let mut world = EcsWorld::new();

        let err = scheduler.tick(&mut world, 0.1, 0.1).unwrap_err();

        assert!(format!("{err:#}").contains("first failed"));
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_frame_clock_accumulates() {
        let mut clock = FrameClock::new();
        clock.advance(0.25);
        assert_eq!(clock.advance(0.5), 0.75);
        assert_eq!(clock.frames(), 2);
    }
}
