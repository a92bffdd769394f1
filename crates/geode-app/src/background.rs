//! Runs a god's update on its own thread.

use std::thread::{self, JoinHandle};

use geode_gods::God;
use tracing::{debug, error};

use crate::error::AppError;

enum Slot<G> {
    Idle(G),
    Running(JoinHandle<(G, usize)>),
    Lost,
}

/// Owns a god between background runs.
///
/// [`launch`](Self::launch) moves the god onto a thread named
/// `<name>-god` for one `update`. Every later launch or access joins that
/// run first, so at most one update is ever in flight.
pub struct BackgroundGod<G> {
    name: &'static str,
    slot: Slot<G>,
    last_work: usize,
}

impl<G: God + 'static> BackgroundGod<G> {
    /// Wrap an idle god.
    pub fn new(god: G) -> Self {
        Self {
            name: god.name(),
            slot: Slot::Idle(god),
            last_work: 0,
        }
    }

    /// The god's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` while an update is in flight.
    pub fn is_running(&self) -> bool {
        matches!(self.slot, Slot::Running(_))
    }

    /// Work reported by the most recently joined update.
    pub fn last_work(&self) -> usize {
        self.last_work
    }

    /// Start one `update` on a background thread, after joining any update
    /// still in flight.
    pub fn launch(&mut self) -> Result<(), AppError> {
        self.join()?;
        let Slot::Idle(mut god) = std::mem::replace(&mut self.slot, Slot::Lost) else {
            return Err(AppError::ManagerPanicked(self.name));
        };

        let spawned = thread::Builder::new()
            .name(format!("{}-god", self.name))
            .spawn(move || {
                let work = god.update();
                (god, work)
            });
        match spawned {
            Ok(handle) => {
                self.slot = Slot::Running(handle);
                Ok(())
            }
            Err(e) => {
                error!(god = self.name, "failed to spawn manager thread: {e}");
                Err(AppError::ManagerPanicked(self.name))
            }
        }
    }

    /// Wait for the in-flight update, if any.
    pub fn join(&mut self) -> Result<(), AppError> {
        match std::mem::replace(&mut self.slot, Slot::Lost) {
            Slot::Running(handle) => match handle.join() {
                Ok((god, work)) => {
                    debug!(god = self.name, work, "background update finished");
                    self.last_work = work;
                    self.slot = Slot::Idle(god);
                    Ok(())
                }
                Err(_) => {
                    error!(god = self.name, "manager thread panicked");
                    Err(AppError::ManagerPanicked(self.name))
                }
            },
            Slot::Idle(god) => {
                self.slot = Slot::Idle(god);
                Ok(())
            }
            Slot::Lost => Err(AppError::ManagerPanicked(self.name)),
        }
    }

    /// Run `f` on the god once it is idle.
    pub fn with<R>(&mut self, f: impl FnOnce(&mut G) -> R) -> Result<R, AppError> {
        self.join()?;
        match &mut self.slot {
            Slot::Idle(god) => Ok(f(god)),
            _ => Err(AppError::ManagerPanicked(self.name)),
        }
    }

    /// Join and hand back the god.
    pub fn into_inner(mut self) -> Result<G, AppError> {
        self.join()?;
        match self.slot {
            Slot::Idle(god) => Ok(god),
            _ => Err(AppError::ManagerPanicked(self.name)),
        }
    }
}
