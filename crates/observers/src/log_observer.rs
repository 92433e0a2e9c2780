use log::Level;
use rsas_core::Observer;
use rsas_solvers::Event;

use crate::traits::{HasConcentration, HasProgress};

/// Reports solve progress through the [`log`] facade.
///
/// Start and finish are always logged. Progress is logged every `every`
/// completed ages or timesteps, and always for the last one.
///
/// # Example
///
/// ```
/// use rsas_functions::Uniform;
/// use rsas_observers::LogObserver;
/// use rsas_solvers::{Config, Mode, Problem, solve};
///
/// let selection = Uniform::constant(0.0, 10.0, 3).unwrap();
/// let problem = Problem::new(&[1.0; 3], 1.0).with_outflow(&[0.5; 3], &selection);
///
/// let observer = LogObserver::new(log::Level::Info).every(10);
/// solve(&problem, Mode::Time, &Config::default(), observer).unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogObserver {
    level: Level,
    every: usize,
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new(Level::Debug)
    }
}

impl LogObserver {
    /// Creates an observer that logs every event at `level`.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level, every: 1 }
    }

    /// Logs progress only every `every` completed units; zero is treated
    /// as one.
    #[must_use]
    pub fn every(mut self, every: usize) -> Self {
        self.every = every.max(1);
        self
    }

    fn message(&self, event: &Event<'_>) -> Option<String> {
        match *event {
            Event::Started {
                mode,
                max_age,
                timesteps,
                substeps,
                fluxes,
            } => Some(format!(
                "{mode}-major rSAS solve: {max_age} ages, {timesteps} timesteps, \
                 {substeps} substeps, {fluxes} outflows"
            )),
            Event::Finished { mode } => Some(format!("{mode}-major rSAS solve finished")),
            Event::AgeCompleted { .. } | Event::StepCompleted { .. } => {
                let (done, total) = event.progress()?;
                if done % self.every != 0 && done != total {
                    return None;
                }

                let unit = match event {
                    Event::AgeCompleted { .. } => "age",
                    _ => "timestep",
                };
                Some(match event.concentration() {
                    Some(c) => format!("{unit} {done}/{total}, C_out = {c:.6}"),
                    None => format!("{unit} {done}/{total}"),
                })
            }
        }
    }
}

impl Observer<Event<'_>> for LogObserver {
    fn observe(&mut self, event: &Event<'_>) {
        if let Some(message) = self.message(event) {
            log::log!(self.level, "{message}");
        }
    }
}
