//! Progress reporting for swarm execution

use super::ProgressObserver;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use swarm_application::SwarmEvent;
use swarm_domain::{WorkerId, WorkerState};

/// Reports progress with one spinner per busy worker plus an overall bar
pub struct ProgressReporter {
    multi: MultiProgress,
    /// Busy workers and the subject each is researching.
    bars: Mutex<HashMap<WorkerId, (ProgressBar, String)>>,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start_phase(&self, total: u64, prefix: &str, message: &str) {
        let pb = self.multi.add(ProgressBar::new(total));
        pb.set_style(if total == 0 {
            Self::spinner_style()
        } else {
            Self::phase_style()
        });
        pb.set_prefix(prefix.to_string());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));

        let mut phase = self.phase_bar.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = phase.replace(pb) {
            previous.finish();
        }
    }

    fn finish_phase(&self, message: String) {
        if let Some(pb) = self
            .phase_bar
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            pb.finish_with_message(message);
        }
    }

    fn worker_started(&self, worker_id: &WorkerId, subject: &str) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(worker_id.to_string());
        pb.set_message(subject.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        self.bars
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(worker_id.clone(), (pb, subject.to_string()));
    }

    fn worker_finished(&self, worker_id: &WorkerId, success: bool) {
        let Some((pb, subject)) = self
            .bars
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(worker_id)
        else {
            return;
        };

        let mark = if success { "v".green() } else { "x".red() };
        pb.finish_with_message(format!("{} {}", mark, subject));

        if let Some(phase) = self
            .phase_bar
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            phase.set_message(format!("{} {}", mark, subject));
            phase.inc(1);
        }
    }

    fn clear_workers(&self) {
        for (_, (pb, _)) in self.bars.lock().unwrap_or_else(|e| e.into_inner()).drain() {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for ProgressReporter {
    fn observe(&self, event: &SwarmEvent) {
        match event {
            SwarmEvent::Dispatching { count, .. } => {
                self.start_phase(*count as u64, "Research", "Dispatching...");
            }
            SwarmEvent::WorkerTransition {
                worker_id,
                state: WorkerState::Running,
                subject: Some(subject),
            } => self.worker_started(worker_id, subject),
            SwarmEvent::WorkerTransition {
                worker_id, state, ..
            } if matches!(state, WorkerState::Idle | WorkerState::Error) => {
                self.worker_finished(worker_id, *state == WorkerState::Idle);
            }
            SwarmEvent::AgentStep {
                worker_id,
                subject,
                iteration,
                tool,
            } => {
                if let Some((pb, _)) = self
                    .bars
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .get(worker_id)
                {
                    pb.set_message(format!("{} · step {} {}", subject, iteration, tool.dimmed()));
                }
            }
            SwarmEvent::Aggregating {
                succeeded, failed, ..
            } => {
                self.finish_phase(format!(
                    "{} ({} ok, {} failed)",
                    "Research complete!".green(),
                    succeeded,
                    failed
                ));
                self.start_phase(0, "Aggregating", "Synthesizing summary...");
            }
            SwarmEvent::Completed { .. } => {
                self.clear_workers();
                self.finish_phase(format!("{}", "Done!".green()));
            }
            SwarmEvent::Failed { message, .. } => {
                self.clear_workers();
                self.finish_phase(format!("{} {}", "Failed:".red(), message));
            }
            _ => {}
        }
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Writes to stderr so stdout stays clean for the result.
pub struct SimpleProgress;

impl ProgressObserver for SimpleProgress {
    fn observe(&self, event: &SwarmEvent) {
        match event {
            // Too chatty for line output.
            SwarmEvent::AgentStep { .. } => {}
            SwarmEvent::Completed { .. } => eprintln!("{} {}", "->".cyan(), event.describe().green()),
            SwarmEvent::Failed { .. } => eprintln!("{} {}", "->".cyan(), event.describe().red()),
            _ => eprintln!("{} {}", "->".cyan(), event.describe()),
        }
    }
}
