//! TTY-aware progress reporting for the C7 probe sweep.
//!
//! Probing a real agent binary is the slowest stage in a run by a wide
//! margin, and all five metrics run concurrently, so each gets its own
//! status line: a redraw-in-place block on an interactive terminal, or
//! periodic complete lines in CI/CD where cursor movement just clutters
//! the log.

use std::io::IsTerminal;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Line {
    label: String,
    total: usize,
    completed: usize,
}

struct State {
    lines: Vec<Line>,
    last_render: Instant,
    rendered_once: bool,
}

pub struct ProbeProgress {
    state: Mutex<State>,
    interactive: bool,
    start: Instant,
}

/// Minimum interval between redraws, matching the cadence real terminals
/// expect for a multi-line progress block (anything tighter just flickers).
const RENDER_THROTTLE: Duration = Duration::from_millis(500);

impl ProbeProgress {
    /// `metrics` is `(label, sample_count)` for each of the five metrics,
    /// in the order their lines should render.
    pub fn new(metrics: Vec<(&'static str, usize)>) -> Self {
        let lines = metrics
            .into_iter()
            .map(|(label, total)| Line {
                label: label.to_string(),
                total,
                completed: 0,
            })
            .collect();
        Self {
            state: Mutex::new(State {
                lines,
                last_render: Instant::now() - RENDER_THROTTLE,
                rendered_once: false,
            }),
            interactive: std::io::stderr().is_terminal(),
            start: Instant::now(),
        }
    }

    /// Record one finished probe for `label` and render if the throttle
    /// allows it, or if this metric just reached its total.
    pub fn tick(&self, label: &str) {
        let mut state = self.state.lock().unwrap();
        let all_done = {
            let Some(line) = state.lines.iter_mut().find(|l| l.label == label) else {
                return;
            };
            line.completed += 1;
            state.lines.iter().all(|l| l.completed >= l.total)
        };

        let due = state.last_render.elapsed() >= RENDER_THROTTLE;
        if !due && !all_done {
            return;
        }
        state.last_render = Instant::now();
        self.render(&mut state, all_done);
    }

    fn render(&self, state: &mut State, all_done: bool) {
        if state.lines.iter().all(|l| l.total == 0) {
            return;
        }

        if self.interactive {
            if state.rendered_once {
                // move cursor up to the start of the previously drawn block
                eprint!("\x1b[{}A", state.lines.len());
            }
            for line in &state.lines {
                let pct = if line.total == 0 {
                    100
                } else {
                    (line.completed as f64 / line.total as f64 * 100.0) as usize
                };
                eprintln!("\r\x1b[K→ {:<14} {}/{} ({pct}%)", line.label, line.completed, line.total);
            }
            state.rendered_once = true;
        } else if all_done {
            for line in &state.lines {
                eprintln!(
                    "✓ {} {}/{} - {:.1}s",
                    line.label,
                    line.completed,
                    line.total,
                    self.start.elapsed().as_secs_f64()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticking_each_metric_to_its_total_does_not_panic() {
        let progress = ProbeProgress::new(vec![("m1_consistency", 2), ("m2_comprehension", 3)]);
        progress.tick("m1_consistency");
        progress.tick("m1_consistency");
        progress.tick("m2_comprehension");
        progress.tick("m2_comprehension");
        progress.tick("m2_comprehension");
    }

    #[test]
    fn zero_total_is_a_no_op() {
        let progress = ProbeProgress::new(vec![("m1_consistency", 0)]);
        progress.tick("m1_consistency");
    }

    #[test]
    fn unknown_label_is_ignored() {
        let progress = ProbeProgress::new(vec![("m1_consistency", 1)]);
        progress.tick("not_a_real_metric");
    }
}
