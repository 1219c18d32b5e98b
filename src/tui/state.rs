use crate::engine::{SortStep, StepCounts};
use crate::model::{Algorithm, InfoEvent, RunResult, SortEvent, Value};
use ratatui::{
    style::Color,
    style::Style,
    text::{Line, Span},
};
use std::time::{Duration, Instant};

/// Visual state of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarState {
    Unsorted,
    Comparing,
    Swapping,
    Sorted,
}

impl BarState {
    pub fn color(self) -> Color {
        match self {
            BarState::Unsorted => Color::Cyan,
            BarState::Comparing => Color::Yellow,
            BarState::Swapping => Color::Magenta,
            BarState::Sorted => Color::Green,
        }
    }
}

/// Step delays reachable with `+`/`-`, fastest first.
pub const DELAY_STEPS_MS: [u64; 10] = [0, 1, 2, 5, 10, 20, 50, 100, 200, 500];

pub struct UiState {
    pub tab: usize,
    pub paused: bool,
    pub running: bool,
    pub algorithm: Algorithm,
    pub info: String,

    pub values: Vec<Value>,
    pub bars: Vec<BarState>,
    // Positions currently drawn as comparing/swapping; reset on the next step.
    highlighted: Vec<usize>,
    pub counts: StepCounts,
    pub max_value: Value,
    pub delay: Duration,
    pub last_tone_hz: Option<f64>,

    pub run_start: Instant,
    pub last_result: Option<RunResult>,
    pub auto_save: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: 0,
            paused: false,
            running: false,
            algorithm: Algorithm::Quick,
            info: String::new(),
            values: Vec::new(),
            bars: Vec::new(),
            highlighted: Vec::new(),
            counts: StepCounts::default(),
            max_value: 100,
            delay: Duration::ZERO,
            last_tone_hz: None,
            run_start: Instant::now(),
            last_result: None,
            auto_save: false,
        }
    }
}

pub fn push_wrapped_status_kv(
    out: &mut Vec<Line<'static>>,
    label: &str,
    value: &str,
    status_area_width: u16,
) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }

    // Account for borders (2 chars on each side)
    let usable_width = status_area_width.saturating_sub(4).max(1);
    let label_text = format!("{label}:");
    let label_width = label_text.chars().count() as u16;

    let value_chars: Vec<char> = value.chars().collect();
    let mut remaining = value_chars.as_slice();
    let mut first = true;

    while !remaining.is_empty() {
        let line_width = if first {
            usable_width.saturating_sub(label_width + 1).max(1)
        } else {
            usable_width.saturating_sub(2).max(1)
        };

        let chars_to_take = (remaining.len() as u16).min(line_width) as usize;
        let (line_chars, rest) = remaining.split_at(chars_to_take);
        let line_text: String = line_chars.iter().collect();

        if first {
            out.push(Line::from(vec![
                Span::styled(label_text.clone(), Style::default().fg(Color::Gray)),
                Span::raw(" "),
                Span::raw(line_text),
            ]));
            first = false;
        } else {
            out.push(Line::from(vec![Span::raw("  "), Span::raw(line_text)]));
        }

        remaining = rest;
    }
}

impl UiState {
    pub fn new(algorithm: Algorithm, auto_save: bool, delay: Duration, max_value: Value) -> Self {
        Self {
            algorithm,
            auto_save,
            delay,
            max_value,
            ..Default::default()
        }
    }

    /// Replace the displayed sequence and forget all per-run progress.
    fn load_values(&mut self, algorithm: Algorithm, values: Vec<Value>) {
        self.algorithm = algorithm;
        self.bars = vec![BarState::Unsorted; values.len()];
        self.values = values;
        self.highlighted.clear();
        self.counts = StepCounts::default();
        self.last_tone_hz = None;
        self.paused = false;
    }

    fn highlight(&mut self, state: BarState, indices: &[usize]) {
        for idx in self.highlighted.drain(..) {
            if let Some(bar) = self.bars.get_mut(idx) {
                if matches!(bar, BarState::Comparing | BarState::Swapping) {
                    *bar = BarState::Unsorted;
                }
            }
        }
        for &idx in indices {
            if let Some(bar) = self.bars.get_mut(idx) {
                *bar = state;
                self.highlighted.push(idx);
            }
        }
    }

    fn touch_tone(&mut self, index: usize) {
        if let Some(v) = self.values.get(index) {
            self.last_tone_hz = Some(crate::metrics::tone_frequency(*v, self.max_value));
        }
    }

    fn apply_step(&mut self, step: SortStep<Value>, snapshot: Vec<Value>) {
        self.counts.record(&step);
        if snapshot.len() == self.values.len() {
            self.values = snapshot;
        }
        match step {
            SortStep::Compare(i, j) => {
                self.highlight(BarState::Comparing, &[i, j]);
                self.touch_tone(i);
            }
            SortStep::Swap(i, j) => {
                self.highlight(BarState::Swapping, &[i, j]);
                self.touch_tone(j);
            }
            SortStep::Merge { index, .. } => {
                self.highlight(BarState::Swapping, &[index]);
                self.touch_tone(index);
            }
            SortStep::MarkSorted(i) => {
                if let Some(bar) = self.bars.get_mut(i) {
                    *bar = BarState::Sorted;
                }
                self.highlighted.retain(|&h| h != i);
            }
            SortStep::Completed => {
                self.highlighted.clear();
                self.bars.iter_mut().for_each(|b| *b = BarState::Sorted);
                self.running = false;
                self.info = format!("{} completed", self.algorithm.label());
            }
        }
    }

    /// Delay one notch faster (`faster == true`) or slower than the current one.
    pub fn next_delay(&self, faster: bool) -> Duration {
        let current = self.delay.as_millis() as u64;
        let next = if faster {
            DELAY_STEPS_MS
                .iter()
                .rev()
                .find(|&&ms| ms < current)
                .copied()
                .unwrap_or(DELAY_STEPS_MS[0])
        } else {
            DELAY_STEPS_MS
                .iter()
                .find(|&&ms| ms > current)
                .copied()
                .unwrap_or(DELAY_STEPS_MS[DELAY_STEPS_MS.len() - 1])
        };
        Duration::from_millis(next)
    }

    pub fn status_label(&self) -> &'static str {
        match (self.running, self.paused) {
            (true, true) => "Paused",
            (true, false) => "Running",
            (false, _) => "Idle",
        }
    }
}

/// Fold one event into the UI state. `RunCompleted` is handled by the caller,
/// which also runs post-processing.
pub fn apply_event(state: &mut UiState, ev: SortEvent) {
    match ev {
        SortEvent::InputReady { algorithm, values } => {
            state.load_values(algorithm, values);
            state.running = false;
            state.info = format!(
                "Ready: {} on {} values (space to start)",
                algorithm.label(),
                state.values.len()
            );
        }
        SortEvent::RunStarted { algorithm, values } => {
            state.load_values(algorithm, values);
            state.running = true;
            state.run_start = Instant::now();
            state.last_result = None;
            state.info = format!("Running {}", algorithm.label());
        }
        SortEvent::Step { step, snapshot } => state.apply_step(step, snapshot),
        SortEvent::Info(info) => {
            match &info {
                InfoEvent::Paused(p) => state.paused = *p,
                InfoEvent::DelayChanged { delay } => state.delay = *delay,
                InfoEvent::Cancelled { .. } => {
                    state.running = false;
                    state.paused = false;
                    state.highlight(BarState::Unsorted, &[]);
                }
                InfoEvent::Message(_) => {}
            }
            state.info = info.to_message();
        }
        SortEvent::RunCompleted { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(values: Vec<Value>) -> UiState {
        let mut state = UiState::default();
        apply_event(
            &mut state,
            SortEvent::RunStarted {
                algorithm: Algorithm::Merge,
                values,
            },
        );
        state
    }

    fn step(state: &mut UiState, step: SortStep<Value>, snapshot: &[Value]) {
        apply_event(
            state,
            SortEvent::Step {
                step,
                snapshot: snapshot.to_vec(),
            },
        );
    }

    #[test]
    fn compare_highlights_then_resets() {
        let mut state = started(vec![2, 1, 3]);
        step(&mut state, SortStep::Compare(0, 1), &[2, 1, 3]);
        assert_eq!(state.bars[0], BarState::Comparing);
        assert_eq!(state.bars[1], BarState::Comparing);

        step(&mut state, SortStep::Swap(0, 1), &[1, 2, 3]);
        assert_eq!(state.bars[0], BarState::Swapping);
        assert_eq!(state.values, vec![1, 2, 3]);

        step(&mut state, SortStep::Compare(1, 2), &[1, 2, 3]);
        assert_eq!(state.bars[0], BarState::Unsorted);
        assert_eq!(state.bars[2], BarState::Comparing);
    }

    #[test]
    fn remarking_restores_sorted_layers() {
        let mut state = started(vec![2, 1]);
        step(&mut state, SortStep::MarkSorted(0), &[2, 1]);
        step(&mut state, SortStep::MarkSorted(1), &[2, 1]);
        step(&mut state, SortStep::Compare(0, 1), &[2, 1]);
        assert_eq!(state.bars, vec![BarState::Comparing, BarState::Comparing]);

        step(&mut state, SortStep::Merge { index: 0, value: 1 }, &[1, 1]);
        step(&mut state, SortStep::Merge { index: 1, value: 2 }, &[1, 2]);
        step(&mut state, SortStep::MarkSorted(0), &[1, 2]);
        step(&mut state, SortStep::MarkSorted(1), &[1, 2]);
        assert_eq!(state.bars, vec![BarState::Sorted, BarState::Sorted]);
        assert_eq!(state.counts.merges, 2);
    }

    #[test]
    fn completed_marks_everything_and_stops() {
        let mut state = started(vec![1, 2, 3]);
        step(&mut state, SortStep::Compare(0, 1), &[1, 2, 3]);
        step(&mut state, SortStep::Completed, &[1, 2, 3]);
        assert!(!state.running);
        assert!(state.bars.iter().all(|b| *b == BarState::Sorted));
        assert_eq!(state.counts.completed, 1);
    }

    #[test]
    fn tone_tracks_touched_value() {
        let mut state = started(vec![100, 0]);
        state.max_value = 100;
        step(&mut state, SortStep::Compare(0, 1), &[100, 0]);
        assert_eq!(state.last_tone_hz, Some(1200.0));
    }

    #[test]
    fn info_events_update_flags() {
        let mut state = started(vec![3, 2, 1]);
        apply_event(&mut state, SortEvent::Info(InfoEvent::Paused(true)));
        assert!(state.paused);
        assert_eq!(state.status_label(), "Paused");

        apply_event(
            &mut state,
            SortEvent::Info(InfoEvent::Cancelled {
                algorithm: Algorithm::Merge,
                steps: 4,
            }),
        );
        assert!(!state.running);
        assert_eq!(state.info, "Merge sort cancelled after 4 steps");
    }

    #[test]
    fn new_state_starts_idle_with_launch_settings() {
        let mut state = UiState::new(Algorithm::Bubble, true, Duration::from_millis(50), 40);
        assert_eq!(state.algorithm, Algorithm::Bubble);
        assert!(state.auto_save);
        assert_eq!(state.max_value, 40);
        assert_eq!(state.status_label(), "Idle");
        assert_eq!(state.next_delay(true), Duration::from_millis(20));

        apply_event(
            &mut state,
            SortEvent::InputReady {
                algorithm: Algorithm::Bubble,
                values: vec![3, 1, 2],
            },
        );
        assert_eq!(state.bars, vec![BarState::Unsorted; 3]);
    }

    #[test]
    fn delay_steps_clamp_at_both_ends() {
        let mut state = UiState::default();
        assert_eq!(state.next_delay(true), Duration::ZERO);
        state.delay = Duration::from_millis(20);
        assert_eq!(state.next_delay(true), Duration::from_millis(10));
        assert_eq!(state.next_delay(false), Duration::from_millis(50));
        state.delay = Duration::from_millis(7);
        assert_eq!(state.next_delay(true), Duration::from_millis(5));
        state.delay = Duration::from_millis(500);
        assert_eq!(state.next_delay(false), Duration::from_millis(500));
    }
}
