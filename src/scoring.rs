/// Running tally for one session. Only the engine mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoringState {
    pub score: u32,
    pub correct: u32,
    pub mistakes: u32,
}

impl ScoringState {
    pub fn record_hit(&mut self, score_per_word: u32) {
        self.correct += 1;
        self.score += score_per_word;
    }

    pub fn record_mistake(&mut self) {
        self.mistakes += 1;
    }

    /// Hits plus misses
    pub fn resolved(&self) -> u32 {
        self.correct + self.mistakes
    }
}

/// Final numbers for a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub score: u32,
    pub correct: u32,
    pub mistakes: u32,
    pub wpm: f64,
    /// Fraction in 0.0..=1.0
    pub accuracy: f64,
    pub seconds_played: u64,
}

impl ResultSummary {
    /// Build the summary from the tally and the wall-clock play time.
    /// Play time is floored to whole seconds and never less than one.
    pub fn compute(state: &ScoringState, elapsed_secs: f64) -> Self {
        let seconds_played = seconds_played(elapsed_secs);
        Self {
            score: state.score,
            correct: state.correct,
            mistakes: state.mistakes,
            wpm: wpm(state.correct, seconds_played),
            accuracy: accuracy(state.correct, state.mistakes),
            seconds_played,
        }
    }

    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy * 100.0
    }
}

pub fn seconds_played(elapsed_secs: f64) -> u64 {
    if elapsed_secs.is_finite() && elapsed_secs > 1.0 {
        elapsed_secs.floor() as u64
    } else {
        1
    }
}

/// Correct words per minute
pub fn wpm(correct: u32, seconds_played: u64) -> f64 {
    correct as f64 / seconds_played.max(1) as f64 * 60.0
}

/// Share of resolved inputs that were hits, 0.0 when nothing was resolved
pub fn accuracy(correct: u32, mistakes: u32) -> f64 {
    let total = correct + mistakes;
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(7, 3), 0.7);
        assert_eq!(accuracy(0, 0), 0.0);
        assert_eq!(accuracy(0, 5), 0.0);
        assert_eq!(accuracy(4, 0), 1.0);
    }

    #[test]
    fn test_wpm() {
        assert_eq!(wpm(30, 60), 30.0);
        assert_eq!(wpm(10, 30), 20.0);
        assert_eq!(wpm(0, 60), 0.0);
        // guarded against a zero duration
        assert_eq!(wpm(1, 0), 60.0);
    }

    #[test]
    fn test_seconds_played_is_floored_and_at_least_one() {
        assert_eq!(seconds_played(0.0), 1);
        assert_eq!(seconds_played(0.4), 1);
        assert_eq!(seconds_played(59.9), 59);
        assert_eq!(seconds_played(61.2), 61);
        assert_eq!(seconds_played(-3.0), 1);
        assert_eq!(seconds_played(f64::NAN), 1);
    }

    #[test]
    fn test_scoring_state_records() {
        let mut state = ScoringState::default();
        state.record_hit(14);
        state.record_hit(14);
        state.record_mistake();
        assert_eq!(state.score, 28);
        assert_eq!(state.correct, 2);
        assert_eq!(state.mistakes, 1);
        assert_eq!(state.resolved(), 3);
    }

    #[test]
    fn test_summary_compute() {
        let state = ScoringState {
            score: 300,
            correct: 30,
            mistakes: 10,
        };
        let summary = ResultSummary::compute(&state, 60.7);
        assert_eq!(summary.seconds_played, 60);
        assert_eq!(summary.wpm, 30.0);
        assert_eq!(summary.accuracy, 0.75);
        assert_eq!(summary.accuracy_percent(), 75.0);
        assert_eq!(summary.score, 300);
    }

    #[test]
    fn test_summary_for_instant_quit() {
        let summary = ResultSummary::compute(&ScoringState::default(), 0.0);
        assert_eq!(summary.seconds_played, 1);
        assert_eq!(summary.wpm, 0.0);
        assert_eq!(summary.accuracy, 0.0);
    }
}
