//! Prometheus metrics for the quiz service.

use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};

/// Metrics collector for the quiz service.
///
/// Counters register into an owned registry rather than the process-global
/// default, so construction is repeatable (tests build one per fixture).
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    questions_served: IntCounter,
    games_completed: IntCounter,
    answers_checked: IntCounter,
    answers_correct: IntCounter,
    unknown_countries: IntCounter,
}

impl Metrics {
    /// Create a new metrics instance.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let questions_served = IntCounter::with_opts(Opts::new(
            "capitals_questions_served_total",
            "Total number of quiz questions served",
        ))?;
        registry.register(Box::new(questions_served.clone()))?;

        let games_completed = IntCounter::with_opts(Opts::new(
            "capitals_games_completed_total",
            "Total number of sessions that exhausted every country",
        ))?;
        registry.register(Box::new(games_completed.clone()))?;

        let answers_checked = IntCounter::with_opts(Opts::new(
            "capitals_answers_checked_total",
            "Total number of answers submitted for validation",
        ))?;
        registry.register(Box::new(answers_checked.clone()))?;

        let answers_correct = IntCounter::with_opts(Opts::new(
            "capitals_answers_correct_total",
            "Total number of correct answers",
        ))?;
        registry.register(Box::new(answers_correct.clone()))?;

        let unknown_countries = IntCounter::with_opts(Opts::new(
            "capitals_unknown_country_total",
            "Total number of answer checks for countries not in the store",
        ))?;
        registry.register(Box::new(unknown_countries.clone()))?;

        Ok(Self {
            registry,
            questions_served,
            games_completed,
            answers_checked,
            answers_correct,
            unknown_countries,
        })
    }

    /// Increment the questions served counter.
    pub fn inc_questions_served(&self) {
        self.questions_served.inc();
    }

    /// Increment the completed games counter.
    pub fn inc_games_completed(&self) {
        self.games_completed.inc();
    }

    /// Increment the answers checked counter.
    pub fn inc_answers_checked(&self) {
        self.answers_checked.inc();
    }

    /// Increment the correct answers counter.
    pub fn inc_answers_correct(&self) {
        self.answers_correct.inc();
    }

    /// Increment the unknown country counter.
    pub fn inc_unknown_countries(&self) {
        self.unknown_countries.inc();
    }

    /// Render the registry in Prometheus text exposition format.
    pub fn gather(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
