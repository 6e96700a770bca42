//! Question selection and answer validation.

use std::collections::HashSet;

use capitals_db::{CapitalStore, StoreError};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const GAME_OVER_MESSAGE: &str =
    "Congratulations! You've answered all the capitals of the world!";

/// Errors from the quiz operations.
#[derive(Debug, Error)]
pub enum GameError {
    /// The submitted country is not a key in the store (stale or tampered
    /// client data, or an end-of-game race).
    #[error("unknown country: {0}")]
    UnknownCountry(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of asking for the next question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextQuestion {
    /// A country to quiz the player on.
    Next { country: String },
    /// Every country has been asked; a terminal state, not an error.
    GameOver { message: String },
}

/// Reference location returned with every answer check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub capital: String,
    pub lat: f64,
    pub lon: f64,
}

/// Outcome of validating a submitted answer.
#[derive(Debug, Clone)]
pub struct AnswerCheck {
    pub correct: bool,
    pub message: String,
    pub location: Location,
}

/// Stateless quiz operations over an injected store handle.
///
/// There is no server-side session: the caller supplies the already-asked
/// list on every request and owns that state entirely.
#[derive(Clone)]
pub struct Quiz {
    store: CapitalStore,
}

impl Quiz {
    pub fn new(store: CapitalStore) -> Self {
        Self { store }
    }

    /// Pick the next country to ask, skipping everything in `asked`.
    ///
    /// Duplicates in `asked` are harmless. Selection is not atomic across
    /// requests, so avoiding repeats depends on the caller resending an
    /// accurate list each call.
    pub async fn next_question(&self, asked: &[String]) -> Result<NextQuestion, GameError> {
        let excluded: HashSet<String> = asked.iter().cloned().collect();

        match self.store.pick_random_unasked(&excluded).await? {
            Some(country) => {
                debug!("Selected next question: {}", country);
                Ok(NextQuestion::Next { country })
            }
            None => Ok(NextQuestion::GameOver {
                message: GAME_OVER_MESSAGE.to_string(),
            }),
        }
    }

    /// Validate `submitted` as the capital of `country`.
    ///
    /// The answer is trimmed of surrounding whitespace and compared to the
    /// stored capital with Unicode lowercase folding. Accents and interior
    /// whitespace are preserved as-is, so "Washington Dc" matches
    /// "Washington DC" but "Washington, D.C." does not.
    pub async fn check_answer(
        &self,
        country: &str,
        submitted: &str,
    ) -> Result<AnswerCheck, GameError> {
        let record = self
            .store
            .lookup(country)
            .await?
            .ok_or_else(|| GameError::UnknownCountry(country.to_string()))?;

        let correct = submitted.trim().to_lowercase() == record.capital.to_lowercase();
        let message = if correct {
            format!(
                "Correct! The capital of {} is {}.",
                record.country, record.capital
            )
        } else {
            format!("Sorry, the correct answer is {}.", record.capital)
        };

        Ok(AnswerCheck {
            correct,
            message,
            location: Location {
                capital: record.capital,
                lat: record.lat,
                lon: record.lon,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capitals_db::models::SeedRecord;
    use capitals_db::DbPool;

    async fn quiz_with(records: &[SeedRecord], name: &str) -> Quiz {
        let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
        let db = DbPool::new(&url).await.expect("open");
        let store = CapitalStore::new(db);
        store.initialize(records).await.expect("seed");
        Quiz::new(store)
    }

    fn france() -> SeedRecord {
        SeedRecord {
            country: "France".to_string(),
            capital: "Paris".to_string(),
            lat: 48.8566,
            lon: 2.3522,
        }
    }

    #[tokio::test]
    async fn matching_is_case_insensitive() {
        let quiz = quiz_with(&[france()], "quiz_case").await;

        let check = quiz.check_answer("France", "paris").await.unwrap();
        assert!(check.correct);
        assert!(check.message.contains("Paris"));
    }

    #[tokio::test]
    async fn surrounding_whitespace_is_trimmed() {
        let quiz = quiz_with(&[france()], "quiz_trim").await;

        let check = quiz.check_answer("France", " Paris ").await.unwrap();
        assert!(check.correct);
    }

    #[tokio::test]
    async fn interior_punctuation_is_not_normalized() {
        let records = [SeedRecord {
            country: "United States".to_string(),
            capital: "Washington DC".to_string(),
            lat: 38.9072,
            lon: -77.0369,
        }];
        let quiz = quiz_with(&records, "quiz_punct").await;

        let check = quiz
            .check_answer("United States", "Washington Dc")
            .await
            .unwrap();
        assert!(check.correct);

        let check = quiz
            .check_answer("United States", "Washington, D.C.")
            .await
            .unwrap();
        assert!(!check.correct);
    }

    #[tokio::test]
    async fn wrong_answer_still_names_the_capital() {
        let quiz = quiz_with(&[france()], "quiz_wrong").await;

        let check = quiz.check_answer("France", "Lyon").await.unwrap();
        assert!(!check.correct);
        assert!(check.message.contains("Paris"));
        assert_eq!(check.location.capital, "Paris");
    }

    #[tokio::test]
    async fn unknown_country_is_rejected() {
        let quiz = quiz_with(&[france()], "quiz_unknown").await;

        let err = quiz.check_answer("Atlantis", "Nowhere").await.unwrap_err();
        assert!(matches!(err, GameError::UnknownCountry(c) if c == "Atlantis"));
    }

    #[tokio::test]
    async fn asked_list_with_duplicates_is_harmless() {
        let quiz = quiz_with(&[france()], "quiz_dupes").await;

        let asked = vec!["France".to_string(), "France".to_string()];
        let next = quiz.next_question(&asked).await.unwrap();
        assert!(matches!(next, NextQuestion::GameOver { .. }));
    }

    #[tokio::test]
    async fn exhausted_store_signals_game_over() {
        let quiz = quiz_with(&[france()], "quiz_over").await;

        match quiz.next_question(&[]).await.unwrap() {
            NextQuestion::Next { country } => assert_eq!(country, "France"),
            NextQuestion::GameOver { .. } => panic!("store should not be exhausted"),
        }

        let asked = vec!["France".to_string()];
        match quiz.next_question(&asked).await.unwrap() {
            NextQuestion::GameOver { message } => {
                assert!(message.contains("Congratulations"));
            }
            NextQuestion::Next { .. } => panic!("store should be exhausted"),
        }
    }
}
