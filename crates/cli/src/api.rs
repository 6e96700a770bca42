//! HTTP/JSON boundary for the quiz.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use capitals_game::{GameError, Location, NextQuestion, Quiz};
use capitals_telemetry::Metrics;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::error;

static INDEX_HTML: &str = include_str!("../static/index.html");

/// Application state shared across handlers.
pub struct AppState {
    pub quiz: Quiz,
    pub metrics: Metrics,
}

type AppStateArc = Arc<AppState>;

/// Build the service router.
pub fn router(quiz: Quiz, metrics: Metrics) -> Router {
    let state = Arc::new(AppState { quiz, metrics });

    Router::new()
        .route("/", get(index))
        .route("/api/question", post(next_question))
        .route("/api/check_answer", post(check_answer))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Deserialize)]
struct QuestionRequest {
    /// Countries already asked in this session; client-owned state.
    #[serde(default)]
    asked: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum QuestionResponse {
    Question { country: String },
    GameOver { game_over: bool, message: String },
}

#[derive(Debug, Deserialize)]
struct CheckAnswerRequest {
    answer: String,
    country: String,
}

#[derive(Debug, Serialize)]
struct CheckAnswerResponse {
    correct: bool,
    message: String,
    location: Location,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn map_game_error(err: GameError) -> ApiError {
    match err {
        GameError::UnknownCountry(country) => {
            error!("Answer check for unknown country: {}", country);
            (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    error: "Question not found".to_string(),
                }),
            )
        }
        GameError::Store(e) => {
            error!("Store failure while handling request: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Internal server error".to_string(),
                }),
            )
        }
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn next_question(
    State(state): State<AppStateArc>,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let next = state
        .quiz
        .next_question(&req.asked)
        .await
        .map_err(map_game_error)?;

    let response = match next {
        NextQuestion::Next { country } => {
            state.metrics.inc_questions_served();
            QuestionResponse::Question { country }
        }
        NextQuestion::GameOver { message } => {
            state.metrics.inc_games_completed();
            QuestionResponse::GameOver {
                game_over: true,
                message,
            }
        }
    };

    Ok(Json(response))
}

async fn check_answer(
    State(state): State<AppStateArc>,
    Json(req): Json<CheckAnswerRequest>,
) -> Result<Json<CheckAnswerResponse>, ApiError> {
    state.metrics.inc_answers_checked();

    let check = state
        .quiz
        .check_answer(&req.country, &req.answer)
        .await
        .map_err(|e| {
            if matches!(e, GameError::UnknownCountry(_)) {
                state.metrics.inc_unknown_countries();
            }
            map_game_error(e)
        })?;

    if check.correct {
        state.metrics.inc_answers_correct();
    }

    Ok(Json(CheckAnswerResponse {
        correct: check.correct,
        message: check.message,
        location: check.location,
    }))
}

async fn metrics_handler(State(state): State<AppStateArc>) -> Result<String, StatusCode> {
    state.metrics.gather().map_err(|e| {
        error!("Failed to gather metrics: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use capitals_db::models::SeedRecord;
    use capitals_db::{CapitalStore, DbPool};
    use std::collections::HashSet;

    fn sample_seed() -> Vec<SeedRecord> {
        vec![
            SeedRecord {
                country: "France".to_string(),
                capital: "Paris".to_string(),
                lat: 48.8566,
                lon: 2.3522,
            },
            SeedRecord {
                country: "Japan".to_string(),
                capital: "Tokyo".to_string(),
                lat: 35.6895,
                lon: 139.6917,
            },
        ]
    }

    async fn test_state(name: &str) -> AppStateArc {
        let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
        let db = DbPool::new(&url).await.expect("open");
        let store = CapitalStore::new(db);
        store.initialize(&sample_seed()).await.expect("seed");

        Arc::new(AppState {
            quiz: Quiz::new(store),
            metrics: Metrics::new().expect("metrics"),
        })
    }

    #[tokio::test]
    async fn question_loop_runs_to_game_over() {
        let state = test_state("api_question_loop").await;
        let mut asked: Vec<String> = Vec::new();

        for _ in 0..2 {
            let Json(response) = next_question(
                State(state.clone()),
                Json(QuestionRequest {
                    asked: asked.clone(),
                }),
            )
            .await
            .unwrap();

            match response {
                QuestionResponse::Question { country } => {
                    assert!(!asked.contains(&country), "a country was repeated");
                    asked.push(country);
                }
                QuestionResponse::GameOver { .. } => panic!("exhausted too early"),
            }
        }

        let Json(response) = next_question(
            State(state.clone()),
            Json(QuestionRequest {
                asked: asked.clone(),
            }),
        )
        .await
        .unwrap();
        assert!(matches!(
            response,
            QuestionResponse::GameOver {
                game_over: true,
                ..
            }
        ));

        let distinct: HashSet<String> = asked.into_iter().collect();
        assert_eq!(distinct.len(), 2);
    }

    #[tokio::test]
    async fn correct_answer_reports_location() {
        let state = test_state("api_correct_answer").await;

        let Json(response) = check_answer(
            State(state),
            Json(CheckAnswerRequest {
                answer: "paris".to_string(),
                country: "France".to_string(),
            }),
        )
        .await
        .unwrap();

        assert!(response.correct);
        assert!(response.message.contains("Paris"));
        assert_eq!(response.location.capital, "Paris");
        assert!((response.location.lat - 48.8566).abs() < 1e-9);
    }

    #[tokio::test]
    async fn wrong_answer_is_reported_with_the_capital() {
        let state = test_state("api_wrong_answer").await;

        let Json(response) = check_answer(
            State(state),
            Json(CheckAnswerRequest {
                answer: "Lyon".to_string(),
                country: "France".to_string(),
            }),
        )
        .await
        .unwrap();

        assert!(!response.correct);
        assert!(response.message.contains("Paris"));
    }

    #[tokio::test]
    async fn unknown_country_maps_to_not_found() {
        let state = test_state("api_unknown_country").await;

        let (status, Json(body)) = check_answer(
            State(state),
            Json(CheckAnswerRequest {
                answer: "Nowhere".to_string(),
                country: "Atlantis".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Question not found");
    }

    #[test]
    fn question_responses_serialize_to_the_wire_contract() {
        let question = QuestionResponse::Question {
            country: "France".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&question).unwrap(),
            serde_json::json!({"country": "France"})
        );

        let over = QuestionResponse::GameOver {
            game_over: true,
            message: "done".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&over).unwrap(),
            serde_json::json!({"game_over": true, "message": "done"})
        );
    }

    #[test]
    fn question_request_tolerates_a_missing_asked_list() {
        let req: QuestionRequest = serde_json::from_str("{}").unwrap();
        assert!(req.asked.is_empty());
    }
}
