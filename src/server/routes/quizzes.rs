use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::Question,
    quiz::{next_question, CategoryFilter, QuizRequest, Round},
    server::{app::AppState, extract::ApiJson},
    telemetry::QUIZ_QUESTIONS_CNTR,
};

use super::ApiResponse;

#[derive(Serialize)]
struct QuizResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<Question>,
}

async fn play_quiz(
    State(pool): State<SqlitePool>,
    ApiJson(request): ApiJson<QuizRequest>,
) -> ApiResponse<QuizResponse> {
    let round = Round::try_from(request)?;
    let question = next_question(&pool, &round).await?;
    if question.is_some() {
        let label = match round.filter {
            CategoryFilter::Any => "all".to_owned(),
            CategoryFilter::Only(id) => id.to_string(),
        };
        QUIZ_QUESTIONS_CNTR.with_label_values(&[label.as_str()]).inc();
    }
    Ok(Json(QuizResponse {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
