use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{category_exists, get_category_map},
            questions::{self, count_questions, get_all_questions, get_question_by_id},
        },
        Category, NewQuestion, Question,
    },
    pagination::{paginate, PageQuery, QUESTIONS_PER_PAGE},
    server::{
        app::AppState,
        error::ApiError,
        extract::{ApiJson, ApiPath, ApiQuery},
    },
    telemetry::QUESTIONS_CREATED_CNTR,
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuestionsBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    categories: BTreeMap<i64, String>,
    current_category: Option<Category>,
}

#[derive(Serialize)]
struct SingleQuestion {
    success: bool,
    question: Question,
    total_questions: i64,
}

#[derive(Serialize)]
struct DeletedQuestion {
    success: bool,
    deleted_question_id: i64,
    total_questions: i64,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: Option<Category>,
}

#[derive(Serialize)]
struct CreatedQuestion {
    success: bool,
    created: i64,
    total_questions: i64,
}

#[derive(Serialize)]
#[serde(untagged)]
enum PostQuestionsResponse {
    Search(SearchResults),
    Created(CreatedQuestion),
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let questions = get_all_questions(&pool).await?;
    Ok(Json(QuestionsPage {
        success: true,
        total_questions: count_questions(&pool).await?,
        questions: paginate(questions, page, QUESTIONS_PER_PAGE),
        categories: get_category_map(&pool).await?,
        current_category: None,
    }))
}

async fn get_question(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<SingleQuestion> {
    let question = get_question_by_id(&pool, id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(SingleQuestion {
        success: true,
        question,
        total_questions: count_questions(&pool).await?,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<DeletedQuestion> {
    if !questions::delete_question(&pool, id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(id, "Deleted question");
    Ok(Json(DeletedQuestion {
        success: true,
        deleted_question_id: id,
        total_questions: count_questions(&pool).await?,
    }))
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::MissingField(field)),
    }
}

async fn search(pool: &SqlitePool, term: &str, page: i64) -> Result<SearchResults, ApiError> {
    let found = questions::search_questions(pool, term).await?;
    tracing::debug!(term, found = found.len(), "Searched questions");
    Ok(SearchResults {
        success: true,
        questions: paginate(found, page, QUESTIONS_PER_PAGE),
        total_questions: count_questions(pool).await?,
        current_category: None,
    })
}

async fn create(pool: &SqlitePool, body: &QuestionsBody) -> Result<CreatedQuestion, ApiError> {
    let new_question = NewQuestion {
        question: required(&body.question, "question")?,
        answer: required(&body.answer, "answer")?,
        category: body.category.ok_or(ApiError::MissingField("category"))?,
        difficulty: body.difficulty.ok_or(ApiError::MissingField("difficulty"))?,
    };
    if !category_exists(pool, new_question.category).await? {
        return Err(ApiError::InvalidCategory(new_question.category));
    }
    let id = questions::create_question(pool, new_question).await?;
    QUESTIONS_CREATED_CNTR.inc();
    tracing::info!(id, "Created question");
    Ok(CreatedQuestion {
        success: true,
        created: id,
        total_questions: count_questions(pool).await?,
    })
}

async fn post_questions(
    State(pool): State<SqlitePool>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
    ApiJson(body): ApiJson<QuestionsBody>,
) -> ApiResponse<PostQuestionsResponse> {
    let response = match body.search_term.as_deref() {
        Some(term) => PostQuestionsResponse::Search(search(&pool, term, page).await?),
        None => PostQuestionsResponse::Created(create(&pool, &body).await?),
    };
    Ok(Json(response))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(post_questions))
        .route("/questions/{id}", get(get_question).delete(delete_question))
        .with_state(state)
}
