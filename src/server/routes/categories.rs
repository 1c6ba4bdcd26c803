use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{get_category, get_category_map},
            questions::{count_questions, get_questions_for_category},
        },
        Category, Question,
    },
    pagination::{paginate, PageQuery, QUESTIONS_PER_PAGE},
    server::{
        app::AppState,
        error::ApiError,
        extract::{ApiPath, ApiQuery},
    },
};

use super::ApiResponse;

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CategoryQuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: Category,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesResponse> {
    Ok(Json(CategoriesResponse {
        success: true,
        categories: get_category_map(&pool).await?,
    }))
}

async fn category_questions(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
) -> ApiResponse<CategoryQuestionsResponse> {
    let current_category = get_category(&pool, id).await?.ok_or(ApiError::NotFound)?;
    let questions = get_questions_for_category(&pool, id).await?;
    Ok(Json(CategoryQuestionsResponse {
        success: true,
        questions: paginate(questions, page, QUESTIONS_PER_PAGE),
        total_questions: count_questions(&pool).await?,
        current_category,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(category_questions))
        .with_state(state)
}
