//! Drawing the next quiz question.
//!
//! A round is described by the category being played and the questions the
//! player has already seen. The candidate pool is every question of that
//! category (or of all categories for id `0`) minus the seen ones, and one of
//! them is chosen uniformly at random.

use rand::Rng;
use serde::{de, Deserialize, Deserializer};
use sqlx::SqlitePool;

use crate::db::{
    queries::{categories::category_exists, questions::get_unseen_questions},
    Question,
};

/// Category id the frontend sends for "all categories".
pub const ANY_CATEGORY: i64 = 0;

#[derive(Deserialize, Debug, Default)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Option<Vec<i64>>,
    #[serde(default)]
    pub quiz_category: Option<QuizCategory>,
}

#[derive(Deserialize, Debug, Default)]
pub struct QuizCategory {
    #[serde(default, deserialize_with = "deserialize_category_id")]
    pub id: Option<i64>,
}

// the frontend sends the id as a number, a float or a string
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseId {
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_category_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseId>::deserialize(deserializer)?;
    value
        .map(|id| match id {
            LooseId::Int(id) => Ok(id),
            LooseId::Float(id)
                if id.fract() == 0.0 && id >= i64::MIN as f64 && id < i64::MAX as f64 =>
            {
                Ok(id as i64)
            }
            LooseId::Float(id) => Err(de::Error::custom(format!(
                "category id {id} is not an integer"
            ))),
            LooseId::Text(id) => id
                .trim()
                .parse::<i64>()
                .map_err(|_| de::Error::custom(format!("category id {id:?} is not an integer"))),
        })
        .transpose()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Any,
    Only(i64),
}

impl From<i64> for CategoryFilter {
    fn from(id: i64) -> Self {
        if id == ANY_CATEGORY {
            CategoryFilter::Any
        } else {
            CategoryFilter::Only(id)
        }
    }
}

impl CategoryFilter {
    fn category(self) -> Option<i64> {
        match self {
            CategoryFilter::Any => None,
            CategoryFilter::Only(id) => Some(id),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum QuizError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("category {0} does not exist")]
    InvalidCategory(i64),
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

/// A validated round: which category to draw from and which ids to skip.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub filter: CategoryFilter,
    pub previous_questions: Vec<i64>,
}

impl TryFrom<QuizRequest> for Round {
    type Error = QuizError;

    fn try_from(request: QuizRequest) -> Result<Self, Self::Error> {
        let category_id = request
            .quiz_category
            .ok_or(QuizError::MissingField("quiz_category"))?
            .id
            .ok_or(QuizError::MissingField("quiz_category.id"))?;
        let previous_questions = request
            .previous_questions
            .ok_or(QuizError::MissingField("previous_questions"))?;
        Ok(Round {
            filter: category_id.into(),
            previous_questions,
        })
    }
}

/// Picks one element of `candidates` uniformly at random.
pub fn pick_question<R: Rng + ?Sized>(mut candidates: Vec<Question>, rng: &mut R) -> Option<Question> {
    if candidates.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..candidates.len());
    Some(candidates.swap_remove(index))
}

/// Loads the candidate pool for `round`, rejecting unknown categories.
pub async fn candidate_pool(pool: &SqlitePool, round: &Round) -> Result<Vec<Question>, QuizError> {
    if let CategoryFilter::Only(id) = round.filter {
        if !category_exists(pool, id).await? {
            return Err(QuizError::InvalidCategory(id));
        }
    }
    Ok(get_unseen_questions(pool, round.filter.category(), &round.previous_questions).await?)
}

pub async fn next_question(pool: &SqlitePool, round: &Round) -> Result<Option<Question>, QuizError> {
    let candidates = candidate_pool(pool, round).await?;
    tracing::debug!(
        filter = ?round.filter,
        seen = round.previous_questions.len(),
        candidates = candidates.len(),
        "Drawing quiz question"
    );
    Ok(pick_question(candidates, &mut rand::thread_rng()))
}
