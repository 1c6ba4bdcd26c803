use serde::{Deserialize, Deserializer};

pub const QUESTIONS_PER_PAGE: usize = 10;

/// `?page=` query parameter. Absent or non-numeric values fall back to the
/// first page instead of rejecting the request.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_lenient_page")]
    pub page: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: first_page() }
    }
}

fn first_page() -> i64 {
    1
}

fn deserialize_lenient_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or_else(first_page))
}

/// Returns the 1-based `page` of `items`, `per_page` items long. Pages past
/// the end (or below 1) are empty.
pub fn paginate<T>(items: Vec<T>, page: i64, per_page: usize) -> Vec<T> {
    if page < 1 {
        return Vec::new();
    }
    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(per_page))
        .unwrap_or(usize::MAX);
    items.into_iter().skip(start).take(per_page).collect()
}
