//! Product review route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use marketstall_core::{ProductId, Rating};

use crate::db::{ProductRepository, ReviewRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Review;
use crate::state::AppState;

/// Longest accepted review comment, in characters.
const MAX_COMMENT_CHARS: usize = 4000;

/// Build the reviews router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/products/{id}/reviews", get(index).post(create))
}

/// Review submission.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}

impl ReviewRequest {
    /// Validate the rating and comment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an out-of-range rating or an
    /// overlong comment.
    pub fn validate(&self) -> Result<(Rating, &str)> {
        let rating = Rating::new(self.rating).map_err(|e| AppError::BadRequest(e.to_string()))?;
        let comment = self.comment.trim();
        if comment.chars().count() > MAX_COMMENT_CHARS {
            return Err(AppError::BadRequest(format!(
                "comment must be at most {MAX_COMMENT_CHARS} characters"
            )));
        }
        Ok((rating, comment))
    }
}

/// Reviews for an active product, newest first.
///
/// # Errors
///
/// Returns 404 if the product is missing or inactive.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Review>>> {
    let id = ProductId::new(id);
    ProductRepository::new(state.pool())
        .get_active(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let reviews = ReviewRepository::new(state.pool())
        .list_for_product(id)
        .await?;
    Ok(Json(reviews))
}

/// Post a review for an active product.
///
/// # Errors
///
/// Returns 400 for invalid input, 404 for a missing product and 409 if the
/// customer already reviewed it.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Json(body): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<Review>)> {
    let (rating, comment) = body.validate()?;
    let id = ProductId::new(id);

    ProductRepository::new(state.pool())
        .get_active(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let review = ReviewRepository::new(state.pool())
        .create(id, user.id, rating, comment)
        .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let ok = ReviewRequest {
            rating: 5,
            comment: " lovely ".to_string(),
        };
        let (rating, comment) = ok.validate().unwrap();
        assert_eq!(rating.stars(), 5);
        assert_eq!(comment, "lovely");

        for bad in [0, 6, -1] {
            let req = ReviewRequest {
                rating: bad,
                comment: String::new(),
            };
            assert!(matches!(req.validate(), Err(AppError::BadRequest(_))));
        }
    }

    #[test]
    fn test_overlong_comment() {
        let req = ReviewRequest {
            rating: 3,
            comment: "x".repeat(MAX_COMMENT_CHARS + 1),
        };
        assert!(matches!(req.validate(), Err(AppError::BadRequest(_))));
    }
}
