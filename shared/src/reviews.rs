use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::NaiveDate;
use lambda_http::{Body, Error, Response};

use crate::error::StoreError;
use crate::resolver::{self, ReviewQuery};
use crate::response;
use crate::store::{self, Item, QueryRequest, Store, REVIEWER_INDEX};
use crate::types::{Review, UpdateReviewRequest};

const REVIEW_NOT_FOUND: &str = "No review found for this movie by the specified reviewer";

// ---- access operations ----

/// Exact lookup via the ReviewerIndex. The composite key guarantees at
/// most one review per (movieId, reviewerName).
pub async fn get_review_by_reviewer(
    store: &Store,
    movie_id: i64,
    reviewer_name: &str,
) -> Result<Vec<Review>, StoreError> {
    let items = store
        .query(
            &store.tables.reviews,
            QueryRequest {
                index: Some(REVIEWER_INDEX),
                key_condition: "movieId = :movieId AND reviewerName = :reviewerName",
                values: HashMap::from([
                    (
                        ":movieId".to_string(),
                        AttributeValue::N(movie_id.to_string()),
                    ),
                    (
                        ":reviewerName".to_string(),
                        AttributeValue::S(reviewer_name.to_string()),
                    ),
                ]),
            },
        )
        .await?;
    Ok(collect_reviews(&items))
}

/// All reviews in the movie's partition, every sort-key value.
pub async fn list_reviews_for_movie(
    store: &Store,
    movie_id: i64,
) -> Result<Vec<Review>, StoreError> {
    let items = store
        .query(
            &store.tables.reviews,
            QueryRequest {
                index: None,
                key_condition: "movieId = :movieId",
                values: HashMap::from([(
                    ":movieId".to_string(),
                    AttributeValue::N(movie_id.to_string()),
                )]),
            },
        )
        .await?;
    Ok(collect_reviews(&items))
}

/// Partition query plus an in-memory rating predicate. The rating is
/// not indexed, so the filter applies to retrieved items only.
pub async fn list_reviews_for_movie_filtered(
    store: &Store,
    movie_id: i64,
    min_rating: Option<i32>,
    max_rating: Option<i32>,
) -> Result<Vec<Review>, StoreError> {
    let mut reviews = list_reviews_for_movie(store, movie_id).await?;
    reviews.retain(|r| rating_within(r.rating, min_rating, max_rating));
    Ok(reviews)
}

/// Sort-key range query: reviewDate BETWEEN the year's first and last
/// day (lexical comparison over zero-padded ISO dates).
pub async fn list_reviews_for_movie_by_year(
    store: &Store,
    movie_id: i64,
    year: &str,
) -> Result<Vec<Review>, StoreError> {
    let (start_of_year, end_of_year) = resolver::year_bounds(year);
    let items = store
        .query(
            &store.tables.reviews,
            QueryRequest {
                index: None,
                key_condition:
                    "movieId = :movieId AND reviewDate BETWEEN :startOfYear AND :endOfYear",
                values: HashMap::from([
                    (
                        ":movieId".to_string(),
                        AttributeValue::N(movie_id.to_string()),
                    ),
                    (":startOfYear".to_string(), AttributeValue::S(start_of_year)),
                    (":endOfYear".to_string(), AttributeValue::S(end_of_year)),
                ]),
            },
        )
        .await?;
    Ok(collect_reviews(&items))
}

/// Cross-movie lookup has no partition key, so this is the scan
/// fallback with a filter expression. Documented cost, not an index
/// hit.
pub async fn list_reviews_by_reviewer(
    store: &Store,
    reviewer_name: &str,
) -> Result<Vec<Review>, StoreError> {
    let items = store
        .scan_filtered(
            &store.tables.reviews,
            "reviewerName = :reviewerName",
            HashMap::from([(
                ":reviewerName".to_string(),
                AttributeValue::S(reviewer_name.to_string()),
            )]),
        )
        .await?;
    Ok(collect_reviews(&items))
}

/// Idempotent upsert keyed by (movieId, reviewerName): a put for an
/// existing pair overwrites silently.
pub async fn add_review(store: &Store, review: &Review) -> Result<(), StoreError> {
    store
        .put(&store.tables.reviews, store::review_to_item(review))
        .await
}

/// Update content and/or rating in place. The write is conditional on
/// the record existing, so a missing key comes back NotFound instead
/// of silently creating a review.
pub async fn update_review(
    store: &Store,
    movie_id: i64,
    reviewer_name: &str,
    req: &UpdateReviewRequest,
) -> Result<(), StoreError> {
    // The table key is (movieId, reviewDate); resolve the sort key
    // through the index first.
    let current = get_review_by_reviewer(store, movie_id, reviewer_name)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::NotFound(REVIEW_NOT_FOUND.to_string()))?;

    let (update_expression, expr_names, expr_values) = build_review_update(req);

    store
        .update(
            &store.tables.reviews,
            store::review_key(movie_id, &current.review_date),
            update_expression,
            Some("attribute_exists(movieId)"),
            expr_names,
            expr_values,
        )
        .await
        .map_err(vanished_to_not_found)
}

/// Only content and rating are mutable; the key attributes and
/// reviewDate never appear in the update expression.
fn build_review_update(
    req: &UpdateReviewRequest,
) -> (String, HashMap<String, String>, Item) {
    let mut update_expr = vec![];
    let mut expr_names = HashMap::new();
    let mut expr_values: Item = HashMap::new();

    if let Some(content) = &req.content {
        update_expr.push("#content = :content");
        expr_names.insert("#content".to_string(), "content".to_string());
        expr_values.insert(":content".to_string(), AttributeValue::S(content.clone()));
    }

    if let Some(rating) = req.rating {
        update_expr.push("#rating = :rating");
        expr_names.insert("#rating".to_string(), "rating".to_string());
        expr_values.insert(":rating".to_string(), AttributeValue::N(rating.to_string()));
    }

    (
        format!("SET {}", update_expr.join(", ")),
        expr_names,
        expr_values,
    )
}

/// The update is conditional on the record still existing; a
/// conditional-check failure means the key vanished between lookup and
/// write, so the caller sees NotFound rather than a silent create.
/// Everything else (throttling included) passes through unchanged.
fn vanished_to_not_found(err: StoreError) -> StoreError {
    match err {
        StoreError::Conflict(_) => StoreError::NotFound(REVIEW_NOT_FOUND.to_string()),
        other => other,
    }
}

fn collect_reviews(items: &[Item]) -> Vec<Review> {
    items
        .iter()
        .filter_map(|item| {
            let review = store::review_from_item(item);
            if review.is_none() {
                tracing::warn!("skipping review item with missing key attributes");
            }
            review
        })
        .collect()
}

// ---- validation ----

pub(crate) fn rating_within(rating: i32, min: Option<i32>, max: Option<i32>) -> bool {
    min.map_or(true, |m| rating >= m) && max.map_or(true, |m| rating <= m)
}

fn validate_review(review: &Review) -> Result<(), String> {
    if review.movie_id < 1 {
        return Err("movieId must be a positive integer".to_string());
    }
    if review.reviewer_name.trim().is_empty() {
        return Err("reviewerName must not be empty".to_string());
    }
    if !(1..=10).contains(&review.rating) {
        return Err("rating must be between 1 and 10".to_string());
    }
    if NaiveDate::parse_from_str(&review.review_date, "%Y-%m-%d").is_err() {
        return Err("reviewDate must be an ISO date (YYYY-MM-DD)".to_string());
    }
    Ok(())
}

fn validate_update(req: &UpdateReviewRequest) -> Result<(), String> {
    if req.content.is_none() && req.rating.is_none() {
        return Err("at least one of content or rating is required".to_string());
    }
    if let Some(content) = &req.content {
        if content.trim().is_empty() {
            return Err("content must not be empty".to_string());
        }
    }
    if let Some(rating) = req.rating {
        if !(1..=10).contains(&rating) {
            return Err("rating must be between 1 and 10".to_string());
        }
    }
    Ok(())
}

/// The PUT route's final segment is as ambiguous as the GET route's;
/// classify it the same way and reject a year, which is not an
/// updatable key.
fn reviewer_segment(segment: &str) -> Result<String, String> {
    match resolver::classify(segment) {
        ReviewQuery::Year(_) => Err("reviewerName must not be a year".to_string()),
        ReviewQuery::Reviewer(name) => Ok(name),
    }
}

fn parse_rating(raw: Option<&str>, name: &str) -> Result<Option<i32>, String> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .parse::<i32>()
            .map(Some)
            .map_err(|_| format!("{name} must be a number")),
    }
}

// ---- handlers ----

/// POST /movies/reviews
pub async fn handle_add_review(store: &Store, body: &[u8]) -> Result<Response<Body>, Error> {
    let review: Review = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!("invalid review body: {}", err);
            return response::bad_request("Missing or invalid request body");
        }
    };

    if let Err(reason) = validate_review(&review) {
        return response::bad_request(&reason);
    }

    match add_review(store, &review).await {
        Ok(()) => response::created("Review added"),
        Err(err) => response::store_error(err),
    }
}

/// GET /movies/{movieId}/reviews[?minRating=..&maxRating=..]
pub async fn handle_reviews_for_movie(
    store: &Store,
    movie_id: i64,
    min_rating: Option<&str>,
    max_rating: Option<&str>,
) -> Result<Response<Body>, Error> {
    let min = match parse_rating(min_rating, "minRating") {
        Ok(v) => v,
        Err(reason) => return response::bad_request(&reason),
    };
    let max = match parse_rating(max_rating, "maxRating") {
        Ok(v) => v,
        Err(reason) => return response::bad_request(&reason),
    };

    let result = if min.is_none() && max.is_none() {
        list_reviews_for_movie(store, movie_id).await
    } else {
        list_reviews_for_movie_filtered(store, movie_id, min, max).await
    };

    match result {
        Ok(reviews) => response::items_or_not_found(&reviews, "No reviews found for this movie"),
        Err(err) => response::store_error(err),
    }
}

/// GET /movies/{movieId}/reviews/{queryParam} — the ambiguous route.
/// The resolver decides year vs reviewer; nothing here re-implements
/// that choice.
pub async fn handle_reviews_query(
    store: &Store,
    movie_id: i64,
    third_param: &str,
) -> Result<Response<Body>, Error> {
    match resolver::classify(third_param) {
        ReviewQuery::Year(year) => {
            match list_reviews_for_movie_by_year(store, movie_id, &year).await {
                Ok(reviews) => response::items_or_not_found(
                    &reviews,
                    "No reviews found for this movie in the specified year",
                ),
                Err(err) => response::store_error(err),
            }
        }
        ReviewQuery::Reviewer(reviewer_name) => {
            match get_review_by_reviewer(store, movie_id, &reviewer_name).await {
                Ok(reviews) => response::first_or_not_found(
                    reviews,
                    "No review found for this movie by the specified reviewer",
                ),
                Err(err) => response::store_error(err),
            }
        }
    }
}

/// PUT /movies/{movieId}/reviews/{reviewerName}
pub async fn handle_update_review(
    store: &Store,
    movie_id: i64,
    reviewer_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let reviewer_name = match reviewer_segment(reviewer_name) {
        Ok(name) => name,
        Err(reason) => return response::bad_request(&reason),
    };

    let req: UpdateReviewRequest = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!("invalid update body: {}", err);
            return response::bad_request("Missing or invalid parameters");
        }
    };

    if let Err(reason) = validate_update(&req) {
        return response::bad_request(&reason);
    }

    match update_review(store, movie_id, &reviewer_name, &req).await {
        Ok(()) => response::ok_message("Review updated successfully"),
        Err(err) => response::store_error(err),
    }
}

/// GET /reviews/{reviewerName}
pub async fn handle_reviews_by_reviewer(
    store: &Store,
    reviewer_name: &str,
) -> Result<Response<Body>, Error> {
    match list_reviews_by_reviewer(store, reviewer_name).await {
        Ok(reviews) => {
            response::items_or_not_found(&reviews, "No reviews found for this reviewer")
        }
        Err(err) => response::store_error(err),
    }
}
