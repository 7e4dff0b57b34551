use serde::{Deserialize, Serialize};

// ========== MOVIE ==========
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub release_year: i32,
    pub genres: Vec<String>,
}

// ========== CAST ==========
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub movie_id: i64,
    pub actor_name: String,
    pub role_name: String,
}

// ========== REVIEW ==========
/// One review per (movieId, reviewerName). reviewDate is the table sort
/// key and stays zero-padded ISO `YYYY-MM-DD` so lexical range queries
/// line up with calendar order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub movie_id: i64,
    pub reviewer_name: String,
    pub review_date: String,
    pub rating: i32,
    pub content: String,
}

/// Partial update: only content and rating are mutable after creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    pub content: Option<String>,
    pub rating: Option<i32>,
}
