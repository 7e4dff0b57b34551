use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Serialize;

use crate::error::StoreError;

/// Uniform HTTP envelopes. Every handler funnels its outcome through
/// here so the success/not-found/error shapes cannot drift per route.

fn json_response(status: StatusCode, body: String) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(body.into())
        .map_err(Box::new)?)
}

pub fn ok_data<T: Serialize>(data: &T) -> Result<Response<Body>, Error> {
    json_response(
        StatusCode::OK,
        serde_json::json!({ "data": data }).to_string(),
    )
}

pub fn ok_message(message: &str) -> Result<Response<Body>, Error> {
    json_response(
        StatusCode::OK,
        serde_json::json!({ "message": message }).to_string(),
    )
}

pub fn created(message: &str) -> Result<Response<Body>, Error> {
    json_response(
        StatusCode::CREATED,
        serde_json::json!({ "message": message }).to_string(),
    )
}

pub fn bad_request(message: &str) -> Result<Response<Body>, Error> {
    json_response(
        StatusCode::BAD_REQUEST,
        serde_json::json!({ "message": message }).to_string(),
    )
}

pub fn not_found(message: &str) -> Result<Response<Body>, Error> {
    json_response(
        StatusCode::NOT_FOUND,
        serde_json::json!({ "message": message }).to_string(),
    )
}

/// An empty result set is a 404, never a 200 with an empty list.
pub fn items_or_not_found<T: Serialize>(
    items: &[T],
    empty_message: &str,
) -> Result<Response<Body>, Error> {
    if items.is_empty() {
        not_found(empty_message)
    } else {
        ok_data(&items)
    }
}

/// Same policy for single-item lookups: first match or 404.
pub fn first_or_not_found<T: Serialize>(
    items: Vec<T>,
    empty_message: &str,
) -> Result<Response<Body>, Error> {
    match items.into_iter().next() {
        Some(item) => ok_data(&item),
        None => not_found(empty_message),
    }
}

pub fn store_error(err: StoreError) -> Result<Response<Body>, Error> {
    tracing::error!("store error: {}", err);
    let body = match &err {
        // keep the raw detail for diagnostics, never a stack trace
        StoreError::Unexpected(detail) => serde_json::json!({
            "message": "Internal server error",
            "error": detail,
        }),
        other => serde_json::json!({ "message": other.message() }),
    };
    json_response(err.status(), body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Review;

    fn sample_review() -> Review {
        Review {
            movie_id: 1,
            reviewer_name: "alice".to_string(),
            review_date: "2021-05-01".to_string(),
            rating: 8,
            content: "Great pacing.".to_string(),
        }
    }

    fn body_json(resp: &Response<Body>) -> serde_json::Value {
        match resp.body() {
            Body::Text(text) => serde_json::from_str(text).unwrap(),
            other => panic!("expected text body, got {other:?}"),
        }
    }

    #[test]
    fn non_empty_result_is_200_with_data() {
        let resp = items_or_not_found(&[sample_review()], "none").unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/json"
        );

        let json = body_json(&resp);
        assert_eq!(json["data"][0]["reviewerName"], "alice");
        assert_eq!(json["data"][0]["rating"], 8);
    }

    #[test]
    fn empty_result_is_404_not_empty_200() {
        let resp = items_or_not_found::<Review>(&[], "No reviews found").unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(&resp)["message"], "No reviews found");
    }

    #[test]
    fn single_lookup_takes_first_item() {
        let resp = first_or_not_found(vec![sample_review()], "none").unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(&resp)["data"]["reviewerName"], "alice");

        let resp = first_or_not_found::<Review>(vec![], "No review found").unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn rate_limit_surfaces_as_429() {
        let resp = store_error(StoreError::RateLimit("throttled".to_string())).unwrap();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body_json(&resp)["message"], "throttled");
    }

    #[test]
    fn unexpected_error_keeps_detail() {
        let resp = store_error(StoreError::Unexpected("socket closed".to_string())).unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(&resp);
        assert_eq!(json["message"], "Internal server error");
        assert_eq!(json["error"], "socket closed");
    }

    #[test]
    fn conflict_and_upstream_missing_statuses() {
        let resp = store_error(StoreError::Conflict("condition".to_string())).unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = store_error(StoreError::UpstreamMissing("no table".to_string())).unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
