use cinefile_shared::{movies, response, reviews, translation, AppState};
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, RequestExt, Response,
};
use std::sync::Arc;

/// Main Lambda handler. Parses the path once, routes on
/// (method, segments), and leaves all store interaction to the shared
/// operations. Auth-gated routes trust the gateway authorizer that ran
/// before this handler was invoked.
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method().clone();
    let path = event.uri().path().to_string();
    tracing::info!("API invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == Method::OPTIONS {
        return Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET,POST,PUT,OPTIONS,DELETE")
            .header("Access-Control-Allow-Headers", "Content-Type,Authorization")
            .body(Body::Empty)
            .map_err(Box::new)?);
    }

    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let body = event.body();

    match (&method, parts.as_slice()) {
        // --- MOVIES ---
        (&Method::GET, ["movies"]) => movies::handle_list_movies(&state.store).await,
        (&Method::POST, ["movies"]) => movies::handle_create_movie(&state.store, body).await,
        (&Method::GET, ["movies", "cast"]) => {
            movies::handle_list_cast_members(&state.store).await
        }
        (&Method::POST, ["movies", "reviews"]) => {
            reviews::handle_add_review(&state.store, body).await
        }
        (&Method::GET, ["movies", movie_id]) => {
            let Some(movie_id) = parse_movie_id(movie_id) else {
                return response::bad_request("Missing or invalid movieId");
            };
            let include_cast = event
                .query_string_parameters_ref()
                .and_then(|params| params.first("cast"))
                .map(|v| v == "true")
                .unwrap_or(false);
            movies::handle_get_movie(&state.store, movie_id, include_cast).await
        }
        (&Method::DELETE, ["movies", movie_id]) => {
            let Some(movie_id) = parse_movie_id(movie_id) else {
                return response::bad_request("Missing or invalid movieId");
            };
            movies::handle_delete_movie(&state.store, movie_id).await
        }

        // --- REVIEWS ---
        (&Method::GET, ["movies", movie_id, "reviews"]) => {
            let Some(movie_id) = parse_movie_id(movie_id) else {
                return response::bad_request("Missing or invalid movieId");
            };
            let min_rating = event
                .query_string_parameters_ref()
                .and_then(|params| params.first("minRating"));
            let max_rating = event
                .query_string_parameters_ref()
                .and_then(|params| params.first("maxRating"));
            reviews::handle_reviews_for_movie(&state.store, movie_id, min_rating, max_rating)
                .await
        }
        // {queryParam} is a year or a reviewer name; the resolver decides
        (&Method::GET, ["movies", movie_id, "reviews", query_param]) => {
            let Some(movie_id) = parse_movie_id(movie_id) else {
                return response::bad_request("Missing or invalid movieId");
            };
            reviews::handle_reviews_query(&state.store, movie_id, query_param).await
        }
        (&Method::PUT, ["movies", movie_id, "reviews", reviewer_name]) => {
            let Some(movie_id) = parse_movie_id(movie_id) else {
                return response::bad_request("Missing or invalid movieId");
            };
            reviews::handle_update_review(&state.store, movie_id, reviewer_name, body).await
        }
        (&Method::GET, ["reviews", reviewer_name]) => {
            reviews::handle_reviews_by_reviewer(&state.store, reviewer_name).await
        }
        (&Method::GET, ["reviews", reviewer_name, movie_id, "translation"]) => {
            let Some(movie_id) = parse_movie_id(movie_id) else {
                return response::bad_request("Missing or invalid movieId");
            };
            let language = event
                .query_string_parameters_ref()
                .and_then(|params| params.first("language"));
            translation::handle_review_translation(
                &state.store,
                &state.translate_client,
                reviewer_name,
                movie_id,
                language,
            )
            .await
        }

        _ => {
            tracing::warn!("No route matched - Method: {} Path: {}", method, path);
            response::not_found("Not found")
        }
    }
}

fn parse_movie_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_id_must_be_a_positive_integer() {
        assert_eq!(parse_movie_id("1"), Some(1));
        assert_eq!(parse_movie_id("1234"), Some(1234));
        assert_eq!(parse_movie_id("0"), None);
        assert_eq!(parse_movie_id("-3"), None);
        assert_eq!(parse_movie_id("abc"), None);
        assert_eq!(parse_movie_id("1.5"), None);
    }
}
