use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use lambda_http::{Body, Error, Response};

use crate::error::StoreError;
use crate::response;
use crate::store::{self, QueryRequest, Store};
use crate::types::{CastMember, Movie};

/// GET /movies
pub async fn handle_list_movies(store: &Store) -> Result<Response<Body>, Error> {
    match store.scan_all(&store.tables.movies).await {
        Ok(items) => {
            let movies: Vec<Movie> = items.iter().filter_map(store::movie_from_item).collect();
            response::items_or_not_found(&movies, "No movies found")
        }
        Err(err) => response::store_error(err),
    }
}

/// GET /movies/{movieId}[?cast=true]
pub async fn handle_get_movie(
    store: &Store,
    movie_id: i64,
    include_cast: bool,
) -> Result<Response<Body>, Error> {
    let item = match store.get(&store.tables.movies, store::movie_key(movie_id)).await {
        Ok(item) => item,
        Err(err) => return response::store_error(err),
    };

    let Some(movie) = item.as_ref().and_then(store::movie_from_item) else {
        return response::not_found("Invalid movie Id");
    };

    let mut data = serde_json::to_value(&movie)?;
    if include_cast {
        match list_cast_for_movie(store, movie_id).await {
            Ok(cast) => data["cast"] = serde_json::to_value(&cast)?,
            Err(err) => return response::store_error(err),
        }
    }

    response::ok_data(&data)
}

/// POST /movies
pub async fn handle_create_movie(store: &Store, body: &[u8]) -> Result<Response<Body>, Error> {
    let movie: Movie = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!("invalid movie body: {}", err);
            return response::bad_request("Missing or invalid request body");
        }
    };

    if movie.id < 1 {
        return response::bad_request("id must be a positive integer");
    }
    if movie.title.trim().is_empty() {
        return response::bad_request("title must not be empty");
    }

    match store
        .put(&store.tables.movies, store::movie_to_item(&movie))
        .await
    {
        Ok(()) => response::created("Movie added"),
        Err(err) => response::store_error(err),
    }
}

/// DELETE /movies/{movieId}
pub async fn handle_delete_movie(store: &Store, movie_id: i64) -> Result<Response<Body>, Error> {
    match store
        .delete(&store.tables.movies, store::movie_key(movie_id))
        .await
    {
        Ok(()) => response::ok_message("Movie deleted"),
        Err(err) => response::store_error(err),
    }
}

/// GET /movies/cast
pub async fn handle_list_cast_members(store: &Store) -> Result<Response<Body>, Error> {
    match store.scan_all(&store.tables.movie_cast).await {
        Ok(items) => {
            let cast: Vec<CastMember> = items.iter().filter_map(store::cast_from_item).collect();
            response::items_or_not_found(&cast, "No cast members found")
        }
        Err(err) => response::store_error(err),
    }
}

async fn list_cast_for_movie(store: &Store, movie_id: i64) -> Result<Vec<CastMember>, StoreError> {
    let items = store
        .query(
            &store.tables.movie_cast,
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
    Ok(items.iter().filter_map(store::cast_from_item).collect())
}
