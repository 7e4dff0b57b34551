use aws_sdk_translate::Client as TranslateClient;
use lambda_http::{Body, Error, Response};

use crate::error::StoreError;
use crate::response;
use crate::reviews;
use crate::store::Store;

/// GET /reviews/{reviewerName}/{movieId}/translation?language=code
///
/// Looks up the review through the reviewer index, then hands the
/// content to the translation collaborator. The response is the review
/// with its content replaced by the translation.
pub async fn handle_review_translation(
    store: &Store,
    translate_client: &TranslateClient,
    reviewer_name: &str,
    movie_id: i64,
    language: Option<&str>,
) -> Result<Response<Body>, Error> {
    let Some(language) = language.filter(|l| !l.is_empty()) else {
        return response::bad_request("Missing language query parameter");
    };

    let mut review = match reviews::get_review_by_reviewer(store, movie_id, reviewer_name).await {
        Ok(reviews) => match reviews.into_iter().next() {
            Some(review) => review,
            None => {
                return response::not_found(
                    "No review found for this movie by the specified reviewer",
                )
            }
        },
        Err(err) => return response::store_error(err),
    };

    let translated = translate_client
        .translate_text()
        .text(&review.content)
        .source_language_code("auto")
        .target_language_code(language)
        .send()
        .await;

    match translated {
        Ok(output) => {
            review.content = output.translated_text;
            response::ok_data(&review)
        }
        Err(err) => response::store_error(StoreError::from(err)),
    }
}
