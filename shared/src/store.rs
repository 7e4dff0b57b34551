use std::collections::HashMap;
use std::env;

use aws_sdk_dynamodb::{types::AttributeValue, Client as DynamoClient};

use crate::error::StoreError;
use crate::types::{CastMember, Movie, Review};

pub type Item = HashMap<String, AttributeValue>;

/// Global secondary index on the reviews table: movieId + reviewerName.
pub const REVIEWER_INDEX: &str = "ReviewerIndex";

#[derive(Debug, Clone)]
pub struct TableNames {
    pub movies: String,
    pub movie_cast: String,
    pub reviews: String,
}

impl TableNames {
    pub fn from_env() -> Self {
        Self {
            movies: env::var("MOVIES_TABLE_NAME").unwrap_or_else(|_| "movies".to_string()),
            movie_cast: env::var("MOVIE_CAST_TABLE_NAME")
                .unwrap_or_else(|_| "movie-cast".to_string()),
            reviews: env::var("REVIEWS_TABLE_NAME")
                .unwrap_or_else(|_| "movie-reviews".to_string()),
        }
    }
}

#[derive(Debug)]
pub struct QueryRequest {
    pub index: Option<&'static str>,
    pub key_condition: &'static str,
    pub values: Item,
}

/// Thin adapter over the DynamoDB client: typed call surface plus
/// attribute marshalling. No business logic lives here; access
/// operations decide which table, key condition, and filter to use.
pub struct Store {
    client: DynamoClient,
    pub tables: TableNames,
}

impl Store {
    pub fn new(client: DynamoClient, tables: TableNames) -> Self {
        Self { client, tables }
    }

    pub async fn get(&self, table: &str, key: Item) -> Result<Option<Item>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key))
            .send()
            .await?;
        Ok(result.item)
    }

    pub async fn query(&self, table: &str, req: QueryRequest) -> Result<Vec<Item>, StoreError> {
        let result = self
            .client
            .query()
            .table_name(table)
            .set_index_name(req.index.map(String::from))
            .key_condition_expression(req.key_condition)
            .set_expression_attribute_values(Some(req.values))
            .send()
            .await?;
        Ok(result.items.unwrap_or_default())
    }

    /// Full-table pass with a post-hoc filter. The most expensive
    /// access pattern; used only where no key-based path exists.
    pub async fn scan_filtered(
        &self,
        table: &str,
        filter: &str,
        values: Item,
    ) -> Result<Vec<Item>, StoreError> {
        let result = self
            .client
            .scan()
            .table_name(table)
            .filter_expression(filter)
            .set_expression_attribute_values(Some(values))
            .send()
            .await?;
        Ok(result.items.unwrap_or_default())
    }

    pub async fn scan_all(&self, table: &str) -> Result<Vec<Item>, StoreError> {
        let result = self.client.scan().table_name(table).send().await?;
        Ok(result.items.unwrap_or_default())
    }

    pub async fn put(&self, table: &str, item: Item) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await?;
        Ok(())
    }

    pub async fn update(
        &self,
        table: &str,
        key: Item,
        update_expression: String,
        condition: Option<&str>,
        names: HashMap<String, String>,
        values: Item,
    ) -> Result<(), StoreError> {
        self.client
            .update_item()
            .table_name(table)
            .set_key(Some(key))
            .update_expression(update_expression)
            .set_condition_expression(condition.map(String::from))
            .set_expression_attribute_names(if names.is_empty() { None } else { Some(names) })
            .set_expression_attribute_values(Some(values))
            .send()
            .await?;
        Ok(())
    }

    pub async fn delete(&self, table: &str, key: Item) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(key))
            .send()
            .await?;
        Ok(())
    }
}

// ---- attribute access ----

/// Typed accessors over a raw item. movieId and rating are numeric in
/// the store; the conversion to Rust integers happens here and nowhere
/// else.
pub trait AttributesExt {
    fn get_s(&self, key: &str) -> Option<String>;
    fn get_i64(&self, key: &str) -> Option<i64>;
    fn get_i32(&self, key: &str) -> Option<i32>;
    fn get_string_list(&self, key: &str) -> Vec<String>;
}

impl AttributesExt for Item {
    fn get_s(&self, key: &str) -> Option<String> {
        Some(self.get(key)?.as_s().ok()?.to_string())
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_n().ok()?.parse().ok()
    }

    fn get_i32(&self, key: &str) -> Option<i32> {
        self.get(key)?.as_n().ok()?.parse().ok()
    }

    fn get_string_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(|v| v.as_l().ok())
            .map(|list| {
                list.iter()
                    .filter_map(|v| v.as_s().ok().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ---- keys ----

pub fn movie_key(id: i64) -> Item {
    HashMap::from([("id".to_string(), AttributeValue::N(id.to_string()))])
}

pub fn review_key(movie_id: i64, review_date: &str) -> Item {
    HashMap::from([
        (
            "movieId".to_string(),
            AttributeValue::N(movie_id.to_string()),
        ),
        (
            "reviewDate".to_string(),
            AttributeValue::S(review_date.to_string()),
        ),
    ])
}

// ---- marshalling ----

pub fn movie_to_item(movie: &Movie) -> Item {
    HashMap::from([
        ("id".to_string(), AttributeValue::N(movie.id.to_string())),
        ("title".to_string(), AttributeValue::S(movie.title.clone())),
        (
            "releaseYear".to_string(),
            AttributeValue::N(movie.release_year.to_string()),
        ),
        (
            "genres".to_string(),
            AttributeValue::L(
                movie
                    .genres
                    .iter()
                    .map(|g| AttributeValue::S(g.clone()))
                    .collect(),
            ),
        ),
    ])
}

pub fn movie_from_item(item: &Item) -> Option<Movie> {
    Some(Movie {
        id: item.get_i64("id")?,
        title: item.get_s("title").unwrap_or_default(),
        release_year: item.get_i32("releaseYear").unwrap_or_default(),
        genres: item.get_string_list("genres"),
    })
}

pub fn review_to_item(review: &Review) -> Item {
    HashMap::from([
        (
            "movieId".to_string(),
            AttributeValue::N(review.movie_id.to_string()),
        ),
        (
            "reviewerName".to_string(),
            AttributeValue::S(review.reviewer_name.clone()),
        ),
        (
            "reviewDate".to_string(),
            AttributeValue::S(review.review_date.clone()),
        ),
        (
            "rating".to_string(),
            AttributeValue::N(review.rating.to_string()),
        ),
        (
            "content".to_string(),
            AttributeValue::S(review.content.clone()),
        ),
    ])
}

pub fn review_from_item(item: &Item) -> Option<Review> {
    Some(Review {
        movie_id: item.get_i64("movieId")?,
        reviewer_name: item.get_s("reviewerName")?,
        review_date: item.get_s("reviewDate").unwrap_or_default(),
        rating: item.get_i32("rating").unwrap_or_default(),
        content: item.get_s("content").unwrap_or_default(),
    })
}

pub fn cast_from_item(item: &Item) -> Option<CastMember> {
    Some(CastMember {
        movie_id: item.get_i64("movieId")?,
        actor_name: item.get_s("actorName")?,
        role_name: item.get_s("roleName").unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_review() -> Review {
        Review {
            movie_id: 1,
            reviewer_name: "alice".to_string(),
            review_date: "2021-05-01".to_string(),
            rating: 8,
            content: "Great pacing.".to_string(),
        }
    }

    #[test]
    fn attributevalue_get_s() {
        let mut item = Item::new();
        item.insert("title".to_owned(), AttributeValue::S("Dune".to_owned()));

        assert_eq!(item.get_s("title"), Some("Dune".to_owned()));
        assert_eq!(item.get_s("missing"), None);
    }

    #[test]
    fn attributevalue_get_i64_rejects_non_numeric() {
        let mut item = Item::new();
        item.insert("movieId".to_owned(), AttributeValue::S("1".to_owned()));

        // a string-typed id is a schema violation, not a number
        assert_eq!(item.get_i64("movieId"), None);

        item.insert("movieId".to_owned(), AttributeValue::N("1".to_owned()));
        assert_eq!(item.get_i64("movieId"), Some(1));
    }

    #[test]
    fn review_round_trips_through_item() {
        let review = sample_review();
        let item = review_to_item(&review);

        assert_eq!(
            item.get("movieId"),
            Some(&AttributeValue::N("1".to_string()))
        );
        assert_eq!(review_from_item(&item), Some(review));
    }

    #[test]
    fn review_without_id_is_rejected() {
        let mut item = review_to_item(&sample_review());
        item.remove("movieId");

        assert_eq!(review_from_item(&item), None);
    }

    #[test]
    fn movie_round_trips_through_item() {
        let movie = Movie {
            id: 42,
            title: "Arrival".to_string(),
            release_year: 2016,
            genres: vec!["sci-fi".to_string(), "drama".to_string()],
        };
        let item = movie_to_item(&movie);
        let back = movie_from_item(&item).unwrap();

        assert_eq!(back.id, 42);
        assert_eq!(back.title, "Arrival");
        assert_eq!(back.release_year, 2016);
        assert_eq!(back.genres, vec!["sci-fi", "drama"]);
    }

    #[test]
    fn review_key_is_typed() {
        let key = review_key(7, "2020-03-04");
        assert_eq!(key.get("movieId"), Some(&AttributeValue::N("7".to_string())));
        assert_eq!(
            key.get("reviewDate"),
            Some(&AttributeValue::S("2020-03-04".to_string()))
        );
    }
}
