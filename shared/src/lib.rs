pub mod types;
pub mod error;
pub mod store;
pub mod resolver;
pub mod reviews;
pub mod movies;
pub mod translation;
pub mod response;

use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_translate::Client as TranslateClient;
use std::sync::Arc;

use store::{Store, TableNames};

/// Shared application state, built once per execution context and
/// cloned into each invocation. No process-wide singletons: everything
/// below the router takes `&Store`.
pub struct AppState {
    pub store: Store,
    pub translate_client: TranslateClient,
}

impl AppState {
    pub fn new(
        dynamo_client: DynamoClient,
        translate_client: TranslateClient,
        tables: TableNames,
    ) -> Arc<Self> {
        Arc::new(Self {
            store: Store::new(dynamo_client, tables),
            translate_client,
        })
    }
}
