use anyhow::Result;
use async_trait::async_trait;

use crate::types::*;

/// Anything that can play the oracle's side of the `/select`, `/explore`,
/// `/guess` protocol: the real HTTP client, or a local `Simulator` used in
/// tests.
///
/// `explore` takes `&mut self` because a real session has to track how many
/// doorways it has spent; a stateless implementation is free to ignore that.
#[async_trait]
pub trait AedificiumClient {
    async fn select(&self, problem_name: String) -> Result<SelectResponse>;
    async fn explore(&mut self, plans: Vec<String>) -> Result<ExploreResponse>;
    async fn guess(&self, data: Map) -> Result<GuessResponse>;
}
