use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport seam under the upstream clients; lets middleware wrap `reqwest`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
