use crate::traits::BoardGateway;
use async_trait::async_trait;
use kanban_core::{ApiConfig, KanbanError, KanbanResult};
use kanban_domain::{
    Board, BoardId, BoardPatch, ResolvedTaskMove, Section, SectionPatch, Task, TaskPatch,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

/// REST/JSON gateway talking to the board service.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &ApiConfig) -> KanbanResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(ref token) = config.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| KanbanError::Config(format!("invalid token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| KanbanError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!("{} {}", method, path);
        self.client.request(method, self.url(path))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> KanbanResult<T> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| KanbanError::Serialization(e.to_string()))
    }

    async fn send_empty(&self, request: RequestBuilder) -> KanbanResult<()> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        Ok(())
    }

    async fn put_empty<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> KanbanResult<()> {
        self.send_empty(self.request(Method::PUT, path).json(body))
            .await
    }
}

fn transport_error(e: reqwest::Error) -> KanbanError {
    if e.is_timeout() {
        KanbanError::Network(format!("request timed out: {}", e))
    } else if e.is_decode() {
        KanbanError::Serialization(e.to_string())
    } else {
        KanbanError::Network(e.to_string())
    }
}

fn status_error(status: StatusCode, body: &str) -> KanbanError {
    let message = if body.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("HTTP {}: {}", status.as_u16(), body)
    };
    if status == StatusCode::NOT_FOUND {
        KanbanError::NotFound(message)
    } else {
        KanbanError::Network(message)
    }
}

#[async_trait]
impl BoardGateway for HttpGateway {
    async fn get_all_boards(&self) -> KanbanResult<Vec<Board>> {
        self.send_json(self.request(Method::GET, "/boards")).await
    }

    async fn get_favourites(&self) -> KanbanResult<Vec<Board>> {
        self.send_json(self.request(Method::GET, "/boards/favourites"))
            .await
    }

    async fn get_board(&self, board_id: &str) -> KanbanResult<Board> {
        self.send_json(self.request(Method::GET, &format!("/boards/{}", board_id)))
            .await
    }

    async fn create_board(&self) -> KanbanResult<Board> {
        self.send_json(self.request(Method::POST, "/boards")).await
    }

    async fn update_board(&self, board_id: &str, patch: &BoardPatch) -> KanbanResult<Board> {
        let request = self
            .request(Method::PUT, &format!("/boards/{}", board_id))
            .json(patch);
        let board: Board = self.send_json(request).await?;
        tracing::info!("Updated board {}", board_id);
        Ok(board)
    }

    async fn delete_board(&self, board_id: &str) -> KanbanResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/boards/{}", board_id)))
            .await
    }

    async fn update_board_order(&self, ids: &[BoardId]) -> KanbanResult<()> {
        self.put_empty("/boards", &json!({ "boards": ids })).await
    }

    async fn update_favourite_order(&self, ids: &[BoardId]) -> KanbanResult<()> {
        self.put_empty("/boards/favourites", &json!({ "boards": ids }))
            .await
    }

    async fn create_section(&self, board_id: &str) -> KanbanResult<Section> {
        self.send_json(self.request(Method::POST, &format!("/boards/{}/sections", board_id)))
            .await
    }

    async fn update_section(
        &self,
        board_id: &str,
        section_id: &str,
        patch: &SectionPatch,
    ) -> KanbanResult<()> {
        self.put_empty(
            &format!("/boards/{}/sections/{}", board_id, section_id),
            patch,
        )
        .await
    }

    async fn delete_section(&self, board_id: &str, section_id: &str) -> KanbanResult<()> {
        let path = format!("/boards/{}/sections/{}", board_id, section_id);
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    async fn create_task(&self, board_id: &str, section_id: &str) -> KanbanResult<Task> {
        let request = self
            .request(Method::POST, &format!("/boards/{}/tasks", board_id))
            .json(&json!({ "sectionId": section_id }));
        self.send_json(request).await
    }

    async fn update_task(
        &self,
        board_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> KanbanResult<()> {
        self.put_empty(&format!("/boards/{}/tasks/{}", board_id, task_id), patch)
            .await
    }

    async fn delete_task(&self, board_id: &str, task_id: &str) -> KanbanResult<()> {
        let path = format!("/boards/{}/tasks/{}", board_id, task_id);
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    async fn update_task_position(
        &self,
        board_id: &str,
        resolved: &ResolvedTaskMove,
    ) -> KanbanResult<()> {
        self.put_empty(
            &format!("/boards/{}/tasks/update-position", board_id),
            resolved,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:5000/api/v1/".into(),
            ..Default::default()
        };
        let gateway = HttpGateway::new(&config).unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:5000/api/v1");
        assert_eq!(gateway.url("/boards"), "http://localhost:5000/api/v1/boards");
    }

    #[test]
    fn test_invalid_token_is_config_error() {
        let config = ApiConfig {
            token: Some("bad\ntoken".into()),
            ..Default::default()
        };
        assert!(matches!(
            HttpGateway::new(&config),
            Err(KanbanError::Config(_))
        ));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, ""),
            KanbanError::NotFound(_)
        ));
        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(err.to_string(), "Network error: HTTP 500: boom");
    }
}
