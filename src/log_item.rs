use crate::error::{ClientError, Result};
use crate::filter::FilterOption;
use crate::models::{
    Content, CreateLogItemRequest, LogItemCreatedResponse, LogItemResponse, MessageResponse,
    Responses,
};
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

/// Client for the project-scoped log endpoints.
///
/// Every call is a single request/response round trip. Non-success statuses
/// are returned as [`ClientError::Http`] without retrying.
#[derive(Debug, Clone)]
pub struct LogItemResource {
    client: Client,
    base_uri: Url,
    project: String,
}

impl LogItemResource {
    pub fn new(client: Client, base_uri: Url, project: impl Into<String>) -> Self {
        Self {
            client,
            base_uri,
            project: project.into(),
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// Returns a page of log items matching `filter`.
    pub async fn list(&self, filter: Option<&FilterOption>) -> Result<Content<LogItemResponse>> {
        let mut uri = self.endpoint(&[self.project.as_str(), "log"])?;

        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            uri.set_query(Some(&filter.to_string()));
        }

        debug!("GET {}", uri);
        let response = self.client.get(uri).send().await?;
        read_json(response).await
    }

    pub async fn get_by_uuid(&self, uuid: &str) -> Result<LogItemResponse> {
        let uri = self.endpoint(&[self.project.as_str(), "log", "uuid", uuid])?;

        debug!("GET {}", uri);
        let response = self.client.get(uri).send().await?;
        read_json(response).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<LogItemResponse> {
        let uri = self.endpoint(&[self.project.as_str(), "log", id.to_string().as_str()])?;

        debug!("GET {}", uri);
        let response = self.client.get(uri).send().await?;
        read_json(response).await
    }

    /// Returns the raw bytes of an attachment, exactly as served.
    pub async fn get_binary_data(&self, id: &str) -> Result<Vec<u8>> {
        let uri = self.endpoint(&["data", self.project.as_str(), id])?;

        debug!("GET {}", uri);
        let response = self.client.get(uri).send().await?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Creates a log item.
    ///
    /// Without an attachment the request goes out as plain JSON. With one, the
    /// body is multipart: a `json_request_part` holding a one-element JSON
    /// array and a `file` part with the bytes. The service answers the latter
    /// with a batch envelope, which is unwrapped to its first element.
    pub async fn create(&self, request: &CreateLogItemRequest) -> Result<LogItemCreatedResponse> {
        let uri = self.endpoint(&[self.project.as_str(), "log"])?;

        match &request.attach {
            None => {
                let body = serde_json::to_string(request)?;

                debug!("POST {}", uri);
                let response = self
                    .client
                    .post(uri)
                    .header(CONTENT_TYPE, "application/json")
                    .body(body)
                    .send()
                    .await?;
                read_json(response).await
            }
            Some(attach) => {
                let body = serde_json::to_string(&[request])?;

                let json_part = Part::text(body)
                    .mime_str("application/json")
                    .map_err(|_| ClientError::InvalidMime("application/json".to_string()))?;
                let file_part = Part::bytes(attach.data.clone())
                    .file_name(attach.name.clone())
                    .mime_str(&attach.mime_type)
                    .map_err(|_| ClientError::InvalidMime(attach.mime_type.clone()))?;

                let form = Form::new()
                    .part("json_request_part", json_part)
                    .part("file", file_part);

                debug!("POST {} (multipart, {} bytes attached)", uri, attach.data.len());
                let response = self.client.post(uri).multipart(form).send().await?;
                let responses: Responses = read_json(response).await?;

                responses
                    .log_items
                    .into_iter()
                    .next()
                    .ok_or(ClientError::EmptyBatch)
            }
        }
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse> {
        let uri = self.endpoint(&[self.project.as_str(), "log", id.to_string().as_str()])?;

        debug!("DELETE {}", uri);
        let response = self.client.delete(uri).send().await?;
        read_json(response).await
    }

    /// Appends `segments` to the base path. Empty, `.` and `..` segments are
    /// rejected since the url crate would collapse them into another route.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ClientError::InvalidSegment(bad.to_string()));
        }

        let mut uri = self.base_uri.clone();
        uri.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("Base URI cannot be a base: {}", self.base_uri)))?
            .pop_if_empty()
            .extend(segments);
        Ok(uri)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!("Request failed with status {}: {}", status, body);

    Err(ClientError::Http {
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
