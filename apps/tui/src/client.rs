use agrod_core::{DetectionRequest, DetectionResult};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network response was not ok (HTTP {0})")]
    Status(u16),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid detection response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Posts images to the `/detect` endpoint.
#[derive(Debug, Clone)]
pub struct DetectClient {
    http: reqwest::Client,
    endpoint: String,
}

impl DetectClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One POST, no retry.
    pub async fn detect(&self, request: &DetectionRequest) -> Result<DetectionResult, ClientError> {
        tracing::debug!(endpoint = %self.endpoint, crop = request.crop_type.as_str(), "posting image");

        let response = self.http.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "detection backend rejected request");
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrod_core::CropType;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> DetectionRequest {
        DetectionRequest {
            image: "data:image/png;base64,aGk=".to_string(),
            crop_type: CropType::Cotton,
        }
    }

    fn client(server: &MockServer) -> Result<DetectClient, ClientError> {
        DetectClient::new(format!("{}/detect", server.uri()), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn posts_json_body_and_parses_result() -> Result<(), ClientError> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/detect"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "image": "data:image/png;base64,aGk=",
                "cropType": "cotton"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "diseases": ["cotton_leaf_curl"],
                "disease_info": [{
                    "name": "Leaf Curl",
                    "description": "Viral curling of leaves.",
                    "confidence": 77.0,
                    "recommended_pesticides": []
                }],
                "field_data": null,
                "multiple_detections": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server)?.detect(&request()).await?;
        assert_eq!(result.diseases, ["cotton_leaf_curl"]);
        assert!(result.field_data.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() -> Result<(), ClientError> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/detect"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let error = client(&server)?.detect(&request()).await.err();
        assert!(matches!(error, Some(ClientError::Status(500))));
        assert_eq!(
            error.map(|error| error.to_string()),
            Some("Network response was not ok (HTTP 500)".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() -> Result<(), ClientError> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let error = client(&server)?.detect(&request()).await.err();
        assert!(matches!(error, Some(ClientError::Decode(_))));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() -> Result<(), Box<dyn std::error::Error>> {
        // grab a free port, then close it again
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let endpoint = format!("http://{}/detect", listener.local_addr()?);
        drop(listener);

        let error = DetectClient::new(endpoint, Duration::from_secs(2))?
            .detect(&request())
            .await
            .err();
        assert!(matches!(error, Some(ClientError::Transport(_))));
        Ok(())
    }
}
