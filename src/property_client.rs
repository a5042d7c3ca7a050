use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listing {
    pub price: u64,
    pub bedrooms: u32,
    // Any other fields on a listing are ignored.
}

#[derive(Deserialize, Debug)]
pub struct PropertiesResponse {
    pub properties: Vec<Listing>,
}

/// Everything that can end a fetch attempt. The display text is what the
/// presentation layer shows to the user.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL.")]
    InvalidUrl,

    #[error("No data received.")]
    NoData,

    #[error("Invalid response from server: {0}.")]
    ResponseError(u16),

    #[error("Failed to decode JSON: {0}")]
    DecodingError(#[source] serde_json::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] reqwest::Error),
}

/// Anything that can produce the listing catalog for a URL.
#[async_trait]
pub trait PropertySource: Send + Sync {
    async fn fetch_properties(&self, url: &str) -> Result<Vec<Listing>, FetchError>;
}

pub struct HttpPropertyClient {
    client: Client,
}

impl HttpPropertyClient {
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

pub fn decode_properties(body: &[u8]) -> Result<Vec<Listing>, FetchError> {
    if body.is_empty() {
        return Err(FetchError::NoData);
    }
    let response: PropertiesResponse =
        serde_json::from_slice(body).map_err(FetchError::DecodingError)?;
    Ok(response.properties)
}

#[async_trait]
impl PropertySource for HttpPropertyClient {
    async fn fetch_properties(&self, url: &str) -> Result<Vec<Listing>, FetchError> {
        let url = Url::parse(url).map_err(|_| FetchError::InvalidUrl)?;
        log::debug!("Fetching properties from {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::ResponseError(status.as_u16()));
        }

        let body = response.bytes().await?;
        let listings = decode_properties(&body)?;
        log::info!("Fetched {} listings", listings.len());
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Serves a single canned HTTP response and returns the URL to hit.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}/properties.json", addr)
    }

    #[test]
    fn test_parse_properties_response() {
        let json_data = r#"
        {
            "properties": [
                {"id": 1, "price": 100000, "bedrooms": 1, "number": "12", "address": "Foo Street", "postcode": "AB1 2CD", "propertyType": "FLAT"},
                {"id": 2, "price": 150000, "bedrooms": 2}
            ]
        }
        "#;
        let listings = decode_properties(json_data.as_bytes()).unwrap();
        assert_eq!(
            listings,
            vec![
                Listing {
                    price: 100_000,
                    bedrooms: 1,
                },
                Listing {
                    price: 150_000,
                    bedrooms: 2,
                },
            ]
        );
    }

    #[test]
    fn test_parse_malformed_properties_response() {
        // Missing bedrooms
        let missing = r#"{"properties": [{"price": 100000}]}"#;
        assert!(matches!(
            decode_properties(missing.as_bytes()),
            Err(FetchError::DecodingError(_))
        ));

        // Top level must be an object with a properties array
        let bare_array = r#"[{"price": 100000, "bedrooms": 1}]"#;
        assert!(matches!(
            decode_properties(bare_array.as_bytes()),
            Err(FetchError::DecodingError(_))
        ));

        // Prices are whole, non-negative numbers
        let negative = r#"{"properties": [{"price": -5, "bedrooms": 1}]}"#;
        assert!(decode_properties(negative.as_bytes()).is_err());
        let fractional = r#"{"properties": [{"price": 10.5, "bedrooms": 1}]}"#;
        assert!(decode_properties(fractional.as_bytes()).is_err());
    }

    #[test]
    fn test_empty_body_is_no_data() {
        assert!(matches!(decode_properties(b""), Err(FetchError::NoData)));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(FetchError::InvalidUrl.to_string(), "Invalid URL.");
        assert_eq!(FetchError::NoData.to_string(), "No data received.");
        assert_eq!(
            FetchError::ResponseError(404).to_string(),
            "Invalid response from server: 404."
        );
        let decode_err = serde_json::from_str::<PropertiesResponse>("{}").unwrap_err();
        assert!(
            FetchError::DecodingError(decode_err)
                .to_string()
                .starts_with("Failed to decode JSON: ")
        );
    }

    #[tokio::test]
    async fn test_fetch_properties_success() {
        let url = serve_once(
            "200 OK",
            r#"{"properties":[{"price":100000,"bedrooms":1},{"price":200000,"bedrooms":3}]}"#,
        )
        .await;
        let client = HttpPropertyClient::new(None).unwrap();
        let listings = client.fetch_properties(&url).await.unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(
            listings[1],
            Listing {
                price: 200_000,
                bedrooms: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_properties_not_found() {
        let url = serve_once("404 Not Found", "").await;
        let client = HttpPropertyClient::new(None).unwrap();
        let err = client.fetch_properties(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::ResponseError(404)));
    }

    #[tokio::test]
    async fn test_fetch_properties_bad_json() {
        let url = serve_once("200 OK", r#"{"listings":[]}"#).await;
        let client = HttpPropertyClient::new(None).unwrap();
        let err = client.fetch_properties(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::DecodingError(_)));
    }

    #[tokio::test]
    async fn test_fetch_properties_empty_body() {
        let url = serve_once("200 OK", "").await;
        let client = HttpPropertyClient::new(None).unwrap();
        let err = client.fetch_properties(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::NoData));
    }

    #[tokio::test]
    async fn test_fetch_properties_invalid_url() {
        let client = HttpPropertyClient::new(None).unwrap();
        let err = client.fetch_properties("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl));
    }

    #[tokio::test]
    async fn test_fetch_properties_connection_refused() {
        // Grab a free port, then close it so nothing is listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpPropertyClient::new(Some(Duration::from_secs(5))).unwrap();
        let err = client
            .fetch_properties(&format!("http://{}/properties.json", addr))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Unexpected(_)));
    }
}
