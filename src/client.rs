use crate::{
    model::{ItemCatalogue, RestockTimes, StockData, WeatherReport},
    utils::{Error, Result},
};
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::fmt::{self, Debug, Display, Formatter};

macro_rules! api {
    ($api:expr, $($tt:tt)*) => {
        format!("{}/{}", $api, format!($($tt)*))
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Stock,
    Weather,
    ItemInfo,
    RestockTime,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Stock => "stock/GetStock",
            Self::Weather => "GetWeather",
            Self::ItemInfo => "Item-Info",
            Self::RestockTime => "stock/Restock-Time",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

pub struct Client {
    api: String,
    inner: reqwest::Client,
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Client {{ api: {}, client: reqwest::Client }}", self.api)
    }
}

impl Client {
    pub(crate) const DEFAULT_API: &'static str = "https://growagardenapi.vercel.app/api";

    pub fn new(api: &str, inner: reqwest::Client) -> Self {
        Self {
            api: api.trim_end_matches('/').to_owned(),
            inner,
        }
    }

    /// GETs `endpoint` and decodes its JSON body. Non-2xx is `ApiStatus`, an
    /// undecodable body is `MalformedPayload`.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let res = self.inner.get(api!(self.api, "{endpoint}")).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::ApiStatus {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        let body = res.bytes().await?;
        json::from_slice(&body).map_err(|err| Error::malformed(endpoint.path(), err))
    }

    pub async fn stock(&self) -> Result<StockData> {
        self.fetch(Endpoint::Stock).await
    }

    pub async fn weather(&self) -> Result<WeatherReport> {
        self.fetch(Endpoint::Weather).await
    }

    pub async fn item_info(&self) -> Result<ItemCatalogue> {
        self.fetch(Endpoint::ItemInfo).await
    }

    pub async fn restock_times(&self) -> Result<RestockTimes> {
        self.fetch(Endpoint::RestockTime).await
    }

    /// Item pictures live on third-party hosts, so anything that is not a
    /// non-empty `image/*` body counts as a failed load.
    pub async fn image_bytes(&self, url: &str) -> Result<Bytes> {
        let res = self.inner.get(url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::ApiStatus {
                endpoint: url.to_owned(),
                status,
            });
        }

        let is_image = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| value.starts_with("image/"));
        if !is_image {
            return Err(Error::malformed(url, "not an image"));
        }

        let bytes = res.bytes().await?;
        if bytes.is_empty() {
            return Err(Error::malformed(url, "empty image"));
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    const ENDPOINTS: [Endpoint; 4] = [
        Endpoint::Stock,
        Endpoint::Weather,
        Endpoint::ItemInfo,
        Endpoint::RestockTime,
    ];

    /// Serves `responses` in order, one per connection, and returns the base url.
    async fn serve(responses: Vec<(&'static str, &'static str, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for (status, content_type, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = [0; 4096];
                let _ = socket.read(&mut buf).await.unwrap();
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: {content_type}\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });
        format!("http://{addr}/api")
    }

    #[tokio::test]
    async fn server_error_keeps_status() {
        let responses = ENDPOINTS
            .iter()
            .map(|_| ("500 Internal Server Error", "text/plain", "boom"))
            .collect();
        let client = Client::new(&serve(responses).await, reqwest::Client::new());

        for endpoint in ENDPOINTS {
            let err = client.fetch::<json::Value>(endpoint).await.unwrap_err();
            match err {
                Error::ApiStatus { endpoint: path, status } => {
                    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                    assert_eq!(path, endpoint.path());
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[tokio::test]
    async fn decodes_stock() {
        let body = r#"{"gearStock":[{"name":"Trowel","value":3}]}"#;
        let client = Client::new(
            &serve(vec![("200 OK", "application/json", body)]).await,
            reqwest::Client::new(),
        );

        let stock = client.stock().await.unwrap();
        assert_eq!(stock.gear_stock[0].name, "Trowel");
        assert_eq!(stock.gear_stock[0].quantity, 3);
        assert!(stock.seeds_stock.is_empty());
    }

    #[tokio::test]
    async fn garbage_body_is_malformed() {
        let client = Client::new(
            &serve(vec![("200 OK", "application/json", "<html>")]).await,
            reqwest::Client::new(),
        );

        let err = client.weather().await.unwrap_err();
        assert!(matches!(err, Error::MalformedPayload { .. }), "{err}");
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::new(&format!("http://{addr}/api"), reqwest::Client::new());
        let err = client.restock_times().await.unwrap_err();
        assert!(matches!(err, Error::Network(_)), "{err}");
    }

    #[tokio::test]
    async fn html_is_not_an_image() {
        let base = serve(vec![
            ("200 OK", "text/html", "<html></html>"),
            ("404 Not Found", "image/png", ""),
        ])
        .await;
        let client = Client::new(&base, reqwest::Client::new());

        let err = client.image_bytes(&format!("{base}/a.png")).await.unwrap_err();
        assert!(matches!(err, Error::MalformedPayload { .. }), "{err}");

        let err = client.image_bytes(&format!("{base}/b.png")).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }
}
