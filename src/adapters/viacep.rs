use crate::domain::model::{Address, PostalCode, ViaCepPayload};
use crate::domain::ports::{AddressLookup, ConfigProvider};
use crate::utils::error::{CepError, Result};
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br";

/// ViaCEP lookup over HTTP: `GET {base_url}/ws/{cep}/json/`.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    base_url: String,
    client: Client,
}

impl ViaCepClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(user_agent) = config.user_agent() {
            builder = builder.user_agent(user_agent.to_string());
        }
        Ok(Self::with_client(config.lookup_base_url(), builder.build()?))
    }

    pub fn endpoint(&self, cep: &PostalCode) -> String {
        format!("{}/ws/{}/json/", self.base_url, cep.digits())
    }
}

#[async_trait]
impl AddressLookup for ViaCepClient {
    async fn lookup(&self, cep: &PostalCode) -> Result<Address> {
        let endpoint = self.endpoint(cep);
        tracing::debug!("📡 Looking up CEP {} at {}", cep, endpoint);

        let response = self.client.get(&endpoint).send().await?;
        let status = response.status();
        tracing::debug!("📡 Lookup response status: {}", status);

        if !status.is_success() {
            return Err(CepError::LookupStatusError {
                status: status.as_u16(),
            });
        }

        // 先取原始內容，解析錯誤歸類為序列化錯誤而非網路錯誤
        let body = response.bytes().await?;
        let payload: ViaCepPayload = serde_json::from_slice(&body)?;
        payload.into_address(cep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tokio_test::assert_err;

    fn cep(digits: &str) -> PostalCode {
        PostalCode::new(digits).unwrap()
    }

    #[test]
    fn test_endpoint_format() {
        let client = ViaCepClient::new("https://viacep.com.br/");
        assert_eq!(
            client.endpoint(&cep("01001000")),
            "https://viacep.com.br/ws/01001000/json/"
        );
    }

    #[tokio::test]
    async fn test_lookup_successful_response() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/ws/01001000/json/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "cep": "01001-000",
                    "logradouro": "Praça da Sé",
                    "complemento": "lado ímpar",
                    "bairro": "Sé",
                    "localidade": "São Paulo",
                    "uf": "SP",
                    "ibge": "3550308",
                    "ddd": "11"
                }));
        });

        let client = ViaCepClient::new(server.base_url());
        let address = client.lookup(&cep("01001000")).await.unwrap();

        api_mock.assert();
        assert_eq!(address.street.as_deref(), Some("Praça da Sé"));
        assert_eq!(address.neighborhood.as_deref(), Some("Sé"));
        assert_eq!(address.city.as_deref(), Some("São Paulo"));
        assert_eq!(address.state.as_deref(), Some("SP"));
        assert_eq!(address.complement.as_deref(), Some("lado ímpar"));
    }

    #[tokio::test]
    async fn test_lookup_not_found_marker() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/ws/99999999/json/");
            then.status(200).json_body(serde_json::json!({"erro": true}));
        });

        let client = ViaCepClient::new(server.base_url());
        let result = client.lookup(&cep("99999999")).await;

        api_mock.assert();
        assert!(matches!(result, Err(CepError::AddressNotFound { .. })));
    }

    #[tokio::test]
    async fn test_lookup_server_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/ws/01001000/json/");
            then.status(500);
        });

        let client = ViaCepClient::new(server.base_url());
        let result = client.lookup(&cep("01001000")).await;

        api_mock.assert();
        assert!(matches!(
            result,
            Err(CepError::LookupStatusError { status: 500 })
        ));
    }

    #[tokio::test]
    async fn test_lookup_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/ws/01001000/json/");
            then.status(200).body("<html>maintenance</html>");
        });

        let client = ViaCepClient::new(server.base_url());
        let err = assert_err!(client.lookup(&cep("01001000")).await);
        assert!(matches!(err, CepError::SerializationError(_)));
        assert!(err.is_lookup_unavailable());
    }

    #[tokio::test]
    async fn test_lookup_connection_refused() {
        // 埠 1 沒有服務在聽
        let client = ViaCepClient::new("http://127.0.0.1:1");
        let err = assert_err!(client.lookup(&cep("01001000")).await);
        assert!(matches!(err, CepError::ApiError(_)));
    }

    #[tokio::test]
    async fn test_user_agent_from_config() {
        struct Config {
            base_url: String,
        }

        impl ConfigProvider for Config {
            fn lookup_base_url(&self) -> &str {
                &self.base_url
            }

            fn sequence_policy(&self) -> crate::domain::model::SequencePolicy {
                Default::default()
            }

            fn user_agent(&self) -> Option<&str> {
                Some("cep-autofill-test")
            }
        }

        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/ws/20040002/json/")
                .header("user-agent", "cep-autofill-test");
            then.status(200).json_body(serde_json::json!({"uf": "RJ"}));
        });

        let client = ViaCepClient::from_config(&Config {
            base_url: server.base_url(),
        })
        .unwrap();
        let address = client.lookup(&cep("20040002")).await.unwrap();

        api_mock.assert();
        assert_eq!(address.state.as_deref(), Some("RJ"));
    }
}
