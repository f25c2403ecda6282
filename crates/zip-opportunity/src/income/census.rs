use super::{parse_income_rows, IncomeFetchError, IncomeSource, IncomeTable};
use crate::config::CensusConfig;
use tracing::debug;

const USER_AGENT: &str = concat!("zip-opportunity/", env!("CARGO_PKG_VERSION"));
const ZCTA_GEOGRAPHY: &str = "zip code tabulation area:*";

/// ACS 5-year client. One GET per run, bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct CensusIncomeClient {
    http_client: reqwest::Client,
    config: CensusConfig,
}

impl CensusIncomeClient {
    pub fn new(config: CensusConfig) -> Result<Self, IncomeFetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|err| IncomeFetchError::Transport(err.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("get", format!("NAME,{}", self.config.income_field)),
            ("for", ZCTA_GEOGRAPHY.to_string()),
        ];
        if let Some(key) = &self.config.api_key {
            query.push(("key", key.clone()));
        }
        query
    }
}

impl IncomeSource for CensusIncomeClient {
    async fn fetch(&self) -> Result<IncomeTable, IncomeFetchError> {
        let url = self.config.endpoint();
        debug!(url = %url, vintage = self.config.vintage, "querying Census ACS income");

        let response = self
            .http_client
            .get(&url)
            .query(&self.query())
            .send()
            .await
            .map_err(|err| IncomeFetchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IncomeFetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| IncomeFetchError::Transport(err.to_string()))?;
        parse_income_rows(&body)
    }
}
