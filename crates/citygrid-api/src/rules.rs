// Assignment rule endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{RuleMap, RulesUpdateResponse};

impl ApiClient {
    /// Fetch the threshold rules the backend assigns VLANs with.
    ///
    /// `GET {base}/rules`
    pub async fn get_rules(&self) -> Result<RuleMap, Error> {
        let url = self.endpoint_url("rules")?;
        debug!("fetching rules");
        self.get(url).await
    }

    /// Replace the whole rule map. The backend re-evaluates every stored
    /// device and echoes the rules back.
    ///
    /// `POST {base}/rules`
    pub async fn update_rules(&self, rules: &RuleMap) -> Result<RulesUpdateResponse, Error> {
        let url = self.endpoint_url("rules")?;
        debug!(parameters = rules.len(), "updating rules");
        self.post(url, rules).await
    }
}
