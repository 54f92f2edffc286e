// Device simulation endpoint

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{SimulateRequest, SimulateResponse};

impl ApiClient {
    /// Publish a simulated device reading and get back the stored record
    /// plus the VLAN it was assigned to.
    ///
    /// `POST {base}/simulate`
    pub async fn simulate(&self, request: &SimulateRequest) -> Result<SimulateResponse, Error> {
        let url = self.endpoint_url("simulate")?;
        debug!(name = %request.name, kind = %request.kind, "simulating device");
        self.post(url, request).await
    }
}
