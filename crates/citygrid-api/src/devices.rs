// Device and VLAN assignment endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{DeviceMap, VlanAssignmentMap};

impl ApiClient {
    /// List the latest reading of every known device.
    ///
    /// `GET {base}/devices`
    pub async fn list_devices(&self) -> Result<DeviceMap, Error> {
        let url = self.endpoint_url("devices")?;
        debug!("listing devices");
        self.get(url).await
    }

    /// List the current VLAN assignment of every known device.
    ///
    /// `GET {base}/vlans`
    pub async fn list_vlan_assignments(&self) -> Result<VlanAssignmentMap, Error> {
        let url = self.endpoint_url("vlans")?;
        debug!("listing vlan assignments");
        self.get(url).await
    }
}
