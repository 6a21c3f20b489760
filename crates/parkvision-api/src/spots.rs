// Single-spot endpoints, nested below the owning lot.

use tracing::debug;

use crate::client::ParkClient;
use crate::error::Error;
use crate::types::{SpotStatusResponse, SpotStatusUpdate};

impl ParkClient {
    /// Set a spot's status.
    ///
    /// `POST /lots/{lot}/spots/{spot}/update` with `{"status": ..., "meta": ...}`
    pub async fn update_spot(
        &self,
        lot_id: i64,
        spot_id: i64,
        body: &SpotStatusUpdate,
    ) -> Result<SpotStatusResponse, Error> {
        debug!(lot_id, spot_id, status = %body.status, "updating spot status");
        self.post(&format!("lots/{lot_id}/spots/{spot_id}/update"), body)
            .await
    }

    /// Latest recorded status of one spot.
    ///
    /// `GET /lots/{lot}/spots/{spot}/status`
    pub async fn spot_status(
        &self,
        lot_id: i64,
        spot_id: i64,
    ) -> Result<SpotStatusResponse, Error> {
        self.get(&format!("lots/{lot_id}/spots/{spot_id}/status"))
            .await
    }
}
