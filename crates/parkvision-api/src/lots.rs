// Parking lot endpoints
//
// Lot CRUD lives under `/lots/`; occupancy and spot listings are nested
// below the lot (`/lots/{id}/status`, `/lots/{id}/spots`).

use tracing::debug;

use crate::client::ParkClient;
use crate::error::Error;
use crate::types::{
    BulkSpotUpdate, BulkUpdateRequest, InitLotRequest, InitLotResponse, LotCreate,
    LotStatusResponse, LotUpdate, ParkingLot, ParkingSpot, SpotAnnotation, SpotsResponse,
};

impl ParkClient {
    /// List all parking lots.
    ///
    /// `GET /lots/`
    pub async fn list_lots(&self) -> Result<Vec<ParkingLot>, Error> {
        self.get("lots/").await
    }

    /// `GET /lots/{id}`
    pub async fn get_lot(&self, lot_id: i64) -> Result<ParkingLot, Error> {
        self.get(&format!("lots/{lot_id}")).await
    }

    /// `POST /lots/`
    pub async fn create_lot(&self, body: &LotCreate) -> Result<ParkingLot, Error> {
        debug!(name = %body.name, "creating lot");
        self.post("lots/", body).await
    }

    /// `PUT /lots/{id}` -- partial update, unset fields are left alone.
    pub async fn update_lot(&self, lot_id: i64, body: &LotUpdate) -> Result<ParkingLot, Error> {
        debug!(lot_id, "updating lot");
        self.put(&format!("lots/{lot_id}"), body).await
    }

    /// `DELETE /lots/{id}`
    pub async fn delete_lot(&self, lot_id: i64) -> Result<(), Error> {
        debug!(lot_id, "deleting lot");
        self.delete(&format!("lots/{lot_id}")).await
    }

    /// Current status of every spot in a lot, keyed by spot.
    ///
    /// `GET /lots/{id}/status`
    pub async fn lot_status(&self, lot_id: i64) -> Result<LotStatusResponse, Error> {
        self.get(&format!("lots/{lot_id}/status")).await
    }

    /// `GET /lots/{id}/spots`
    pub async fn list_spots(&self, lot_id: i64) -> Result<Vec<ParkingSpot>, Error> {
        let resp: SpotsResponse = self.get(&format!("lots/{lot_id}/spots")).await?;
        Ok(resp.into_spots())
    }

    /// Create a lot's spots from polygon annotations.
    ///
    /// `POST /lots/{id}/init` with `{"annotations": [{"points": [[x, y], ...]}]}`
    pub async fn init_lot(
        &self,
        lot_id: i64,
        annotations: Vec<SpotAnnotation>,
    ) -> Result<Vec<ParkingSpot>, Error> {
        debug!(lot_id, count = annotations.len(), "initialising lot spots");
        let resp: InitLotResponse = self
            .post(&format!("lots/{lot_id}/init"), &InitLotRequest { annotations })
            .await?;
        Ok(resp.parking_spots)
    }

    /// Apply several spot status changes in one request.
    ///
    /// `POST /lots/{id}/bulk_update` with `{"updates": [...]}`
    pub async fn bulk_update_spots(
        &self,
        lot_id: i64,
        updates: Vec<BulkSpotUpdate>,
    ) -> Result<serde_json::Value, Error> {
        debug!(lot_id, count = updates.len(), "bulk updating spots");
        self.post(
            &format!("lots/{lot_id}/bulk_update"),
            &BulkUpdateRequest { updates },
        )
        .await
    }
}
