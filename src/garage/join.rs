use std::collections::HashMap;

use crate::garage::JoinedVehicle;
use crate::prelude::*;
use crate::wargaming::{OwnedVehicle, TankId, VehicleDetail};

/// Joins the owned vehicles with their details by tank ID.
///
/// The owned order is preserved, duplicates are kept, and vehicles without details are dropped.
#[instrument(level = "debug", skip_all, fields(n_owned = owned.len(), n_details = details.len()))]
pub fn join_vehicles(owned: Vec<OwnedVehicle>, details: Vec<VehicleDetail>) -> Vec<JoinedVehicle> {
    let details: HashMap<TankId, VehicleDetail> = details
        .into_iter()
        .map(|detail| (detail.tank_id, detail))
        .collect();
    owned
        .into_iter()
        .filter_map(|vehicle| match details.get(&vehicle.tank_id) {
            Some(detail) => Some(JoinedVehicle::new(vehicle, detail.clone())),
            None => {
                warn!(vehicle.tank_id, "no details found");
                None
            }
        })
        .collect()
}
