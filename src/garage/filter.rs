use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::garage::JoinedVehicle;
use crate::wargaming::{Nation, TankId, TankType};

/// Active filter selection, an empty set accepts everything.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    #[serde(default)]
    pub tiers: BTreeSet<i32>,

    #[serde(default)]
    pub nations: BTreeSet<Nation>,

    #[serde(default)]
    pub types: BTreeSet<TankType>,

    #[serde(default)]
    pub premium_only: bool,
}

impl Filter {
    pub fn matches(&self, vehicle: &JoinedVehicle) -> bool {
        (self.tiers.is_empty() || self.tiers.contains(&vehicle.tier))
            && (self.nations.is_empty() || self.nations.contains(&vehicle.nation))
            && (self.types.is_empty() || self.types.contains(&vehicle.type_))
            && (!self.premium_only || vehicle.is_premium)
    }

    /// Selects the vehicles which are not blacklisted and match the filter, keeping the order.
    pub fn apply<'a>(
        &self,
        vehicles: &'a [JoinedVehicle],
        blacklist: &Blacklist,
    ) -> Vec<&'a JoinedVehicle> {
        vehicles
            .iter()
            .filter(|vehicle| !blacklist.contains(vehicle.tank_id) && self.matches(vehicle))
            .collect()
    }
}

/// Vehicles the user never wants to get picked.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Blacklist(BTreeSet<TankId>);

impl Blacklist {
    pub fn contains(&self, tank_id: TankId) -> bool {
        self.0.contains(&tank_id)
    }

    /// Returns `false` if the vehicle has already been blacklisted.
    pub fn insert(&mut self, tank_id: TankId) -> bool {
        self.0.insert(tank_id)
    }

    /// Returns `false` if the vehicle has not been blacklisted.
    pub fn remove(&mut self, tank_id: TankId) -> bool {
        self.0.remove(&tank_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TankId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<TankId> for Blacklist {
    fn from_iter<I: IntoIterator<Item = TankId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Picks a vehicle uniformly at random, `None` when there is nothing to pick from.
pub fn pick<'a, R: Rng + ?Sized>(
    candidates: &[&'a JoinedVehicle],
    rng: &mut R,
) -> Option<&'a JoinedVehicle> {
    candidates.choose(rng).copied()
}
