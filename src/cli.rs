//! Terminal front-end: picking, listing, and the blacklist management.

use rand::rngs::StdRng;
use rand::{thread_rng, SeedableRng};

use crate::garage::roulette;
use crate::garage::{pick as pick_vehicle, Filter, GarageLoader, JoinedVehicle};
use crate::opts::{
    BlacklistAction, BlacklistOpts, ClearOpts, FilterOpts, ListOpts, PickOpts, ProfileOpts,
    UpstreamOpts,
};
use crate::prelude::*;
use crate::store::{JsonFileStore, Profile};

const NO_MATCH: &str = "No vehicles match the filters.";

impl From<&FilterOpts> for Filter {
    fn from(opts: &FilterOpts) -> Self {
        Self {
            tiers: opts.tiers.iter().copied().collect(),
            nations: opts.nations.iter().copied().collect(),
            types: opts.types.iter().copied().collect(),
            premium_only: opts.premium,
        }
    }
}

#[instrument(level = "info", skip_all, fields(username = opts.profile.username.as_str()))]
pub async fn pick(opts: PickOpts) -> Result {
    sentry::configure_scope(|scope| scope.set_tag("app", "pick"));

    let store = JsonFileStore::open(&opts.profile.store)?;
    let profile = Profile::new(&store, &opts.profile.username, opts.profile.server);
    let vehicles =
        load_vehicles(&profile, &opts.profile, &opts.upstream, opts.refresh).await?;
    let blacklist = profile.load_blacklist()?;
    let candidates = Filter::from(&opts.filter).apply(&vehicles, &blacklist);
    info!(n_vehicles = vehicles.len(), n_candidates = candidates.len());

    let period = match opts.every {
        Some(period) => period,
        None => {
            match pick_vehicle(&candidates, &mut thread_rng()) {
                Some(vehicle) => println!("{}", vehicle),
                None => println!("{}", NO_MATCH),
            }
            return Ok(());
        }
    };

    let candidates = candidates.into_iter().cloned().collect();
    let mut roulette = roulette::spawn(candidates, period, StdRng::from_entropy());
    loop {
        tokio::select! {
            draw = roulette.next() => match draw {
                Some(Some(vehicle)) => println!("{}", vehicle),
                Some(None) => {
                    println!("{}", NO_MATCH);
                    break;
                }
                None => break,
            },
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("interrupted");
                break;
            }
        }
    }
    roulette.stop();
    Ok(())
}

#[instrument(level = "info", skip_all, fields(username = opts.profile.username.as_str()))]
pub async fn list(opts: ListOpts) -> Result {
    sentry::configure_scope(|scope| scope.set_tag("app", "list"));

    let store = JsonFileStore::open(&opts.profile.store)?;
    let profile = Profile::new(&store, &opts.profile.username, opts.profile.server);
    let vehicles =
        load_vehicles(&profile, &opts.profile, &opts.upstream, opts.refresh).await?;
    let blacklist = profile.load_blacklist()?;
    let candidates = Filter::from(&opts.filter).apply(&vehicles, &blacklist);

    for vehicle in &candidates {
        println!("{}", vehicle);
    }
    println!("{} of {} vehicles, {} blacklisted", candidates.len(), vehicles.len(), blacklist.len());
    Ok(())
}

pub fn blacklist(opts: BlacklistOpts) -> Result {
    let store = JsonFileStore::open(&opts.profile.store)?;
    let profile = Profile::new(&store, &opts.profile.username, opts.profile.server);

    match opts.action {
        BlacklistAction::Add { tank_id } => {
            if profile.blacklist(tank_id)? {
                println!("#{} is blacklisted", tank_id);
            } else {
                println!("#{} has already been blacklisted", tank_id);
            }
        }
        BlacklistAction::Remove { tank_id } => {
            if profile.unblacklist(tank_id)? {
                println!("#{} is no longer blacklisted", tank_id);
            } else {
                println!("#{} has not been blacklisted", tank_id);
            }
        }
        BlacklistAction::List => {
            let vehicles = profile.load_vehicles()?.unwrap_or_default();
            for tank_id in profile.load_blacklist()?.iter() {
                match vehicles.iter().find(|vehicle| vehicle.tank_id == tank_id) {
                    Some(vehicle) => println!("{}", vehicle),
                    None => println!("#{}", tank_id),
                }
            }
        }
    }
    Ok(())
}

pub fn clear(opts: ClearOpts) -> Result {
    let store = JsonFileStore::open(&opts.profile.store)?;
    Profile::new(&store, &opts.profile.username, opts.profile.server).clear()?;
    info!(username = opts.profile.username.as_str(), "cleared");
    Ok(())
}

/// Takes the cached garage, or fetches and caches it on a miss.
async fn load_vehicles(
    profile: &Profile<'_>,
    profile_opts: &ProfileOpts,
    upstream_opts: &UpstreamOpts,
    refresh: bool,
) -> Result<Vec<JoinedVehicle>> {
    if !refresh {
        if let Some(vehicles) = profile.load_vehicles()? {
            debug!(n_vehicles = vehicles.len(), "cached");
            return Ok(vehicles);
        }
    }

    let loader = GarageLoader::from_opts(upstream_opts)?;
    let garage = loader
        .load(profile_opts.server, &profile_opts.username)
        .await
        .with_context(|| format!("failed to load the garage of `{}`", profile_opts.username))?;
    if garage.completeness.is_partial() {
        warn!("some vehicles could not be fetched, the garage is incomplete");
    }
    profile.save_vehicles(&garage.vehicles)?;
    Ok(garage.vehicles)
}
