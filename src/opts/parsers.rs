use std::str::FromStr;

use crate::prelude::*;
use crate::wargaming;

pub fn tank_id(value: &str) -> Result<wargaming::TankId> {
    match wargaming::TankId::from_str(value)? {
        tank_id if tank_id >= 1 => Ok(tank_id),
        tank_id => Err(anyhow!("{} is an invalid tank ID", tank_id)),
    }
}

pub fn tier(value: &str) -> Result<i32> {
    match i32::from_str(value)? {
        tier if (1..=10).contains(&tier) => Ok(tier),
        tier => Err(anyhow!("{} is not a tier, expected 1 to 10", tier)),
    }
}

pub fn non_zero_usize(value: &str) -> Result<usize> {
    match FromStr::from_str(value)? {
        value if value >= 1 => Ok(value),
        _ => Err(anyhow!("expected a positive number")),
    }
}

pub fn non_zero_u32(value: &str) -> Result<u32> {
    match FromStr::from_str(value)? {
        value if value >= 1 => Ok(value),
        _ => Err(anyhow!("expected a positive number")),
    }
}

pub fn non_zero_duration(value: &str) -> Result<StdDuration> {
    match humantime::parse_duration(value)? {
        value if !value.is_zero() => Ok(value),
        _ => Err(anyhow!("expected a positive duration")),
    }
}
