pub mod health;
pub mod tanks;
