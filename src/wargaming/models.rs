pub use self::account::*;
pub use self::nation::*;
pub use self::realm::*;
pub use self::tank::*;
pub use self::vehicle::*;

pub mod account;
pub mod nation;
pub mod realm;
pub mod tank;
pub mod vehicle;

pub type AccountId = i32;
pub type TankId = i32;
