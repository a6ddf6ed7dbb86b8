pub mod initialize;
pub mod open_via_exchange;
pub mod open_direct;
pub mod claim;
pub mod close;
pub mod reward;

pub use initialize::*;
pub use open_via_exchange::*;
pub use open_direct::*;
pub use claim::*;
pub use close::*;
pub use reward::*;
