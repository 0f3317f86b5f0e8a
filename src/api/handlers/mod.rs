pub mod health;
pub use self::health::{health, live};

pub mod metrics;
pub use self::metrics::metrics;

pub mod user_register;
pub use self::user_register::register;
