pub mod audit;
pub mod dispatch;
pub mod interaction;
pub mod opportunity;
pub mod schema;
pub mod shared;
pub mod user;
