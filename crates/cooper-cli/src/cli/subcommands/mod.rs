mod interaction;
mod opportunity;
mod user;

pub use interaction::InteractionCommands;
pub use opportunity::OpportunityCommands;
pub use user::UserCommands;
