pub mod user_ops;
pub mod person_ops;
pub mod organization_ops;
pub mod event_ops;
pub mod interaction_ops;
pub mod preference_ops;
