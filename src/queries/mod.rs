pub mod person_queries;
pub mod interaction_queries;
pub mod event_queries;
pub mod map_queries;
pub mod stats_queries;
pub mod preference_queries;
