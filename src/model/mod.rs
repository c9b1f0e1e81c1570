pub mod ids;
pub mod geo;
pub mod user;
pub mod organization;
pub mod person;
pub mod event;
pub mod interaction;
pub mod preference;

// Re-exports for convenience
pub use ids::Id;
pub use geo::GeoPoint;
pub use user::User;
pub use organization::{Organization, OrganizationDraft};
pub use person::{ContactInfo, Membership, OrganizationLink, Person, PersonDraft};
pub use event::{Event, EventDraft};
pub use interaction::{EventAttendance, Interaction, InteractionDraft, DEFAULT_INTERACTION_TYPE};
pub use preference::{Preference, PreferenceKey, Preferences};
