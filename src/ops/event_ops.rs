use rusqlite::Connection;

use crate::db::event_repo;
use crate::error::{PrmError, PrmResult};
use crate::model::{Event, EventDraft, Id, User};
use crate::validation::{self, trim_optional};

pub fn add_event(conn: &Connection, owner_id: Id<User>, draft: &EventDraft) -> PrmResult<Event> {
    let mut event = Event::create(String::new(), draft.date, String::new());
    apply_draft(&mut event, draft)?;
    event_repo::insert(conn, owner_id, &event)?;
    tracing::info!(event_id = %event.id, "event added");
    Ok(event)
}

pub fn update_event(
    conn: &Connection,
    owner_id: Id<User>,
    event_id: Id<Event>,
    draft: &EventDraft,
) -> PrmResult<Event> {
    let mut event = event_repo::find_by_id(conn, owner_id, event_id)?
        .ok_or_else(|| PrmError::not_found("Event", event_id))?;
    apply_draft(&mut event, draft)?;
    event_repo::update(conn, owner_id, &event)?;
    tracing::info!(event_id = %event.id, "event updated");
    Ok(event)
}

pub fn delete_event(conn: &Connection, owner_id: Id<User>, event_id: Id<Event>) -> PrmResult<()> {
    if !event_repo::delete(conn, owner_id, event_id)? {
        return Err(PrmError::not_found("Event", event_id));
    }
    tracing::info!(event_id = %event_id, "event deleted");
    Ok(())
}

fn apply_draft(event: &mut Event, draft: &EventDraft) -> PrmResult<()> {
    validation::date_range(draft.date, draft.end_date, "end_date")?;
    event.name = validation::non_blank(&draft.name, "name")?;
    event.location_name = validation::non_blank(&draft.location_name, "location_name")?;
    event.event_type = trim_optional(draft.event_type.as_deref());
    event.date = draft.date;
    event.end_date = draft.end_date;
    event.description = trim_optional(draft.description.as_deref());
    event.coordinates = validation::optional_geo_point(draft.coordinates)?;
    Ok(())
}
