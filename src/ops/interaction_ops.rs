use rusqlite::Connection;

use crate::db::{event_repo, interaction_repo, person_repo};
use crate::error::{PrmError, PrmResult};
use crate::model::{Event, EventAttendance, Id, Interaction, InteractionDraft, User};
use crate::validation::{self, trim_optional};

pub fn log_interaction(
    conn: &Connection,
    owner_id: Id<User>,
    draft: &InteractionDraft,
) -> PrmResult<Interaction> {
    let interaction = build(conn, owner_id, draft)?;
    interaction_repo::insert(conn, owner_id, &interaction)?;
    tracing::info!(
        interaction_id = %interaction.id,
        person_id = %interaction.person_id,
        "interaction logged"
    );
    Ok(interaction)
}

/// Logs every draft or none of them.
pub fn log_batch(
    conn: &Connection,
    owner_id: Id<User>,
    drafts: &[InteractionDraft],
) -> PrmResult<Vec<Interaction>> {
    validation::non_empty_set(drafts, "interactions")?;

    let interactions = drafts
        .iter()
        .map(|draft| build(conn, owner_id, draft))
        .collect::<PrmResult<Vec<_>>>()?;

    let tx = conn.unchecked_transaction()?;
    for interaction in &interactions {
        interaction_repo::insert(&tx, owner_id, interaction)?;
    }
    tx.commit()?;

    tracing::info!(count = interactions.len(), "interaction batch logged");
    Ok(interactions)
}

/// Logs one interaction per attendee, dated and placed at the event.
/// Rows that name no person are skipped.
pub fn log_batch_for_event(
    conn: &Connection,
    owner_id: Id<User>,
    event_id: Id<Event>,
    rows: &[EventAttendance],
) -> PrmResult<Vec<Interaction>> {
    let event = event_repo::find_by_id(conn, owner_id, event_id)?
        .ok_or_else(|| PrmError::not_found("Event", event_id))?;

    let drafts: Vec<InteractionDraft> = rows
        .iter()
        .filter_map(|row| {
            let person_id = row.person_id?;
            Some(InteractionDraft {
                person_id,
                event_id: Some(event.id),
                date: event.date,
                interaction_type: row.interaction_type.clone(),
                sentiment: row.sentiment.clone(),
                notes: row.notes.clone(),
                location_name: Some(event.location_name.clone()),
                coordinates: event.coordinates,
            })
        })
        .collect();

    if drafts.is_empty() {
        return Err(PrmError::EmptySet {
            field: "people".into(),
        });
    }

    log_batch(conn, owner_id, &drafts)
}

pub fn update_interaction(
    conn: &Connection,
    owner_id: Id<User>,
    interaction_id: Id<Interaction>,
    draft: &InteractionDraft,
) -> PrmResult<Interaction> {
    let existing = interaction_repo::find_by_id(conn, owner_id, interaction_id)?
        .ok_or_else(|| PrmError::not_found("Interaction", interaction_id))?;

    let mut interaction = build(conn, owner_id, draft)?;
    interaction.id = existing.id;
    interaction.created_at = existing.created_at;

    interaction_repo::update(conn, owner_id, &interaction)?;
    tracing::info!(interaction_id = %interaction.id, "interaction updated");
    Ok(interaction)
}

pub fn delete_interaction(
    conn: &Connection,
    owner_id: Id<User>,
    interaction_id: Id<Interaction>,
) -> PrmResult<()> {
    if !interaction_repo::delete(conn, owner_id, interaction_id)? {
        return Err(PrmError::not_found("Interaction", interaction_id));
    }
    tracing::info!(interaction_id = %interaction_id, "interaction deleted");
    Ok(())
}

/// Validates a draft against the owner's people and events.
fn build(conn: &Connection, owner_id: Id<User>, draft: &InteractionDraft) -> PrmResult<Interaction> {
    person_repo::find_by_id(conn, owner_id, draft.person_id)?
        .ok_or_else(|| PrmError::not_found("Person", draft.person_id))?;
    if let Some(event_id) = draft.event_id {
        event_repo::find_by_id(conn, owner_id, event_id)?
            .ok_or_else(|| PrmError::not_found("Event", event_id))?;
    }

    let interaction_type = validation::non_blank(&draft.interaction_type, "type")?;

    let mut interaction = Interaction::create(draft.person_id, draft.date, interaction_type);
    interaction.event_id = draft.event_id;
    interaction.sentiment = trim_optional(draft.sentiment.as_deref());
    interaction.notes = trim_optional(draft.notes.as_deref());
    interaction.location_name = trim_optional(draft.location_name.as_deref());
    interaction.coordinates = validation::optional_geo_point(draft.coordinates)?;
    Ok(interaction)
}
