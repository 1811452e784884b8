use crate::booking::prepare_booking;
use crate::db::{Collection, Database, Filter};
use crate::error::{DataError, DataResult};
use crate::event::prepare_event;
use crate::models::{Booking, BookingDraft, BookingId, Event, EventCard, EventDraft, EventId};

async fn ensure_slug_free(db: &Database, slug: &str) -> DataResult<()> {
    if db
        .exists(Collection::Event, Filter::Slug(slug.to_string()))
        .await?
    {
        tracing::warn!("rejected event write: slug `{slug}` already taken");
        return Err(DataError::Uniqueness(slug.to_string()));
    }
    Ok(())
}

pub async fn create_event(db: &Database, draft: &EventDraft) -> DataResult<Event> {
    let normalized = prepare_event(draft, None)?;
    ensure_slug_free(db, &normalized.slug).await?;
    let event = db.insert_event(normalized).await?;
    tracing::debug!(
        "created {} {} `{}`",
        Collection::Event.name(),
        event.id,
        event.fields.slug
    );
    Ok(event)
}

pub async fn update_event(db: &Database, id: EventId, draft: &EventDraft) -> DataResult<Event> {
    let previous = db.get_event(id).await?.ok_or(DataError::EventNotFound(id))?;
    let normalized = prepare_event(draft, Some(&previous.fields))?;
    if normalized.slug != previous.fields.slug {
        ensure_slug_free(db, &normalized.slug).await?;
    }
    let event = db.update_event(id, normalized).await?;
    tracing::debug!("updated {} {id}", Collection::Event.name());
    Ok(event)
}

pub async fn create_booking(db: &Database, draft: &BookingDraft) -> DataResult<Booking> {
    let normalized = prepare_booking(draft, None, db).await?;
    let booking = db.insert_booking(normalized).await?;
    tracing::debug!(
        "created {} {} for event {}",
        Collection::Booking.name(),
        booking.id,
        booking.event_id
    );
    Ok(booking)
}

pub async fn update_booking(
    db: &Database,
    id: BookingId,
    draft: &BookingDraft,
) -> DataResult<Booking> {
    let previous = db
        .get_booking(id)
        .await?
        .ok_or(DataError::BookingNotFound(id))?;
    let normalized = prepare_booking(draft, Some(&previous), db).await?;
    let booking = db.update_booking(id, normalized).await?;
    tracing::debug!("updated {} {id}", Collection::Booking.name());
    Ok(booking)
}

pub async fn bookings_for_event(db: &Database, event_id: EventId) -> DataResult<Vec<Booking>> {
    db.list_bookings_for_event(event_id).await
}

pub async fn find_event(db: &Database, slug: &str) -> DataResult<Option<Event>> {
    db.get_event_by_slug(slug).await
}

pub async fn list_event_cards(db: &Database) -> DataResult<Vec<EventCard>> {
    let mut events = db.list_events().await?;
    events.sort_by(|a, b| {
        (&a.fields.date, &a.fields.time, a.id).cmp(&(&b.fields.date, &b.fields.time, b.id))
    });
    Ok(events.iter().map(EventCard::from).collect())
}
