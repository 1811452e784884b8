use std::future::Future;

use crate::error::{DataError, DataResult};
use crate::models::{Booking, BookingDraft, EventId, NormalizedBooking};
use crate::normalize::{normalize_email, required_string};

/// Answers whether an event exists, for reference checks on bookings.
///
/// An `Err` means the lookup itself could not be performed.
pub trait EventLookup {
    fn event_exists(&self, id: EventId) -> impl Future<Output = DataResult<bool>> + Send;
}

pub async fn prepare_booking<L>(
    candidate: &BookingDraft,
    previous: Option<&Booking>,
    events: &L,
) -> DataResult<NormalizedBooking>
where
    L: EventLookup + Sync,
{
    let event_id = candidate
        .event_id
        .or(previous.map(|p| p.event_id))
        .ok_or(DataError::RequiredField("Event reference (eventId)"))?;
    let email = required_string(
        "Email",
        candidate
            .email
            .as_deref()
            .or(previous.map(|p| p.email.as_str())),
    )?;
    let email = normalize_email(&email)?;

    let event_changed = previous.map_or(true, |p| p.event_id != event_id);
    if event_changed {
        let exists = events.event_exists(event_id).await.map_err(|err| {
            tracing::warn!("event lookup for booking failed: {err}");
            DataError::DependencyUnavailable(err.to_string())
        })?;
        if !exists {
            return Err(DataError::DanglingReference(event_id));
        }
    }

    Ok(NormalizedBooking { event_id, email })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;

    use super::*;

    struct FakeEvents {
        ids: HashSet<EventId>,
        calls: AtomicUsize,
        reachable: bool,
    }

    impl FakeEvents {
        fn with(ids: &[EventId]) -> Self {
            Self {
                ids: ids.iter().copied().collect(),
                calls: AtomicUsize::new(0),
                reachable: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl EventLookup for FakeEvents {
        fn event_exists(&self, id: EventId) -> impl Future<Output = DataResult<bool>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = if self.reachable {
                Ok(self.ids.contains(&id))
            } else {
                Err(DataError::Internal("store offline".to_string()))
            };
            async move { result }
        }
    }

    fn booking(event_id: EventId, email: &str) -> Booking {
        let now = Utc::now();
        Booking {
            id: 1,
            event_id,
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn draft(event_id: Option<EventId>, email: Option<&str>) -> BookingDraft {
        BookingDraft {
            event_id,
            email: email.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn email_is_normalized() {
        let events = FakeEvents::with(&[7]);
        let booking = prepare_booking(&draft(Some(7), Some("User@Example.com")), None, &events)
            .await
            .unwrap();
        assert_eq!(booking.email, "user@example.com");
        assert_eq!(booking.event_id, 7);
        assert_eq!(events.calls(), 1);
    }

    #[tokio::test]
    async fn invalid_email_wins_over_missing_event() {
        let events = FakeEvents::with(&[]);
        let result = prepare_booking(&draft(Some(7), Some("not-an-email")), None, &events).await;
        assert!(matches!(result, Err(DataError::InvalidEmail(_))));
        assert_eq!(events.calls(), 0);
    }

    #[tokio::test]
    async fn missing_fields_are_required() {
        let events = FakeEvents::with(&[7]);
        let result = prepare_booking(&draft(None, Some("a@b.co")), None, &events).await;
        assert!(matches!(result, Err(DataError::RequiredField(_))));

        let result = prepare_booking(&draft(Some(7), Some("  ")), None, &events).await;
        assert!(matches!(result, Err(DataError::RequiredField("Email"))));
    }

    #[tokio::test]
    async fn unknown_event_is_dangling() {
        let events = FakeEvents::with(&[1]);
        let result = prepare_booking(&draft(Some(2), Some("a@b.co")), None, &events).await;
        assert!(matches!(result, Err(DataError::DanglingReference(2))));
    }

    #[tokio::test]
    async fn unreachable_lookup_is_not_a_missing_event() {
        let mut events = FakeEvents::with(&[1]);
        events.reachable = false;
        let result = prepare_booking(&draft(Some(1), Some("a@b.co")), None, &events).await;
        assert!(matches!(result, Err(DataError::DependencyUnavailable(_))));
    }

    #[tokio::test]
    async fn email_update_skips_event_lookup() {
        // The event was deleted out from under the booking; an email-only update still passes.
        let events = FakeEvents::with(&[]);
        let stored = booking(3, "old@example.com");
        let updated = prepare_booking(&draft(None, Some("New@Example.com")), Some(&stored), &events)
            .await
            .unwrap();
        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.event_id, 3);
        assert_eq!(events.calls(), 0);

        let same_event = draft(Some(3), Some("new@example.com"));
        prepare_booking(&same_event, Some(&stored), &events).await.unwrap();
        assert_eq!(events.calls(), 0);
    }

    #[tokio::test]
    async fn stored_email_is_rechecked() {
        let events = FakeEvents::with(&[3]);
        let stored = booking(3, "bypassed-validation");
        let result = prepare_booking(&BookingDraft::default(), Some(&stored), &events).await;
        assert!(matches!(result, Err(DataError::InvalidEmail(_))));
    }

    #[tokio::test]
    async fn moving_to_another_event_rechecks() {
        let events = FakeEvents::with(&[3, 4]);
        let stored = booking(3, "a@b.co");
        let moved = prepare_booking(&draft(Some(4), None), Some(&stored), &events)
            .await
            .unwrap();
        assert_eq!(moved.event_id, 4);
        assert_eq!(events.calls(), 1);

        let result = prepare_booking(&draft(Some(5), None), Some(&stored), &events).await;
        assert!(matches!(result, Err(DataError::DanglingReference(5))));
    }
}
