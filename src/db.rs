use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};

use crate::booking::EventLookup;
use crate::error::{ConnectionError, DataError, DataResult};
use crate::models::{Booking, BookingId, Event, EventId, NormalizedBooking, NormalizedEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Event,
    Booking,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Self::Event => "Event",
            Self::Booking => "Booking",
        }
    }

    fn table(self) -> &'static str {
        match self {
            Self::Event => "events",
            Self::Booking => "bookings",
        }
    }
}

#[derive(Clone, Debug)]
pub enum Filter {
    Id(i64),
    // events only
    Slug(String),
    // bookings only
    EventId(EventId),
}

#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self, ConnectionError> {
        let conn = Connection::open(path).map_err(|source| ConnectionError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.init_schema().map_err(ConnectionError::Schema)?;
        Ok(store)
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS events(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                slug TEXT NOT NULL,
                payload TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS events_slug_idx ON events(slug);
            CREATE TABLE IF NOT EXISTS bookings(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                event_id INTEGER NOT NULL,
                email TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS bookings_event_id_idx ON bookings(event_id);",
        )
    }

    pub fn exists(&self, collection: Collection, filter: &Filter) -> DataResult<bool> {
        let table = collection.table();
        let found = match filter {
            Filter::Id(id) => self.conn.query_row(
                &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)"),
                params![id],
                |row| row.get::<_, bool>(0),
            )?,
            Filter::Slug(slug) => self.conn.query_row(
                &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE slug = ?1)"),
                params![slug],
                |row| row.get::<_, bool>(0),
            )?,
            Filter::EventId(event_id) => self.conn.query_row(
                &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE event_id = ?1)"),
                params![event_id],
                |row| row.get::<_, bool>(0),
            )?,
        };
        Ok(found)
    }

    pub fn count_events(&self) -> DataResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn insert_event(&self, event: &NormalizedEvent) -> DataResult<Event> {
        let now = Utc::now();
        let payload = serde_json::to_string(event)?;
        self.conn
            .execute(
                "INSERT INTO events (slug, payload, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)",
                params![event.slug, payload, now],
            )
            .map_err(|err| unique_violation(err, &event.slug))?;
        Ok(Event {
            id: self.conn.last_insert_rowid(),
            fields: event.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_event(&self, id: EventId, event: &NormalizedEvent) -> DataResult<Event> {
        let now = Utc::now();
        let payload = serde_json::to_string(event)?;
        let changed = self
            .conn
            .execute(
                "UPDATE events SET slug = ?2, payload = ?3, updated_at = ?4 WHERE id = ?1",
                params![id, event.slug, payload, now],
            )
            .map_err(|err| unique_violation(err, &event.slug))?;
        if changed == 0 {
            return Err(DataError::EventNotFound(id));
        }
        self.get_event(id)?.ok_or(DataError::EventNotFound(id))
    }

    pub fn get_event(&self, id: EventId) -> DataResult<Option<Event>> {
        self.conn
            .query_row(
                "SELECT id, payload, created_at, updated_at FROM events WHERE id = ?1",
                params![id],
                event_row,
            )
            .optional()?
            .map(EventRow::into_event)
            .transpose()
    }

    pub fn get_event_by_slug(&self, slug: &str) -> DataResult<Option<Event>> {
        self.conn
            .query_row(
                "SELECT id, payload, created_at, updated_at FROM events WHERE slug = ?1",
                params![slug],
                event_row,
            )
            .optional()?
            .map(EventRow::into_event)
            .transpose()
    }

    pub fn list_events(&self) -> DataResult<Vec<Event>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, payload, created_at, updated_at FROM events ORDER BY id")?;
        let rows = stmt.query_map([], event_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_event()?);
        }
        Ok(out)
    }

    pub fn insert_booking(&self, booking: &NormalizedBooking) -> DataResult<Booking> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO bookings (event_id, email, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
            params![booking.event_id, booking.email, now],
        )?;
        Ok(Booking {
            id: self.conn.last_insert_rowid(),
            event_id: booking.event_id,
            email: booking.email.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_booking(&self, id: BookingId, booking: &NormalizedBooking) -> DataResult<Booking> {
        let changed = self.conn.execute(
            "UPDATE bookings SET event_id = ?2, email = ?3, updated_at = ?4 WHERE id = ?1",
            params![id, booking.event_id, booking.email, Utc::now()],
        )?;
        if changed == 0 {
            return Err(DataError::BookingNotFound(id));
        }
        self.get_booking(id)?.ok_or(DataError::BookingNotFound(id))
    }

    pub fn get_booking(&self, id: BookingId) -> DataResult<Option<Booking>> {
        let booking = self
            .conn
            .query_row(
                "SELECT id, event_id, email, created_at, updated_at FROM bookings WHERE id = ?1",
                params![id],
                booking_row,
            )
            .optional()?;
        Ok(booking)
    }

    pub fn list_bookings_for_event(&self, event_id: EventId) -> DataResult<Vec<Booking>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_id, email, created_at, updated_at FROM bookings
             WHERE event_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![event_id], booking_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

struct EventRow {
    id: EventId,
    payload: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EventRow {
    fn into_event(self) -> DataResult<Event> {
        let fields: NormalizedEvent = serde_json::from_str(&self.payload)?;
        Ok(Event {
            id: self.id,
            fields,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn event_row(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        payload: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

fn booking_row(row: &Row<'_>) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(0)?,
        event_id: row.get(1)?,
        email: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn unique_violation(err: rusqlite::Error, slug: &str) -> DataError {
    match err {
        rusqlite::Error::SqliteFailure(ref failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            DataError::Uniqueness(slug.to_string())
        }
        _ => DataError::Storage(err),
    }
}

#[derive(Clone, Debug)]
pub struct Database {
    store: Arc<Mutex<Store>>,
}

impl Database {
    pub async fn open(path: &Path) -> Result<Self, ConnectionError> {
        let path = path.to_path_buf();
        let store = tokio::task::spawn_blocking(move || Store::open(&path)).await??;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
        })
    }

    pub async fn in_memory() -> Result<Self, ConnectionError> {
        Self::open(Path::new(":memory:")).await
    }

    pub fn same_connection(&self, other: &Database) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }

    async fn with_store<F, T>(&self, op: F) -> DataResult<T>
    where
        F: FnOnce(&Store) -> DataResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let guard = store
                .lock()
                .map_err(|_| DataError::Internal("store mutex poisoned".to_string()))?;
            op(&guard)
        })
        .await?
    }

    pub async fn exists(&self, collection: Collection, filter: Filter) -> DataResult<bool> {
        self.with_store(move |store| store.exists(collection, &filter))
            .await
    }

    pub async fn count_events(&self) -> DataResult<i64> {
        self.with_store(Store::count_events).await
    }

    pub async fn insert_event(&self, event: NormalizedEvent) -> DataResult<Event> {
        self.with_store(move |store| store.insert_event(&event)).await
    }

    pub async fn update_event(&self, id: EventId, event: NormalizedEvent) -> DataResult<Event> {
        self.with_store(move |store| store.update_event(id, &event))
            .await
    }

    pub async fn get_event(&self, id: EventId) -> DataResult<Option<Event>> {
        self.with_store(move |store| store.get_event(id)).await
    }

    pub async fn get_event_by_slug(&self, slug: &str) -> DataResult<Option<Event>> {
        let slug = slug.to_string();
        self.with_store(move |store| store.get_event_by_slug(&slug))
            .await
    }

    pub async fn list_events(&self) -> DataResult<Vec<Event>> {
        self.with_store(Store::list_events).await
    }

    pub async fn insert_booking(&self, booking: NormalizedBooking) -> DataResult<Booking> {
        self.with_store(move |store| store.insert_booking(&booking))
            .await
    }

    pub async fn update_booking(
        &self,
        id: BookingId,
        booking: NormalizedBooking,
    ) -> DataResult<Booking> {
        self.with_store(move |store| store.update_booking(id, &booking))
            .await
    }

    pub async fn get_booking(&self, id: BookingId) -> DataResult<Option<Booking>> {
        self.with_store(move |store| store.get_booking(id)).await
    }

    pub async fn list_bookings_for_event(&self, event_id: EventId) -> DataResult<Vec<Booking>> {
        self.with_store(move |store| store.list_bookings_for_event(event_id))
            .await
    }
}

impl EventLookup for Database {
    async fn event_exists(&self, id: EventId) -> DataResult<bool> {
        self.exists(Collection::Event, Filter::Id(id)).await
    }
}
