use crate::error::{DataError, DataResult};
use crate::models::{EventDraft, NormalizedEvent};
use crate::normalize::{normalize_date, normalize_time, required_list, required_string, slugify};

struct Merged<'a> {
    value: Option<&'a str>,
    changed: bool,
}

fn merge<'a>(candidate: Option<&'a str>, previous: Option<&'a str>) -> Merged<'a> {
    match (candidate, previous) {
        (Some(new), Some(old)) => Merged {
            value: Some(new),
            changed: new.trim() != old,
        },
        (Some(new), None) => Merged {
            value: Some(new),
            changed: true,
        },
        (None, old) => Merged {
            value: old,
            changed: false,
        },
    }
}

/// `previous` is the currently stored version of the event, or `None` when creating one.
/// Slug, date and time are only recomputed when their source field changed.
pub fn prepare_event(
    candidate: &EventDraft,
    previous: Option<&NormalizedEvent>,
) -> DataResult<NormalizedEvent> {
    let title = merge(candidate.title.as_deref(), previous.map(|p| p.title.as_str()));
    let date = merge(candidate.date.as_deref(), previous.map(|p| p.date.as_str()));
    let time = merge(candidate.time.as_deref(), previous.map(|p| p.time.as_str()));
    let text = |field: &'static str, value: &Option<String>, old: Option<&str>| {
        required_string(field, merge(value.as_deref(), old).value)
    };

    let title_value = required_string("Title", title.value)?;
    let description = text(
        "Description",
        &candidate.description,
        previous.map(|p| p.description.as_str()),
    )?;
    let overview = text("Overview", &candidate.overview, previous.map(|p| p.overview.as_str()))?;
    let image = text("Image", &candidate.image, previous.map(|p| p.image.as_str()))?;
    let venue = text("Venue", &candidate.venue, previous.map(|p| p.venue.as_str()))?;
    let location = text("Location", &candidate.location, previous.map(|p| p.location.as_str()))?;
    let date_value = required_string("Date", date.value)?;
    let time_value = required_string("Time", time.value)?;
    let mode = text("Mode", &candidate.mode, previous.map(|p| p.mode.as_str()))?;
    let audience = text("Audience", &candidate.audience, previous.map(|p| p.audience.as_str()))?;
    let agenda = required_list(
        "Agenda",
        candidate
            .agenda
            .as_deref()
            .or(previous.map(|p| p.agenda.as_slice())),
    )?;
    let organizer = text(
        "Organizer",
        &candidate.organizer,
        previous.map(|p| p.organizer.as_str()),
    )?;
    let tags = required_list(
        "Tags",
        candidate
            .tags
            .as_deref()
            .or(previous.map(|p| p.tags.as_slice())),
    )?;

    let slug = match previous {
        Some(prev) if !title.changed => prev.slug.clone(),
        _ => {
            let slug = slugify(&title_value);
            if slug.is_empty() {
                return Err(DataError::RequiredField("Slug"));
            }
            slug
        }
    };
    let date = if date.changed {
        normalize_date(&date_value)?
    } else {
        date_value
    };
    let time = if time.changed {
        normalize_time(&time_value)?
    } else {
        time_value
    };

    Ok(NormalizedEvent {
        title: title_value,
        slug,
        description,
        overview,
        image,
        venue,
        location,
        date,
        time,
        mode,
        audience,
        agenda,
        organizer,
        tags,
    })
}
