use crate::db::Database;
use crate::error::DataResult;
use crate::models::EventDraft;
use crate::service;

struct FeaturedEvent {
    title: &'static str,
    image: &'static str,
    venue: &'static str,
    location: &'static str,
    date: &'static str,
    time: &'static str,
    mode: &'static str,
    organizer: &'static str,
    tags: &'static [&'static str],
}

const FEATURED: [FeaturedEvent; 7] = [
    FeaturedEvent {
        title: "React Summit 2026",
        image: "/images/event1.png",
        venue: "Beurs van Berlage",
        location: "Amsterdam, Netherlands",
        date: "March 18, 2026",
        time: "09:00 AM",
        mode: "hybrid",
        organizer: "GitNation",
        tags: &["react", "frontend", "javascript"],
    },
    FeaturedEvent {
        title: "Next.js Conf 2026",
        image: "/images/event2.png",
        venue: "SVN West",
        location: "San Francisco, CA, USA",
        date: "April 22, 2026",
        time: "10:00 AM",
        mode: "hybrid",
        organizer: "Vercel",
        tags: &["nextjs", "react", "web"],
    },
    FeaturedEvent {
        title: "JSConf EU 2026",
        image: "/images/event3.png",
        venue: "Arena Berlin",
        location: "Berlin, Germany",
        date: "May 12, 2026",
        time: "09:30 AM",
        mode: "offline",
        organizer: "JSConf EU",
        tags: &["javascript", "community"],
    },
    FeaturedEvent {
        title: "HackMIT 2026",
        image: "/images/event4.png",
        venue: "MIT Stata Center",
        location: "Cambridge, MA, USA",
        date: "January 24, 2026",
        time: "08:00 AM",
        mode: "offline",
        organizer: "HackMIT",
        tags: &["hackathon", "students"],
    },
    FeaturedEvent {
        title: "ETHGlobal London 2026",
        image: "/images/event5.png",
        venue: "Truman Brewery",
        location: "London, UK",
        date: "June 5, 2026",
        time: "09:00 AM",
        mode: "offline",
        organizer: "ETHGlobal",
        tags: &["ethereum", "web3", "hackathon"],
    },
    FeaturedEvent {
        title: "Flutter Forward 2026",
        image: "/images/event6.png",
        venue: "Javits Center",
        location: "New York, NY, USA",
        date: "September 14, 2026",
        time: "10:00 AM",
        mode: "hybrid",
        organizer: "Google",
        tags: &["flutter", "mobile", "dart"],
    },
    FeaturedEvent {
        title: "GitHub Universe 2025",
        image: "/images/event-full.png",
        venue: "Fort Mason Center",
        location: "Virtual / San Francisco, CA, USA",
        date: "November 12, 2025",
        time: "04:00 PM",
        mode: "online",
        organizer: "GitHub",
        tags: &["github", "devtools", "ai"],
    },
];

impl FeaturedEvent {
    fn to_draft(&self) -> EventDraft {
        EventDraft {
            title: Some(self.title.to_string()),
            description: Some(format!(
                "{} brings the community together in {}.",
                self.title, self.location
            )),
            overview: Some(format!(
                "Talks, workshops and networking hosted by {}.",
                self.organizer
            )),
            image: Some(self.image.to_string()),
            venue: Some(self.venue.to_string()),
            location: Some(self.location.to_string()),
            date: Some(self.date.to_string()),
            time: Some(self.time.to_string()),
            mode: Some(self.mode.to_string()),
            audience: Some("Developers".to_string()),
            agenda: Some(vec![
                "Registration".to_string(),
                "Opening keynote".to_string(),
                "Sessions".to_string(),
                "Networking".to_string(),
            ]),
            organizer: Some(self.organizer.to_string()),
            tags: Some(self.tags.iter().map(|tag| tag.to_string()).collect()),
        }
    }
}

pub fn featured_events() -> Vec<EventDraft> {
    FEATURED.iter().map(FeaturedEvent::to_draft).collect()
}

pub async fn seed_if_empty(db: &Database) -> DataResult<usize> {
    if db.count_events().await? > 0 {
        return Ok(0);
    }

    let drafts = featured_events();
    for draft in &drafts {
        service::create_event(db, draft).await?;
    }
    tracing::info!("seeded {} featured events", drafts.len());
    Ok(drafts.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::prepare_event;

    #[test]
    fn catalogue_is_valid() {
        let events: Vec<_> = featured_events()
            .iter()
            .map(|draft| prepare_event(draft, None).unwrap())
            .collect();
        assert_eq!(events.len(), 7);
        assert_eq!(events[0].slug, "react-summit-2026");
        assert_eq!(events[1].slug, "next-js-conf-2026");
        assert_eq!(events[6].date, "2025-11-12");
        assert_eq!(events[6].time, "16:00");
    }

    #[tokio::test]
    async fn seeding_runs_once() {
        let db = Database::in_memory().await.unwrap();
        assert_eq!(seed_if_empty(&db).await.unwrap(), 7);
        assert_eq!(seed_if_empty(&db).await.unwrap(), 0);
        assert_eq!(db.count_events().await.unwrap(), 7);
    }
}
