//! Fixed event taxonomy
//!
//! In-process lookup from an event label to occasion and style hints.
//! Unknown labels are not an error: they fall back to a casual profile.

/// Known event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Formal,
    Casual,
    Business,
    Sport,
    Evening,
}

impl EventKind {
    /// Case-insensitive parse; `None` for labels outside the taxonomy
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "formal" => Some(EventKind::Formal),
            "casual" => Some(EventKind::Casual),
            "business" => Some(EventKind::Business),
            "sport" => Some(EventKind::Sport),
            "evening" => Some(EventKind::Evening),
            _ => None,
        }
    }

    pub fn profile(self) -> EventProfile {
        match self {
            EventKind::Formal => EventProfile {
                occasions: &["Formal"],
                styles: &["Elegant", "Classic"],
            },
            EventKind::Casual => EventProfile {
                occasions: &["Casual"],
                styles: &["Comfortable", "Relaxed"],
            },
            EventKind::Business => EventProfile {
                occasions: &["Business", "Formal"],
                styles: &["Professional", "Smart Casual"],
            },
            EventKind::Sport => EventProfile {
                occasions: &["Sport"],
                styles: &["Athletic", "Comfortable"],
            },
            EventKind::Evening => EventProfile {
                occasions: &["Evening", "Formal"],
                styles: &["Elegant", "Chic"],
            },
        }
    }
}

/// Occasion and style hints for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventProfile {
    pub occasions: &'static [&'static str],
    pub styles: &'static [&'static str],
}

pub const FALLBACK_PROFILE: EventProfile = EventProfile {
    occasions: &["Casual"],
    styles: &["Comfortable"],
};

/// Looks up the hints for an event label
pub fn lookup(event_label: &str) -> EventProfile {
    EventKind::from_label(event_label)
        .map(EventKind::profile)
        .unwrap_or(FALLBACK_PROFILE)
}
