//! Constraint resolver
//!
//! Three construction paths produce a [`ConstraintSet`]: explicit filters,
//! a weather snapshot, or an event label. Weather and event paths also yield
//! the [`Recommendation`] shown to the caller and carry their hints as a
//! pool-level [`PoolNarrowing`] rather than hard constraints.
use crate::{
    models::{label_set, ConstraintSet, OutfitFilters, PoolNarrowing, Recommendation, WeatherSnapshot},
    services::event_taxonomy,
};

const COLD_BELOW: f64 = 10.0;
const MILD_BELOW: f64 = 20.0;
const RAIN_STYLE: &str = "Waterproof";

/// Passes caller filters through; budget only applies outside owned-only mode
pub fn from_filters(filters: &OutfitFilters) -> ConstraintSet {
    ConstraintSet {
        event_type: filters.event_type.clone(),
        allowed_colors: label_set(&filters.colors),
        preferred_styles: label_set(filters.style.iter()),
        use_owned_only: filters.use_owned_only,
        budget_ceiling: if filters.use_owned_only {
            None
        } else {
            filters.budget
        },
        ..Default::default()
    }
}

/// Temperature bands; lower bounds are inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBand {
    Cold,
    Mild,
    Warm,
}

impl TemperatureBand {
    pub fn from_celsius(temperature: f64) -> Self {
        if temperature < COLD_BELOW {
            TemperatureBand::Cold
        } else if temperature < MILD_BELOW {
            TemperatureBand::Mild
        } else {
            TemperatureBand::Warm
        }
    }

    fn recommendation(self) -> Recommendation {
        match self {
            TemperatureBand::Cold => hints(&["Winter", "Fall"], &["Warm", "Layered"], &["Casual", "Formal"]),
            TemperatureBand::Mild => hints(
                &["Spring", "Fall"],
                &["Casual", "Smart Casual"],
                &["Casual", "Business"],
            ),
            TemperatureBand::Warm => hints(&["Summer", "Spring"], &["Light", "Casual"], &["Casual", "Sport"]),
        }
    }
}

fn hints(seasons: &[&str], styles: &[&str], occasions: &[&str]) -> Recommendation {
    Recommendation {
        seasons: owned_labels(seasons),
        styles: owned_labels(styles),
        occasions: owned_labels(occasions),
    }
}

/// Derives seasons, styles and occasions from current conditions
pub fn weather_recommendation(weather: &WeatherSnapshot) -> Recommendation {
    let mut recommendation = TemperatureBand::from_celsius(weather.temperature).recommendation();
    if weather.conditions.to_ascii_lowercase().contains("rain") {
        recommendation.styles.push(RAIN_STYLE.to_string());
    }
    recommendation
}

/// Weather path: the pool is narrowed to garments fitting the season or style hints
pub fn from_weather(weather: &WeatherSnapshot) -> (ConstraintSet, Recommendation) {
    let recommendation = weather_recommendation(weather);
    let constraints = ConstraintSet {
        narrowing: Some(PoolNarrowing::SeasonOrStyle {
            seasons: label_set(&recommendation.seasons),
            styles: label_set(&recommendation.styles),
        }),
        ..Default::default()
    };
    (constraints, recommendation)
}

/// Event path: the pool is narrowed to garments fitting the occasion or style hints
pub fn from_event(event_label: &str) -> (ConstraintSet, Recommendation) {
    let profile = event_taxonomy::lookup(event_label);
    let recommendation = Recommendation {
        seasons: Vec::new(),
        styles: owned_labels(profile.styles),
        occasions: owned_labels(profile.occasions),
    };
    let constraints = ConstraintSet {
        event_type: Some(event_label.trim().to_string()),
        narrowing: Some(PoolNarrowing::OccasionOrStyle {
            occasions: label_set(&recommendation.occasions),
            styles: label_set(&recommendation.styles),
        }),
        ..Default::default()
    };
    (constraints, recommendation)
}

fn owned_labels(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|label| label.to_string()).collect()
}
