//! Tutor profile entity - Dati aggiuntivi degli utenti con ruolo TUTOR

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct TutorProfile {
    pub tutor_id: i32, // coincide con user_id
    pub hourly_rate: f64,
    pub currency: String,
    pub bio: Option<String>,
    /// Materie offerte, colonna JSON
    pub subjects: Json<Vec<String>>,
    /// Giorni disponibili in minuscolo ("monday", ...), colonna JSON
    pub available_days: Json<Vec<String>>,
    pub available_from: NaiveTime,
    pub available_until: NaiveTime,
}

impl TutorProfile {
    /// Case-insensitive match against the offered subjects
    pub fn offers(&self, subject: &str) -> bool {
        let subject = subject.trim();
        self.subjects
            .iter()
            .any(|s| s.trim().eq_ignore_ascii_case(subject))
    }

    pub fn works_on(&self, day: Weekday) -> bool {
        self.available_days
            .iter()
            .filter_map(|d| d.trim().parse::<Weekday>().ok())
            .any(|d| d == day)
    }

    /// True when `[start, end]` lies inside the daily availability window
    pub fn covers(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.available_from <= start && end <= self.available_until
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> TutorProfile {
        TutorProfile {
            tutor_id: 1,
            hourly_rate: 45.0,
            currency: "NZD".to_string(),
            bio: None,
            subjects: Json(vec!["Mathematics".to_string(), "Physics".to_string()]),
            available_days: Json(vec!["monday".to_string(), "Wednesday".to_string()]),
            available_from: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            available_until: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        }
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn subjects_match_ignoring_case() {
        let p = profile();
        assert!(p.offers("mathematics"));
        assert!(p.offers(" Physics "));
        assert!(!p.offers("Chemistry"));
    }

    #[test]
    fn days_are_parsed_from_names() {
        let p = profile();
        assert!(p.works_on(Weekday::Mon));
        assert!(p.works_on(Weekday::Wed));
        assert!(!p.works_on(Weekday::Sun));
    }

    #[test]
    fn window_must_fit_availability() {
        let p = profile();
        assert!(p.covers(at(9, 0), at(17, 0)));
        assert!(p.covers(at(10, 30), at(11, 30)));
        assert!(!p.covers(at(8, 30), at(9, 30)));
        assert!(!p.covers(at(16, 30), at(17, 30)));
    }
}
