//! Tutor DTOs - Profilo pubblico dei tutor con riepilogo delle recensioni

use crate::dtos::{ReviewDTO, UserSummaryDTO};
use crate::entities::{Review, TutorProfile, User};
use chrono::{Datelike, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TutorDTO {
    pub user: UserSummaryDTO,
    pub hourly_rate: Option<f64>,
    pub currency: Option<String>,
    pub bio: Option<String>,
    pub subjects: Vec<String>,
    pub availability: Option<AvailabilityDTO>,
    pub member_since: i32,
    /// Mean rating rounded to one decimal, absent when there are no reviews
    pub average_rating: Option<f64>,
    pub review_count: usize,
}

/// Disponibilità settimanale: stessi orari per ogni giorno indicato
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AvailabilityDTO {
    pub days: Vec<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TutorDetailDTO {
    #[serde(flatten)]
    pub tutor: TutorDTO,
    pub reviews: Vec<ReviewDTO>,
}

impl TutorDTO {
    pub fn new(user: User, profile: Option<TutorProfile>, reviews: &[Review]) -> Self {
        let member_since = user.created_at.year();
        let (hourly_rate, currency, bio, subjects, availability) = match profile {
            Some(p) => (
                Some(p.hourly_rate),
                Some(p.currency),
                p.bio,
                p.subjects.0,
                Some(AvailabilityDTO {
                    days: p.available_days.0,
                    start_time: p.available_from,
                    end_time: p.available_until,
                }),
            ),
            None => (None, None, None, Vec::new(), None),
        };
        Self {
            user: user.into(),
            hourly_rate,
            currency,
            bio,
            subjects,
            availability,
            member_since,
            average_rating: average_rating(reviews),
            review_count: reviews.len(),
        }
    }
}

pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: i32 = reviews.iter().map(|r| r.rating).sum();
    let mean = f64::from(sum) / reviews.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}
