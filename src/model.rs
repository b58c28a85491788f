use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub username: String,
    pub password_hash: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub year: i32,
    pub synopsis: String,
    pub director: String,
    pub cast: String,
    pub genre: String,
    pub fingerprint: String,
}

/// Movie as submitted, before validation. `year` is kept as text until the
/// catalog parses it.
#[derive(Debug, Clone, Default)]
pub struct NewMovie {
    pub title: String,
    pub year: String,
    pub synopsis: String,
    pub director: String,
    pub cast: String,
    pub genre: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    pub id: u64,
    pub movie_id: u64,
    pub author: String,
    pub rating: u8,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub movie_id: u64,
    pub author: String,
    pub rating: i64,
    pub text: String,
}
