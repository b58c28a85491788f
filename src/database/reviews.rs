use super::{serialize_id, Store, MOVIES, REVIEWS};
use crate::error::{Result, ServiceError};
use crate::model::*;
use crate::text::normalize_review;
use chrono::{DateTime, SubsecRound, Utc};
use log::info;
use sled::transaction::{TransactionError, Transactional};

pub trait ReviewDb {
    /// Reviews of a movie, most recent first.
    fn list_reviews(&self, movie_id: u64) -> Result<Vec<Review>>;
    /// Stores a review and returns its normalized text.
    fn add_review(&self, review: NewReview) -> Result<String>;
}

/// Reviews are keyed by movie id, creation time in microseconds and review
/// id, so a prefix scan yields one movie's reviews oldest first. The id only
/// breaks ties between reviews created in the same microsecond.
fn review_key(movie_id: u64, created_at: &DateTime<Utc>, review_id: u64) -> [u8; 24] {
    let micros = created_at.timestamp_micros().max(0) as u64;
    let mut key = [0u8; 24];
    key[..8].copy_from_slice(&serialize_id(movie_id));
    key[8..16].copy_from_slice(&micros.to_be_bytes());
    key[16..].copy_from_slice(&serialize_id(review_id));
    key
}

impl ReviewDb for Store {
    fn list_reviews(&self, movie_id: u64) -> Result<Vec<Review>> {
        let reviews = self.tree(REVIEWS)?;
        reviews
            .scan_prefix(serialize_id(movie_id))
            .rev()
            .map(|entry| -> Result<Review> {
                let (_key, data) = entry?;
                Ok(bincode::deserialize(&data)?)
            })
            .collect()
    }

    fn add_review(&self, review: NewReview) -> Result<String> {
        if review.movie_id == 0 || review.author.is_empty() || review.text.is_empty() {
            return Err(ServiceError::validation("Missing fields"));
        }
        if !(1..=5).contains(&review.rating) {
            return Err(ServiceError::RatingOutOfRange);
        }
        let id = self.next_id()?;
        let review = Review {
            id,
            movie_id: review.movie_id,
            author: review.author,
            rating: review.rating as u8,
            text: normalize_review(&review.text),
            // Stored at key precision so listing order and timestamps agree.
            created_at: Utc::now().trunc_subsecs(6),
        };
        let record = bincode::serialize(&review)?;
        let key = review_key(review.movie_id, &review.created_at, id);
        let movie_key = serialize_id(review.movie_id);

        let movies = self.tree(MOVIES)?;
        let reviews = self.tree(REVIEWS)?;
        (&movies, &reviews)
            .transaction(|(movies, reviews)| {
                if movies.get(&movie_key[..])?.is_none() {
                    return sled::transaction::abort(());
                }
                reviews.insert(&key[..], &record[..])?;
                Ok(())
            })
            .map_err(|err| match err {
                TransactionError::Storage(e) => ServiceError::Store(e),
                TransactionError::Abort(()) => ServiceError::MovieNotFound(review.movie_id),
            })?;
        info!(
            "Added review {} for movie {} by {}",
            id, review.movie_id, review.author
        );
        Ok(review.text)
    }
}
