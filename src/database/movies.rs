use super::{seed::STARTER_MOVIES, serialize_id, Store, MOVIES, MOVIES_FINGERPRINT, MOVIES_TITLE};
use crate::error::{Result, ServiceError};
use crate::hash::{fingerprint, normalize_title};
use crate::model::*;
use log::{debug, info};
use sled::transaction::{
    ConflictableTransactionResult, TransactionError, TransactionalTree, Transactional,
};
use sled::IVec;

pub trait MovieDb {
    /// All movies in insertion order, or those matching `query` when it is
    /// non-empty.
    fn list_movies(&self, query: Option<&str>) -> Result<Vec<Movie>>;
    fn get_movie(&self, id: u64) -> Result<Option<Movie>>;
    fn add_movie(&self, movie: NewMovie) -> Result<Movie>;
    /// Inserts the starter catalog if no movie exists yet. Returns the number
    /// of inserted movies.
    fn seed_movies(&self) -> Result<usize>;
}

enum Conflict {
    Title(Option<IVec>),
    Fingerprint(String),
}

fn matches_query(movie: &Movie, query: &str, query_lower: &str) -> bool {
    movie.title.to_lowercase().contains(query_lower)
        || movie.director.to_lowercase().contains(query_lower)
        || movie.genre.to_lowercase().contains(query_lower)
        || movie.year.to_string().contains(query)
}

fn validate(movie: NewMovie) -> Result<(NewMovie, i32)> {
    let fields = [
        &movie.title,
        &movie.year,
        &movie.synopsis,
        &movie.director,
        &movie.cast,
        &movie.genre,
    ];
    if fields.iter().any(|field| field.is_empty()) {
        return Err(ServiceError::validation("All fields are required"));
    }
    let year = movie
        .year
        .trim()
        .parse()
        .map_err(|_| ServiceError::validation("Year must be a valid number"))?;
    Ok((movie, year))
}

impl MovieDb for Store {
    fn list_movies(&self, query: Option<&str>) -> Result<Vec<Movie>> {
        let movies = self.tree(MOVIES)?;
        let query = query.filter(|q| !q.is_empty());
        let query_lower = query.map(str::to_lowercase);
        let mut ret = Vec::new();
        for entry in movies.iter() {
            let (_id, data) = entry?;
            let movie: Movie = bincode::deserialize(&data)?;
            let keep = match (query, &query_lower) {
                (Some(q), Some(lower)) => matches_query(&movie, q, lower),
                _ => true,
            };
            if keep {
                ret.push(movie);
            }
        }
        Ok(ret)
    }

    fn get_movie(&self, id: u64) -> Result<Option<Movie>> {
        let movies = self.tree(MOVIES)?;
        match movies.get(serialize_id(id))? {
            Some(data) => Ok(Some(bincode::deserialize(&data)?)),
            None => Ok(None),
        }
    }

    fn add_movie(&self, movie: NewMovie) -> Result<Movie> {
        let pending = self.prepare(movie)?;
        let movies = self.tree(MOVIES)?;
        let movies_title = self.tree(MOVIES_TITLE)?;
        let movies_fingerprint = self.tree(MOVIES_FINGERPRINT)?;
        (&movies, &movies_title, &movies_fingerprint)
            .transaction(|(movies, movies_title, movies_fingerprint)| {
                insert_pending(movies, movies_title, movies_fingerprint, &pending)
            })
            .map_err(conflict_error)?;
        let movie = pending.movie;
        info!("Added movie {} {:?} ({})", movie.id, movie.title, movie.year);
        Ok(movie)
    }

    fn seed_movies(&self) -> Result<usize> {
        let movies = self.tree(MOVIES)?;
        if !movies.is_empty() {
            return Ok(0);
        }
        let pending = STARTER_MOVIES
            .iter()
            .map(|(title, year, synopsis, director, cast, genre)| {
                self.prepare(NewMovie {
                    title: title.to_string(),
                    year: year.to_string(),
                    synopsis: synopsis.to_string(),
                    director: director.to_string(),
                    cast: cast.to_string(),
                    genre: genre.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let movies_title = self.tree(MOVIES_TITLE)?;
        let movies_fingerprint = self.tree(MOVIES_FINGERPRINT)?;
        // All or nothing, so an interrupted seed leaves an empty catalog that
        // is seeded again on the next start.
        (&movies, &movies_title, &movies_fingerprint)
            .transaction(|(movies, movies_title, movies_fingerprint)| {
                for movie in &pending {
                    insert_pending(movies, movies_title, movies_fingerprint, movie)?;
                }
                Ok(())
            })
            .map_err(conflict_error)?;
        Ok(pending.len())
    }
}

/// A validated movie with its id assigned, ready to be written.
struct PendingMovie {
    movie: Movie,
    title_key: String,
    record: Vec<u8>,
}

impl Store {
    fn prepare(&self, movie: NewMovie) -> Result<PendingMovie> {
        let (movie, year) = validate(movie)?;
        let title_key = normalize_title(&movie.title);
        let movie = Movie {
            id: self.next_id()?,
            fingerprint: fingerprint(&movie.title, year),
            title: movie.title,
            year,
            synopsis: movie.synopsis,
            director: movie.director,
            cast: movie.cast,
            genre: movie.genre,
        };
        let record = bincode::serialize(&movie)?;
        Ok(PendingMovie {
            movie,
            title_key,
            record,
        })
    }
}

/// Writes the movie and both of its unique indexes, aborting on a taken
/// normalized title or fingerprint.
fn insert_pending(
    movies: &TransactionalTree,
    movies_title: &TransactionalTree,
    movies_fingerprint: &TransactionalTree,
    pending: &PendingMovie,
) -> ConflictableTransactionResult<(), Conflict> {
    let key = serialize_id(pending.movie.id);
    let fingerprint_key = pending.movie.fingerprint.as_bytes();
    if let Some(existing) = movies_title.get(pending.title_key.as_bytes())? {
        return sled::transaction::abort(Conflict::Title(movies.get(existing)?));
    }
    if movies_fingerprint.get(fingerprint_key)?.is_some() {
        return sled::transaction::abort(Conflict::Fingerprint(
            pending.movie.fingerprint.clone(),
        ));
    }
    movies_title.insert(pending.title_key.as_bytes(), &key[..])?;
    movies_fingerprint.insert(fingerprint_key, &key[..])?;
    movies.insert(&key[..], &pending.record[..])?;
    Ok(())
}

fn conflict_error(err: TransactionError<Conflict>) -> ServiceError {
    match err {
        TransactionError::Storage(e) => e.into(),
        TransactionError::Abort(Conflict::Title(Some(data))) => {
            match bincode::deserialize::<Movie>(&data) {
                Ok(existing) => {
                    debug!("Title conflicts with {:?}", existing.title);
                    ServiceError::DuplicateTitle {
                        title: existing.title,
                        year: existing.year,
                    }
                }
                Err(e) => e.into(),
            }
        }
        TransactionError::Abort(Conflict::Title(None)) => {
            ServiceError::Store(sled::Error::ReportableBug(format!(
                "Bad index {}",
                String::from_utf8_lossy(MOVIES_TITLE)
            )))
        }
        TransactionError::Abort(Conflict::Fingerprint(taken)) => {
            ServiceError::DuplicateFingerprint(taken)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_movie(title: &str, year: &str) -> NewMovie {
        NewMovie {
            title: title.to_owned(),
            year: year.to_owned(),
            synopsis: "synopsis".to_owned(),
            director: "Someone".to_owned(),
            cast: "A, B".to_owned(),
            genre: "Drama".to_owned(),
        }
    }

    #[test]
    fn add_and_get() {
        let store = Store::temporary();
        let movie = store.add_movie(new_movie("Heat", "1995")).unwrap();
        assert!(movie.id > 0);
        assert_eq!(movie.year, 1995);
        assert_eq!(movie.fingerprint, fingerprint("heat", 1995));
        assert_eq!(store.get_movie(movie.id).unwrap(), Some(movie));
        assert_eq!(store.get_movie(12345).unwrap(), None);
    }

    #[test]
    fn duplicate_title_ignores_year() {
        let store = Store::temporary();
        store.add_movie(new_movie("inception", "1999")).unwrap();
        match store.add_movie(new_movie("Inception", "2010")) {
            Err(ServiceError::DuplicateTitle { title, year }) => {
                assert_eq!(title, "inception");
                assert_eq!(year, 1999);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            store.add_movie(new_movie("IN CEP TION", "1999")),
            Err(ServiceError::DuplicateTitle { .. })
        ));
        assert_eq!(store.list_movies(None).unwrap().len(), 1);
    }

    #[test]
    fn validation() {
        let store = Store::temporary();
        assert!(matches!(
            store.add_movie(new_movie("Heat", "nineteen")),
            Err(ServiceError::ValidationFailed(_))
        ));
        assert!(matches!(
            store.add_movie(new_movie("", "1995")),
            Err(ServiceError::ValidationFailed(_))
        ));
        let mut missing_cast = new_movie("Heat", "1995");
        missing_cast.cast.clear();
        assert!(matches!(
            store.add_movie(missing_cast),
            Err(ServiceError::ValidationFailed(_))
        ));
        assert_eq!(store.add_movie(new_movie("Heat", " 1995 ")).unwrap().year, 1995);
    }

    #[test]
    fn search() {
        let store = Store::temporary();
        store.seed_movies().unwrap();
        let titles = |q: &str| -> Vec<String> {
            store
                .list_movies(Some(q))
                .unwrap()
                .into_iter()
                .map(|m| m.title)
                .collect()
        };
        assert_eq!(titles("2010"), vec!["Inception"]);
        assert_eq!(
            titles("nolan"),
            vec!["Interestelar", "Inception", "El Caballero de la Noche"]
        );
        assert_eq!(titles("ROMANCE"), vec!["Forrest Gump", "Titanic"]);
        assert_eq!(titles("199").len(), 4);
        assert_eq!(titles("titan"), vec!["Titanic"]);
        // cast is not searched
        assert!(titles("dicaprio").is_empty());
        assert_eq!(titles("").len(), 8);
        assert_eq!(store.list_movies(None).unwrap().len(), 8);
    }

    #[test]
    fn list_in_insertion_order() {
        let store = Store::temporary();
        store.add_movie(new_movie("Zodiac", "2007")).unwrap();
        store.add_movie(new_movie("Alien", "1979")).unwrap();
        let titles: Vec<_> = store
            .list_movies(None)
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["Zodiac", "Alien"]);
    }

    #[test]
    fn seed_once() {
        let store = Store::temporary();
        assert_eq!(store.seed_movies().unwrap(), 8);
        assert_eq!(store.seed_movies().unwrap(), 0);
        assert_eq!(store.list_movies(None).unwrap().len(), 8);
    }

    #[test]
    fn failed_seed_writes_nothing() {
        let store = Store::temporary();
        // A dangling title index entry for the last starter movie makes the
        // seed transaction abort after the first seven inserts.
        store
            .tree(MOVIES_TITLE)
            .unwrap()
            .insert("titanic", &serialize_id(999_999)[..])
            .unwrap();
        assert!(matches!(store.seed_movies(), Err(ServiceError::Store(_))));
        assert!(store.list_movies(None).unwrap().is_empty());
        assert!(store.tree(MOVIES_FINGERPRINT).unwrap().is_empty());

        store.tree(MOVIES_TITLE).unwrap().clear().unwrap();
        assert_eq!(store.seed_movies().unwrap(), 8);
        assert_eq!(store.list_movies(None).unwrap().len(), 8);
    }

    #[test]
    fn concurrent_same_title_has_one_winner() {
        let store = Store::temporary();
        let handles: Vec<_> = ["Heat", "HEAT", "he at", "heat", "H E A T", "hEaT"]
            .iter()
            .enumerate()
            .map(|(i, title)| {
                let store = store.clone();
                let movie = new_movie(title, &(1990 + i).to_string());
                std::thread::spawn(move || store.add_movie(movie))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| matches!(r, Err(ServiceError::DuplicateTitle { .. }))));
        assert_eq!(store.list_movies(None).unwrap().len(), 1);
    }
}
