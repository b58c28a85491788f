use crate::database::*;
use crate::error::ServiceError;
use crate::model::*;
use actix_web::{error, http::StatusCode, web, HttpResponse, ResponseError};
use log::debug;
use serde::Deserialize;
use serde_json::{json, Value};

type Db = web::Data<Store>;

fn log_error<E: std::fmt::Debug>(err: E, message: &'static str) -> error::Error {
    debug!("{:?}", err);
    error::ErrorInternalServerError(message)
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::ValidationFailed(_) | ServiceError::RatingOutOfRange => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::DuplicateUser(_)
            | ServiceError::DuplicateTitle { .. }
            | ServiceError::DuplicateFingerprint(_) => StatusCode::CONFLICT,
            ServiceError::UserNotFound | ServiceError::BadSecret => StatusCode::UNAUTHORIZED,
            ServiceError::MovieNotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Store(_) | ServiceError::Codec(_) | ServiceError::Hash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // Do not reveal which usernames exist.
            ServiceError::UserNotFound | ServiceError::BadSecret => {
                "Invalid credentials".to_owned()
            }
            _ => self.to_string(),
        };
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Runs a store operation on the blocking thread pool.
async fn with_store<F, T>(db: Db, f: F) -> actix_web::Result<T>
where
    F: FnOnce(&Store) -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    let store = Store::clone(&db);
    let result = web::block(move || f(&store))
        .await
        .map_err(|err| log_error(err, "Blocking error"))?;
    Ok(result?)
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
}

async fn list_movies(params: web::Query<SearchParams>, db: Db) -> actix_web::Result<HttpResponse> {
    let query = params.into_inner().q;
    let movies = with_store(db, move |store| store.list_movies(query.as_deref())).await?;
    Ok(HttpResponse::Ok().json(movies))
}

async fn get_movie(movie_id: web::Path<u64>, db: Db) -> actix_web::Result<HttpResponse> {
    let movie_id = movie_id.into_inner();
    let movie = with_store(db, move |store| {
        store
            .get_movie(movie_id)?
            .ok_or(ServiceError::MovieNotFound(movie_id))
    })
    .await?;
    Ok(HttpResponse::Ok().json(movie))
}

async fn list_reviews(movie_id: web::Path<u64>, db: Db) -> actix_web::Result<HttpResponse> {
    let movie_id = movie_id.into_inner();
    let reviews = with_store(db, move |store| store.list_reviews(movie_id)).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

#[derive(Deserialize)]
struct Credentials {
    username: Option<String>,
    password: Option<String>,
}

async fn register(params: web::Json<Credentials>, db: Db) -> actix_web::Result<HttpResponse> {
    let Credentials { username, password } = params.into_inner();
    with_store(db, move |store| {
        store.register(
            &username.unwrap_or_default(),
            &password.unwrap_or_default(),
        )
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Registration successful" })))
}

async fn login(params: web::Json<Credentials>, db: Db) -> actix_web::Result<HttpResponse> {
    let Credentials { username, password } = params.into_inner();
    with_store(db, move |store| {
        store.login(
            &username.unwrap_or_default(),
            &password.unwrap_or_default(),
        )
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Login successful" })))
}

#[derive(Deserialize)]
struct MovieParams {
    title: Option<String>,
    year: Option<Value>,
    synopsis: Option<String>,
    director: Option<String>,
    cast: Option<String>,
    genre: Option<String>,
}

/// Accepts the year either as a JSON number or as a string. Numbers are
/// truncated toward zero and a numeric 0 counts as missing. Anything else is
/// passed on as text and rejected by the catalog.
fn year_text(year: Option<Value>) -> String {
    match year {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => {
            let year = n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64));
            match year {
                Some(0) | None => String::new(),
                Some(year) => year.to_string(),
            }
        }
        Some(other) => other.to_string(),
    }
}

async fn add_movie(params: web::Json<MovieParams>, db: Db) -> actix_web::Result<HttpResponse> {
    let params = params.into_inner();
    let movie = NewMovie {
        title: params.title.unwrap_or_default(),
        year: year_text(params.year),
        synopsis: params.synopsis.unwrap_or_default(),
        director: params.director.unwrap_or_default(),
        cast: params.cast.unwrap_or_default(),
        genre: params.genre.unwrap_or_default(),
    };
    let movie = with_store(db, move |store| store.add_movie(movie)).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Movie added", "movie": movie })))
}

#[derive(Deserialize)]
struct ReviewParams {
    movie_id: Option<u64>,
    author: Option<String>,
    rating: Option<Value>,
    text: Option<String>,
}

async fn add_review(params: web::Json<ReviewParams>, db: Db) -> actix_web::Result<HttpResponse> {
    let params = params.into_inner();
    let rating = match params.rating {
        None | Some(Value::Null) => return Err(ServiceError::validation("Missing fields").into()),
        Some(rating) => rating.as_i64().ok_or(ServiceError::RatingOutOfRange)?,
    };
    let review = NewReview {
        movie_id: params.movie_id.unwrap_or_default(),
        author: params.author.unwrap_or_default(),
        rating,
        text: params.text.unwrap_or_default(),
    };
    let text = with_store(db, move |store| store.add_review(review)).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Review added", "text": text })))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "Route not found" }))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest()
            .json(json!({ "error": format!("Invalid JSON: {}", err) }));
        error::InternalError::from_response(err, response).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/api/movies", web::get().to(list_movies))
        .route("/api/movies", web::post().to(add_movie))
        .route("/api/movies/{id}", web::get().to(get_movie))
        .route("/api/movies/{id}/reviews", web::get().to(list_reviews))
        .route("/api/reviews", web::post().to(add_review))
        .route("/api/register", web::post().to(register))
        .route("/api/login", web::post().to(login))
        .default_service(web::route().to(not_found));
}
