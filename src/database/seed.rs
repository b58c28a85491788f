/// (title, year, synopsis, director, cast, genre)
pub(super) type StarterMovie = (
    &'static str,
    i32,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

pub(super) const STARTER_MOVIES: &[StarterMovie] = &[
    (
        "El Padrino",
        1972,
        "La historia de la familia Corleone, una poderosa familia mafiosa de Nueva York.",
        "Francis Ford Coppola",
        "Marlon Brando, Al Pacino, James Caan",
        "Drama, Crimen",
    ),
    (
        "Interestelar",
        2014,
        "Un grupo de exploradores viaja a través de un agujero de gusano en el espacio para asegurar la supervivencia de la humanidad.",
        "Christopher Nolan",
        "Matthew McConaughey, Anne Hathaway, Jessica Chastain",
        "Ciencia Ficción, Drama",
    ),
    (
        "Inception",
        2010,
        "Un ladrón que roba secretos corporativos a través del uso de la tecnología de compartir sueños recibe la tarea inversa de plantar una idea.",
        "Christopher Nolan",
        "Leonardo DiCaprio, Joseph Gordon-Levitt, Ellen Page",
        "Ciencia Ficción, Acción",
    ),
    (
        "Matrix",
        1999,
        "Un hacker descubre que la realidad que conoce es una simulación creada por máquinas inteligentes.",
        "Lana Wachowski, Lilly Wachowski",
        "Keanu Reeves, Laurence Fishburne, Carrie-Anne Moss",
        "Ciencia Ficción, Acción",
    ),
    (
        "Pulp Fiction",
        1994,
        "Varias historias entrelazadas de crimen en Los Ángeles.",
        "Quentin Tarantino",
        "John Travolta, Uma Thurman, Samuel L. Jackson",
        "Crimen, Drama",
    ),
    (
        "Forrest Gump",
        1994,
        "La vida de un hombre simple con un corazón puro que vive eventos extraordinarios.",
        "Robert Zemeckis",
        "Tom Hanks, Robin Wright, Gary Sinise",
        "Drama, Romance",
    ),
    (
        "El Caballero de la Noche",
        2008,
        "Batman enfrenta al Joker en una batalla por el alma de Gotham.",
        "Christopher Nolan",
        "Christian Bale, Heath Ledger, Aaron Eckhart",
        "Acción, Crimen",
    ),
    (
        "Titanic",
        1997,
        "Una historia de amor en el trágico viaje del Titanic.",
        "James Cameron",
        "Leonardo DiCaprio, Kate Winslet, Billy Zane",
        "Romance, Drama",
    ),
];
