use sha2::{Digest, Sha256};

/// Lower-cases `title` and drops every space character.
pub fn normalize_title(title: &str) -> String {
    title.to_lowercase().replace(' ', "")
}

/// Content fingerprint of a movie, used both as a uniqueness key and as the
/// public opaque identifier. Hex encoded SHA-256 of the normalized title
/// followed by the decimal year.
pub fn fingerprint(title: &str, year: i32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_title(title).as_bytes());
    hasher.update(year.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize() {
        assert_eq!(normalize_title("The  Dark Knight"), "thedarkknight");
        assert_eq!(normalize_title("Matrix"), "matrix");
    }

    #[test]
    fn case_and_spacing_do_not_matter() {
        let a = fingerprint("THE MATRIX", 1999);
        assert_eq!(a, fingerprint("the matrix", 1999));
        assert_eq!(a, fingerprint("the  matrix", 1999));
        assert_eq!(a, fingerprint("TheMatrix", 1999));
        assert_ne!(a, fingerprint("the matrix", 2003));
    }

    #[test]
    fn known_digest() {
        // sha256("matrix1999")
        let fp = fingerprint("Matrix", 1999);
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        let mut hasher = Sha256::new();
        hasher.update(b"matrix1999");
        assert_eq!(fp, format!("{:x}", hasher.finalize()));
    }
}
