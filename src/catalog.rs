use crate::info_log;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Default movie list, looked up relative to the working directory.
pub const DEFAULT_TITLES_PATH: &str = "peliculas.txt";

/// A secret movie title, trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    /// Normalizes a catalog line. Returns `None` for blank lines.
    ///
    /// A leading byte order mark, as left by some editors on the first line,
    /// is dropped along with the surrounding whitespace.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim_start_matches('\u{feff}').trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_lowercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn load_titles_from_str(data: &str) -> Vec<Title> {
    data.lines().filter_map(Title::new).collect()
}

pub fn load_titles_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<Title>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut titles = Vec::new();
    for line in reader.lines() {
        if let Some(title) = Title::new(&line?) {
            titles.push(title);
        }
    }
    Ok(titles)
}

/// Loads the catalog, logging and swallowing any I/O failure.
///
/// A missing or unreadable file yields an empty list; the caller decides how
/// to tell the player.
pub fn load_titles<P: AsRef<Path>>(path: P) -> Vec<Title> {
    let path = path.as_ref();
    match load_titles_from_file(path) {
        Ok(titles) => {
            info_log!("Loaded {} titles from {}", titles.len(), path.display());
            titles
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Movie list {} does not exist", path.display());
            Vec::new()
        }
        Err(e) => {
            log::warn!("Failed to read movie list {}: {e}", path.display());
            Vec::new()
        }
    }
}

pub fn pick_random<'a, R: Rng + ?Sized>(titles: &'a [Title], rng: &mut R) -> Option<&'a Title> {
    titles.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::io::Write;

    #[test]
    fn test_title_is_trimmed_and_lowercased() {
        let title = Title::new("  The Matrix \r").unwrap();
        assert_eq!(title.as_str(), "the matrix");
        assert_eq!(title.to_string(), "the matrix");
    }

    #[test]
    fn test_blank_lines_are_not_titles() {
        assert!(Title::new("").is_none());
        assert!(Title::new("   \t").is_none());
    }

    #[test]
    fn test_byte_order_mark_is_stripped() {
        let titles = load_titles_from_str("\u{feff}Up\nJaws\n");
        assert_eq!(titles[0].as_str(), "up");
        assert_eq!(titles[1].as_str(), "jaws");
        assert!(Title::new("\u{feff}").is_none());
    }

    #[test]
    fn test_load_titles_from_str_skips_blank_lines() {
        let titles = load_titles_from_str("Alien\n\nJaws\n   \nUp\n");
        let names: Vec<&str> = titles.iter().map(Title::as_str).collect();
        assert_eq!(names, vec!["alien", "jaws", "up"]);
    }

    #[test]
    fn test_load_titles_missing_file_is_empty() {
        let path = std::env::temp_dir().join("movie_hangman_catalog_missing_file.txt");
        let _ = std::fs::remove_file(&path);
        assert!(load_titles(&path).is_empty());
        assert!(load_titles_from_file(&path).is_err());
    }

    #[test]
    fn test_load_titles_from_file() {
        let path = std::env::temp_dir().join(format!(
            "movie_hangman_catalog_{}.txt",
            std::process::id()
        ));
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, "Star Wars").unwrap();
            writeln!(file).unwrap();
            writeln!(file, "Amélie").unwrap();
        }
        let titles = load_titles(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].as_str(), "star wars");
        assert_eq!(titles[1].as_str(), "amélie");
    }

    #[test]
    fn test_pick_random_empty_catalog() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert!(pick_random(&[], &mut rng).is_none());
    }

    #[test]
    fn test_pick_random_returns_catalog_member() {
        let titles = load_titles_from_str("alien\njaws\nup");
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..20 {
            let picked = pick_random(&titles, &mut rng).unwrap();
            assert!(titles.contains(picked));
        }
    }

    #[test]
    fn test_pick_random_is_deterministic_for_a_seed() {
        let titles = load_titles_from_str("alien\njaws\nup\nheat\nbig");
        let mut first = Pcg32::seed_from_u64(1234);
        let mut second = Pcg32::seed_from_u64(1234);
        for _ in 0..10 {
            assert_eq!(
                pick_random(&titles, &mut first),
                pick_random(&titles, &mut second)
            );
        }
    }

    #[test]
    fn test_pick_random_covers_every_title() {
        let titles = load_titles_from_str("alien\njaws\nup");
        let mut rng = Pcg32::seed_from_u64(99);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(pick_random(&titles, &mut rng).unwrap().as_str());
        }
        assert_eq!(seen.len(), 3);
    }
}
