// CSV catalog loader: header alias resolution, filtering, dedup, row cap
use regex::Regex;
use simrec_core::{Catalog, Error, Item, Result};
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

pub const TITLE_ALIASES: &[&str] = &["title", "name"];
pub const TEXT_ALIASES: &[&str] = &["overview", "description", "plot", "summary"];
pub const POSTER_ALIASES: &[&str] = &["poster_path", "poster", "image", "posterurl", "poster_url"];
pub const YEAR_ALIASES: &[&str] = &["year", "release_year", "release_date"];

/// Cells read as missing values, compared against the raw cell text
const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Default catalog size cap
pub const DEFAULT_MAX_ROWS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Keep at most this many items (after dedup); `None` keeps everything
    pub max_rows: Option<usize>,
    /// Take the year from a `(dddd)` group in the title when no year column exists
    pub year_from_title: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_rows: Some(DEFAULT_MAX_ROWS),
            year_from_title: false,
        }
    }
}

/// Logical field to column index, resolved once from the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub title: usize,
    pub text: usize,
    pub poster: Option<usize>,
    pub year: Option<usize>,
}

impl ColumnMap {
    /// Match headers case-insensitively; the first alias present wins
    pub fn resolve<'a, I: IntoIterator<Item = &'a str>>(headers: I) -> Result<Self> {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
            .collect();
        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|alias| headers.iter().position(|h| h == alias))
        };

        let title = find(TITLE_ALIASES).ok_or_else(|| {
            Error::Configuration(format!(
                "no title column found (expected one of {TITLE_ALIASES:?}, got {headers:?})"
            ))
        })?;
        let text = find(TEXT_ALIASES).ok_or_else(|| {
            Error::Configuration(format!(
                "no text column found (expected one of {TEXT_ALIASES:?}, got {headers:?})"
            ))
        })?;

        Ok(Self {
            title,
            text,
            poster: find(POSTER_ALIASES),
            year: find(YEAR_ALIASES),
        })
    }
}

fn year_in_title() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\((\d{4})\)").unwrap())
}

/// Extract `1999` from titles like `The Matrix (1999)`
#[must_use]
pub fn extract_year_from_title(title: &str) -> Option<String> {
    year_in_title()
        .captures(title)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn cell<'r>(record: &'r csv::StringRecord, index: usize) -> Option<&'r str> {
    record
        .get(index)
        .filter(|value| !NULL_MARKERS.contains(value))
}

#[derive(Debug, Clone, Default)]
pub struct CatalogLoader {
    config: LoaderConfig,
}

impl CatalogLoader {
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<Catalog> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::Configuration(format!(
                "source file not found: {}",
                path.display()
            )));
        }
        info!("Loading CSV: {:?}", path);
        let file = std::fs::File::open(path).map_err(|e| {
            Error::Configuration(format!("cannot open {}: {e}", path.display()))
        })?;
        self.load_reader(file)
    }

    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Catalog> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| Error::Configuration(format!("unreadable CSV header: {e}")))?
            .clone();
        let columns = ColumnMap::resolve(headers.iter())?;
        debug!("Resolved columns: {:?}", columns);

        let mut catalog = Catalog::new();
        let (mut rows, mut incomplete, mut duplicates) = (0usize, 0usize, 0usize);
        for record in reader.records() {
            if self.config.max_rows.is_some_and(|cap| catalog.len() >= cap) {
                break;
            }
            let record =
                record.map_err(|e| Error::Configuration(format!("unreadable CSV row: {e}")))?;
            rows += 1;

            let (Some(title), Some(text)) = (cell(&record, columns.title), cell(&record, columns.text))
            else {
                incomplete += 1;
                continue;
            };
            let title = title.trim();
            if title.is_empty() {
                incomplete += 1;
                continue;
            }

            let mut item = Item::new(title, text);
            item.poster = columns
                .poster
                .and_then(|i| cell(&record, i))
                .map(str::to_string);
            item.year = match columns.year {
                Some(i) => cell(&record, i).map(str::to_string),
                None if self.config.year_from_title => extract_year_from_title(title),
                None => None,
            };

            if !catalog.push(item) {
                duplicates += 1;
            }
        }

        if incomplete > 0 {
            warn!("Dropped {} rows without title or text", incomplete);
        }
        info!(
            "Using {} items ({} rows read, {} duplicate titles, cap {:?})",
            catalog.len(),
            rows,
            duplicates,
            self.config.max_rows
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(csv: &str, config: LoaderConfig) -> Result<Catalog> {
        CatalogLoader::new(config).load_reader(csv.as_bytes())
    }

    #[test]
    fn test_resolve_prefers_alias_order() {
        let columns = ColumnMap::resolve(["Name", "Plot", "Title", "Overview", "Release_Date"]).unwrap();
        assert_eq!(columns.title, 2);
        assert_eq!(columns.text, 3);
        assert_eq!(columns.poster, None);
        assert_eq!(columns.year, Some(4));
    }

    #[test]
    fn test_missing_text_column() {
        let err = ColumnMap::resolve(["title"]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("text column"));
    }

    #[test]
    fn test_missing_title_column() {
        let err = load("overview\nsomething\n", LoaderConfig::default()).unwrap_err();
        assert!(err.to_string().contains("title column"));
    }

    #[test]
    fn test_rows_filtered_trimmed_and_deduplicated() {
        let csv = "title,overview,poster_path\n\
                   \" Alien \",first,/a.jpg\n\
                   Heat,,/h.jpg\n\
                   ,orphan,\n\
                   Alien,second,\n\
                   Ran,war,\n";
        let catalog = load(csv, LoaderConfig::default()).unwrap();
        let titles: Vec<&str> = catalog.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Alien", "Ran"]);
        assert_eq!(catalog.get(0).unwrap().text, "first");
        assert_eq!(catalog.get(0).unwrap().poster.as_deref(), Some("/a.jpg"));
        assert!(catalog.get(1).unwrap().poster.is_none());
    }

    #[test]
    fn test_row_cap_applies_after_dedup() {
        let csv = "name,summary\nA,x\nA,y\nB,z\nC,w\n";
        let config = LoaderConfig { max_rows: Some(2), ..Default::default() };
        let catalog = load(csv, config).unwrap();
        let titles: Vec<&str> = catalog.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_year_column_kept_verbatim() {
        let csv = "title,overview,release_date\nAlien (1979),x,1979-05-25\n";
        let catalog = load(csv, LoaderConfig::default()).unwrap();
        assert_eq!(catalog.get(0).unwrap().year.as_deref(), Some("1979-05-25"));
        assert_eq!(catalog.get(0).unwrap().title, "Alien (1979)");
    }

    #[test]
    fn test_year_from_title_is_opt_in() {
        let csv = "title,overview\nToy Story (1995),x\nHeat,y\n";
        let catalog = load(csv, LoaderConfig::default()).unwrap();
        assert!(catalog.get(0).unwrap().year.is_none());

        let config = LoaderConfig { year_from_title: true, ..Default::default() };
        let catalog = load(csv, config).unwrap();
        assert_eq!(catalog.get(0).unwrap().year.as_deref(), Some("1995"));
        assert!(catalog.get(1).unwrap().year.is_none());
    }

    #[test]
    fn test_whitespace_only_text_is_not_missing() {
        let csv = "title,overview\nA,space opera battle\nB,\"   \"\nC,cooking recipe\n";
        let catalog = load(csv, LoaderConfig::default()).unwrap();
        let titles: Vec<&str> = catalog.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert_eq!(catalog.get(1).unwrap().text, "   ");
    }

    #[test]
    fn test_null_markers_drop_rows() {
        let csv = "title,overview,poster_path\n\
                   A,None,/a.jpg\n\
                   B,<NA>,\n\
                   C,n/a,\n\
                   D,#NA,\n\
                   E,kept,None\n\
                   None,titled none,\n";
        let catalog = load(csv, LoaderConfig::default()).unwrap();
        let titles: Vec<&str> = catalog.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["E"]);
        assert!(catalog.get(0).unwrap().poster.is_none());
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = CatalogLoader::default()
            .load_path("/definitely/not/here.csv")
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
