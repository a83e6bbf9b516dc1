//! Averaged word-vector encoder (fastText / GloVe style tables).
//!
//! A phrase is encoded as the element-wise mean of the vectors of its known
//! words. Unknown words are skipped; a phrase with no known words encodes to a
//! zero vector, which the router reports as degenerate instead of scoring it.

use crate::normalize::mean_pool;
use crate::{EmbeddingError, EmbeddingResult};
use semroute_core::encoder::Encoder;
use semroute_core::error::EncoderResult;
use semroute_core::types::Vector;
use std::collections::HashMap;
use std::io::BufRead;
use tracing::debug;

/// Encoder backed by an in-memory word → vector table.
///
/// # Example
///
/// ```rust
/// use semroute_core::encoder::Encoder;
/// use semroute_embeddings::WordVectorEncoder;
///
/// let encoder = WordVectorEncoder::from_pairs(vec![
///     ("flight".to_string(), vec![1.0, 0.0]),
///     ("rain".to_string(), vec![0.0, 1.0]),
/// ])
/// .unwrap();
///
/// let v = encoder.encode("Flight").unwrap();
/// assert_eq!(v.as_slice(), &[1.0, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct WordVectorEncoder {
    table: HashMap<String, Vec<f32>>,
    dimension: usize,
    lowercase: bool,
    name: String,
}

impl WordVectorEncoder {
    /// Build from `(word, vector)` pairs. All vectors must share one non-zero
    /// dimension. Later duplicates overwrite earlier ones.
    pub fn from_pairs<I>(pairs: I) -> EmbeddingResult<Self>
    where
        I: IntoIterator<Item = (String, Vec<f32>)>,
    {
        let mut table = HashMap::new();
        let mut dimension = None;

        for (word, vector) in pairs {
            match dimension {
                None if vector.is_empty() => {
                    return Err(EmbeddingError::InvalidInput(format!(
                        "Empty vector for word {:?}",
                        word
                    )))
                }
                None => dimension = Some(vector.len()),
                Some(expected) if expected != vector.len() => {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected,
                        got: vector.len(),
                    })
                }
                Some(_) => {}
            }
            table.insert(word, vector);
        }

        let dimension = dimension
            .ok_or_else(|| EmbeddingError::InvalidInput("Empty word-vector table".to_string()))?;

        Ok(Self {
            table,
            dimension,
            lowercase: true,
            name: "word-vectors".to_string(),
        })
    }

    /// Parse the `.vec` text format: an optional `<count> <dimension>` header,
    /// then one `word v1 v2 ... vn` row per line. Blank lines are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> EmbeddingResult<Self> {
        let mut pairs = Vec::new();
        let mut declared_dimension = None;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            let mut fields = line.split_whitespace();
            let word = match fields.next() {
                Some(word) => word,
                None => continue,
            };
            let rest: Vec<&str> = fields.collect();

            if line_no == 1 && rest.len() == 1 {
                if let (Ok(_), Ok(dim)) = (word.parse::<usize>(), rest[0].parse::<usize>()) {
                    declared_dimension = Some(dim);
                    continue;
                }
            }

            let vector = rest
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|e| EmbeddingError::Parse {
                    line: line_no,
                    reason: e.to_string(),
                })?;

            if let Some(expected) = declared_dimension {
                if vector.len() != expected {
                    return Err(EmbeddingError::Parse {
                        line: line_no,
                        reason: format!("expected {} values, got {}", expected, vector.len()),
                    });
                }
            }
            pairs.push((word.to_string(), vector));
        }

        let encoder = Self::from_pairs(pairs)?;
        debug!(
            words = encoder.table.len(),
            dimension = encoder.dimension,
            "loaded word vectors"
        );
        Ok(encoder)
    }

    /// Load a `.vec` file from disk.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> EmbeddingResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let mut encoder = Self::from_reader(std::io::BufReader::new(file))?;
        if let Some(stem) = path.as_ref().file_stem().and_then(|s| s.to_str()) {
            encoder.name = stem.to_string();
        }
        Ok(encoder)
    }

    /// Whether words are lowercased before lookup (default: true).
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of words in the table.
    pub fn vocabulary_size(&self) -> usize {
        self.table.len()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.table.contains_key(word)
    }

    /// Split on whitespace and strip surrounding punctuation.
    fn words<'a>(&self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        let lowercase = self.lowercase;
        text.split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| !w.is_empty())
            .map(move |w| if lowercase { w.to_lowercase() } else { w.to_string() })
    }

    /// Mean of the known word vectors in `text`.
    pub fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("Empty text".to_string()));
        }

        let words: Vec<String> = self.words(text).collect();
        let known = words
            .iter()
            .filter_map(|w| self.table.get(w))
            .map(Vec::as_slice);
        Ok(mean_pool(known, self.dimension))
    }
}

impl Encoder for WordVectorEncoder {
    fn encode(&self, text: &str) -> EncoderResult<Vector> {
        Ok(Vector::from(self.embed(text)?))
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn table() -> WordVectorEncoder {
        WordVectorEncoder::from_pairs(vec![
            ("book".to_string(), vec![1.0, 0.0, 0.0]),
            ("flight".to_string(), vec![0.8, 0.2, 0.0]),
            ("rain".to_string(), vec![0.0, 1.0, 0.0]),
            ("hello".to_string(), vec![0.0, 0.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn averages_known_words() {
        let v = table().encode("book flight").unwrap();
        assert!((v[0] - 0.9).abs() < 1e-6);
        assert!((v[1] - 0.1).abs() < 1e-6);
        assert_eq!(v[2], 0.0);
    }

    #[test]
    fn unknown_words_are_skipped() {
        let encoder = table();
        let with_noise = encoder.encode("please book my flight!").unwrap();
        let clean = encoder.encode("book flight").unwrap();
        assert_eq!(with_noise, clean);
    }

    #[test]
    fn all_unknown_words_yield_zero_vector() {
        let v = table().encode("quantum chromodynamics").unwrap();
        assert_eq!(v.dimension(), 3);
        assert_eq!(v.norm(), 0.0);
    }

    #[test]
    fn case_sensitivity_is_configurable() {
        let encoder = table().with_lowercase(false);
        let v = encoder.encode("Hello").unwrap();
        assert_eq!(v.norm(), 0.0);

        let v = table().encode("Hello").unwrap();
        assert_eq!(v.as_slice(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn rejects_mixed_dimensions() {
        let err = WordVectorEncoder::from_pairs(vec![
            ("a".to_string(), vec![1.0, 0.0]),
            ("b".to_string(), vec![1.0, 0.0, 0.0]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn rejects_empty_table() {
        assert!(WordVectorEncoder::from_pairs(Vec::new()).is_err());
    }

    #[test]
    fn parses_vec_format_with_header() {
        let data = "3 2\nbook 1.0 0.0\n\nrain 0.0 1.0\nflight 0.5 0.5\n";
        let encoder = WordVectorEncoder::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(encoder.vocabulary_size(), 3);
        assert_eq!(encoder.dimension(), Some(2));
        assert!(encoder.contains("flight"));
    }

    #[test]
    fn parses_vec_format_without_header() {
        let data = "book 1.0 0.0 0.0\nrain 0.0 1.0 0.0\n";
        let encoder = WordVectorEncoder::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(encoder.dimension(), Some(3));
    }

    #[test]
    fn reports_bad_rows() {
        let data = "2 2\nbook 1.0 0.0\nrain 0.0 oops\n";
        let err = WordVectorEncoder::from_reader(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, EmbeddingError::Parse { line: 3, .. }));

        let data = "2 2\nbook 1.0 0.0\nrain 0.0\n";
        let err = WordVectorEncoder::from_reader(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, EmbeddingError::Parse { line: 3, .. }));
    }
}
