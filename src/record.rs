//! Comma-separated match log records.
//!
//! Each line carries twelve fields:
//!
//! ```text
//! begin,end,name1,score1,name2,score2,name3,score3,name4,score4,tag,paipu
//! ```
//!
//! Seats are listed in finishing order. The header row is recognised by its
//! end-time column and skipped.

use std::io::BufRead;

use thiserror::Error;
use tracing::debug;

use crate::models::{PaipuId, SEATS};

/// Number of fields in every record.
pub const FIELD_COUNT: usize = 12;

const DELIMITER: char = ',';

/// Errors that can occur while reading records. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("parse error at line {line}: expected {} fields, found {found}", FIELD_COUNT)]
    FieldCount { line: usize, found: usize },

    #[error("parse error at line {line}: last field is not a game record id: {value:?}")]
    InvalidPaipu { line: usize, value: String },

    #[error("IO error at line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

impl RecordError {
    pub fn line(&self) -> usize {
        match self {
            RecordError::FieldCount { line, .. }
            | RecordError::InvalidPaipu { line, .. }
            | RecordError::Io { line, .. } => *line,
        }
    }
}

/// One data row, split but not yet interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based source line
    pub line: usize,
    pub begin_time: String,
    pub end_time: String,

    /// (player name, score text) in finishing order
    pub seats: [(String, String); SEATS],
    pub tag: String,
    pub paipu: PaipuId,
}

/// Split one line. Returns `Ok(None)` for the header row.
pub fn parse_line(
    text: &str,
    line: usize,
    header_label: &str,
) -> Result<Option<RawRecord>, RecordError> {
    let fields: Vec<&str> = text.split(DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return Err(RecordError::FieldCount {
            line,
            found: fields.len(),
        });
    }

    if fields[1] == header_label {
        return Ok(None);
    }

    let paipu = PaipuId::parse(fields[11]).ok_or_else(|| RecordError::InvalidPaipu {
        line,
        value: fields[11].to_string(),
    })?;

    let seats = std::array::from_fn(|i| (fields[2 + i * 2].to_string(), fields[3 + i * 2].to_string()));

    Ok(Some(RawRecord {
        line,
        begin_time: fields[0].to_string(),
        end_time: fields[1].to_string(),
        seats,
        tag: fields[10].to_string(),
        paipu,
    }))
}

/// Streams records whose tag contains the filter substring.
///
/// The header row and filtered-out rows are consumed silently; the first
/// malformed row ends the stream with an error.
pub struct RecordReader<R> {
    reader: R,
    line: usize,
    header_label: String,
    tag_filter: String,
    skipped: usize,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R, header_label: impl Into<String>, tag_filter: impl Into<String>) -> Self {
        Self {
            reader,
            line: 0,
            header_label: header_label.into(),
            tag_filter: tag_filter.into(),
            skipped: 0,
        }
    }

    /// Rows dropped by the tag filter so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<RawRecord, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut text = String::new();

        loop {
            text.clear();
            self.line += 1;
            match self.reader.read_line(&mut text) {
                Ok(0) => return None, // EOF
                Ok(_) => {
                    let trimmed = text.trim_end_matches(&['\n', '\r'][..]);
                    match parse_line(trimmed, self.line, &self.header_label) {
                        Ok(None) => continue,
                        Ok(Some(record)) if !record.tag.contains(self.tag_filter.as_str()) => {
                            debug!(
                                "Skipping line {}: tag {:?} does not contain {:?}",
                                self.line, record.tag, self.tag_filter
                            );
                            self.skipped += 1;
                            continue;
                        }
                        Ok(Some(record)) => return Some(Ok(record)),
                        Err(e) => return Some(Err(e)),
                    }
                }
                Err(source) => {
                    return Some(Err(RecordError::Io {
                        line: self.line,
                        source,
                    }))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PAIPU: &str = "230512-0f1e2d3c-4b5a-6978-8796-a5b4c3d2e1f0";
    const HEADER: &str = "開始時間,終了時間,1位,得点,2位,得点,3位,得点,4位,得点,タグ,牌譜";

    fn line(begin: &str, tag: &str) -> String {
        format!(
            "{},{}+,alice,55.9,bob,4.7,carol,-19.0,dave,-41.6,{},{}",
            begin, begin, tag, PAIPU
        )
    }

    #[test]
    fn test_parse_line() {
        let record = parse_line(&line("2023-05-12 20:00", "league"), 7, "終了時間")
            .unwrap()
            .unwrap();

        assert_eq!(record.line, 7);
        assert_eq!(record.begin_time, "2023-05-12 20:00");
        assert_eq!(record.end_time, "2023-05-12 20:00+");
        assert_eq!(record.seats[0], ("alice".to_string(), "55.9".to_string()));
        assert_eq!(record.seats[3], ("dave".to_string(), "-41.6".to_string()));
        assert_eq!(record.tag, "league");
        assert_eq!(record.paipu.as_str(), PAIPU);
    }

    #[test]
    fn test_parse_header() {
        assert!(parse_line(HEADER, 1, "終了時間").unwrap().is_none());
    }

    #[test]
    fn test_parse_wrong_field_count() {
        let err = parse_line("a,b,c", 3, "終了時間").unwrap_err();
        assert!(matches!(err, RecordError::FieldCount { line: 3, found: 3 }));
        assert_eq!(err.line(), 3);
        assert!(err.to_string().contains("line 3"));

        let err = parse_line("", 4, "終了時間").unwrap_err();
        assert!(matches!(err, RecordError::FieldCount { line: 4, found: 1 }));
    }

    #[test]
    fn test_parse_invalid_paipu() {
        let text = line("2023", "league").replace(PAIPU, "not-a-paipu");
        let err = parse_line(&text, 2, "終了時間").unwrap_err();
        assert!(matches!(err, RecordError::InvalidPaipu { line: 2, .. }));
    }

    #[test]
    fn test_reader_skips_header_and_filters_tags() {
        let input = format!(
            "{}\n{}\n{}\r\n{}",
            HEADER,
            line("1", "spring league"),
            line("2", "friendly"),
            line("3", "league final")
        );
        let mut reader = RecordReader::new(Cursor::new(input), "終了時間", "league");
        let records: Vec<_> = reader.by_ref().collect::<Result<_, _>>().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line, 2);
        assert_eq!(records[1].line, 4);
        assert_eq!(records[1].paipu.as_str(), PAIPU);
        assert_eq!(reader.skipped(), 1);
    }

    #[test]
    fn test_reader_empty_filter_matches_everything() {
        let input = format!("{}\n{}\n", line("1", ""), line("2", "x"));
        let reader = RecordReader::new(Cursor::new(input), "終了時間", "");
        assert_eq!(reader.filter(|r| r.is_ok()).count(), 2);
    }

    #[test]
    fn test_reader_stops_at_malformed_line() {
        let input = format!("{}\n{}\nbroken\n", HEADER, line("1", "x"));
        let mut reader = RecordReader::new(Cursor::new(input), "終了時間", "");

        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert_eq!(err.line(), 3);
    }
}
