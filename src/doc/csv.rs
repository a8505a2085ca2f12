//! CSV files as whole-file row tables.
//!
//! Reading decodes the entire file into rows of string fields; writing
//! re-encodes and overwrites the entire file. Quoting follows RFC 4180:
//! fields containing commas, quotes, or line breaks are quoted, and quotes
//! inside quoted fields are doubled. CRLF line endings are tolerated on
//! input; output uses `\n`.

use std::path::{Path, PathBuf};

use crate::error::{FsError, Result};
use crate::file::{self, WriteOptions};
use crate::path as path_util;

/// Read and parse the CSV file at `path` into rows of fields.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<String>>> {
    let text = file::read_to_string(path)?;
    Ok(parse(&text))
}

/// Write `rows` to `path`, appending a `.csv` extension when the path
/// doesn't already carry one.
pub fn create<P: AsRef<Path>>(path: P, rows: &[Vec<String>]) -> Result<()> {
    let p = ensure_csv_extension(path.as_ref());
    file::write(&p, render(rows).as_bytes(), &WriteOptions::default())?;
    Ok(())
}

/// Replace the contents of an existing CSV file with `rows`.
///
/// Unlike [`create`] this requires the file to already exist.
pub fn edit<P: AsRef<Path>>(path: P, rows: &[Vec<String>]) -> Result<()> {
    let p = path.as_ref();
    if !p.is_file() {
        return Err(FsError::NotFound(p.to_path_buf()));
    }
    file::write(p, render(rows).as_bytes(), &WriteOptions::default())?;
    Ok(())
}

/// First record of the CSV file at `path`, usually the header row.
pub fn first_row<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let rows = read(path)?;
    Ok(rows.into_iter().next().unwrap_or_default())
}

/// Number of data rows in the CSV file at `path`, header excluded.
pub fn row_count<P: AsRef<Path>>(path: P) -> Result<usize> {
    let rows = read(path)?;
    Ok(rows.len().saturating_sub(1))
}

fn parse(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            // Bare or CRLF line endings both terminate a record here.
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

fn render(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        let mut first = true;
        for field in row {
            if !first {
                out.push(',');
            }
            first = false;
            out.push_str(&render_field(field));
        }
        out.push('\n');
    }
    out
}

fn render_field(s: &str) -> String {
    if s.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn ensure_csv_extension(p: &Path) -> PathBuf {
    if path_util::extension(p).as_deref() == Some("csv") {
        p.to_path_buf()
    } else {
        let mut s = p.as_os_str().to_os_string();
        s.push(".csv");
        PathBuf::from(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_plain_rows() {
        let rows = parse("a,b,c\n1,2,3\n");
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), "b".into(), "c".into()],
                vec!["1".to_string(), "2".into(), "3".into()],
            ]
        );
    }

    #[test]
    fn parse_quoted_fields() {
        let rows = parse("name,note\r\n\"Doe, Jane\",\"says \"\"hi\"\"\"\r\n");
        assert_eq!(rows[1][0], "Doe, Jane");
        assert_eq!(rows[1][1], "says \"hi\"");
    }

    #[test]
    fn parse_quoted_newline_stays_in_field() {
        let rows = parse("a\n\"line1\nline2\"\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "line1\nline2");
    }

    #[test]
    fn create_read_roundtrip_with_quoting() {
        let td = tempdir().unwrap();
        let base = td.path().join("table");
        let rows = vec![
            vec!["id".to_string(), "name".into()],
            vec!["1".to_string(), "Doe, Jane".into()],
        ];
        create(&base, &rows).unwrap();

        let f = td.path().join("table.csv");
        assert!(f.exists(), "extension should be appended");
        assert_eq!(read(&f).unwrap(), rows);
    }

    #[test]
    fn edit_requires_existing_file() {
        let td = tempdir().unwrap();
        let missing = td.path().join("missing.csv");
        assert!(matches!(
            edit(&missing, &[]).unwrap_err(),
            FsError::NotFound(_)
        ));
    }

    #[test]
    fn first_row_and_row_count() {
        let td = tempdir().unwrap();
        let f = td.path().join("t.csv");
        std::fs::write(&f, "h1,h2\na,b\nc,d\n").unwrap();
        assert_eq!(first_row(&f).unwrap(), vec!["h1".to_string(), "h2".into()]);
        assert_eq!(row_count(&f).unwrap(), 2);
    }
}
