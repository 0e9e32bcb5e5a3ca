//! CSV to attestation rows, with encoding and delimiter auto-detection.
//!
//! Parsing is line based. The header row is fuzzy-mapped onto form field ids,
//! then every data line goes through the same conversions and reference checks
//! as a hand-entered row. Structural problems (empty file, broken or duplicate
//! headers, missing required columns) abort with zero rows; content problems
//! are reported per row and parsing continues.
//!
//! Full format validation is left to [`crate::validation::validate_bulk`].

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::api::logs::{log_info, log_success, log_warning};
use crate::diagnostics::{codes, AttestationDiagnostics, Pointer};
use crate::error::{CsvError, CsvResult};
use crate::fuzzy::{convert_category_alias, convert_chain_id, convert_paymaster_alias, levenshtein_distance};
use crate::models::AttestationRow;
use crate::reference::{is_valid_category, is_valid_paymaster_category, FORM_FIELDS, HEADER_ALIASES};
use crate::validation::fields::normalize_text;
use crate::validation::{check_references, infer_caip, ValidationOptions};

/// Parsed CSV with its header mapping.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CsvParseResult {
    pub rows: Vec<AttestationRow>,
    /// Mapped field ids in header order.
    pub columns: Vec<String>,
    /// Raw header → field id, `None` when the header was not mapped.
    pub header_map: BTreeMap<String, Option<String>>,
    pub diagnostics: AttestationDiagnostics,
    pub encoding: String,
    pub delimiter: char,
}

impl CsvParseResult {
    fn aborted(
        columns: Vec<String>,
        header_map: BTreeMap<String, Option<String>>,
        diagnostics: AttestationDiagnostics,
        delimiter: char,
    ) -> Self {
        Self {
            rows: Vec::new(),
            columns,
            header_map,
            diagnostics,
            encoding: "utf-8".to_string(),
            delimiter,
        }
    }
}

// =============================================================================
// Bytes and encodings
// =============================================================================

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes with the given encoding. Unknown encodings fall back to lossy
/// UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let text = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        },
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };

    let text = text.trim_start_matches('\u{feff}').to_string();
    if text.contains('\0') {
        return Err(CsvError::EncodingError(format!(
            "content decoded as {} contains NUL bytes; is this a binary file?",
            encoding
        )));
    }
    Ok(text)
}

/// Pick the separator that occurs most often in the header line. Comma wins
/// ties.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");

    let mut best = ',';
    let mut best_count = first_line.matches(',').count();
    for sep in [';', '\t', '|'] {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best = sep;
            best_count = count;
        }
    }
    best
}

// =============================================================================
// Tokenizer
// =============================================================================

/// Split one line into raw cells. Quoted cells keep their quotes; see
/// [`clean_cell`].
pub fn tokenize_line(line: &str, delimiter: char) -> Result<Vec<String>, String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push_str("\"\"");
                chars.next();
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            c if c == delimiter && !in_quotes => {
                cells.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    cells.push(current);
    Ok(cells)
}

/// Trim, strip surrounding quotes and un-escape doubled quotes.
pub fn clean_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].replace("\"\"", "\"").trim().to_string()
    } else {
        trimmed.to_string()
    }
}

// =============================================================================
// Header mapping
// =============================================================================

/// Lowercase with whitespace, underscores and dashes removed.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-' && *c != '\u{feff}')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Map a raw header to a field id: alias table first, then the closest field
/// id or label within edit distance 2 (1 for headers of five chars or fewer).
pub fn map_header(header: &str) -> Option<&'static str> {
    let normalized = normalize_header(header);
    if normalized.is_empty() {
        return None;
    }

    if let Some((_, field)) = HEADER_ALIASES
        .iter()
        .find(|(alias, _)| normalize_header(alias) == normalized)
    {
        return Some(*field);
    }

    let limit = if normalized.chars().count() > 5 { 2 } else { 1 };
    let mut best: Option<(&'static str, usize)> = None;
    for field in FORM_FIELDS {
        let distance = levenshtein_distance(&normalized, &normalize_header(field.id))
            .min(levenshtein_distance(&normalized, &normalize_header(field.label)));
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((field.id, distance));
        }
    }

    best.filter(|(_, d)| *d <= limit).map(|(id, _)| id)
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse CSV text into attestation rows.
pub fn parse_csv(text: &str, options: &ValidationOptions) -> CsvParseResult {
    let delimiter = detect_delimiter(text);
    let mut diagnostics = AttestationDiagnostics::new();

    // (1-based line number, trimmed line)
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect();

    let Some(((header_line_no, header_line), data_lines)) = lines.split_first() else {
        diagnostics.add_error(codes::CSV_EMPTY, "CSV file is empty", Pointer::global());
        return CsvParseResult::aborted(Vec::new(), BTreeMap::new(), diagnostics, delimiter);
    };
    if data_lines.is_empty() {
        diagnostics.add_error(codes::CSV_EMPTY, "CSV file has a header but no data rows", Pointer::global());
        return CsvParseResult::aborted(Vec::new(), BTreeMap::new(), diagnostics, delimiter);
    }

    let headers = match tokenize_line(header_line, delimiter) {
        Ok(cells) => cells.iter().map(|c| clean_cell(c)).collect::<Vec<_>>(),
        Err(reason) => {
            diagnostics.add_error(
                codes::CSV_HEADER_PARSE_ERROR,
                format!("Cannot read header line: {}", reason),
                Pointer::global().with_metadata("line", *header_line_no),
            );
            return CsvParseResult::aborted(Vec::new(), BTreeMap::new(), diagnostics, delimiter);
        }
    };

    // ---- header mapping ----
    let mut header_map = BTreeMap::new();
    let mut mapping: Vec<Option<&'static str>> = Vec::with_capacity(headers.len());
    let mut columns: Vec<String> = Vec::new();
    let mut structural_failure = false;

    for (position, header) in headers.iter().enumerate() {
        let field = map_header(header).filter(|f| options.accepts_column(f));
        header_map.insert(header.clone(), field.map(str::to_string));

        match field {
            None => {
                if options.allowed_fields.is_none() && !header.is_empty() {
                    diagnostics.add_warning(
                        codes::CSV_UNKNOWN_COLUMN,
                        format!("Column '{}' does not match any field and is ignored", header),
                        Pointer::global()
                            .with_metadata("header", header.as_str())
                            .with_metadata("column", position),
                    );
                }
            }
            Some(f) if columns.iter().any(|c| c == f) => {
                diagnostics.add_error(
                    codes::CSV_DUPLICATE_COLUMN,
                    format!("Column '{}' maps to {} which is already mapped", header, f),
                    Pointer::global()
                        .with_field(f)
                        .with_metadata("header", header.as_str()),
                );
                structural_failure = true;
            }
            Some(f) => columns.push(f.to_string()),
        }
        mapping.push(field);
    }

    let missing: Vec<String> = options
        .mode
        .requires_fields
        .iter()
        .filter(|f| options.accepts_column(f) && !columns.contains(*f))
        .cloned()
        .collect();
    if !missing.is_empty() {
        diagnostics.add_error(
            codes::CSV_MISSING_REQUIRED_COLUMNS,
            format!("Missing required columns: {}", missing.join(", ")),
            Pointer::global().with_metadata("missing", missing),
        );
        structural_failure = true;
    }

    if structural_failure {
        log_warning("CSV header rejected");
        return CsvParseResult::aborted(columns, header_map, diagnostics, delimiter);
    }
    log_info(format!("Mapped {} of {} columns", columns.len(), headers.len()));

    // ---- data rows ----
    let mut rows = Vec::new();
    for (line_no, line) in data_lines {
        let cells = match tokenize_line(line, delimiter) {
            Ok(cells) => cells,
            Err(reason) => {
                diagnostics.add_error(
                    codes::CSV_ROW_PARSE_ERROR,
                    format!("Line {}: {}", line_no, reason),
                    Pointer::global().with_metadata("line", *line_no),
                );
                continue;
            }
        };
        if cells.iter().all(|c| clean_cell(c).is_empty()) {
            continue;
        }

        let index = rows.len();
        if cells.len() > headers.len() {
            diagnostics.add_warning(
                codes::CSV_EXTRA_CELLS,
                format!(
                    "Line {} has {} cells but only {} columns; extra cells ignored",
                    line_no,
                    cells.len(),
                    headers.len()
                ),
                Pointer::row(index).with_metadata("line", *line_no),
            );
        }

        let mut row = AttestationRow::new();
        for (position, field) in mapping.iter().enumerate() {
            let Some(field) = field else { continue };
            let raw = cells.get(position).map(|c| clean_cell(c)).unwrap_or_default();
            let value = convert_cell(field, normalize_text(field, &raw), index, &mut diagnostics);
            row.set(*field, value);
        }

        infer_caip(&mut row, index, &mut diagnostics);
        check_references(&row, index, &options.projects, &mut diagnostics);
        rows.push(row);
    }

    // every data line was blank cells only
    let had_parse_errors = diagnostics.errors.iter().any(|d| d.code == codes::CSV_ROW_PARSE_ERROR);
    if rows.is_empty() && !had_parse_errors {
        diagnostics.add_error(codes::CSV_EMPTY, "CSV file has no data rows", Pointer::global());
    }

    log_success(format!("Parsed {} rows", rows.len()));

    CsvParseResult {
        rows,
        columns,
        header_map,
        diagnostics,
        encoding: "utf-8".to_string(),
        delimiter,
    }
}

/// Chain, category and paymaster rewrites, reported when the value changed.
fn convert_cell(field: &str, value: String, index: usize, diagnostics: &mut AttestationDiagnostics) -> String {
    if value.is_empty() {
        return value;
    }

    let (converted, code) = match field {
        "chain_id" => {
            let converted = convert_chain_id(&value);
            (converted, codes::CHAIN_NORMALIZED)
        }
        "usage_category" => {
            let converted = convert_category_alias(&value);
            let converted = if is_valid_category(&converted) { converted } else { value.clone() };
            (converted, codes::CATEGORY_CONVERTED)
        }
        "paymaster_category" => {
            let converted = convert_paymaster_alias(&value);
            let converted = if is_valid_paymaster_category(&converted) { converted } else { value.clone() };
            (converted, codes::PAYMASTER_CATEGORY_CONVERTED)
        }
        _ => return value,
    };

    if converted.is_empty() || converted == value {
        return value;
    }

    diagnostics.add_conversion(
        code,
        format!("'{}' converted to '{}'", value, converted),
        Pointer::cell(index, field)
            .with_suggestion(converted.clone())
            .with_metadata("original", value.as_str()),
    );
    converted
}

/// Decode bytes (encoding auto-detected) and parse.
pub fn parse_csv_bytes(bytes: &[u8], options: &ValidationOptions) -> CsvResult<CsvParseResult> {
    let encoding = detect_encoding(bytes);
    let text = decode_content(bytes, &encoding)?;
    log_info(format!("Detected encoding: {}", encoding));

    let mut result = parse_csv(&text, options);
    result.encoding = encoding;
    Ok(result)
}

/// Read, decode and parse a CSV file.
pub fn parse_csv_file<P: AsRef<Path>>(path: P, options: &ValidationOptions) -> CsvResult<CsvParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_csv_bytes(&bytes, options)
}

// =============================================================================
// Export
// =============================================================================

/// Render rows as CSV with the given column order.
pub fn write_csv(rows: &[AttestationRow], columns: &[String]) -> CsvResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(columns)
        .map_err(|e| CsvError::WriteError(e.to_string()))?;

    for row in rows {
        writer
            .write_record(columns.iter().map(|c| row.text(c)))
            .map_err(|e| CsvError::WriteError(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CsvError::WriteError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CsvError::WriteError(e.to_string()))
}
