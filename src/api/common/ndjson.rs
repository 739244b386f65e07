//
//  kibana-api
//  api/common/ndjson.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! NDJSON export handling.
//!
//! Saved-object and detection-rule exports answer with newline-delimited
//! JSON. Each line is kept as an untouched raw JSON record so it can be
//! written back out byte-for-byte or decoded into a typed struct later.
//!
//! Kibana appends an export summary (`exportedCount`, `missingRefCount`, ...)
//! as the last line unless `excludeExportDetails` is set.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;

/// Splits an NDJSON body into raw JSON records.
///
/// Lines are trimmed, leading comma artifacts are stripped and blank lines
/// are dropped. Every remaining line must be valid JSON.
pub fn parse_ndjson(body: &[u8]) -> serde_json::Result<Vec<Box<RawValue>>> {
    body.split(|b| *b == b'\n')
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .map(serde_json::from_slice::<Box<RawValue>>)
        .collect()
}

fn clean_line(line: &[u8]) -> &[u8] {
    let mut line = line.trim_ascii();
    while let Some(rest) = line.strip_prefix(b",") {
        line = rest.trim_ascii_start();
    }
    line
}

/// Summary line Kibana appends to an export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportDetails {
    #[serde(rename = "exportedCount", alias = "exported_count", default)]
    pub exported_count: u64,

    #[serde(rename = "missingRefCount", alias = "missing_rules_count", default)]
    pub missing_ref_count: u64,

    #[serde(rename = "missingReferences", alias = "missing_rules", default)]
    pub missing_references: Vec<serde_json::Value>,
}

/// Decoded NDJSON export response.
#[derive(Debug, Clone)]
pub struct NdjsonExport {
    /// The status code Kibana answered with.
    pub status_code: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Every record in the body, in order, including the summary line.
    pub records: Vec<Box<RawValue>>,
}

impl NdjsonExport {
    pub(crate) fn from_body(
        status_code: StatusCode,
        headers: HeaderMap,
        body: &[u8],
    ) -> serde_json::Result<Self> {
        Ok(Self {
            status_code,
            headers,
            records: parse_ndjson(body)?,
        })
    }

    /// The export summary, if the last record is one.
    pub fn details(&self) -> Option<ExportDetails> {
        self.records
            .last()
            .filter(|record| is_details(record))
            .and_then(|record| serde_json::from_str(record.get()).ok())
    }

    /// Exported objects, without the summary line.
    pub fn objects(&self) -> impl Iterator<Item = &RawValue> {
        let skip_last = self.records.last().is_some_and(|r| is_details(r));
        let take = self.records.len() - usize::from(skip_last);
        self.records.iter().take(take).map(|r| &**r)
    }

    /// Decodes every exported object into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<Vec<T>> {
        self.objects()
            .map(|record| serde_json::from_str(record.get()))
            .collect()
    }

    /// Writes every record followed by a newline.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for record in &self.records {
            writer.write_all(record.get().as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }

    /// Writes the export as an NDJSON file at `path`, replacing it.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create export file {}", path.display()))?;
        self.write_to(BufWriter::new(file))
            .with_context(|| format!("Failed to write export file {}", path.display()))
    }
}

fn is_details(record: &RawValue) -> bool {
    serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(record.get())
        .map(|map| map.contains_key("exportedCount") || map.contains_key("exported_count"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = concat!(
        r#"{"id":"a","type":"index-pattern","attributes":{"title":"logs-*"}}"#,
        "\n",
        r#",{"id":"b","type":"dashboard","attributes":{"title":"Ops"}}"#,
        "\n\n",
        r#"{"exportedCount":2,"missingRefCount":0,"missingReferences":[]}"#,
        "\n"
    );

    fn export() -> NdjsonExport {
        NdjsonExport::from_body(StatusCode::OK, HeaderMap::new(), EXPORT.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_strips_commas_and_blank_lines() {
        let records = parse_ndjson(EXPORT.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[1].get().starts_with(r#"{"id":"b""#));
    }

    #[test]
    fn test_parse_rejects_invalid_line() {
        assert!(parse_ndjson(b"{\"id\":1}\nnot json\n").is_err());
    }

    #[test]
    fn test_details_and_objects() {
        let export = export();
        let details = export.details().unwrap();
        assert_eq!(details.exported_count, 2);
        assert_eq!(export.objects().count(), 2);

        let objects: Vec<serde_json::Value> = export.decode().unwrap();
        assert_eq!(objects[0]["id"], "a");
        assert_eq!(objects[1]["type"], "dashboard");
    }

    #[test]
    fn test_no_details_line() {
        let export =
            NdjsonExport::from_body(StatusCode::OK, HeaderMap::new(), b"{\"rule_id\":\"r1\"}").unwrap();
        assert!(export.details().is_none());
        assert_eq!(export.objects().count(), 1);
    }

    #[test]
    fn test_write_to_file_round_trip() {
        let export = export();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.ndjson");

        export.write_to_file(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with('\n'));
        assert_eq!(written.lines().count(), 3);

        let reread = parse_ndjson(written.as_bytes()).unwrap();
        let original: Vec<serde_json::Value> = export
            .records
            .iter()
            .map(|r| serde_json::from_str(r.get()).unwrap())
            .collect();
        let round_tripped: Vec<serde_json::Value> = reread
            .iter()
            .map(|r| serde_json::from_str(r.get()).unwrap())
            .collect();
        assert_eq!(original, round_tripped);
    }
}
