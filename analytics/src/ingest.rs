use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{info, warn};

use crate::dtos::{parse_timestamp, PipelineExec, PipelineExecLine, PipelineStatus};
use crate::error::{Error, Result};

/// Reads every execution from a newline-delimited JSON file.
///
/// The whole file is parsed before anything is returned, so a single bad
/// line fails the load without yielding a partial log.
pub fn read_executions<P: AsRef<Path>>(path: P) -> Result<Vec<PipelineExec>> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|source| Error::InputUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let executions = parse_executions(BufReader::new(file))?;
    info!(
        "Loaded {} executions from {}",
        executions.len(),
        path.display()
    );

    Ok(executions)
}

pub fn parse_executions<R: BufRead>(reader: R) -> Result<Vec<PipelineExec>> {
    let mut executions = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|source| Error::Read {
            line: line_number,
            source,
        })?;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        executions.push(parse_line(trimmed, line_number)?);
    }

    Ok(executions)
}

pub fn parse_line(line: &str, line_number: usize) -> Result<PipelineExec> {
    let raw = serde_json::from_str::<PipelineExecLine>(line).map_err(|source| {
        Error::MalformedRecord {
            line: line_number,
            source,
        }
    })?;

    if raw.status == PipelineStatus::Unknown {
        warn!(
            "Execution {} on line {line_number} has an unrecognized status, treating it as UNKNOWN",
            raw.execution_id
        );
    }

    let timestamp = |value: String| {
        parse_timestamp(&value).map_err(|source| Error::InvalidTimestamp {
            line: line_number,
            value,
            source,
        })
    };

    let start_time = timestamp(raw.start_time)?;
    let end_time = match raw.end_time.filter(|value| !value.is_empty()) {
        Some(value) => Some(timestamp(value)?),
        None => None,
    };

    Ok(PipelineExec {
        execution_id: raw.execution_id,
        pipeline_id: raw.pipeline_id,
        status: raw.status,
        start_time,
        end_time,
        duration: raw.duration.unwrap_or(0),
        records_processed: raw.records_processed.unwrap_or(0),
        team: raw.team,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const FULL: &str = r#"{"execution_id":"e1","pipeline_id":"p1","status":"SUCCESS","start_time":"2024-01-01T00:00:00Z","end_time":"2024-01-01T00:05:00Z","duration":300,"records_processed":1200,"team":"data"}"#;

    #[test]
    fn parses_a_complete_record() {
        let exec = parse_line(FULL, 1).unwrap();

        assert_eq!(exec.execution_id, "e1");
        assert_eq!(exec.pipeline_id, "p1");
        assert_eq!(exec.status, PipelineStatus::Success);
        assert!(exec.end_time.is_some());
        assert_eq!(exec.duration, 300);
        assert_eq!(exec.records_processed, 1200);
        assert_eq!(exec.team.as_deref(), Some("data"));
    }

    #[test]
    fn optional_fields_default_when_absent_or_null() {
        let exec = parse_line(
            r#"{"execution_id":"e2","pipeline_id":"p1","status":"RUNNING","start_time":"2024-01-01T00:00:00Z","end_time":null,"duration":null,"team":"data"}"#,
            1,
        )
        .unwrap();

        assert_eq!(exec.end_time, None);
        assert_eq!(exec.duration, 0);
        assert_eq!(exec.records_processed, 0);
    }

    #[test]
    fn empty_end_time_is_treated_as_missing() {
        let exec = parse_line(
            r#"{"execution_id":"e3","pipeline_id":"p1","status":"FAILED","start_time":"2024-01-01T00:00:00Z","end_time":"","team":"data"}"#,
            1,
        )
        .unwrap();

        assert_eq!(exec.end_time, None);
    }

    #[test]
    fn unknown_status_is_coerced() {
        let exec = parse_line(
            r#"{"execution_id":"e4","pipeline_id":"p1","status":"PAUSED","start_time":"2024-01-01T00:00:00Z","team":"data"}"#,
            1,
        )
        .unwrap();

        assert_eq!(exec.status, PipelineStatus::Unknown);
    }

    #[test]
    fn null_team_is_accepted() {
        let exec = parse_line(&FULL.replace(r#""team":"data""#, r#""team":null"#), 1).unwrap();
        assert_eq!(exec.team, None);
    }

    #[test]
    fn missing_team_key_is_malformed() {
        let error = parse_line(&FULL.replace(r#","team":"data""#, ""), 3).unwrap_err();
        assert!(matches!(error, Error::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let error = parse_line(
            r#"{"execution_id":"e5","status":"SUCCESS","start_time":"2024-01-01T00:00:00Z","team":"data"}"#,
            7,
        )
        .unwrap_err();

        assert!(matches!(error, Error::MalformedRecord { line: 7, .. }));
    }

    #[test]
    fn bad_start_time_is_reported_with_its_value() {
        let error = parse_line(
            r#"{"execution_id":"e6","pipeline_id":"p1","status":"SUCCESS","start_time":"not-a-date","team":"data"}"#,
            2,
        )
        .unwrap_err();

        match error {
            Error::InvalidTimestamp { line, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn skips_blank_lines_and_counts_physical_lines() {
        let input = format!("{FULL}\n\n   \n{FULL}\nnot json\n");
        let error = parse_executions(Cursor::new(input)).unwrap_err();

        assert!(matches!(error, Error::MalformedRecord { line: 5, .. }));
    }

    #[test]
    fn parses_every_non_empty_line_in_order() {
        let second = FULL.replace("\"e1\"", "\"e2\"");
        let input = format!("{FULL}\n\n{second}\n");
        let executions = parse_executions(Cursor::new(input)).unwrap();

        let ids: Vec<_> = executions.iter().map(|e| e.execution_id.as_str()).collect();
        assert_eq!(ids, ["e1", "e2"]);
    }

    #[test]
    fn missing_file_is_input_unavailable() {
        let error = read_executions("/definitely/not/here.jsonl").unwrap_err();
        assert!(matches!(error, Error::InputUnavailable { .. }));
    }
}
