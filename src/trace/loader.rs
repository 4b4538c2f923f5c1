use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use log::info;
use serde::Deserialize;

use super::{CornerMarker, Sample, TelemetryTrace};
use crate::errors::LapscopeError;

/// The one shape the data-fetching collaborator hands us: the recorded
/// samples for a lap plus the circuit's static corner annotations.
#[derive(Debug, Deserialize)]
pub struct TelemetryTraceDTO {
    pub data: Vec<Sample>,
    #[serde(default)]
    pub corners: Vec<CornerMarker>,
}

/// Load a `TelemetryTraceDTO` JSON document from disk and validate it
/// into a playable trace.
pub fn load_trace_json(source_file: &PathBuf) -> Result<TelemetryTrace, LapscopeError> {
    if !source_file.exists() {
        return Err(LapscopeError::InvalidTraceFile {
            path: format!("{:?}", source_file),
        });
    }

    let file = File::open(source_file).map_err(|e| LapscopeError::TraceIOError { source: e })?;
    let dto: TelemetryTraceDTO = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| LapscopeError::TraceParseError { source: e })?;

    let trace = TelemetryTrace::new(dto.data, dto.corners)?;
    info!(
        "Loaded {:?}: {} samples over {:.1}s, {} corners",
        source_file,
        trace.len(),
        trace.samples().last().map(|s| s.time_s).unwrap_or(0.),
        trace.corners().len()
    );
    Ok(trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_trace_with_corners() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"data":[
                {{"Time":0.0,"Distance":0.0,"X":0.0,"Y":0.0,"Speed":100.0,"Throttle":50.0,"Brake":0.0}},
                {{"Time":2.0,"Distance":50.0,"X":10.0,"Y":0.0,"Speed":200.0,"Throttle":100.0,"Brake":0.0}}
            ],"corners":[{{"number":1,"Distance":30.0,"X":6.0,"Y":0.0}}]}}"#
        )
        .unwrap();
        file.flush().unwrap();

        let trace = load_trace_json(&file.path().to_path_buf()).unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.samples()[1].speed_kmh, 200.0);
        assert_eq!(trace.max_distance_m(), 50.0);
        assert_eq!(trace.corners().len(), 1);
        assert_eq!(trace.corners()[0].number, 1);
    }

    #[test]
    fn test_load_trace_without_corners_key() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"data":[{{"Time":0.0,"Distance":0.0,"X":0.0,"Y":0.0,"Speed":0.0,"Throttle":0.0,"Brake":0.0}}]}}"#
        )
        .unwrap();
        file.flush().unwrap();

        let trace = load_trace_json(&file.path().to_path_buf()).unwrap();
        assert_eq!(trace.len(), 1);
        assert!(trace.corners().is_empty());
    }

    #[test]
    fn test_load_out_of_order_trace_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"data":[
                {{"Time":2.0,"Distance":0.0,"X":0.0,"Y":0.0,"Speed":0.0,"Throttle":0.0,"Brake":0.0}},
                {{"Time":1.0,"Distance":50.0,"X":10.0,"Y":0.0,"Speed":0.0,"Throttle":0.0,"Brake":0.0}}
            ],"corners":[]}}"#
        )
        .unwrap();
        file.flush().unwrap();

        let result = load_trace_json(&file.path().to_path_buf());
        assert!(matches!(
            result,
            Err(LapscopeError::NonMonotonicTrace { index: 1, .. })
        ));
    }

    #[test]
    fn test_load_malformed_json_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"data": not json"#).unwrap();
        file.flush().unwrap();

        let result = load_trace_json(&file.path().to_path_buf());
        assert!(matches!(result, Err(LapscopeError::TraceParseError { .. })));
    }

    #[test]
    fn test_load_missing_file_rejected() {
        let result = load_trace_json(&PathBuf::from("/nonexistent/lap.json"));
        assert!(matches!(result, Err(LapscopeError::InvalidTraceFile { .. })));
    }
}
