//! Delimited-text trajectory files.
//!
//! Header `time,pos,vel,torque`, one row per state. A trajectory has one
//! torque fewer than states, so the final row carries a `0` placeholder that
//! the reader drops. Files produced elsewhere (one torque per row) load the
//! same way, losing only the final torque. Quoting and whitespace are
//! handled by the `csv` reader.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, Writer};

use pendulum_core::error::RecordError;
use pendulum_core::trajectory::Trajectory;
use pendulum_core::types::State;

/// Expected header row.
pub const HEADER: &str = "time,pos,vel,torque";

const COLUMNS: [&str; 4] = ["time", "pos", "vel", "torque"];

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write `trajectory` as CSV.
pub fn write_csv<W: Write>(trajectory: &Trajectory, writer: W) -> Result<(), RecordError> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(COLUMNS)?;
    let torques = trajectory.torques();
    for (i, (time, state)) in trajectory.times().iter().zip(trajectory.states()).enumerate() {
        let torque = torques.get(i).copied().unwrap_or(0.0);
        writer.write_record([
            time.to_string(),
            state.position.to_string(),
            state.velocity.to_string(),
            torque.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `trajectory` to a CSV file at `path`, replacing it if present.
pub fn save_csv(trajectory: &Trajectory, path: impl AsRef<Path>) -> Result<(), RecordError> {
    let file = File::create(path)?;
    write_csv(trajectory, file)
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Parse a CSV trajectory. Blank lines are skipped and fields are trimmed.
pub fn read_csv<R: Read>(reader: R) -> Result<Trajectory, RecordError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?;
    if !headers.iter().eq(COLUMNS) {
        return Err(RecordError::Header {
            expected: HEADER,
            got: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut times = Vec::new();
    let mut states = Vec::new();
    let mut torques = Vec::new();
    for record in reader.records() {
        let [time, position, velocity, torque] = parse_row(&record?)?;
        times.push(time);
        states.push(State::new(position, velocity));
        torques.push(torque);
    }
    // Placeholder for the final state.
    torques.pop();

    Trajectory::from_parts(times, states, torques).map_err(RecordError::from)
}

/// Read a CSV trajectory from `path`.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Trajectory, RecordError> {
    let file = File::open(path)?;
    read_csv(file)
}

fn parse_row(record: &StringRecord) -> Result<[f64; 4], RecordError> {
    let line = record.position().map_or(0, csv::Position::line);
    if record.len() != COLUMNS.len() {
        return Err(RecordError::MalformedRow {
            line,
            message: format!("expected {} columns, found {}", COLUMNS.len(), record.len()),
        });
    }
    let mut row = [0.0_f64; 4];
    for (value, field) in row.iter_mut().zip(record) {
        *value = field.parse().map_err(|e| RecordError::MalformedRow {
            line,
            message: format!("`{field}`: {e}"),
        })?;
        if !value.is_finite() {
            return Err(RecordError::MalformedRow {
                line,
                message: format!("`{field}` is not finite"),
            });
        }
    }
    Ok(row)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pendulum_core::error::TrajectoryError;

    use super::*;

    fn sample() -> Trajectory {
        Trajectory::from_parts(
            vec![0.0, 0.01, 0.02],
            vec![State::new(0.01, 0.0), State::new(0.0105, 0.1), State::new(0.012, 0.2)],
            vec![0.5, -1.0],
        )
        .unwrap()
    }

    fn to_string(trajectory: &Trajectory) -> String {
        let mut buf = Vec::new();
        write_csv(trajectory, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_header_and_placeholder() {
        let text = to_string(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "0,0.01,0,0.5");
        assert_eq!(lines[3], "0.02,0.012,0.2,0");
    }

    #[test]
    fn read_restores_trajectory_exactly() {
        let original = sample();
        let back = read_csv(to_string(&original).as_bytes()).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn read_accepts_external_files() {
        let text = "time,pos,vel,torque\n0.0, 0.0, 0.0, 0.3\n\n0.5, 0.1, 0.4, 0.2\n";
        let traj = read_csv(text.as_bytes()).unwrap();
        assert_eq!(traj.len(), 2);
        assert_eq!(traj.torques(), &[0.3]);
    }

    #[test]
    fn rejects_wrong_header() {
        let err = read_csv("t,x,v,u\n0,0,0,0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RecordError::Header { .. }));
        let err = read_csv("".as_bytes()).unwrap_err();
        assert!(matches!(err, RecordError::Header { .. }));
    }

    #[test]
    fn rejects_malformed_rows() {
        let err = read_csv("time,pos,vel,torque\n0,0,0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RecordError::MalformedRow { line: 2, .. }));

        let err = read_csv("time,pos,vel,torque\n0,0,0,0\n0.1,abc,0,0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RecordError::MalformedRow { line: 3, .. }));

        let err = read_csv("time,pos,vel,torque\n0,NaN,0,0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RecordError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn read_accepts_quoted_fields() {
        let text = "time,pos,vel,torque\n\"0\",\"0.1\",0,0.3\n1,0,0,0\n";
        let traj = read_csv(text.as_bytes()).unwrap();
        assert_eq!(traj.states()[0], State::new(0.1, 0.0));
        assert_eq!(traj.torques(), &[0.3]);
    }

    #[test]
    fn invalid_utf8_is_csv_error() {
        let err = read_csv(&b"time,pos,vel,torque\n0,\xff,0,0\n"[..]).unwrap_err();
        assert!(matches!(err, RecordError::Csv(_)));
    }

    #[test]
    fn rejects_header_only() {
        let err = read_csv("time,pos,vel,torque\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RecordError::Trajectory(TrajectoryError::Empty)));
    }

    #[test]
    fn rejects_non_increasing_time() {
        let err = read_csv("time,pos,vel,torque\n0,0,0,0\n0,0,0,0\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            RecordError::Trajectory(TrajectoryError::NonIncreasingTime { index: 1 })
        ));
    }

    #[test]
    fn save_and_load_file() {
        let path = std::env::temp_dir().join("pendulum_sim_record_test.csv");
        save_csv(&sample(), &path).unwrap();
        let back = load_csv(&path).unwrap();
        assert_eq!(back, sample());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_csv("/nonexistent/pendulum/trajectory.csv").unwrap_err();
        assert!(matches!(err, RecordError::Io(_)));
    }
}
