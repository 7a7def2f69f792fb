use crate::error::{ConfigError, PlotError};
use crate::numerical::series::SeriesSet;
use csv::Writer;
use nalgebra::{DMatrix, DVector};
use simplelog::*;
use std::fs::File;
use std::path::Path;

/// Level filter for the loglevel names used in task documents.
pub fn parse_loglevel(level: &str) -> Result<LevelFilter, ConfigError> {
    match level.trim().to_lowercase().as_str() {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" => Ok(LevelFilter::Off),
        other => Err(ConfigError::LogLevel(other.to_string())),
    }
}

/// Terminal logger at `level`, plus a file logger when `log_file` is given.
///
/// A second call keeps the logger installed by the first one.
pub fn init_logger(level: &str, log_file: Option<&Path>) -> Result<(), ConfigError> {
    let level = parse_loglevel(level)?;
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let file = File::create(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    if CombinedLogger::init(loggers).is_err() {
        log::debug!("logger already initialized");
    }
    Ok(())
}

/// Writes `x_mesh` and the columns of `matrix` as CSV: header `[arg, headers...]`,
/// then one row per mesh point.
pub fn save_matrix_to_csv(
    matrix: &DMatrix<f64>,
    headers: &[String],
    path: &Path,
    x_mesh: &DVector<f64>,
    arg: &str,
) -> Result<(), PlotError> {
    if matrix.nrows() != x_mesh.len() {
        return Err(PlotError::Shape {
            expected: x_mesh.len(),
            actual: matrix.nrows(),
        });
    }
    let file = File::create(path).map_err(|source| PlotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = Writer::from_writer(file);

    let mut headers_with_x = Vec::with_capacity(headers.len() + 1);
    headers_with_x.push(arg.to_string());
    headers_with_x.extend(headers.iter().cloned());
    writer.write_record(&headers_with_x)?;

    for (i, row) in matrix.row_iter().enumerate() {
        let mut row_data = Vec::with_capacity(row.len() + 1);
        row_data.push(x_mesh[i].to_string());
        row_data.extend(row.iter().map(|&val| val.to_string()));
        writer.write_record(&row_data)?;
    }
    writer.flush().map_err(|source| PlotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Every curve of `series` as one CSV column next to the grid.
pub fn save_series_to_csv(series: &SeriesSet, variable: &str, path: &Path) -> Result<(), PlotError> {
    if series.is_empty() {
        return Err(PlotError::NoSeries);
    }
    save_matrix_to_csv(
        &series.to_matrix(),
        &series.headers(),
        path,
        &series.x_vector(),
        variable,
    )?;
    log::info!("series saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::series::{PlotRequest, build_series};
    use crate::symbolic::parse_expr::parse;
    use tempfile::tempdir;

    #[test]
    fn test_loglevels() {
        assert_eq!(parse_loglevel("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_loglevel(" Warn ").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_loglevel("off").unwrap(), LevelFilter::Off);
        assert_eq!(
            parse_loglevel("loud").unwrap_err(),
            ConfigError::LogLevel("loud".to_string())
        );
    }

    #[test]
    fn test_save_series_to_csv() {
        let request = PlotRequest::new(parse("x**2").unwrap(), 0.0, 2.0).with_samples(3);
        let (series, _) = build_series(&request).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("series.csv");
        save_series_to_csv(&series, "x", &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["x", "Function", "First Derivative", "Integral"]);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[2][0], "2");
        assert_eq!(&rows[2][1], "4");
        assert_eq!(&rows[2][2], "4");
    }

    #[test]
    fn test_shape_mismatch_is_reported() {
        let matrix = DMatrix::<f64>::zeros(3, 1);
        let x = DVector::from_vec(vec![0.0, 1.0]);
        let dir = tempdir().unwrap();
        let result = save_matrix_to_csv(&matrix, &["y".to_string()], &dir.path().join("a.csv"), &x, "x");
        assert!(matches!(result, Err(PlotError::Shape { expected: 2, actual: 3 })));
    }

    #[test]
    fn test_unwritable_path() {
        let request = PlotRequest::new(parse("x").unwrap(), 0.0, 1.0).with_samples(2);
        let (series, _) = build_series(&request).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("series.csv");
        assert!(matches!(
            save_series_to_csv(&series, "x", &path),
            Err(PlotError::Io { .. })
        ));
    }
}
