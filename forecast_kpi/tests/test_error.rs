use forecast_kpi::ForecastError;
use std::io;

#[test]
fn test_error_conversion() {
    // IO error conversion
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);

    match forecast_error {
        ForecastError::IoError(_) => {}
        _ => panic!("Expected IoError variant"),
    }

    // JSON error conversion
    let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let forecast_error = ForecastError::from(json_error);

    match forecast_error {
        ForecastError::JsonError(_) => {}
        _ => panic!("Expected JsonError variant"),
    }
}

#[test]
fn test_error_display() {
    let error = ForecastError::ValidationError("top_n must be greater than zero".to_string());
    let error_string = format!("{}", error);
    assert!(error_string.contains("top_n must be greater than zero"));

    let error = ForecastError::MissingColumns(vec!["MAPE".to_string(), "Región".to_string()]);
    assert_eq!(error.to_string(), "Missing required columns: MAPE, Región");

    // With source error
    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error = ForecastError::from(io_error);
    let error_string = format!("{}", error);

    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));
}
