use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sales pipeline.
///
/// Nothing in the pipeline catches or retries these; the first error aborts
/// the run and is reported by the binary.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be created or written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited structure of a file is malformed.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The file has no header row.
    #[error("No header row found in {0}")]
    EmptyInput(PathBuf),

    /// A column the pipeline depends on is absent from the table header.
    #[error("Table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    /// A cell holds a value of the wrong kind for the operation.
    #[error("Column '{column}', row {row}: expected {expected}")]
    UnexpectedType {
        column: String,
        row: usize,
        expected: &'static str,
    },

    /// A date value did not match any recognised format.
    #[error("Column '{column}', row {row}: invalid date '{value}'")]
    DateParse {
        column: String,
        row: usize,
        value: String,
    },

    /// A value used in arithmetic is not numeric.
    #[error("Column '{column}', row {row}: '{value}' is not a number")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },

    /// The database could not be reached or rejected the credentials.
    #[error("Failed to connect to database {target}: {message}")]
    Connection { target: String, message: String },

    /// The database rejected a table write.
    #[error("Failed to write table '{table}': {message}")]
    Write { table: String, message: String },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the sales crates.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = PipelineError::FileRead {
            path: PathBuf::from("/data/sales.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/sales.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_file_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = PipelineError::FileWrite {
            path: PathBuf::from("/out/sales_clean.csv"),
            source: io_err,
        };
        assert_eq!(
            err.to_string(),
            "Failed to write file /out/sales_clean.csv: denied"
        );
    }

    #[test]
    fn test_error_display_missing_column() {
        let err = PipelineError::MissingColumn {
            table: "sales".to_string(),
            column: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "Table 'sales' has no column 'quantity'");
    }

    #[test]
    fn test_error_display_date_parse() {
        let err = PipelineError::DateParse {
            column: "sale_date".to_string(),
            row: 3,
            value: "yesterday".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Column 'sale_date', row 3: invalid date 'yesterday'"
        );
    }

    #[test]
    fn test_error_display_invalid_number() {
        let err = PipelineError::InvalidNumber {
            column: "quantity".to_string(),
            row: 0,
            value: "two".to_string(),
        };
        assert_eq!(err.to_string(), "Column 'quantity', row 0: 'two' is not a number");
    }

    #[test]
    fn test_error_display_connection() {
        let err = PipelineError::Connection {
            target: "mysql://app@db:3306/shop".to_string(),
            message: "connection refused".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to connect to database"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_error_display_write() {
        let err = PipelineError::Write {
            table: "sales".to_string(),
            message: "syntax error".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to write table 'sales': syntax error");
    }

    #[test]
    fn test_error_display_config() {
        let err = PipelineError::Config("DB_HOST is not set".to_string());
        assert_eq!(err.to_string(), "Configuration error: DB_HOST is not set");
    }

    #[test]
    fn test_error_display_empty_input() {
        let err = PipelineError::EmptyInput(PathBuf::from("empty.csv"));
        assert_eq!(err.to_string(), "No header row found in empty.csv");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PipelineError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
