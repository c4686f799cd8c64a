//! # Client Constants
//!
//! Default values and the fixed user-facing messages surfaced through
//! [`crate::lifecycle::JobLifecycleState::Failed`] and the display model.
//!
//! Messages are kept in Polish to match the presentation layer the client
//! was built for.

/// Default values shared by configuration and components
pub mod defaults {
    pub const BASE_URL: &str = "http://localhost:8080";
    pub const UPLOAD_PATH: &str = "/api/v1/upload";
    pub const RESULTS_PATH: &str = "/api/v1/results";
    pub const REQUEST_TIMEOUT_MS: u64 = 30_000;

    /// Poll cadence between status queries
    pub const POLL_INTERVAL_MS: u64 = 2_000;
    pub const STATUS_TIMEOUT_MS: u64 = 10_000;
    pub const UPLOAD_TIMEOUT_MS: u64 = 30_000;

    /// Multipart field name the upload endpoint expects
    pub const UPLOAD_FIELD_NAME: &str = "file";
    pub const ALLOWED_EXTENSIONS: &[&str] = &["csv"];
}

/// Human-readable reasons carried by failed lifecycle states
pub mod messages {
    /// Upload rejected without a backend-provided detail
    pub const UPLOAD_SERVER_ERROR: &str = "Błąd serwera.";
    /// Upload never reached the backend
    pub const UPLOAD_CONNECTION_ERROR: &str = "Nie można połączyć się z serwerem.";
    /// Status query failed at the transport level
    pub const RESULTS_CONNECTION_ERROR: &str = "Nie można połączyć się z serwerem wyników.";
    pub const JOB_FAILED_FALLBACK: &str = "Nieznany błąd przetwarzania.";
    pub const INCOMPLETE_DATA: &str = "Otrzymano niekompletne dane z serwera.";
    pub const NO_FILE_SELECTED: &str = "Nie wybrano pliku lub plik jest nieprawidłowy.";
    pub const INVALID_FILE_TYPE: &str = "Nieprawidłowy typ pliku. Proszę wybrać plik .csv";
    pub const OPTIMIZATION_COMPLETED: &str = "Optymalizacja zakończona.";
}

/// Labels used by the duration and distance formatters
pub mod units {
    pub const HOURS: &str = "godz.";
    pub const MINUTES: &str = "minut";
    pub const KILOMETERS: &str = "km";
}
