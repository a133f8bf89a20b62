use thiserror::Error;

/// Platform error code: the user refused location access.
pub const PERMISSION_DENIED: u16 = 1;
/// Platform error code: the position could not be determined.
pub const POSITION_UNAVAILABLE: u16 = 2;
/// Platform error code: the position was not obtained within the timeout.
pub const TIMEOUT: u16 = 3;

/// Classified geolocation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationErrorKind {
    #[error("Location access denied by user")]
    PermissionDenied,
    #[error("Location information unavailable")]
    PositionUnavailable,
    #[error("Location request timeout")]
    Timeout,
    #[error("An unknown error occurred")]
    Unknown,
}

impl LocationErrorKind {
    /// Map a platform error code onto one of the four kinds.
    pub fn from_code(code: u16) -> Self {
        match code {
            PERMISSION_DENIED => LocationErrorKind::PermissionDenied,
            POSITION_UNAVAILABLE => LocationErrorKind::PositionUnavailable,
            TIMEOUT => LocationErrorKind::Timeout,
            _ => LocationErrorKind::Unknown,
        }
    }
}

/// Every way a single attempt (location, then weather) can fail.
///
/// The `Display` text is what the user sees; nothing else about the error is
/// surfaced by the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("Geolocation is not supported by your browser")]
    Unsupported,

    #[error(transparent)]
    Location(#[from] LocationErrorKind),

    #[error("Network error: Unable to connect to the weather service")]
    Network,

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid response from the weather service: {0}")]
    InvalidResponse(String),
}

impl WeatherError {
    /// Build an `Api` error, preferring the server-supplied message.
    pub fn api(status: u16, server_message: Option<String>) -> Self {
        let message = server_message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {status}"));

        WeatherError::Api { status, message }
    }
}
