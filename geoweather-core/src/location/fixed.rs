use super::{ErrorCallback, Position, PositionOptions, PositionSource, SuccessCallback};
use crate::Coordinate;

/// A position supplied up front, e.g. from `--lat/--lon`.
#[derive(Debug, Clone, Copy)]
pub struct FixedSource {
    coordinate: Coordinate,
}

impl FixedSource {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

impl PositionSource for FixedSource {
    fn get_current_position(
        &self,
        on_success: SuccessCallback,
        _on_error: ErrorCallback,
        _options: PositionOptions,
    ) {
        on_success(Position {
            latitude: self.coordinate.lat,
            longitude: self.coordinate.lon,
        });
    }
}
