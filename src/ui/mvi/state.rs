/// Marker trait for state objects.
///
/// `Default` lets owners move state out with `std::mem::take` before
/// reducing; `PartialEq` lets tests compare whole snapshots.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
