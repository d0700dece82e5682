/// Marker trait for intents: key presses, turn completions, fetch results.
pub trait Intent: Send + 'static {}
