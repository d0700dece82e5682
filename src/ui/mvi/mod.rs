//! Model-View-Intent primitives shared by the conversation, analytics and
//! topic picker state.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! Remote calls never run inside a reducer. Their completions come back as
//! intents.

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
