//! Per-CPU frequency/governor/slider mirror and the two paths that mutate
//! it: the once-per-second reconcile tick and pointer gestures.

pub mod display;
pub mod gesture;
pub mod reconcile;
pub mod state;

pub use display::PanelDisplay;
pub use gesture::{GestureOutcome, PointerButton, PointerEvent};
pub use reconcile::Tick;
pub use state::{CpuPanel, CpuRegions, HitRect};
