//! State module - selection state and the dashboard context that mutates it

mod dashboard;
mod selection;

pub use dashboard::{Dashboard, DashboardSnapshot, Surface};
pub use selection::{SelectionSource, SelectionUpdate};
