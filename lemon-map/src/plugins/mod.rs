mod lemons;
pub use lemons::{markers, Lemons, Marker};
