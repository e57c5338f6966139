mod lemon;
pub use lemon::Lemon;

mod marker_color;
pub use marker_color::{parse_hex_color, DEFAULT_LEMON_COLOR};

mod map_bounds;
pub use map_bounds::MapBounds;
