mod alert;
mod loader;
mod sheet;
pub use alert::WidgetAlert;
pub use loader::WidgetLoader;
pub use sheet::{SheetAction, WidgetSheet};
