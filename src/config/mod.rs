//! Configuration module

mod widget;

pub use widget::IndexSourceKind;
pub use widget::WidgetConfig;
pub use widget::DEFAULT_CONFIG_FILE;
