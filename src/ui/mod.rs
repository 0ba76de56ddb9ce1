pub mod app;
pub mod chart;
pub mod layout;
pub mod levels;
pub mod statusbar;

pub use app::App;
pub use chart::Chart;
pub use layout::LayoutManager;
pub use levels::LevelPanel;
pub use statusbar::StatusBar;
