pub mod animation;
pub mod canvas;
pub mod clock;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod interaction;
pub mod outline;
pub mod painter;
pub mod renderer;
pub mod scheduler;
pub mod theme;

#[cfg(feature = "gui")]
pub mod gui;

pub use animation::{EyeAnimation, EyeFrame, LidRegime, LidState};
pub use canvas::{Canvas, DrawCommand, RecordingCanvas, RenderHint};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, EyeConfig, Tuning};
pub use controller::EyeController;
pub use geometry::{EyeGeometry, Viewport};
pub use interaction::InteractionEvent;
pub use outline::AlmondOutline;
pub use painter::{CanvasSurface, Detail, EyeSurface};
pub use renderer::{EyeRenderer, EyeUniforms};
pub use scheduler::{FrameDecision, FrameRequester, FrameScheduler};
pub use theme::{Color, ThemeMode, ThemePalette, ThemeSource, ThemeVariables};
