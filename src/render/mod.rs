pub mod background;
pub mod canvas;
pub mod font;
pub mod surface;
pub mod view;
#[cfg(feature = "desktop")]
pub mod window;

pub use background::Background;
pub use canvas::Canvas;
pub use surface::{HeadlessSurface, Surface};
pub use view::HudView;
#[cfg(feature = "desktop")]
pub use window::MinifbSurface;
