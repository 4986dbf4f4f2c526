pub mod controller;
pub mod dwell;
pub mod state;

pub use controller::HudController;
pub use dwell::{ControlAction, DwellControl, DwellTimer, DWELL_DURATION};
pub use state::{Command, CommandOutcome, DriveMode, HudState, Notification, DRIVE_MODES};
