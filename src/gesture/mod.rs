pub mod machine;

pub use machine::{ArmingState, GestureStateMachine, ARMING_FRAMES, DISPATCH_TIMEOUT};
