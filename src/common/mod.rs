pub mod clock;
pub mod frame;
pub mod rotation;

pub use clock::{Clock, SystemClock};
pub use frame::{Frame, FrameLease, FrameReleaser};
pub use rotation::Rotation;
