pub mod drag;
pub mod pick;
pub mod queue;

pub use drag::{DragTracker, ShotIntent};
pub use pick::{pick_player, PickRay};
pub use queue::{InputEvent, InputQueue, CUSTOM_RESET};
