use crate::api::types::{PlayerId, ScreenPoint};

/// A completed drag on a player's ball, ready for the shot controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotIntent {
    pub player: PlayerId,
    pub start: ScreenPoint,
    pub end: ScreenPoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    player: PlayerId,
    start: ScreenPoint,
    current: ScreenPoint,
}

/// Transient pointer state between down and up. At most one drag at a time;
/// a second `begin` replaces the first.
#[derive(Debug, Default, Clone)]
pub struct DragTracker {
    active: Option<Drag>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, player: PlayerId, at: ScreenPoint) {
        self.active = Some(Drag {
            player,
            start: at,
            current: at,
        });
    }

    /// Track the pointer while dragging. Ignored when idle.
    pub fn update(&mut self, at: ScreenPoint) {
        if let Some(drag) = &mut self.active {
            drag.current = at;
        }
    }

    /// End the drag. Returns `None` if no drag was in progress.
    pub fn release(&mut self, at: ScreenPoint) -> Option<ShotIntent> {
        self.active.take().map(|drag| ShotIntent {
            player: drag.player,
            start: drag.start,
            end: at,
        })
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn player(&self) -> Option<PlayerId> {
        self.active.map(|d| d.player)
    }

    /// Pull-back vector in pixels (start − current), for aim feedback.
    pub fn pull(&self) -> Option<(f32, f32)> {
        self.active
            .map(|d| (d.start.x - d.current.x, d.start.y - d.current.y))
    }
}
