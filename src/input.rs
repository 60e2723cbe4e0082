//! Pointer input and item interaction.
//!
//! [`Interaction`] turns raw per-frame pointer state into click, release,
//! double-click and drag events, and arbitrates which item is hovered and
//! which one owns the mouse. Items are identified by [`Id`]s; an item that
//! owns the mouse must call [`Interaction::button_behavior`] every frame or
//! it loses ownership at the next [`Interaction::new_frame`].

use bitflags::bitflags;

use crate::geometry::{Rect, Vec2};
use crate::id::Id;

/// Seconds between two clicks for them to count as a double click.
pub const DOUBLE_CLICK_TIME: f64 = 0.30;
/// Maximum distance between two clicks of a double click.
pub const DOUBLE_CLICK_MAX_DIST: f32 = 6.0;
/// Distance the mouse must travel while held before it counts as dragging.
pub const DRAG_THRESHOLD: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

/// Standard cursor icons an item can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorIcon {
    /// The default arrow cursor.
    #[default]
    Default,
    /// Pointer/hand cursor for clickable elements.
    Pointer,
    /// Column resize cursor.
    ColResize,
    /// Not allowed cursor.
    NotAllowed,
}

/// Raw input for one frame, as reported by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Seconds elapsed since the previous frame
    pub delta_time: f32,
    /// Size of the surface the draw list renders into
    pub display_size: Vec2,
    /// Pointer position, `None` when the pointer left the surface
    pub mouse_pos: Option<Vec2>,
    /// Left, right and middle button state
    pub mouse_down: [bool; 3],
    pub modifiers: Modifiers,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            delta_time: 1.0 / 60.0,
            display_size: Vec2::new(1280.0, 720.0),
            mouse_pos: None,
            mouse_down: [false; 3],
            modifiers: Modifiers::default(),
        }
    }
}

impl FrameInput {
    pub fn with_mouse(mut self, pos: Vec2, left_down: bool) -> Self {
        self.mouse_pos = Some(pos);
        self.mouse_down[0] = left_down;
        self
    }
}

bitflags! {
    /// When a button reports `pressed`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ButtonFlags: u8 {
        /// Pressed when clicked and released over the item (default)
        const PRESS_ON_CLICK_RELEASE = 1 << 0;
        /// Pressed as soon as the mouse goes down
        const PRESS_ON_CLICK = 1 << 1;
        /// Pressed on the second click of a double click
        const PRESS_ON_DOUBLE_CLICK = 1 << 2;
        /// Items submitted later may take the hover from this one
        const ALLOW_OVERLAP = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonResponse {
    pub pressed: bool,
    pub hovered: bool,
    pub held: bool,
}

#[derive(Debug)]
pub struct Interaction {
    time: f64,
    delta_time: f32,
    display_size: Vec2,
    mouse_pos: Vec2,
    mouse_delta: Vec2,
    mouse_down: [bool; 3],
    mouse_clicked: [bool; 3],
    mouse_released: [bool; 3],
    mouse_double_clicked: [bool; 3],
    mouse_clicked_time: [f64; 3],
    mouse_clicked_pos: [Vec2; 3],
    mouse_drag_max_dist_sqr: [f32; 3],
    modifiers: Modifiers,

    hovered_id: Option<Id>,
    hovered_allow_overlap: bool,
    hovered_id_prev_frame: Option<Id>,
    hovered_id_timer: f32,
    active_id: Option<Id>,
    active_id_alive: bool,
    active_id_click_offset: Vec2,
    cursor: CursorIcon,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Interaction {
    pub fn new() -> Self {
        Self {
            time: 0.0,
            delta_time: 0.0,
            display_size: FrameInput::default().display_size,
            mouse_pos: Vec2::new(-f32::MAX, -f32::MAX),
            mouse_delta: Vec2::ZERO,
            mouse_down: [false; 3],
            mouse_clicked: [false; 3],
            mouse_released: [false; 3],
            mouse_double_clicked: [false; 3],
            mouse_clicked_time: [f64::MIN; 3],
            mouse_clicked_pos: [Vec2::ZERO; 3],
            mouse_drag_max_dist_sqr: [0.0; 3],
            modifiers: Modifiers::default(),
            hovered_id: None,
            hovered_allow_overlap: false,
            hovered_id_prev_frame: None,
            hovered_id_timer: 0.0,
            active_id: None,
            active_id_alive: false,
            active_id_click_offset: Vec2::ZERO,
            cursor: CursorIcon::Default,
        }
    }

    pub fn new_frame(&mut self, input: &FrameInput) {
        self.delta_time = input.delta_time;
        self.time += input.delta_time as f64;
        self.display_size = input.display_size;
        self.modifiers = input.modifiers;

        let pos = input.mouse_pos.unwrap_or(Vec2::new(-f32::MAX, -f32::MAX));
        self.mouse_delta = if input.mouse_pos.is_some() && self.mouse_pos.x > -f32::MAX {
            pos - self.mouse_pos
        } else {
            Vec2::ZERO
        };
        self.mouse_pos = pos;

        for n in 0..3 {
            let down = input.mouse_down[n];
            let was_down = self.mouse_down[n];
            self.mouse_clicked[n] = down && !was_down;
            self.mouse_released[n] = !down && was_down;
            self.mouse_double_clicked[n] = false;
            if self.mouse_clicked[n] {
                let d = self.mouse_pos - self.mouse_clicked_pos[n];
                if self.time - self.mouse_clicked_time[n] < DOUBLE_CLICK_TIME
                    && d.x * d.x + d.y * d.y < DOUBLE_CLICK_MAX_DIST * DOUBLE_CLICK_MAX_DIST
                {
                    self.mouse_double_clicked[n] = true;
                    // A third click starts a new sequence.
                    self.mouse_clicked_time[n] = f64::MIN;
                } else {
                    self.mouse_clicked_time[n] = self.time;
                }
                self.mouse_clicked_pos[n] = self.mouse_pos;
                self.mouse_drag_max_dist_sqr[n] = 0.0;
            } else if down {
                let d = self.mouse_pos - self.mouse_clicked_pos[n];
                self.mouse_drag_max_dist_sqr[n] =
                    self.mouse_drag_max_dist_sqr[n].max(d.x * d.x + d.y * d.y);
            }
            self.mouse_down[n] = down;
        }

        // Hover timer keeps running while the same item stays hovered.
        if self.hovered_id.is_some() {
            self.hovered_id_timer += self.delta_time;
        } else {
            self.hovered_id_timer = 0.0;
        }
        self.hovered_id_prev_frame = self.hovered_id;
        self.hovered_id = None;
        self.hovered_allow_overlap = false;

        if self.active_id.is_some() && !self.active_id_alive {
            log::trace!("active id {:?} was not kept alive, releasing", self.active_id);
            self.active_id = None;
        }
        self.active_id_alive = false;
        self.cursor = CursorIcon::Default;
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn display_size(&self) -> Vec2 {
        self.display_size
    }

    pub fn mouse_pos(&self) -> Vec2 {
        self.mouse_pos
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_down[button.index()]
    }

    pub fn is_mouse_clicked(&self, button: MouseButton) -> bool {
        self.mouse_clicked[button.index()]
    }

    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_released[button.index()]
    }

    pub fn is_mouse_double_clicked(&self, button: MouseButton) -> bool {
        self.mouse_double_clicked[button.index()]
    }

    pub fn is_mouse_dragging(&self, button: MouseButton) -> bool {
        let n = button.index();
        self.mouse_down[n] && self.mouse_drag_max_dist_sqr[n] >= DRAG_THRESHOLD * DRAG_THRESHOLD
    }

    pub fn is_mouse_hovering_rect(&self, rect: &Rect) -> bool {
        rect.contains(self.mouse_pos.x, self.mouse_pos.y)
    }

    pub fn hovered_id(&self) -> Option<Id> {
        self.hovered_id
    }

    /// Seconds the current hovered item has been hovered without interruption.
    pub fn hovered_id_timer(&self) -> f32 {
        self.hovered_id_timer
    }

    pub fn active_id(&self) -> Option<Id> {
        self.active_id
    }

    pub fn is_any_item_active(&self) -> bool {
        self.active_id.is_some()
    }

    /// Mouse position relative to the active item's rectangle at click time.
    pub fn active_id_click_offset(&self) -> Vec2 {
        self.active_id_click_offset
    }

    pub fn set_active_id(&mut self, id: Id, rect: &Rect) {
        self.active_id = Some(id);
        self.active_id_alive = true;
        self.active_id_click_offset = self.mouse_pos - rect.min;
    }

    pub fn clear_active_id(&mut self) {
        self.active_id = None;
        self.active_id_alive = false;
    }

    pub fn keep_alive(&mut self, id: Id) {
        if self.active_id == Some(id) {
            self.active_id_alive = true;
        }
    }

    pub fn cursor(&self) -> CursorIcon {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: CursorIcon) {
        self.cursor = cursor;
    }

    /// Whether `id` may claim the hover for `rect` this frame.
    pub fn item_hoverable(&mut self, id: Id, rect: &Rect, flags: ButtonFlags) -> bool {
        if let Some(hovered) = self.hovered_id {
            if hovered != id && !self.hovered_allow_overlap {
                return false;
            }
        }
        if let Some(active) = self.active_id {
            if active != id {
                return false;
            }
        }
        if !self.is_mouse_hovering_rect(rect) {
            return false;
        }
        if self.hovered_id_prev_frame != Some(id) {
            self.hovered_id_timer = 0.0;
        }
        self.hovered_id = Some(id);
        self.hovered_allow_overlap = flags.contains(ButtonFlags::ALLOW_OVERLAP);
        true
    }

    /// Standard press/hold logic for a clickable rectangle.
    pub fn button_behavior(&mut self, id: Id, rect: &Rect, flags: ButtonFlags) -> ButtonResponse {
        let flags = if flags.intersects(
            ButtonFlags::PRESS_ON_CLICK_RELEASE
                | ButtonFlags::PRESS_ON_CLICK
                | ButtonFlags::PRESS_ON_DOUBLE_CLICK,
        ) {
            flags
        } else {
            flags | ButtonFlags::PRESS_ON_CLICK_RELEASE
        };

        let hovered = self.item_hoverable(id, rect, flags);
        let mut pressed = false;
        let left = MouseButton::Left.index();

        if hovered {
            let clicked = self.mouse_clicked[left];
            let double_clicked = self.mouse_double_clicked[left];
            if clicked
                && (flags.contains(ButtonFlags::PRESS_ON_CLICK)
                    || (flags.contains(ButtonFlags::PRESS_ON_DOUBLE_CLICK) && double_clicked))
            {
                pressed = true;
                self.set_active_id(id, rect);
            } else if clicked && flags.contains(ButtonFlags::PRESS_ON_CLICK_RELEASE) {
                self.set_active_id(id, rect);
            }
        }

        let mut held = false;
        if self.active_id == Some(id) {
            self.active_id_alive = true;
            if self.mouse_down[left] {
                held = true;
            } else {
                if hovered
                    && flags.contains(ButtonFlags::PRESS_ON_CLICK_RELEASE)
                    && self.mouse_released[left]
                {
                    pressed = true;
                }
                self.clear_active_id();
            }
        }

        ButtonResponse {
            pressed,
            hovered,
            held,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(it: &mut Interaction, pos: (f32, f32), down: bool) {
        it.new_frame(&FrameInput::default().with_mouse(Vec2::new(pos.0, pos.1), down));
    }

    #[test]
    fn test_click_release_presses_once() {
        let mut it = Interaction::new();
        let id = Id::ROOT.with_str("button");
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);

        frame(&mut it, (5.0, 5.0), false);
        assert!(!it.button_behavior(id, &rect, ButtonFlags::empty()).pressed);
        frame(&mut it, (5.0, 5.0), true);
        let r = it.button_behavior(id, &rect, ButtonFlags::empty());
        assert!(r.held && !r.pressed);
        frame(&mut it, (5.0, 5.0), false);
        let r = it.button_behavior(id, &rect, ButtonFlags::empty());
        assert!(r.pressed && !r.held);
        assert_eq!(it.active_id(), None);
    }

    #[test]
    fn test_active_item_blocks_others() {
        let mut it = Interaction::new();
        let a = Id::ROOT.with_str("a");
        let b = Id::ROOT.with_str("b");
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);

        frame(&mut it, (5.0, 5.0), false);
        frame(&mut it, (5.0, 5.0), true);
        assert!(it.button_behavior(a, &rect, ButtonFlags::PRESS_ON_CLICK).pressed);
        assert!(!it.button_behavior(b, &rect, ButtonFlags::PRESS_ON_CLICK).hovered);
    }

    #[test]
    fn test_active_id_released_when_not_kept_alive() {
        let mut it = Interaction::new();
        let id = Id::ROOT.with_str("a");
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        frame(&mut it, (5.0, 5.0), false);
        frame(&mut it, (5.0, 5.0), true);
        it.button_behavior(id, &rect, ButtonFlags::empty());
        assert_eq!(it.active_id(), Some(id));
        frame(&mut it, (5.0, 5.0), true);
        frame(&mut it, (5.0, 5.0), true);
        assert_eq!(it.active_id(), None);
    }

    #[test]
    fn test_double_click_detection() {
        let mut it = Interaction::new();
        frame(&mut it, (5.0, 5.0), false);
        frame(&mut it, (5.0, 5.0), true);
        assert!(!it.is_mouse_double_clicked(MouseButton::Left));
        frame(&mut it, (5.0, 5.0), false);
        frame(&mut it, (6.0, 5.0), true);
        assert!(it.is_mouse_double_clicked(MouseButton::Left));
    }

    #[test]
    fn test_drag_threshold() {
        let mut it = Interaction::new();
        frame(&mut it, (0.0, 0.0), false);
        frame(&mut it, (0.0, 0.0), true);
        frame(&mut it, (3.0, 0.0), true);
        assert!(!it.is_mouse_dragging(MouseButton::Left));
        frame(&mut it, (7.0, 0.0), true);
        assert!(it.is_mouse_dragging(MouseButton::Left));
        assert_eq!(it.mouse_delta(), Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_hover_timer_accumulates() {
        let mut it = Interaction::new();
        let id = Id::ROOT.with_str("a");
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        for _ in 0..5 {
            frame(&mut it, (5.0, 5.0), false);
            it.button_behavior(id, &rect, ButtonFlags::empty());
        }
        assert!(it.hovered_id_timer() > 0.06);
    }
}
