use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::app::App;
use crate::panel::{PointerButton, PointerEvent};

/// Translate a terminal mouse event into a panel pointer event. Scroll
/// wheel events have no meaning on the panel.
pub fn pointer_event(mouse: MouseEvent) -> Option<PointerEvent> {
    let (x, y) = (mouse.column, mouse.row);

    let event = match mouse.kind {
        MouseEventKind::Down(button) => PointerEvent::Press {
            button: pointer_button(button),
            x,
            y,
        },
        MouseEventKind::Up(button) => PointerEvent::Release {
            button: pointer_button(button),
            x,
            y,
        },
        MouseEventKind::Drag(button) => PointerEvent::Motion {
            x,
            y,
            primary_held: button == MouseButton::Left,
        },
        // plain motion: no button is down
        MouseEventKind::Moved => PointerEvent::Motion {
            x,
            y,
            primary_held: false,
        },
        _ => return None,
    };
    Some(event)
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
    }
}

/// Handle a mouse event.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if let Some(event) = pointer_event(mouse) {
        app.handle_pointer(event);
    }
}
