use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{DrawingArea, EventControllerMotion, GestureClick};
use tracing::trace;

use super::app::SharedController;
use super::controller::PendingTurn;
use super::rendering;
use crate::game::logic::Snapshot;

/// The last snapshot pushed to the view, read by the draw function.
pub type SharedFrame = Rc<RefCell<Option<Snapshot>>>;

/// Create the board drawing area. Handlers are attached with [`attach`] once
/// the controller exists.
pub fn create_board() -> DrawingArea {
    let drawing_area = DrawingArea::new();
    drawing_area.set_content_width(rendering::REF_SIZE as i32);
    drawing_area.set_content_height(rendering::REF_SIZE as i32);
    drawing_area.set_hexpand(true);
    drawing_area.set_vexpand(true);
    drawing_area
}

/// Wire drawing to `frame`, and clicks and hover to the controller.
pub fn attach(drawing_area: &DrawingArea, controller: SharedController, frame: SharedFrame) {
    let hovered: Rc<Cell<Option<usize>>> = Rc::new(Cell::new(None));

    // --- Draw handler ---
    {
        let hovered = hovered.clone();
        drawing_area.set_draw_func(move |_area, cr, w, h| {
            if let Some(snapshot) = frame.borrow().as_ref() {
                rendering::render(cr, snapshot, hovered.get(), w, h);
            }
        });
    }

    // --- Click handler ---
    {
        let da = drawing_area.clone();
        let click = GestureClick::new();
        click.connect_released(move |_gesture, _n, x, y| {
            let Some(index) = rendering::mouse_to_cell(x, y, da.width(), da.height()) else {
                return;
            };
            trace!(index, "cell clicked");
            let pending = controller.borrow_mut().click(index);
            if let Some(pending) = pending {
                schedule_computer(&controller, pending);
            }
        });
        drawing_area.add_controller(click);
    }

    // --- Mouse move handler ---
    {
        let da = drawing_area.clone();
        let hovered_move = hovered.clone();
        let motion = EventControllerMotion::new();
        motion.connect_motion(move |_ctrl, x, y| {
            let cell = rendering::mouse_to_cell(x, y, da.width(), da.height());
            if hovered_move.replace(cell) != cell {
                da.queue_draw();
            }
        });
        let da = drawing_area.clone();
        motion.connect_leave(move |_ctrl| {
            if hovered.replace(None).is_some() {
                da.queue_draw();
            }
        });
        drawing_area.add_controller(motion);
    }
}

/// Run the computer's reply once its delay has elapsed. A reset or restart in
/// the meantime turns the token stale and the callback does nothing.
fn schedule_computer(controller: &SharedController, pending: PendingTurn) {
    let controller = controller.clone();
    glib::timeout_add_local_once(pending.delay, move || {
        controller.borrow_mut().fire(pending.token);
    });
}
