use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_sys::{HtmlCanvasElement, PointerEvent, WheelEvent};

use super::dom::listen;
use crate::error::Result;
use crate::scene::Scene;

/// Wire pointer drag and wheel zoom on `canvas` to the scene's orbit controls.
pub fn install(canvas: &HtmlCanvasElement, scene: Rc<RefCell<Scene>>) -> Result<()> {
    let last: Rc<Cell<Option<(i32, i32)>>> = Rc::new(Cell::new(None));

    {
        let (scene, last, canvas_ref) = (Rc::clone(&scene), Rc::clone(&last), canvas.clone());
        listen(canvas, "pointerdown", move |e: PointerEvent| {
            last.set(Some((e.client_x(), e.client_y())));
            canvas_ref.set_pointer_capture(e.pointer_id()).ok();
            scene.borrow_mut().controls.begin_drag();
        })?;
    }
    {
        let (scene, last, canvas_ref) = (Rc::clone(&scene), Rc::clone(&last), canvas.clone());
        listen(canvas, "pointermove", move |e: PointerEvent| {
            let Some((x, y)) = last.get() else { return };
            let (nx, ny) = (e.client_x(), e.client_y());
            last.set(Some((nx, ny)));
            scene.borrow_mut().controls.drag(
                (nx - x) as f32,
                (ny - y) as f32,
                canvas_ref.client_height() as f32,
            );
        })?;
    }
    for event in ["pointerup", "pointercancel"] {
        let (scene, last) = (Rc::clone(&scene), Rc::clone(&last));
        listen(canvas, event, move |_: PointerEvent| {
            last.set(None);
            scene.borrow_mut().controls.end_drag();
        })?;
    }
    listen(canvas, "wheel", move |e: WheelEvent| {
        scene.borrow_mut().controls.dolly(e.delta_y() as f32);
    })?;
    Ok(())
}
