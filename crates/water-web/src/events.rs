use crate::dom;
use crate::App;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use water_core::normalize_canvas_point;
use web_sys as web;

/// Pointer position in normalized pool coordinates, if the canvas has a size.
#[inline]
fn pool_point(canvas: &web::HtmlCanvasElement, ev: &web::PointerEvent) -> Option<glam::Vec2> {
    let (local, size) = dom::client_to_canvas(canvas, ev.client_x(), ev.client_y());
    normalize_canvas_point(local.x, local.y, size.x, size.y)
}

pub(crate) fn wire_pointer(canvas: &web::HtmlCanvasElement, app: &Rc<RefCell<App>>) {
    // Press: start a stroke and drop ink
    {
        let app = app.clone();
        let canvas_c = canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let Some(pos) = pool_point(&canvas_c, &ev) else {
                return;
            };
            let _ = canvas_c.set_pointer_capture(ev.pointer_id());
            let mut guard = app.borrow_mut();
            let app = &mut *guard;
            let force = app.pointer.down(pos, app.sim.now_ms());
            app.sim.inject_pointer_force(force);
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);
        let _ = canvas
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Drag
    {
        let app = app.clone();
        let canvas_c = canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let Some(pos) = pool_point(&canvas_c, &ev) else {
                return;
            };
            let mut guard = app.borrow_mut();
            let app = &mut *guard;
            if let Some(force) = app.pointer.moved(pos, app.sim.now_ms()) {
                app.sim.inject_pointer_force(force);
            }
        }) as Box<dyn FnMut(_)>);
        let _ = canvas
            .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Release, cancel or leave all end the stroke
    for kind in ["pointerup", "pointercancel", "pointerleave"] {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
            app.borrow_mut().pointer.up();
        }) as Box<dyn FnMut(_)>);
        let _ = canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

pub(crate) fn wire_keyboard(app: &Rc<RefCell<App>>) {
    let Some(window) = web::window() else {
        return;
    };
    {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            let mut guard = app.borrow_mut();
            let app = &mut *guard;
            if let Some(action) = app.keyboard.key_down(&ev.key(), ev.shift_key(), ev.repeat()) {
                action.apply(&mut app.sim);
            }
        }) as Box<dyn FnMut(_)>);
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            let mut guard = app.borrow_mut();
            let app = &mut *guard;
            if let Some(action) = app.keyboard.key_up(&ev.key()) {
                action.apply(&mut app.sim);
            }
        }) as Box<dyn FnMut(_)>);
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Track window resizes: canvas backing size and the overlay's CSS surface.
pub(crate) fn wire_resize(canvas: &web::HtmlCanvasElement, app: &Rc<RefCell<App>>) {
    let Some(window) = web::window() else {
        return;
    };
    let app = app.clone();
    let canvas_c = canvas.clone();
    let closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_c);
        app.borrow_mut().overlay.resize(dom::css_size(&canvas_c));
    }) as Box<dyn FnMut()>);
    let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
}
