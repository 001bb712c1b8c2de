use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn find_canvas(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", id))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("#{} is not a canvas: {:?}", id, e))
}

/// Keep the canvas backing store at CSS size * devicePixelRatio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Canvas size in CSS pixels, the space the text overlay lays out in.
#[inline]
pub fn css_size(canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(rect.width() as f32, rect.height() as f32)
}

/// Client coordinates relative to the canvas' top-left corner, with the
/// canvas' CSS size.
#[inline]
pub fn client_to_canvas(canvas: &web::HtmlCanvasElement, client_x: i32, client_y: i32) -> (Vec2, Vec2) {
    let rect = canvas.get_bounding_client_rect();
    let local = Vec2::new(
        (client_x as f64 - rect.left()) as f32,
        (client_y as f64 - rect.top()) as f32,
    );
    (local, Vec2::new(rect.width() as f32, rect.height() as f32))
}

/// A click-through layer stacked over the canvas for the floating text.
pub fn create_text_layer(
    document: &web::Document,
    canvas: &web::HtmlCanvasElement,
) -> anyhow::Result<web::HtmlElement> {
    let layer = document
        .create_element("div")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    layer.set_class_name("water-text-layer");
    let _ = layer.set_attribute(
        "style",
        "position:absolute;inset:0;pointer-events:none;overflow:hidden;",
    );
    let parent = canvas
        .parent_element()
        .ok_or_else(|| anyhow::anyhow!("canvas has no parent element"))?;
    parent
        .append_child(&layer)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(layer)
}
