use glam::Vec2;
use rand::Rng;
use wasm_bindgen::JsCast;
use water_core::{RenderState, TextOverlay};
use web_sys as web;

const DISSOLVE_STYLE: &str = "opacity:0;filter:blur(8px);transition:opacity 2s ease-out,filter 2s ease-out;";

/// DOM side of the floating text: one absolutely positioned span per
/// overlay item, kept index for index with the model's items.
pub struct DomOverlay {
    model: TextOverlay,
    layer: web::HtmlElement,
    spans: Vec<web::HtmlElement>,
}

impl DomOverlay {
    pub fn new(layer: web::HtmlElement, surface_css: Vec2) -> Self {
        Self {
            model: TextOverlay::new(surface_css),
            layer,
            spans: Vec::new(),
        }
    }

    pub fn resize(&mut self, surface_css: Vec2) {
        self.model.resize(surface_css);
    }

    pub fn add_text<R: Rng + ?Sized>(
        &mut self,
        text: &str,
        intensity: f32,
        energy: f32,
        now_ms: f64,
        rng: &mut R,
    ) {
        let Some(item) = self.model.add_text(text, intensity, energy, now_ms, rng) else {
            return;
        };
        let span = match create_span(&self.layer, &item.text, item.font_px, item.weight) {
            Ok(span) => span,
            Err(e) => {
                log::warn!("[overlay] could not create text node: {:?}", e);
                self.model.pop();
                return;
            }
        };
        self.spans.push(span);
    }

    /// Remove expired items, then move the survivors with the water.
    pub fn update(&mut self, time_sec: f32, now_ms: f64, state: &RenderState) {
        let spans = std::mem::take(&mut self.spans);
        self.spans = self
            .model
            .items()
            .iter()
            .zip(spans)
            .filter_map(|(item, span)| {
                if now_ms < item.remove_at_ms {
                    Some(span)
                } else {
                    span.remove();
                    None
                }
            })
            .collect();
        self.model.retain_live(now_ms);

        let placements = self.model.layout(time_sec, now_ms, state);
        for ((item, place), span) in self.model.items().iter().zip(placements).zip(&self.spans) {
            let mut style = format!(
                "position:absolute;left:{:.1}px;top:{:.1}px;font-size:{:.1}px;font-weight:{};\
                 white-space:nowrap;color:rgba(255,255,255,0.85);\
                 transform:translate(-50%,-50%) translateY({:.1}px) scale({:.3},{:.3}) skewX({:.2}deg);",
                place.center.x,
                place.center.y,
                item.font_px,
                item.weight,
                place.float_y,
                place.scale.x,
                place.scale.y,
                place.skew_deg,
            );
            if place.dissolving {
                style.push_str(DISSOLVE_STYLE);
            }
            let _ = span.set_attribute("style", &style);
        }
    }
}

fn create_span(
    layer: &web::HtmlElement,
    text: &str,
    font_px: f32,
    weight: u16,
) -> Result<web::HtmlElement, wasm_bindgen::JsValue> {
    let document = layer
        .owner_document()
        .ok_or_else(|| wasm_bindgen::JsValue::from_str("layer is detached"))?;
    let span = document
        .create_element("span")?
        .dyn_into::<web::HtmlElement>()
        .map_err(wasm_bindgen::JsValue::from)?;
    span.set_text_content(Some(text));
    let _ = span.set_attribute(
        "style",
        &format!("position:absolute;font-size:{font_px:.1}px;font-weight:{weight};opacity:0;"),
    );
    layer.append_child(&span)?;
    Ok(span)
}
