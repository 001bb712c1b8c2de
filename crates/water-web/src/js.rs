use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsValue;
use water_core::RenderState;

fn set(obj: &Object, key: &str, value: impl Into<JsValue>) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value.into());
}

fn pair(x: f32, y: f32) -> Array {
    let arr = Array::new();
    arr.push(&JsValue::from_f64(x as f64));
    arr.push(&JsValue::from_f64(y as f64));
    arr
}

/// Plain JS object mirror of the render state, camelCase keys and hex colors.
pub fn render_state_to_js(state: &RenderState) -> JsValue {
    let obj = Object::new();
    set(&obj, "rippleCenter", pair(state.ripple_center.x, state.ripple_center.y));
    set(&obj, "deleteMix", state.delete_mix);
    set(&obj, "energy", state.energy);
    set(&obj, "pointerEnergy", state.pointer_energy);
    set(&obj, "baseColor", state.base_color.to_hex());
    set(&obj, "highlightColor", state.highlight_color.to_hex());
    set(&obj, "purifyProgress", state.purify_progress);

    let drops = Array::new();
    for drop in &state.ink_drops {
        let d = Object::new();
        set(&d, "position", pair(drop.position.x, drop.position.y));
        set(&d, "color", drop.color.to_hex());
        set(&d, "age", drop.age);
        drops.push(&d);
    }
    set(&obj, "inkDrops", drops);

    set(&obj, "audioAmplitude", state.audio_amplitude);
    set(&obj, "audioPeak", state.audio_peak);
    set(&obj, "audioFrequency", state.audio_frequency);
    obj.into()
}
