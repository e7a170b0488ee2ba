use wasm_bindgen::prelude::*;

/// Planificador del siguiente paso del polling
pub trait FrameScheduler {
    fn schedule_next_frame(&self, callback: Box<dyn FnOnce()>);
}

/// requestAnimationFrame del navegador
#[derive(Clone, Default)]
pub struct AnimationFrameScheduler;

impl FrameScheduler for AnimationFrameScheduler {
    fn schedule_next_frame(&self, callback: Box<dyn FnOnce()>) {
        let Some(window) = web_sys::window() else {
            log::error!("❌ [SCANNER] No window, no se puede planificar el frame");
            return;
        };

        let closure = Closure::once_into_js(move |_timestamp: f64| callback());
        if let Err(e) = window.request_animation_frame(closure.unchecked_ref()) {
            log::error!("❌ [SCANNER] requestAnimationFrame falló: {:?}", e);
        }
    }
}
