// ============================================================================
// EVENT HANDLING - Listeners con ciclo de vida acotado
// ============================================================================
// El listener vive mientras viva el ScopedListener: al hacer drop se quita del
// target y se libera el closure. Nada de closure.forget() ni de listeners
// globales en document.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, MouseEvent};

/// Listener registrado en un EventTarget, eliminado en Drop
pub struct ScopedListener {
    target: EventTarget,
    event_type: String,
    closure: Closure<dyn FnMut(Event)>,
}

impl ScopedListener {
    /// Crear event listener genérico
    pub fn new<F>(target: &EventTarget, event_type: &str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event_type: event_type.to_string(),
            closure,
        })
    }
}

impl Drop for ScopedListener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            &self.event_type,
            self.closure.as_ref().unchecked_ref(),
        );
    }
}

/// Helper para crear click handler
pub fn on_click<F>(target: &EventTarget, mut handler: F) -> Result<ScopedListener, JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    ScopedListener::new(target, "click", move |event: Event| {
        if let Ok(mouse) = event.dyn_into::<MouseEvent>() {
            handler(mouse);
        }
    })
}
