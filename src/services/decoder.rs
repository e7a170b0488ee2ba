// ============================================================================
// DECODER - Decodificación QR (jsQR) y carga bajo demanda de la librería
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlScriptElement;
use crate::config::ScannerConfig;
use crate::error::ScanError;
use crate::utils::html::escape_css_attr;
use crate::utils::jsqr_ffi;

/// Decodificador opaco: buffer RGBA + dimensiones → texto
pub trait Decoder {
    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<String>;
}

/// Garantiza que el decodificador está disponible antes de escanear
pub trait DecoderProvider {
    /// Idempotente: si ya está cargado, termina inmediatamente
    fn ensure_loaded(&self) -> LocalBoxFuture<'static, Result<(), ScanError>>;
}

/// jsQR expuesto como global por su script
#[derive(Clone, Default)]
pub struct JsQrDecoder;

impl Decoder for JsQrDecoder {
    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<String> {
        let buffer = js_sys::Uint8ClampedArray::new_with_length(pixels.len() as u32);
        buffer.copy_from(pixels);

        match jsqr_ffi::js_qr(&buffer, width, height) {
            Ok(code) if code.is_object() => {
                js_sys::Reflect::get(&code, &JsValue::from_str("data"))
                    .ok()
                    .and_then(|data| data.as_string())
            }
            Ok(_) => None,
            Err(e) => {
                log::warn!("⚠️ [DECODER] jsQR lanzó un error: {}", ScanError::describe(&e));
                None
            }
        }
    }
}

type LoadResult = Result<(), ScanError>;

/// Carga en curso (o terminada) compartida entre llamadas
pub type PendingLoad = Shared<LocalBoxFuture<'static, LoadResult>>;

/// Una sola carga para todas las llamadas concurrentes
///
/// Mientras la carga está en curso, o si terminó bien, todas las llamadas
/// esperan la misma. Tras un fallo la siguiente llamada vuelve a empezar.
#[derive(Default)]
pub struct SharedLoad {
    pending: RefCell<Option<PendingLoad>>,
}

impl SharedLoad {
    pub fn run<F>(&self, start: F) -> PendingLoad
    where
        F: FnOnce() -> LocalBoxFuture<'static, LoadResult>,
    {
        let mut pending = self.pending.borrow_mut();
        if let Some(load) = pending.as_ref() {
            if !matches!(load.peek(), Some(Err(_))) {
                return load.clone();
            }
        }

        let load = start().shared();
        *pending = Some(load.clone());
        load
    }
}

/// Carga la librería insertando un <script> si su global no existe
#[derive(Clone)]
pub struct ScriptDecoderProvider {
    script_url: String,
    global_name: String,
    load: Rc<SharedLoad>,
}

impl ScriptDecoderProvider {
    pub fn new(script_url: impl Into<String>, global_name: impl Into<String>) -> Self {
        Self {
            script_url: script_url.into(),
            global_name: global_name.into(),
            load: Rc::new(SharedLoad::default()),
        }
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        Self::new(config.decoder_url.clone(), config.decoder_global.clone())
    }
}

impl DecoderProvider for ScriptDecoderProvider {
    fn ensure_loaded(&self) -> LocalBoxFuture<'static, Result<(), ScanError>> {
        if global_present(&self.global_name) {
            return future::ready(Ok(())).boxed_local();
        }

        let url = self.script_url.clone();
        let global = self.global_name.clone();
        let load = self.load.run(|| load_script(url.clone()).boxed_local());
        async move {
            load.await?;

            if global_present(&global) {
                log::info!("✅ [DECODER] {} disponible", global);
                Ok(())
            } else {
                Err(ScanError::Initialization(format!(
                    "{} loaded but `{}` is not defined",
                    url, global
                )))
            }
        }
        .boxed_local()
    }
}

fn global_present(name: &str) -> bool {
    web_sys::window()
        .and_then(|window| js_sys::Reflect::get(&window, &JsValue::from_str(name)).ok())
        .map(|value| !value.is_undefined() && !value.is_null())
        .unwrap_or(false)
}

/// Esperar el <script src=url> de <head> (o insertarlo) hasta load/error
async fn load_script(url: String) -> LoadResult {
    let init_error = |detail: String| ScanError::Initialization(format!("{}: {}", url, detail));

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| init_error("No document".to_string()))?;
    let head = document
        .head()
        .ok_or_else(|| init_error("No <head>".to_string()))?;

    let selector = format!(r#"script[src="{}"]"#, escape_css_attr(&url));
    let existing = head
        .query_selector(&selector)
        .map_err(|e| init_error(ScanError::describe(&e)))?
        .and_then(|el| el.dyn_into::<HtmlScriptElement>().ok());

    let (script, appended) = match existing {
        Some(script) => {
            log::info!("📦 [DECODER] Esperando el <script> existente de {}", url);
            (script, false)
        }
        None => {
            log::info!("📦 [DECODER] Cargando {}", url);
            let script: HtmlScriptElement = document
                .create_element("script")
                .and_then(|el| el.dyn_into::<HtmlScriptElement>().map_err(JsValue::from))
                .map_err(|e| init_error(ScanError::describe(&e)))?;
            script.set_src(&url);
            script.set_async(true);
            (script, true)
        }
    };

    // Listeners en vez de onload/onerror: el <script> puede ser de otra app
    let mut listen = Ok(());
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        listen = script
            .add_event_listener_with_callback("load", &resolve)
            .and_then(|_| script.add_event_listener_with_callback("error", &reject));
    });
    listen.map_err(|e| init_error(ScanError::describe(&e)))?;

    if appended {
        head.append_child(&script)
            .map_err(|e| init_error(ScanError::describe(&e)))?;
    }

    match JsFuture::from(promise).await {
        Ok(_) => Ok(()),
        Err(_) => {
            // Un <script> fallido no vuelve a disparar eventos: fuera, para reintentar
            script.remove();
            Err(init_error("script failed to load".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use futures::channel::oneshot;
    use futures::executor::block_on;

    fn deferred(starts: &Rc<Cell<usize>>, senders: &Rc<RefCell<Vec<oneshot::Sender<LoadResult>>>>)
        -> impl FnOnce() -> LocalBoxFuture<'static, LoadResult>
    {
        let starts = starts.clone();
        let senders = senders.clone();
        move || {
            starts.set(starts.get() + 1);
            let (sender, receiver) = oneshot::channel();
            senders.borrow_mut().push(sender);
            receiver
                .map(|r| r.unwrap_or_else(|_| Err(ScanError::Initialization("cancelled".to_string()))))
                .boxed_local()
        }
    }

    #[test]
    fn concurrent_loads_share_one_fetch() {
        let load = SharedLoad::default();
        let starts = Rc::new(Cell::new(0));
        let senders = Rc::new(RefCell::new(Vec::new()));

        let first = load.run(deferred(&starts, &senders));
        let second = load.run(deferred(&starts, &senders));
        assert_eq!(starts.get(), 1);

        let sender = senders.borrow_mut().remove(0);
        let _ = sender.send(Ok(()));

        assert_eq!(block_on(first), Ok(()));
        assert_eq!(block_on(second), Ok(()));

        // Ya cargada: no se vuelve a pedir
        assert_eq!(block_on(load.run(deferred(&starts, &senders))), Ok(()));
        assert_eq!(starts.get(), 1);
    }

    #[test]
    fn failed_load_is_retried() {
        let load = SharedLoad::default();
        let starts = Rc::new(Cell::new(0));
        let senders = Rc::new(RefCell::new(Vec::new()));

        let first = load.run(deferred(&starts, &senders));
        let sender = senders.borrow_mut().remove(0);
        let _ = sender.send(Err(ScanError::Initialization("404".to_string())));
        assert!(block_on(first).is_err());

        let retry = load.run(deferred(&starts, &senders));
        assert_eq!(starts.get(), 2);

        let sender = senders.borrow_mut().remove(0);
        let _ = sender.send(Ok(()));
        assert_eq!(block_on(retry), Ok(()));
    }
}
