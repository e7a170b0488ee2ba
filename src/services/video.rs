// ============================================================================
// VIDEO SURFACE - <video> enlazado al stream + captura de frames por canvas
// ============================================================================

use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlMediaElement, HtmlVideoElement};
use crate::dom::create_element;
use crate::error::ScanError;
use crate::models::Frame;
use crate::services::camera::CameraStream;

/// Región de vídeo del modal
pub trait VideoSurface {
    /// Enlazar el stream al elemento y empezar la reproducción
    fn attach(&self, stream: &dyn CameraStream) -> Result<(), ScanError>;

    /// Frame actual, o None si el vídeo aún no tiene datos suficientes
    fn capture_frame(&self) -> Option<Frame>;

    fn detach(&self);
}

/// <video> del navegador con canvas off-screen para leer píxeles
pub struct HtmlVideoSurface {
    video: HtmlVideoElement,
    canvas: RefCell<Option<(HtmlCanvasElement, CanvasRenderingContext2d)>>,
}

impl HtmlVideoSurface {
    pub fn new(video: HtmlVideoElement) -> Self {
        Self {
            video,
            canvas: RefCell::new(None),
        }
    }

    /// Canvas reutilizado entre frames, redimensionado al vídeo
    fn canvas(&self, width: u32, height: u32) -> Result<CanvasRenderingContext2d, JsValue> {
        let mut slot = self.canvas.borrow_mut();
        if slot.is_none() {
            let canvas: HtmlCanvasElement = create_element("canvas")?.dyn_into()?;
            let options = js_sys::Object::new();
            js_sys::Reflect::set(&options, &JsValue::from_str("willReadFrequently"), &JsValue::TRUE)?;
            let context: CanvasRenderingContext2d = canvas
                .get_context_with_context_options("2d", &options)?
                .ok_or_else(|| JsValue::from_str("2d context not available"))?
                .dyn_into()?;
            *slot = Some((canvas, context));
        }

        let (canvas, context) = slot
            .as_ref()
            .ok_or_else(|| JsValue::from_str("canvas not initialised"))?;
        if canvas.width() != width {
            canvas.set_width(width);
        }
        if canvas.height() != height {
            canvas.set_height(height);
        }
        Ok(context.clone())
    }
}

impl VideoSurface for HtmlVideoSurface {
    fn attach(&self, stream: &dyn CameraStream) -> Result<(), ScanError> {
        let media = stream.media_stream().ok_or_else(|| {
            ScanError::Acquisition("stream cannot be bound to a video element".to_string())
        })?;

        self.video.set_attribute("playsinline", "")?;
        self.video.set_muted(true);
        self.video.set_src_object(Some(&media));
        // play() devuelve una Promise; el polling espera a HAVE_ENOUGH_DATA de todas formas
        if let Err(e) = self.video.play() {
            log::warn!("⚠️ [SCANNER] video.play() falló: {}", ScanError::describe(&e));
        }
        Ok(())
    }

    fn capture_frame(&self) -> Option<Frame> {
        if self.video.ready_state() != HtmlMediaElement::HAVE_ENOUGH_DATA {
            return None;
        }

        let width = self.video.video_width();
        let height = self.video.video_height();
        if width == 0 || height == 0 {
            return None;
        }

        let context = match self.canvas(width, height) {
            Ok(context) => context,
            Err(e) => {
                log::error!("❌ [SCANNER] Canvas no disponible: {}", ScanError::describe(&e));
                return None;
            }
        };

        context
            .draw_image_with_html_video_element_and_dw_and_dh(
                &self.video,
                0.0,
                0.0,
                width as f64,
                height as f64,
            )
            .ok()?;
        let image = context
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .ok()?;

        Some(Frame::new(image.data().0, image.width(), image.height()))
    }

    fn detach(&self) {
        let _ = self.video.pause();
        self.video.set_src_object(None);
    }
}
