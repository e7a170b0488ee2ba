// ============================================================================
// SCANNER VIEW - Modal del escáner QR (Rust puro)
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlVideoElement};
use std::rc::Rc;
use crate::dom::{ElementBuilder, ScopedListener, append_child, on_click};
use crate::services::host_ui::ModalContent;
use crate::utils::html::escape_html;

/// IDs de los elementos de un modal concreto
#[derive(Clone, Debug, PartialEq)]
pub struct ScannerIds {
    pub video_id: String,
    pub status_id: String,
}

impl ScannerIds {
    pub fn for_session(seq: u32) -> Self {
        Self {
            video_id: format!("qr-video-{}", seq),
            status_id: format!("qr-status-{}", seq),
        }
    }
}

/// Modal renderizado; los listeners se quitan al hacer drop
pub struct ScannerView {
    pub modal: Element,
    pub video: HtmlVideoElement,
    pub status: Element,
    pub listeners: Vec<ScopedListener>,
}

/// HTML de la región de vídeo + estado (campo HTML de un diálogo del host)
pub fn video_region_html(ids: &ScannerIds, content: &ModalContent) -> String {
    format!(
        r#"<div class="qr-scanner-container">
    <video id="{video}" playsinline muted style="width: 100%; max-width: {width}px;"></video>
    <div class="scan-region-highlight"></div>
    <div class="scan-region-highlight-svg"></div>
</div>
<div id="{status}" class="qr-status mt-3">{initial}</div>"#,
        video = ids.video_id,
        status = ids.status_id,
        width = content.video_max_width_px,
        initial = escape_html(&content.initial_status),
    )
}

/// Renderizar modal del escáner
pub fn render_scanner(
    content: &ModalContent,
    ids: &ScannerIds,
    on_close: Rc<dyn Fn()>,
) -> Result<ScannerView, JsValue> {
    let mut listeners = Vec::new();

    // Modal container
    let modal = ElementBuilder::new("div")?
        .class("scanner-modal active")
        .attr("role", "dialog")?
        .build();

    // Overlay (cierra al hacer click)
    let overlay = ElementBuilder::new("div")?
        .class("scanner-overlay")
        .build();
    {
        let on_close = on_close.clone();
        listeners.push(on_click(&overlay, move |_e| on_close())?);
    }
    append_child(&modal, &overlay)?;

    // Content
    let content_el = ElementBuilder::new("div")?
        .class("scanner-content")
        .build();

    // Prevenir cierre al click dentro
    listeners.push(on_click(&content_el, move |e| e.stop_propagation())?);

    // Header
    let title = ElementBuilder::new("h2")?
        .text(&content.title)
        .build();
    let close_btn = ElementBuilder::new("button")?
        .class("btn-close")
        .attr("type", "button")?
        .text("✕")
        .build();
    {
        let on_close = on_close.clone();
        listeners.push(on_click(&close_btn, move |_e| on_close())?);
    }
    let header = ElementBuilder::new("div")?
        .class("scanner-header")
        .child(&title)?
        .child(&close_btn)?
        .build();
    append_child(&content_el, &header)?;

    // Viewport: mismo markup que el campo HTML del diálogo del host
    let viewport = ElementBuilder::new("div")?
        .class("scanner-viewport")
        .build();
    viewport.set_inner_html(&video_region_html(ids, content));
    append_child(&content_el, &viewport)?;

    // Footer con la acción principal
    let primary_btn = ElementBuilder::new("button")?
        .class("btn btn-primary btn-sm")
        .attr("type", "button")?
        .text(&content.primary_label)
        .build();
    {
        let on_close = on_close.clone();
        listeners.push(on_click(&primary_btn, move |_e| on_close())?);
    }
    let footer = ElementBuilder::new("div")?
        .class("scanner-footer")
        .child(&primary_btn)?
        .build();
    append_child(&content_el, &footer)?;

    append_child(&modal, &content_el)?;

    let video = viewport
        .query_selector(&format!("#{}", ids.video_id))?
        .ok_or_else(|| JsValue::from_str("Video element not rendered"))?
        .dyn_into::<HtmlVideoElement>()
        .map_err(|_| JsValue::from_str("#video is not a <video>"))?;
    let status = viewport
        .query_selector(&format!("#{}", ids.status_id))?
        .ok_or_else(|| JsValue::from_str("Status element not rendered"))?;

    Ok(ScannerView {
        modal,
        video,
        status,
        listeners,
    })
}
