// Dobles de prueba de todos los colaboradores de ScannerSession.
// Todos escriben en un log compartido para poder comprobar el orden de efectos.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use futures::channel::oneshot;
use futures::future::{self, FutureExt, LocalBoxFuture};
use crate::error::ScanError;
use crate::models::{Frame, Notice, TargetField};
use crate::services::{
    CameraConstraints, CameraProvider, CameraStream, Decoder, DecoderProvider, FrameScheduler,
    HostUi, MediaTrack, ModalContent, ModalSurface, SharedLoad, VideoSurface,
};
use crate::viewmodels::{ScannerDeps, ScannerSession, SessionSettings};

pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn blank_frame() -> Frame {
    Frame::new(vec![0; 4 * 4 * 4], 4, 4)
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

pub struct FakeSurface {
    log: EventLog,
    video: Rc<FakeVideo>,
    pub statuses: RefCell<Vec<String>>,
}

impl ModalSurface for FakeSurface {
    fn video(&self) -> Rc<dyn VideoSurface> {
        self.video.clone()
    }

    fn set_status(&self, text: &str) {
        self.statuses.borrow_mut().push(text.to_string());
    }

    fn hide(&self) {
        self.log.borrow_mut().push("surface_hidden".to_string());
    }
}

pub struct FakeHost {
    log: EventLog,
    video: Rc<FakeVideo>,
    pub fail_show: Cell<bool>,
    pub shown: Cell<usize>,
    pub contents: RefCell<Vec<ModalContent>>,
    pub notices: RefCell<Vec<Notice>>,
    pub fields: RefCell<Vec<(TargetField, String)>>,
    primary: RefCell<Option<Rc<dyn Fn()>>>,
}

impl FakeHost {
    /// Simular el click en "Cerrar"
    pub fn click_primary(&self) {
        let primary = self.primary.borrow().clone();
        if let Some(primary) = primary {
            primary();
        }
    }

    pub fn visible(&self) -> bool {
        let log = self.log.borrow();
        self.shown.get() > log.iter().filter(|e| *e == "surface_hidden").count()
    }
}

impl HostUi for FakeHost {
    fn show_modal(
        &self,
        content: &ModalContent,
        on_primary: Rc<dyn Fn()>,
    ) -> Result<Rc<dyn ModalSurface>, ScanError> {
        if self.fail_show.get() {
            return Err(ScanError::Dom("no body".to_string()));
        }
        self.shown.set(self.shown.get() + 1);
        self.contents.borrow_mut().push(content.clone());
        *self.primary.borrow_mut() = Some(on_primary);
        self.log.borrow_mut().push("surface_shown".to_string());
        Ok(Rc::new(FakeSurface {
            log: self.log.clone(),
            video: self.video.clone(),
            statuses: RefCell::new(Vec::new()),
        }))
    }

    fn notify(&self, notice: &Notice) {
        self.log
            .borrow_mut()
            .push(format!("notify:{}", notice.severity.indicator()));
        self.notices.borrow_mut().push(notice.clone());
    }

    fn set_field_value(&self, target: &TargetField, value: &str) -> Result<(), ScanError> {
        self.log.borrow_mut().push("field_set".to_string());
        self.fields
            .borrow_mut()
            .push((target.clone(), value.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Vídeo
// ---------------------------------------------------------------------------

pub struct FakeVideo {
    log: EventLog,
    /// None en la cola = el vídeo aún no tiene datos suficientes
    pub frames: RefCell<VecDeque<Option<Frame>>>,
    pub captures: Cell<usize>,
    pub attached: Cell<bool>,
    pub fail_attach: Cell<bool>,
}

impl VideoSurface for FakeVideo {
    fn attach(&self, _stream: &dyn CameraStream) -> Result<(), ScanError> {
        if self.fail_attach.get() {
            return Err(ScanError::Acquisition("cannot bind".to_string()));
        }
        self.attached.set(true);
        self.log.borrow_mut().push("video_attached".to_string());
        Ok(())
    }

    fn capture_frame(&self) -> Option<Frame> {
        self.captures.set(self.captures.get() + 1);
        self.frames
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Some(blank_frame()))
    }

    fn detach(&self) {
        self.attached.set(false);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeDecoder {
    pub results: RefCell<VecDeque<Option<String>>>,
    pub calls: Cell<usize>,
}

impl FakeDecoder {
    pub fn script(&self, results: &[Option<&str>]) {
        *self.results.borrow_mut() = results.iter().map(|r| r.map(str::to_string)).collect();
    }
}

impl Decoder for FakeDecoder {
    fn decode(&self, _pixels: &[u8], _width: u32, _height: u32) -> Option<String> {
        self.calls.set(self.calls.get() + 1);
        self.results.borrow_mut().pop_front().flatten()
    }
}

type PendingFetch = oneshot::Sender<Result<(), ScanError>>;

pub struct FakeDecoderProvider {
    pub loaded: Rc<Cell<bool>>,
    pub fail: Cell<bool>,
    /// La descarga queda pendiente hasta `resolve_fetch`
    pub deferred: Cell<bool>,
    pub fetches: Rc<Cell<usize>>,
    load: SharedLoad,
    pending: Rc<RefCell<Option<PendingFetch>>>,
}

impl FakeDecoderProvider {
    pub fn resolve_fetch(&self, ok: bool) {
        let pending = self.pending.borrow_mut().take();
        if let Some(sender) = pending {
            let result = if ok {
                Ok(())
            } else {
                Err(ScanError::Initialization("https://cdn.invalid/jsQR.min.js".to_string()))
            };
            let _ = sender.send(result);
        }
    }
}

impl DecoderProvider for FakeDecoderProvider {
    fn ensure_loaded(&self) -> LocalBoxFuture<'static, Result<(), ScanError>> {
        if self.loaded.get() {
            return future::ready(Ok(())).boxed_local();
        }

        let loaded = self.loaded.clone();
        let fetches = self.fetches.clone();
        let pending = self.pending.clone();
        let fail = self.fail.get();
        let deferred = self.deferred.get();

        self.load
            .run(move || {
                fetches.set(fetches.get() + 1);
                let fetch: LocalBoxFuture<'static, Result<(), ScanError>> = if deferred {
                    let (sender, receiver) = oneshot::channel();
                    *pending.borrow_mut() = Some(sender);
                    receiver
                        .map(|r| {
                            r.unwrap_or_else(|_| Err(ScanError::Initialization("cancelled".to_string())))
                        })
                        .boxed_local()
                } else if fail {
                    future::ready(Err(ScanError::Initialization(
                        "https://cdn.invalid/jsQR.min.js".to_string(),
                    )))
                    .boxed_local()
                } else {
                    future::ready(Ok(())).boxed_local()
                };
                fetch
                    .map(move |result| {
                        if result.is_ok() {
                            loaded.set(true);
                        }
                        result
                    })
                    .boxed_local()
            })
            .boxed_local()
    }
}

// ---------------------------------------------------------------------------
// Cámara
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraMode {
    Grant,
    Deny,
    /// La petición queda pendiente hasta `resolve_pending`
    Deferred,
}

struct FakeTrack {
    log: EventLog,
    name: &'static str,
}

impl MediaTrack for FakeTrack {
    fn stop(&self) {
        self.log.borrow_mut().push(format!("track_stopped:{}", self.name));
    }
}

pub struct FakeStream {
    log: EventLog,
}

impl CameraStream for FakeStream {
    fn tracks(&self) -> Vec<Box<dyn MediaTrack>> {
        vec![
            Box::new(FakeTrack { log: self.log.clone(), name: "video" }),
            Box::new(FakeTrack { log: self.log.clone(), name: "audio" }),
        ]
    }
}

type PendingCamera = oneshot::Sender<Result<Box<dyn CameraStream>, ScanError>>;

pub struct FakeCamera {
    log: EventLog,
    pub mode: Cell<CameraMode>,
    pub requests: Cell<usize>,
    pub constraints: RefCell<Vec<CameraConstraints>>,
    pending: RefCell<Option<PendingCamera>>,
}

impl FakeCamera {
    pub fn resolve_pending(&self, grant: bool) {
        let pending = self.pending.borrow_mut().take();
        if let Some(sender) = pending {
            let result: Result<Box<dyn CameraStream>, ScanError> = if grant {
                Ok(Box::new(FakeStream { log: self.log.clone() }))
            } else {
                Err(ScanError::Acquisition("NotAllowedError".to_string()))
            };
            let _ = sender.send(result);
        }
    }
}

impl CameraProvider for FakeCamera {
    fn request_camera(
        &self,
        constraints: &CameraConstraints,
    ) -> LocalBoxFuture<'static, Result<Box<dyn CameraStream>, ScanError>> {
        self.requests.set(self.requests.get() + 1);
        self.constraints.borrow_mut().push(constraints.clone());
        match self.mode.get() {
            CameraMode::Grant => {
                let stream: Box<dyn CameraStream> = Box::new(FakeStream { log: self.log.clone() });
                future::ready(Ok(stream)).boxed_local()
            }
            CameraMode::Deny => {
                future::ready(Err(ScanError::Acquisition("NotAllowedError".to_string())))
                    .boxed_local()
            }
            CameraMode::Deferred => {
                let (sender, receiver) = oneshot::channel();
                *self.pending.borrow_mut() = Some(sender);
                receiver
                    .map(|r| r.unwrap_or_else(|_| Err(ScanError::Acquisition("cancelled".to_string()))))
                    .boxed_local()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Scheduler manual
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<Box<dyn FnOnce()>>>,
}

impl ManualScheduler {
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Ejecutar el siguiente frame planificado
    pub fn run_next(&self) -> bool {
        let next = self.queue.borrow_mut().pop_front();
        match next {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next_frame(&self, callback: Box<dyn FnOnce()>) {
        self.queue.borrow_mut().push_back(callback);
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub log: EventLog,
    pub host: Rc<FakeHost>,
    pub video: Rc<FakeVideo>,
    pub decoder: Rc<FakeDecoder>,
    pub provider: Rc<FakeDecoderProvider>,
    pub camera: Rc<FakeCamera>,
    pub scheduler: Rc<ManualScheduler>,
    pub results: Rc<RefCell<Vec<String>>>,
}

impl Harness {
    pub fn new() -> Self {
        let log: EventLog = Rc::new(RefCell::new(Vec::new()));
        let video = Rc::new(FakeVideo {
            log: log.clone(),
            frames: RefCell::new(VecDeque::new()),
            captures: Cell::new(0),
            attached: Cell::new(false),
            fail_attach: Cell::new(false),
        });
        let host = Rc::new(FakeHost {
            log: log.clone(),
            video: video.clone(),
            fail_show: Cell::new(false),
            shown: Cell::new(0),
            contents: RefCell::new(Vec::new()),
            notices: RefCell::new(Vec::new()),
            fields: RefCell::new(Vec::new()),
            primary: RefCell::new(None),
        });
        let provider = Rc::new(FakeDecoderProvider {
            loaded: Rc::new(Cell::new(true)),
            fail: Cell::new(false),
            deferred: Cell::new(false),
            fetches: Rc::new(Cell::new(0)),
            load: SharedLoad::default(),
            pending: Rc::new(RefCell::new(None)),
        });
        let camera = Rc::new(FakeCamera {
            log: log.clone(),
            mode: Cell::new(CameraMode::Grant),
            requests: Cell::new(0),
            constraints: RefCell::new(Vec::new()),
            pending: RefCell::new(None),
        });

        Self {
            log,
            host,
            video,
            decoder: Rc::new(FakeDecoder::default()),
            provider,
            camera,
            scheduler: Rc::new(ManualScheduler::default()),
            results: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn deps(&self) -> ScannerDeps {
        ScannerDeps {
            host: self.host.clone(),
            decoder_provider: self.provider.clone(),
            decoder: self.decoder.clone(),
            camera: self.camera.clone(),
            scheduler: self.scheduler.clone(),
        }
    }

    pub fn session(&self, target: Option<TargetField>) -> ScannerSession {
        let results = self.results.clone();
        ScannerSession::new(self.deps(), SessionSettings::default(), target, move |text| {
            results.borrow_mut().push(text)
        })
    }

    pub fn events(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.log.borrow().iter().position(|e| e == event)
    }

    pub fn last_position(&self, prefix: &str) -> Option<usize> {
        self.log.borrow().iter().rposition(|e| e.starts_with(prefix))
    }
}
