//! Wheel3D Web - WASM host for the wheel carousel
//!
//! Loads the images into WebGL2 textures, then builds the carousel, wires
//! `wheel`/`pointer*`/`resize` listeners and drives `requestAnimationFrame`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::{closure::Closure, prelude::*, JsCast};
use web_sys::{
    window, Element, HtmlCanvasElement, HtmlImageElement, MouseEvent,
    WebGl2RenderingContext as GL, WebGlTexture, WheelEvent,
};
use wheel3d_core::{CarouselConfig, PointerState, WheelCarousel};

pub mod assets;
pub mod gl;
pub mod listener;

use assets::{unique_sources, ResolvedTextures};
use gl::GlRenderer;
use listener::EventListener;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct Runtime {
    config: CarouselConfig,
    container: Element,
    canvas: HtmlCanvasElement,
    renderer: GlRenderer,
    sources: Vec<String>,
    unique: Vec<String>,
    images: Vec<HtmlImageElement>,
    image_handlers: Vec<Closure<dyn FnMut()>>,
    resolved: ResolvedTextures<WebGlTexture>,
    app: Option<WheelCarousel<WebGlTexture>>,
    frame: FrameCallback,
    frame_id: Option<i32>,
    disposed: bool,
}

impl Runtime {
    fn render_frame(&mut self) {
        let Some(app) = self.app.as_mut() else {
            return;
        };
        if let Err(e) = app.tick() {
            log::debug!("skipping frame: {}", e);
            return;
        }
        if let Some(carousel) = app.carousel() {
            self.renderer
                .draw(carousel, app.camera(), self.config.background);
        }
    }

    fn fit_canvas(&mut self) {
        let (width, height) = container_size(&self.container);
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.renderer.set_viewport(width, height);
        if let Some(app) = self.app.as_mut() {
            app.camera_mut().set_viewport(width, height);
        }
    }
}

fn container_size(container: &Element) -> (u32, u32) {
    let width = container.client_width().max(1) as u32;
    let height = container.client_height().max(1) as u32;
    (width, height)
}

fn request_frame(callback: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    window()
        .ok_or("no window")?
        .request_animation_frame(callback.as_ref().unchecked_ref())
}

/// Run `f` against the live carousel, if the runtime still exists
fn with_runtime(runtime: &Weak<RefCell<Runtime>>, f: impl FnOnce(&mut Runtime)) {
    if let Some(runtime) = runtime.upgrade() {
        let mut rt = runtime.borrow_mut();
        if !rt.disposed {
            f(&mut rt);
        }
    }
}

fn image_settled(runtime: &Weak<RefCell<Runtime>>, index: usize, loaded: bool) {
    let Some(strong) = runtime.upgrade() else {
        return;
    };
    let ready = {
        let mut rt = strong.borrow_mut();
        if rt.disposed {
            return;
        }
        let source = rt.unique[index].clone();
        if loaded {
            let image = rt.images[index].clone();
            let uploaded = gl::upload_texture(rt.renderer.context(), &image);
            match uploaded {
                Ok(texture) => rt.resolved.insert(source, texture),
                Err(e) => {
                    log::error!("could not upload {}: {:?}", source, e);
                    rt.resolved.fail(source);
                }
            }
        } else {
            log::error!("could not load image {}", source);
            rt.resolved.fail(source);
        }
        rt.resolved.is_complete()
    };

    if ready {
        if let Err(e) = start(&strong) {
            log::error!("carousel failed to start: {:?}", e);
        }
    }
}

fn start_loading(runtime: &Rc<RefCell<Runtime>>) -> Result<(), JsValue> {
    let unique = runtime.borrow().unique.clone();
    for (index, source) in unique.iter().enumerate() {
        let image = HtmlImageElement::new()?;
        image.set_cross_origin(Some("anonymous"));

        let weak = Rc::downgrade(runtime);
        let onload = Closure::wrap(Box::new(move || image_settled(&weak, index, true))
            as Box<dyn FnMut()>);
        let weak = Rc::downgrade(runtime);
        let onerror = Closure::wrap(Box::new(move || image_settled(&weak, index, false))
            as Box<dyn FnMut()>);
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        let mut rt = runtime.borrow_mut();
        rt.images.push(image.clone());
        rt.image_handlers.push(onload);
        rt.image_handlers.push(onerror);
        drop(rt);

        image.set_src(source);
    }
    Ok(())
}

/// Every texture resolved: build the scene, attach input, start the frame loop
fn start(runtime: &Rc<RefCell<Runtime>>) -> Result<(), JsValue> {
    let window = window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let weak = Rc::downgrade(runtime);

    let mut rt = runtime.borrow_mut();
    let viewport = (rt.canvas.width(), rt.canvas.height());
    let config = rt.config.clone();
    let sources = rt.sources.clone();
    let mut app = WheelCarousel::new(config, &sources, &mut rt.resolved, viewport)
        .map_err(|e| JsValue::from(e.to_string()))?;

    if let Some(carousel) = app.carousel() {
        rt.renderer.upload_geometry(carousel.geometry())?;
    }

    let w = weak.clone();
    let wheel = EventListener::new(&document, "wheel", move |event| {
        let Some(event) = event.dyn_ref::<WheelEvent>() else {
            return;
        };
        let delta = event.delta_y() as f32;
        with_runtime(&w, |rt| {
            if let Some(app) = rt.app.as_mut() {
                if let Err(e) = app.on_wheel(delta) {
                    log::debug!("ignoring wheel event: {}", e);
                }
            }
        });
    })?;

    let w = weak.clone();
    let pointer_move = EventListener::new(&rt.canvas, "pointermove", move |event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let (x, y) = (event.client_x() as f32, event.client_y() as f32);
        with_runtime(&w, |rt| {
            let rect = rt.canvas.get_bounding_client_rect();
            let pointer = PointerState::from_screen(
                x - rect.left() as f32,
                y - rect.top() as f32,
                rect.width() as f32,
                rect.height() as f32,
            );
            if let (Some(app), Some(ndc)) = (rt.app.as_mut(), pointer.ndc()) {
                app.on_pointer_move(ndc);
            }
        });
    })?;

    let w = weak.clone();
    let pointer_leave = EventListener::new(&rt.canvas, "pointerleave", move |_| {
        with_runtime(&w, |rt| {
            if let Some(app) = rt.app.as_mut() {
                app.on_pointer_leave();
            }
        });
    })?;

    let w = weak.clone();
    let resize = EventListener::new(&window, "resize", move |_| {
        with_runtime(&w, Runtime::fit_canvas);
    })?;

    app.attach_subscription(Box::new(wheel));
    app.attach_subscription(Box::new(pointer_move));
    app.attach_subscription(Box::new(pointer_leave));
    app.attach_subscription(Box::new(resize));
    rt.app = Some(app);

    // Animation loop, rescheduling itself until disposal
    let frame = rt.frame.clone();
    let w = weak;
    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let Some(runtime) = w.upgrade() else {
            return;
        };
        let mut rt = runtime.borrow_mut();
        if rt.disposed {
            return;
        }
        rt.render_frame();
        let next = match rt.frame.borrow().as_ref() {
            Some(callback) => request_frame(callback).ok(),
            None => None,
        };
        rt.frame_id = next;
    }) as Box<dyn FnMut()>));

    let first = match frame.borrow().as_ref() {
        Some(callback) => Some(request_frame(callback)?),
        None => None,
    };
    rt.frame_id = first;

    log::info!("web carousel started with {} images", rt.sources.len());
    Ok(())
}

#[wasm_bindgen]
pub struct WebCarousel {
    runtime: Rc<RefCell<Runtime>>,
}

#[wasm_bindgen]
impl WebCarousel {
    /// Mount a carousel inside the element matching `container_selector`.
    ///
    /// Nothing is drawn until every image in `sources` has loaded; if any
    /// image fails the carousel never appears.
    #[wasm_bindgen(constructor)]
    pub fn new(container_selector: &str, sources: Vec<String>) -> Result<WebCarousel, JsValue> {
        let window = window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let container = document
            .query_selector(container_selector)?
            .ok_or_else(|| JsValue::from(format!("container {} not found", container_selector)))?;

        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        container.append_child(&canvas)?;

        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or("WebGL2 not supported")?
            .dyn_into()?;
        let renderer = GlRenderer::new(gl)?;

        let unique = unique_sources(&sources);
        let runtime = Rc::new(RefCell::new(Runtime {
            config: CarouselConfig::default(),
            container,
            canvas,
            renderer,
            resolved: ResolvedTextures::new(unique.len()),
            sources,
            unique,
            images: Vec::new(),
            image_handlers: Vec::new(),
            app: None,
            frame: Rc::new(RefCell::new(None)),
            frame_id: None,
            disposed: false,
        }));
        runtime.borrow_mut().fit_canvas();

        start_loading(&runtime)?;
        Ok(WebCarousel { runtime })
    }

    /// True once every image has loaded and the frame loop is running
    #[wasm_bindgen(getter)]
    pub fn ready(&self) -> bool {
        self.runtime.borrow().app.is_some()
    }

    /// Remove listeners, stop the frame loop and detach the canvas
    pub fn dispose(&self) {
        let mut rt = self.runtime.borrow_mut();
        if rt.disposed {
            return;
        }
        rt.disposed = true;

        if let Some(id) = rt.frame_id.take() {
            if let Some(window) = window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        rt.frame.borrow_mut().take();

        if let Some(mut app) = rt.app.take() {
            app.dispose();
        }
        for image in &rt.images {
            image.set_onload(None);
            image.set_onerror(None);
        }
        rt.image_handlers.clear();
        for texture in rt.resolved.drain() {
            rt.renderer.delete_texture(&texture);
        }
        rt.renderer.release();
        rt.canvas.remove();
        log::info!("web carousel disposed");
    }
}

impl Drop for WebCarousel {
    fn drop(&mut self) {
        self.dispose();
    }
}
