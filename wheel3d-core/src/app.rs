//! Carousel lifecycle: construction, input, frame ticks and disposal
use nalgebra::Point2;

use crate::carousel::Carousel;
use crate::config::CarouselConfig;
use crate::error::{AssetError, CarouselError, CarouselResult};
use crate::hover::{HoverDetector, HoverState, PointerState};
use crate::projection::Camera;
use crate::scroll::ScrollController;
use crate::texture::AssetLoader;

/// A host-side listener registration that can be removed again
pub trait Subscription {
    fn unsubscribe(&mut self);
}

/// The carousel as seen by a host: owns the scene, the camera, and the
/// input state, and releases every listener registration on [`dispose`].
///
/// [`dispose`]: WheelCarousel::dispose
pub struct WheelCarousel<T> {
    config: CarouselConfig,
    camera: Camera,
    scene: Option<Carousel<T>>,
    scroll: ScrollController,
    hover: HoverDetector,
    pointer: PointerState,
    last_hover: HoverState,
    subscriptions: Vec<Box<dyn Subscription>>,
}

impl<T: Clone> WheelCarousel<T> {
    /// Load every texture, then build the scene.
    ///
    /// Fails without building anything if the config is invalid or any
    /// texture cannot be resolved.
    pub fn new<L>(
        config: CarouselConfig,
        sources: &[String],
        loader: &mut L,
        viewport: (u32, u32),
    ) -> CarouselResult<Self>
    where
        L: AssetLoader<Texture = T>,
    {
        config.validate()?;
        if sources.is_empty() {
            return Err(CarouselError::EmptyRing);
        }

        let textures = loader.load(sources).map_err(|e| {
            log::error!("texture loading failed: {}", e);
            e
        })?;
        if textures.len() != sources.len() {
            return Err(AssetError::CountMismatch {
                expected: sources.len(),
                actual: textures.len(),
            }
            .into());
        }

        let scene = Carousel::build(&config, textures)?;

        let mut camera = Camera::new(viewport.0, viewport.1);
        camera.fov = config.camera_fov.to_radians();
        camera.near = config.camera_near;
        camera.far = config.camera_far;
        camera.look_down_z(config.camera_z);

        Ok(Self {
            scroll: ScrollController::from_config(&config),
            hover: HoverDetector::from_config(&config),
            config,
            camera,
            scene: Some(scene),
            pointer: PointerState::new(),
            last_hover: HoverState::default(),
            subscriptions: Vec::new(),
        })
    }
}

impl<T> WheelCarousel<T> {
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// The scene, or `None` once disposed
    pub fn carousel(&self) -> Option<&Carousel<T>> {
        self.scene.as_ref()
    }

    pub fn scroll(&self) -> &ScrollController {
        &self.scroll
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn last_hover(&self) -> HoverState {
        self.last_hover
    }

    pub fn is_disposed(&self) -> bool {
        self.scene.is_none()
    }

    /// Keep a host listener registration alive until disposal
    pub fn attach_subscription(&mut self, subscription: Box<dyn Subscription>) {
        if self.is_disposed() {
            let mut subscription = subscription;
            subscription.unsubscribe();
            return;
        }
        self.subscriptions.push(subscription);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Handle one raw wheel event; returns the spin applied to the rings
    pub fn on_wheel(&mut self, delta_y: f32) -> CarouselResult<f32> {
        let scene = self.scene.as_mut().ok_or(CarouselError::Disposed)?;
        Ok(self.scroll.on_wheel(delta_y, scene))
    }

    pub fn on_pointer_move(&mut self, ndc: Point2<f32>) {
        self.pointer.set(ndc);
    }

    pub fn on_pointer_leave(&mut self) {
        self.pointer.clear();
    }

    /// Per-frame work: recompute hover highlights from the current pointer
    pub fn tick(&mut self) -> CarouselResult<HoverState> {
        let scene = self.scene.as_mut().ok_or(CarouselError::Disposed)?;
        let state = self.hover.update(&self.camera, &self.pointer, scene);
        if state != self.last_hover {
            log::debug!("hover changed: {:?} -> {:?}", self.last_hover, state);
        }
        self.last_hover = state;
        Ok(state)
    }

    /// Unregister every listener and drop the scene. Safe to call twice.
    pub fn dispose(&mut self) {
        if self.is_disposed() && self.subscriptions.is_empty() {
            return;
        }
        for mut subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        self.scene = None;
        self.last_hover = HoverState::default();
        log::info!("carousel disposed");
    }
}

impl<T> Drop for WheelCarousel<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}
