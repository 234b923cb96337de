//! DOM event listeners as removable subscriptions
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Event, EventTarget};
use wheel3d_core::Subscription;

/// A registered listener; removing it detaches the callback from its target
pub struct EventListener {
    target: EventTarget,
    event_type: &'static str,
    callback: Option<Closure<dyn FnMut(Event)>>,
}

impl EventListener {
    pub fn new<F>(target: &EventTarget, event_type: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event_type,
            callback: Some(callback),
        })
    }
}

impl Subscription for EventListener {
    fn unsubscribe(&mut self) {
        let Some(callback) = self.callback.take() else {
            return;
        };
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event_type, callback.as_ref().unchecked_ref())
        {
            log::warn!("failed to remove {} listener: {:?}", self.event_type, e);
        }
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
