//! `setInterval`-backed tick timer

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::scheduler::TimerBackend;

/// An armed interval; dropping the closure is deferred to the backend
pub struct IntervalHandle {
    id: Option<i32>,
    closure: Closure<dyn FnMut()>,
}

/// Timer backend calling `on_fire(generation)` from `window.setInterval`
pub struct IntervalTimer {
    on_fire: Rc<dyn Fn(u64)>,
    /// Most recently cancelled closure. A timer is usually cancelled from
    /// inside its own callback, so its closure must outlive that call.
    retired: Option<Closure<dyn FnMut()>>,
}

impl IntervalTimer {
    pub fn new(on_fire: impl Fn(u64) + 'static) -> Self {
        Self {
            on_fire: Rc::new(on_fire),
            retired: None,
        }
    }
}

impl TimerBackend for IntervalTimer {
    type Handle = IntervalHandle;

    fn arm(&mut self, interval_ms: u32, generation: u64) -> IntervalHandle {
        let on_fire = Rc::clone(&self.on_fire);
        let closure = Closure::<dyn FnMut()>::new(move || on_fire(generation));

        let id = web_sys::window().and_then(|w| {
            w.set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                interval_ms as i32,
            )
            .map_err(|e| log::error!("setInterval failed: {:?}", e))
            .ok()
        });

        IntervalHandle { id, closure }
    }

    fn cancel(&mut self, handle: IntervalHandle) {
        if let (Some(id), Some(window)) = (handle.id, web_sys::window()) {
            window.clear_interval_with_handle(id);
        }
        self.retired = Some(handle.closure);
    }
}
