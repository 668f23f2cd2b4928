//! Browser bindings: `navigator.geolocation` and the developer console

use crate::{
    core::geo::LatLng,
    location::{
        resolver::{Geolocator, LocateOptions, LocationFix},
        GeolocationError, PositionErrorCode,
    },
    ui::log_panel::LogSink,
};
use async_trait::async_trait;
use futures::channel::oneshot;
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{GeolocationPosition, GeolocationPositionError, PositionOptions};

type FixResult = Result<LocationFix, GeolocationError>;

/// One-shot answer slot shared by the success and error callbacks. The first
/// answer wins; answers after that, or after the caller stopped waiting, are
/// dropped.
#[derive(Clone)]
struct FixReply(Rc<RefCell<Option<oneshot::Sender<FixResult>>>>);

impl FixReply {
    fn channel() -> (Self, oneshot::Receiver<FixResult>) {
        let (tx, rx) = oneshot::channel();
        (Self(Rc::new(RefCell::new(Some(tx)))), rx)
    }

    fn send(&self, result: FixResult) {
        if let Some(tx) = self.0.borrow_mut().take() {
            if tx.send(result).is_err() {
                log::debug!("Geolocation answered after the caller gave up");
            }
        }
    }
}

/// [`Geolocator`] backed by the browser's geolocation API. The timeout is
/// handed to the browser, which reports it as a position error.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserGeolocator;

#[async_trait(?Send)]
impl Geolocator for BrowserGeolocator {
    async fn locate(&self, options: &LocateOptions) -> Result<LocationFix, GeolocationError> {
        let geolocation = web_sys::window()
            .ok_or_else(|| GeolocationError::unsupported("no browser window"))?
            .navigator()
            .geolocation()
            .map_err(|_| GeolocationError::unsupported("geolocation is not available"))?;

        let (reply, rx) = FixReply::channel();

        let success_reply = reply.clone();
        let on_success = Closure::once_into_js(move |position: GeolocationPosition| {
            let coords = position.coords();
            let fix = LocationFix {
                position: LatLng::new(coords.latitude(), coords.longitude()),
                accuracy: coords.accuracy(),
            };
            success_reply.send(Ok(fix));
        });
        let on_error = Closure::once_into_js(move |error: GeolocationPositionError| {
            let error = GeolocationError::new(
                PositionErrorCode::from_code(error.code()),
                error.message(),
            );
            reply.send(Err(error));
        });

        let position_options = PositionOptions::new();
        position_options.set_timeout(u32::try_from(options.timeout.as_millis()).unwrap_or(u32::MAX));

        geolocation
            .get_current_position_with_error_callback_and_options(
                on_success.unchecked_ref(),
                Some(on_error.unchecked_ref()),
                &position_options,
            )
            .map_err(|e| GeolocationError::unsupported(format!("{e:?}")))?;

        // The callbacks are owned by JS and stay valid if this future is dropped.
        rx.await.map_err(|_| {
            GeolocationError::new(
                PositionErrorCode::PositionUnavailable,
                "geolocation callback was dropped",
            )
        })?
    }
}

/// Log sink that writes to the browser console
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn log(&mut self, message: &str) {
        web_sys::console::log_1(&message.into());
    }
}

/// Routes Rust panics to the browser console
#[cfg(target_arch = "wasm32")]
pub fn install_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn fix() -> LocationFix {
        LocationFix {
            position: LatLng::new(32.07, 34.79),
            accuracy: 12.0,
        }
    }

    #[test]
    fn test_first_answer_wins() {
        let (reply, rx) = FixReply::channel();
        reply.clone().send(Ok(fix()));
        reply.send(Err(GeolocationError::timeout("too late")));

        assert_eq!(block_on(rx).unwrap().unwrap(), fix());
    }

    #[test]
    fn test_answer_after_caller_left_is_dropped() {
        let (reply, rx) = FixReply::channel();
        drop(rx);
        reply.send(Ok(fix()));
        assert!(reply.0.borrow().is_none());
    }
}
