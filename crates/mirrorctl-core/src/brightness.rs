// ── Debounced brightness control ──
//
// Backs the brightness slider. The displayed value follows input
// immediately; the mirror sees only the last value of each burst. A
// rejected value snaps the display back to the last confirmed one.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use crate::debounce::Debouncer;
use crate::mirror::Mirror;

pub const BRIGHTNESS_MIN: i64 = 0;
pub const BRIGHTNESS_MAX: i64 = 100;
pub const BRIGHTNESS_STEP: i64 = 5;

/// What a slider should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrightnessState {
    /// Value under the user's thumb.
    pub displayed: i64,
    /// Last value the mirror accepted.
    pub confirmed: i64,
    /// Error from the most recent failed send, cleared on success.
    pub last_error: Option<String>,
}

/// Slider model with a debounced sender behind it.
#[derive(Debug)]
pub struct BrightnessControl {
    state: Arc<watch::Sender<BrightnessState>>,
    debouncer: Debouncer<i64>,
}

impl BrightnessControl {
    /// Build a control using the mirror's configured debounce window.
    pub fn new(mirror: &Mirror) -> Self {
        let confirmed = mirror.confirmed_brightness();
        let (tx, _) = watch::channel(BrightnessState {
            displayed: confirmed,
            confirmed,
            last_error: None,
        });
        let state = Arc::new(tx);

        let sink = Arc::clone(&state);
        let sender = mirror.clone();
        let debouncer = Debouncer::spawn(
            mirror.config().brightness_debounce,
            mirror.cancel_token().child_token(),
            move |value: i64| {
                let mirror = sender.clone();
                let state = Arc::clone(&sink);
                async move {
                    match mirror.set_brightness(value).await {
                        Ok(()) => state.send_modify(|s| {
                            s.confirmed = value;
                            s.last_error = None;
                        }),
                        Err(e) => {
                            warn!(brightness = value, error = %e, "failed to set brightness");
                            state.send_modify(|s| {
                                s.displayed = s.confirmed;
                                s.last_error = Some(e.to_string());
                            });
                        }
                    }
                }
            },
        );

        Self { state, debouncer }
    }

    /// Move the slider to `value`. The send is debounced.
    pub fn set(&self, value: i64) {
        self.state.send_modify(|s| s.displayed = value);
        if !self.debouncer.push(value) {
            warn!("brightness control stopped, change dropped");
        }
    }

    /// Move the slider by `steps` increments of `BRIGHTNESS_STEP`,
    /// clamped to the slider range. Returns the new displayed value.
    pub fn step(&self, steps: i64) -> i64 {
        let current = self.state.borrow().displayed;
        let next = current
            .saturating_add(steps.saturating_mul(BRIGHTNESS_STEP))
            .clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX);
        if next != current {
            self.set(next);
        }
        next
    }

    pub fn state(&self) -> BrightnessState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BrightnessState> {
        self.state.subscribe()
    }

    /// Send any pending value now and stop the control.
    pub async fn flush(self) {
        self.debouncer.flush().await;
    }
}
