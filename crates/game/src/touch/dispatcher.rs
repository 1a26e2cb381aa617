use crate::prelude::*;

use std::time::Duration;

/// Receives zone notifications as they are emitted
pub trait ZoneListener {
    fn on_zone_event(&mut self, event: ZoneEvent);
}

impl<F: FnMut(ZoneEvent)> ZoneListener for F {
    fn on_zone_event(&mut self, event: ZoneEvent) {
        self(event)
    }
}

/// Which finger holds a zone
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerBinding {
    pub is_active: bool,
    pub owner: FingerId,
}

/// Turn and look-up rate scalars, in deg/sec
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnRates {
    pub turn: f32,
    pub look_up: f32,
}

/// The single touch slot used for look gestures.
///
/// Every finger writes the same slot, so two fingers dragging at once
/// produce deltas between each other's positions. Look gestures are
/// single-finger only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LastTouch {
    pub is_pressed: bool,
    pub moved: bool,
    pub location: Point2<f32>,
}

impl Default for LastTouch {
    fn default() -> Self {
        Self {
            is_pressed: false,
            moved: false,
            location: Point2::origin(),
        }
    }
}

/// Turns raw touches into zone notifications and look input.
///
/// `V` reports the viewport size and `R` receives yaw/pitch deltas from
/// drag gestures.
pub struct TouchZoneDispatcher<V, R> {
    viewport: V,
    rotation: R,
    config: TouchConfig,
    screen_size: ViewportSize,
    bindings: [FingerBinding; TouchZone::COUNT],
    rates: TurnRates,
    /// Unscaled rates while the camera-turn button is held
    held_rates: Option<TurnRates>,
    last_touch: LastTouch,
    delta_seconds: f32,
    listeners: Vec<Box<dyn ZoneListener + Send + Sync>>,
}

impl<V: ViewportService, R: RotationInput> TouchZoneDispatcher<V, R> {
    pub fn new(viewport: V, rotation: R, config: TouchConfig, rates: TurnRates) -> Self {
        Self {
            viewport,
            rotation,
            config,
            screen_size: ViewportSize::default(),
            bindings: [FingerBinding::default(); TouchZone::COUNT],
            rates,
            held_rates: None,
            last_touch: LastTouch::default(),
            delta_seconds: 0.0,
            listeners: Vec::new(),
        }
    }

    /// Register a listener for zone notifications
    pub fn subscribe(&mut self, listener: impl ZoneListener + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Frame time used to turn look rates into rotation deltas
    pub fn set_delta_time(&mut self, delta_time: Duration) {
        self.delta_seconds = delta_time.as_secs_f32();
    }

    pub fn rates(&self) -> TurnRates {
        self.rates
    }

    pub fn binding(&self, zone: TouchZone) -> FingerBinding {
        self.bindings[zone.index()]
    }

    pub fn last_touch(&self) -> LastTouch {
        self.last_touch
    }

    /// Viewport size seen by the most recent touch-down
    pub fn screen_size(&self) -> ViewportSize {
        self.screen_size
    }

    pub fn rotation(&self) -> &R {
        &self.rotation
    }

    pub fn rotation_mut(&mut self) -> &mut R {
        &mut self.rotation
    }

    /// A finger touched the screen. Returns the zone it took ownership of.
    pub fn on_touch_begin(&mut self, finger: FingerId, position: Point2<f32>) -> Option<TouchZone> {
        self.last_touch = LastTouch {
            is_pressed: true,
            moved: false,
            location: position,
        };

        self.screen_size = self.viewport.viewport_size();
        if !self.screen_size.is_valid() {
            log::warn!(
                "Touch at ({}, {}) ignored, viewport not ready: {:?}",
                position.x,
                position.y,
                self.screen_size
            );
            return None;
        }

        // Touches outside every zone are left to free look
        let zone = hit_test(position, self.screen_size, &self.config.layout)?;

        let binding = &mut self.bindings[zone.index()];
        if binding.is_active {
            log::trace!(
                "Finger {} ignored, {} zone held by finger {}",
                finger,
                zone,
                binding.owner
            );
            return None;
        }

        *binding = FingerBinding {
            is_active: true,
            owner: finger,
        };

        if zone == TouchZone::CameraTurn {
            self.held_rates = Some(self.rates);
            self.rates.turn *= self.config.turn_multiplier;
            self.rates.look_up *= self.config.turn_multiplier;
        }

        log::debug!("Finger {} pressed {} zone", finger, zone);
        self.emit(zone.down_event());
        Some(zone)
    }

    /// A finger left the screen; releases every zone it owns
    pub fn on_touch_end(&mut self, finger: FingerId, position: Point2<f32>) {
        self.last_touch.is_pressed = false;
        self.last_touch.location = position;

        for zone in TouchZone::PRIORITY {
            let binding = &mut self.bindings[zone.index()];
            if !binding.is_active || binding.owner != finger {
                continue;
            }
            binding.is_active = false;

            if zone == TouchZone::CameraTurn {
                if let Some(rates) = self.held_rates.take() {
                    self.rates = rates;
                }
            }

            log::debug!("Finger {} released {} zone", finger, zone);
            self.emit(zone.up_event());
        }
    }

    /// A finger moved; large enough deltas become look input
    pub fn on_touch_move(&mut self, finger: FingerId, position: Point2<f32>) {
        let delta = position - self.last_touch.location;
        let threshold = self.config.jitter_threshold;

        if delta.x.abs() > threshold || delta.y.abs() > threshold {
            self.last_touch.moved = true;
            log::trace!("Finger {} dragged by ({}, {})", finger, delta.x, delta.y);
            self.look_up_at_rate(delta.y * self.config.move_scale);
            self.turn_at_rate(delta.x * self.config.move_scale);
        } else {
            self.last_touch.moved = false;
        }

        self.last_touch.location = position;
    }

    /// Route an engine touch event to the matching handler
    pub fn handle(&mut self, touch: &TouchInput) {
        match touch.action {
            TouchAction::Began => {
                self.on_touch_begin(touch.finger, touch.position);
            }
            TouchAction::Moved => self.on_touch_move(touch.finger, touch.position),
            TouchAction::Ended => self.on_touch_end(touch.finger, touch.position),
        }
    }

    fn turn_at_rate(&mut self, rate: f32) {
        self.rotation
            .add_yaw_input(rate * self.rates.turn * self.delta_seconds);
    }

    fn look_up_at_rate(&mut self, rate: f32) {
        self.rotation
            .add_pitch_input(rate * self.rates.look_up * self.delta_seconds);
    }

    fn emit(&mut self, event: ZoneEvent) {
        for listener in &mut self.listeners {
            listener.on_zone_event(event);
        }
    }
}
