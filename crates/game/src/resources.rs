use crate::prelude::*;

use std::sync::{Arc, Mutex};

pub type TouchDispatcher =
    TouchZoneDispatcher<Box<dyn ViewportService + Send + Sync>, RotationAccumulator>;

/// Touch dispatcher owned by the world
#[derive(Resource)]
pub struct TouchControls {
    pub dispatcher: TouchDispatcher,
}

impl TouchControls {
    /// Dispatcher wired to `queue`
    pub fn new(
        viewport: impl ViewportService + Send + Sync + 'static,
        config: &ControllerConfig,
        queue: &ZoneEventQueue,
    ) -> Self {
        let rates = TurnRates {
            turn: config.character.base_turn_rate,
            look_up: config.character.base_look_up_rate,
        };
        let mut dispatcher = TouchZoneDispatcher::new(
            Box::new(viewport) as Box<dyn ViewportService + Send + Sync>,
            RotationAccumulator::default(),
            config.touch,
            rates,
        );
        dispatcher.subscribe(queue.listener());
        Self { dispatcher }
    }
}

/// Zone notifications waiting for the next frame's systems
#[derive(Resource, Clone, Default)]
pub struct ZoneEventQueue(Arc<Mutex<Vec<ZoneEvent>>>);

impl ZoneEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener that appends to this queue
    pub fn listener(&self) -> impl ZoneListener + Send + Sync + 'static {
        let queue = self.clone();
        move |event: ZoneEvent| queue.push(event)
    }

    pub fn push(&self, event: ZoneEvent) {
        match self.0.lock() {
            Ok(mut events) => events.push(event),
            Err(_) => log::error!("Zone event queue poisoned, dropped {:?}", event),
        }
    }

    /// Take every queued event in arrival order
    pub fn drain(&self) -> Vec<ZoneEvent> {
        match self.0.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(_) => Vec::new(),
        }
    }
}
