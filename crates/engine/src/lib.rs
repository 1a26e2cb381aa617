pub use bevy_ecs::world::World;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use winit::{application::ApplicationHandler, event::WindowEvent, window::Window};

use crate::input::{InputState, TouchInput};
pub type Result<T> = anyhow::Result<T>;

pub mod collision;
pub mod components;
pub mod debug_draw;
pub mod input;
pub mod prelude;
pub mod services;

pub trait Layer: 'static {
    fn frame(&mut self, context: &LayerContext) -> Result<()>;
    fn detach(&mut self, context: &LayerContext);
    fn event(&mut self, _context: &LayerContext, _event: LayerEvent) {}
}

pub trait LayerFactory: 'static {
    fn create(&self, context: &LayerContext) -> Result<Box<dyn Layer>>;
}

pub struct LayerContext {
    pub window: Arc<Window>,
    pub world: Arc<Mutex<World>>,
    pub delta_time: Duration,
}

impl LayerContext {
    /// Lock the shared world, failing instead of panicking on a poisoned lock
    pub fn world(&self) -> Result<MutexGuard<'_, World>> {
        self.world
            .lock()
            .map_err(|_| anyhow::anyhow!("world lock poisoned"))
    }
}

pub enum LayerEvent {
    WindowEvent(Arc<WindowEvent>),
    Touch(TouchInput),
}

pub struct ApplicationBuilder {
    layer_factories: Vec<Box<dyn LayerFactory>>,
    title: String,
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self {
            layer_factories: Vec::new(),
            title: "fpspractice".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn add_layer_factory(mut self, factory: impl LayerFactory) -> Self {
        self.layer_factories.push(Box::new(factory));
        self
    }

    pub fn add_layer<F>(self, factory_fn: F) -> Self
    where
        F: Fn(&LayerContext) -> Result<Box<dyn Layer>> + 'static,
    {
        self.add_layer_factory(ClosureLayerFactory::new(factory_fn))
    }

    pub fn build(self) -> Application {
        let mut world = World::new();
        world.insert_resource(InputState::new());
        world.insert_resource(components::Time::default());

        Application {
            layer_factories: self.layer_factories,
            title: self.title,
            state: None,
            world: Arc::new(Mutex::new(world)),
        }
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct ClosureLayerFactory<F> {
    factory_fn: F,
}

impl<F> ClosureLayerFactory<F> {
    fn new(factory_fn: F) -> Self {
        Self { factory_fn }
    }
}

impl<F> LayerFactory for ClosureLayerFactory<F>
where
    F: Fn(&LayerContext) -> Result<Box<dyn Layer>> + 'static,
{
    fn create(&self, context: &LayerContext) -> Result<Box<dyn Layer>> {
        (self.factory_fn)(context)
    }
}

pub struct Application {
    layer_factories: Vec<Box<dyn LayerFactory>>,
    title: String,
    state: Option<ApplicationState>,
    world: Arc<Mutex<World>>,
}

pub struct ApplicationState {
    window: Arc<Window>,
    layers: Vec<Box<dyn Layer>>,
    last_frame_time: Instant,
}

impl Application {
    fn context(&self, delta_time: Duration) -> Option<LayerContext> {
        self.state.as_ref().map(|state| LayerContext {
            window: state.window.clone(),
            world: self.world.clone(),
            delta_time,
        })
    }

    fn redraw(&mut self) -> Result<()> {
        let delta_time = match &mut self.state {
            Some(state) => {
                let now = Instant::now();
                let delta_time = now.duration_since(state.last_frame_time);
                state.last_frame_time = now;
                delta_time
            }
            None => return Ok(()),
        };

        let Some(context) = self.context(delta_time) else {
            return Ok(());
        };

        if let Some(state) = &mut self.state {
            for layer in &mut state.layers {
                layer.frame(&context)?;
            }
        }

        context.world()?.clear_trackers();

        Ok(())
    }

    fn dispatch(&mut self, event: impl Fn() -> LayerEvent) {
        let Some(context) = self.context(Duration::ZERO) else {
            return;
        };

        if let Some(state) = &mut self.state {
            for layer in &mut state.layers {
                layer.event(&context, event());
            }
        }
    }

    /// Insert or replace a resource before the event loop starts
    pub fn insert_resource<R: bevy_ecs::prelude::Resource>(&mut self, resource: R) {
        match self.world.lock() {
            Ok(mut world) => world.insert_resource(resource),
            Err(_) => log::error!("world lock poisoned, resource not inserted"),
        }
    }

    /// Record keyboard state and translate touches for the layers
    fn record_input(&self, event: &WindowEvent) -> Option<TouchInput> {
        use winit::event::ElementState;
        use winit::keyboard::PhysicalKey;

        match event {
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                let PhysicalKey::Code(keycode) = key_event.physical_key else {
                    return None;
                };
                let mut world = self.world.lock().ok()?;
                let mut input_state = world.get_resource_mut::<InputState>()?;
                match key_event.state {
                    ElementState::Pressed => input_state.press_key(keycode),
                    ElementState::Released => input_state.release_key(keycode),
                }
                None
            }
            WindowEvent::Touch(touch) => Some(TouchInput::from(touch)),
            WindowEvent::Resized(size) => {
                log::debug!("Viewport resized to {}x{}", size.width, size.height);
                None
            }
            _ => None,
        }
    }
}

impl ApplicationHandler for Application {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let window_attributes = Window::default_attributes().with_title(self.title.clone());
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let context = LayerContext {
            window: window.clone(),
            world: self.world.clone(),
            delta_time: Duration::ZERO,
        };

        let mut layers = Vec::with_capacity(self.layer_factories.len());
        for factory in &self.layer_factories {
            match factory.create(&context) {
                Ok(layer) => layers.push(layer),
                Err(e) => {
                    log::error!("Failed to create layer: {:#}", e);
                    event_loop.exit();
                    return;
                }
            }
        }

        log::info!("Application resumed with {} layers", layers.len());

        self.state = Some(ApplicationState {
            window,
            layers,
            last_frame_time: Instant::now(),
        });
    }

    fn suspended(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(context) = self.context(Duration::ZERO) {
            if let Some(state) = &mut self.state {
                for layer in &mut state.layers {
                    layer.detach(&context);
                }
            }
        }
        self.state = None;
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let touch = self.record_input(&event);

        let event = Arc::new(event);

        match *event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    log::error!("Frame failed: {:#}", e);
                }
            }
            _ => {}
        }

        // Touches are delivered in arrival order, before the raw window event
        if let Some(touch) = touch {
            self.dispatch(|| LayerEvent::Touch(touch));
        }
        self.dispatch(|| LayerEvent::WindowEvent(event.clone()));
    }

    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}
