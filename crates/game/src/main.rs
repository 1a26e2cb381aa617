use fpspractice::{
    player_layer::{PlayerLayer, demo_scene},
    prelude::*,
};
use fpspractice_engine::{ApplicationBuilder, Layer, Result};
use winit::event_loop::EventLoop;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_module("fpspractice", log::LevelFilter::Debug)
        .filter_module("fpspractice_engine", log::LevelFilter::Debug)
        .init();

    let config = ControllerConfig::new().validated()?;

    let event_loop = EventLoop::new()?;

    let mut app = ApplicationBuilder::new()
        .with_title("FPS Practice")
        .add_layer(move |context| {
            let layer: Box<dyn Layer> = Box::new(PlayerLayer::new(context, config)?);
            Ok(layer)
        })
        .build();

    app.insert_resource(demo_scene());

    event_loop.run_app(&mut app)?;

    Ok(())
}
