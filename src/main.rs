use std::{path::PathBuf, process::ExitCode, time::Instant};

use cubeview3d::{abs::Gpu, config::Config, scene::CubeScene};
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Keycode,
};

use crate::{app::App, other::DeviceState};

mod app;
mod other;

fn setup_logger(level: log::LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn run(config: &Config) -> Result<(), String> {
    let mut app = App::new(&config.window)?;

    app.gl.enable_depth_test();
    let (width, height) = app.window.size();
    app.gl.viewport(width as i32, height as i32);

    let mut scene = CubeScene::new(&app.gl, config, width, height)?;
    let mut devices = DeviceState::default();
    let mut last_frame_time = Instant::now();

    'running: loop {
        let now = Instant::now();
        let delta_time = now.duration_since(last_frame_time).as_secs_f32();
        last_frame_time = now;

        for event in app.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::Window {
                    win_event: WindowEvent::Resized(width, height),
                    ..
                } => {
                    log::debug!("window resized to {width}x{height}");
                    scene.resize(width.max(0) as u32, height.max(0) as u32);
                }
                _ => {}
            }
            devices.handle_event(&event);
        }

        let control = scene.update(&devices.input_sample());
        if let Some(position) = app.apply_cursor(control) {
            devices.mouse.position = position;
        }

        scene.render();
        app.window.gl_swap_window();

        log::trace!("frame took {:.2} ms", delta_time * 1000.0);
    }

    log::info!("shutting down");
    // GPU objects go before the context that owns them.
    drop(scene);
    Ok(())
}

fn main() -> ExitCode {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = match Config::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = setup_logger(config.log_filter()) {
        eprintln!("failed to set up logging: {e}");
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
