mod cli;
mod input;
mod loader;
mod mesh;
mod render;

use clap::Parser;
use instant::Instant;
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use tree_core::constants::{PHOTO_COUNT, ZOOM_STEP};
use tree_core::pick::ndc_from_pixels;
use tree_core::{FrameClock, ImageSource, InputEvent, Scene};

use crate::cli::Cli;
use crate::input::{ActionQueue, PointerAction, PointerTracker};
use crate::loader::ImageLoader;
use crate::render::GpuState;

const TITLE: &str = "Lumiere";

/// Panel a dropped file goes to: the focused one, else the next in turn.
fn drop_target(scene: &Scene, next_drop: &mut usize) -> usize {
    if let Some(panel) = scene.state().mode.focused_panel() {
        return panel;
    }
    let panel = *next_drop % PHOTO_COUNT;
    *next_drop = panel + 1;
    panel
}

fn apply_action(scene: &mut Scene, gpu: &GpuState<'_>, action: PointerAction) {
    let (w, h) = gpu.size();
    match action {
        PointerAction::Click(p) => {
            let event = scene.pick(ndc_from_pixels(p.x, p.y, w as f32, h as f32));
            scene.handle(event);
        }
        PointerAction::DoubleClick(p) => {
            // only the background reacts to double clicks
            if scene.pick(ndc_from_pixels(p.x, p.y, w as f32, h as f32))
                == InputEvent::BackgroundClick
            {
                scene.handle(InputEvent::BackgroundDoubleClick);
            }
        }
        PointerAction::Orbit(d) => {
            scene.orbit(d.x, d.y);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(TITLE)
        .with_inner_size(LogicalSize::new(cli.width, cli.height))
        .build(&event_loop)?;

    let size = window.inner_size();
    let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
    let mut scene = Scene::new(cli.scene_config(), aspect);
    let mut gpu = pollster::block_on(GpuState::new(&window, &scene))?;
    let loader = ImageLoader::spawn()?;
    for ticket in scene.initial_loads() {
        loader.request(ticket);
    }

    log::info!("[app] click to disperse, drag to rotate, double-click to assemble");
    log::info!("[app] +/- zoom, drop an image onto the window to replace a photo, Esc quits");

    let mut pointer = PointerTracker::default();
    let mut actions = ActionQueue::new();
    let mut clock = FrameClock::new();
    let mut next_drop = 0usize;
    let mut shown_label = "";

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => {
                gpu.resize(size);
                scene.set_aspect(size.width.max(1) as f32 / size.height.max(1) as f32);
            }
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::CursorMoved { position, .. } => {
                let p = glam::Vec2::new(position.x as f32, position.y as f32);
                pointer.moved(p, &mut actions);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => pointer.pressed(),
                ElementState::Released => pointer.released(Instant::now(), &mut actions),
            },
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match logical_key {
                Key::Named(NamedKey::Escape) => elwt.exit(),
                Key::Character(c) if c.as_str() == "+" || c.as_str() == "=" => {
                    scene.set_zoom(scene.state().zoom.get() + ZOOM_STEP);
                    log::debug!("[app] zoom {:.1}", scene.state().zoom.get());
                }
                Key::Character(c) if c.as_str() == "-" => {
                    scene.set_zoom(scene.state().zoom.get() - ZOOM_STEP);
                    log::debug!("[app] zoom {:.1}", scene.state().zoom.get());
                }
                _ => {}
            },
            WindowEvent::DroppedFile(path) => {
                let panel = drop_target(&scene, &mut next_drop);
                match scene.replace_photo(panel, ImageSource::Path(path)) {
                    Ok(ticket) => loader.request(ticket),
                    Err(e) => log::error!("[app] {e}"),
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            for result in loader.poll() {
                let loaded = result.image.is_ok();
                if !scene.resolve_photo(&result.ticket, loaded) {
                    continue;
                }
                match &result.image {
                    Ok(image) => gpu.set_photo(result.ticket.panel, image),
                    Err(e) => log::warn!("[loader] {e:#}"),
                }
            }
            for action in actions.drain(..) {
                apply_action(&mut scene, &gpu, action);
            }

            let (t, _dt) = clock.tick();
            scene.frame(t);

            let label = scene.status_label();
            if label != shown_label {
                gpu.window.set_title(&format!("{TITLE} - {label}"));
                log::info!("[app] {label}");
                shown_label = label;
            }

            match gpu.render(&scene, t) {
                Ok(_) => gpu.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => gpu.resize(gpu.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(_) => {}
            }
        }
        _ => {}
    })?;
    Ok(())
}
