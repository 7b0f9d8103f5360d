/// Terminal demo of hierarchical transforms
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info};
use nalgebra::Vector3;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tstack_core::{
    Channel, MatrixSink, Mesh, OrbitCamera, ProjectionMode, ProjectionSettings, SquareCamera,
    StackError, TransformStack, Transforms,
};

pub mod config;
pub mod logging;
pub mod renderer;

pub use config::DemoConfig;
pub use renderer::AsciiRenderer;

/// Upload the current model transform and draw one mesh with it
fn draw_with(renderer: &mut AsciiRenderer, model: &TransformStack, mesh: &Mesh, color: Color) {
    renderer.upload_matrix(Channel::Model.uniform_name(), &model.top());
    renderer.set_color(color);
    renderer.draw_mesh(mesh);
}

fn stack_error(err: StackError) -> io::Error {
    io::Error::other(err)
}

/// Which camera drives the view and projection channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Orbit camera with the selected projection mode
    Orbit,
    /// Fixed look-at camera with a frustum projection
    Square,
}

/// Main application struct for the terminal transformations demo
pub struct TerminalApp {
    config: DemoConfig,
    transforms: Transforms,
    camera: OrbitCamera,
    camera_mode: CameraMode,
    square: SquareCamera,
    projection: ProjectionSettings,
    cube: Mesh,
    pyramid: Mesh,
    renderer: AsciiRenderer,
    rotating_angle: f32,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: DemoConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Self::with_size(config, width as usize, height as usize)
    }

    /// Build the app for a viewport of `width` x `height` cells
    pub fn with_size(config: DemoConfig, width: usize, height: usize) -> io::Result<Self> {
        let mut app = Self {
            config,
            transforms: Transforms::new(),
            camera: config.camera,
            camera_mode: CameraMode::Orbit,
            square: SquareCamera::default(),
            projection: config.projection,
            cube: Mesh::cube(2.0),
            pyramid: Mesh::pyramid(),
            renderer: AsciiRenderer::new(width, height),
            rotating_angle: 0.0,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.update_projection()?;
        Ok(app)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    pub fn projection_mode(&self) -> ProjectionMode {
        self.projection.mode
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.camera_mode
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.config.fps.max(1)));

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            self.update();

            let mut out = stdout();
            self.render(&mut out)?;
            out.flush()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                self.renderer.resize(width as usize, height as usize);
                self.update_projection()
            }
            _ => Ok(()),
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> io::Result<()> {
        let step = self.config.orbit_step;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.camera.zoom(self.config.zoom_step);
                self.refresh_ortho()?;
            }
            KeyCode::Char('-') => {
                self.camera.zoom(-self.config.zoom_step);
                self.refresh_ortho()?;
            }
            KeyCode::Up => self.camera.orbit(step, 0.0),
            KeyCode::Down => self.camera.orbit(-step, 0.0),
            KeyCode::Left => self.camera.orbit(0.0, step),
            KeyCode::Right => self.camera.orbit(0.0, -step),
            // Spin the whole scene by turning the base entry of the model stack.
            KeyCode::Char('a') => self.transforms.model.rotate(step, &Vector3::y()),
            KeyCode::Char('d') => self.transforms.model.rotate(-step, &Vector3::y()),
            KeyCode::Char('r') => {
                self.camera.reset();
                self.transforms.model.load_identity();
                self.refresh_ortho()?;
            }
            KeyCode::Char('1') => {
                self.camera_mode = CameraMode::Orbit;
                self.projection.mode = ProjectionMode::Perspective;
                self.update_projection()?;
            }
            KeyCode::Char('2') => {
                self.camera_mode = CameraMode::Orbit;
                self.projection.mode = ProjectionMode::Orthographic;
                self.update_projection()?;
            }
            KeyCode::Char('3') => {
                self.camera_mode = CameraMode::Square;
                self.update_projection()?;
            }
            _ => {}
        }
        Ok(())
    }

    /// The orthographic box is sized from the camera distance, so it must
    /// follow every distance change. The other cameras need nothing.
    fn refresh_ortho(&mut self) -> io::Result<()> {
        if self.camera_mode == CameraMode::Orbit
            && self.projection.mode == ProjectionMode::Orthographic
        {
            self.update_projection()?;
        }
        Ok(())
    }

    fn update_projection(&mut self) -> io::Result<()> {
        let aspect = self.renderer.aspect();
        if self.camera_mode == CameraMode::Square {
            debug!("projection update: square camera");
            self.square
                .apply(&mut self.transforms, aspect, &mut self.renderer);
            return Ok(());
        }

        debug!("projection update: {:?}", self.projection.mode);
        self.projection
            .apply(
                &mut self.transforms.projection,
                aspect,
                self.camera.distance,
                &mut self.renderer,
            )
            .map_err(stack_error)
    }

    fn update(&mut self) {
        self.rotating_angle = (self.rotating_angle + self.config.spin_per_frame) % 360.0;
    }

    /// Draw one frame into the renderer and write it out
    pub fn render<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.renderer.clear();

        // The square camera set its view once; only the orbit camera moves.
        if self.camera_mode == CameraMode::Orbit {
            self.camera
                .apply(&mut self.transforms.view, &mut self.renderer)
                .map_err(stack_error)?;
        }
        self.draw_cube_scene().map_err(stack_error)?;
        self.draw_rotating_pyramid().map_err(stack_error)?;

        queue!(out, cursor::MoveTo(0, 0))?;
        self.renderer.draw(out)?;

        let mode = match (self.camera_mode, self.projection.mode) {
            (CameraMode::Square, _) => "square",
            (CameraMode::Orbit, ProjectionMode::Perspective) => "persp",
            (CameraMode::Orbit, ProjectionMode::Orthographic) => "ortho",
        };
        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "TStack | FPS: {:.1} | {} | dist {:.1} | +/-=Zoom Arrows=Orbit A/D=Spin 1/2/3=Camera R=Reset Q=Quit",
                self.fps, mode, self.camera.distance
            )),
            ResetColor
        )?;
        Ok(())
    }

    /// A grey slab with a spinning red post and a green block on top of it
    fn draw_cube_scene(&mut self) -> Result<(), StackError> {
        let model = &mut self.transforms.model;
        let renderer = &mut self.renderer;
        let cube = &self.cube;
        let angle = self.rotating_angle;

        // Keep the base entry so the A/D spin applies to the whole scene.
        model.push();
        model.translate(&Vector3::new(0.0, -1.0, 0.0));

        model.scoped(|model| {
            model.scale(&Vector3::new(1.1, 0.1, 1.1));
            draw_with(renderer, model, cube, Color::Grey);
        })?;

        model.scoped(|model| {
            model.translate(&Vector3::new(-0.7, 0.5, -0.7));
            model.rotate(angle, &Vector3::y());
            model.scale(&Vector3::new(0.2, 0.5, 0.2));
            draw_with(renderer, model, cube, Color::Red);
        })?;

        model.scoped(|model| {
            model.translate(&Vector3::new(0.5, 0.2, 0.5));
            model.scale(&Vector3::new(0.4, 0.2, 0.4));
            draw_with(renderer, model, cube, Color::Green);
        })?;

        model.pop()?;
        Ok(())
    }

    /// Barrel roll: rotate about the pyramid's own origin, then move it down.
    fn draw_rotating_pyramid(&mut self) -> Result<(), StackError> {
        let model = &mut self.transforms.model;
        model.push_identity();
        model.rotate(self.rotating_angle, &Vector3::z());
        model.translate(&Vector3::new(0.0, -0.5, 0.0));
        self.renderer
            .upload_matrix(Channel::Model.uniform_name(), &model.top());
        model.pop()?;

        // The uploaded matrix outlives the stack entry it came from.
        self.renderer.set_color(Color::Yellow);
        self.renderer.draw_mesh(&self.pyramid);
        Ok(())
    }
}

impl Drop for TerminalApp {
    fn drop(&mut self) {
        info!(
            "demo stopped at camera distance {:.1}, model depth {}",
            self.camera.distance,
            self.transforms.model.depth()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> TerminalApp {
        TerminalApp::with_size(DemoConfig::default(), 80, 24).unwrap()
    }

    #[test]
    fn test_frame_leaves_stacks_balanced() {
        let mut app = app();
        let mut out = Vec::new();
        for _ in 0..3 {
            app.update();
            app.render(&mut out).unwrap();
        }
        assert_eq!(app.transforms().model.depth(), 1);
        assert_eq!(app.transforms().view.depth(), 1);
        assert_eq!(app.transforms().projection.depth(), 1);
        assert!(!out.is_empty());
    }

    #[test]
    fn test_zoom_and_orbit_keys() {
        let mut app = app();
        app.handle_key(KeyCode::Char('+')).unwrap();
        app.handle_key(KeyCode::Up).unwrap();
        app.handle_key(KeyCode::Right).unwrap();
        assert_eq!(app.camera().distance, 4.5);
        assert_eq!(app.camera().latitude, 5.0);
        assert_eq!(app.camera().longitude, -5.0);

        app.handle_key(KeyCode::Char('r')).unwrap();
        assert_eq!(*app.camera(), OrbitCamera::default());
    }

    #[test]
    fn test_spin_then_reset_model_base() {
        let mut app = app();
        app.handle_key(KeyCode::Char('a')).unwrap();
        assert_ne!(app.transforms().model.top(), TransformStack::new().top());
        app.handle_key(KeyCode::Char('r')).unwrap();
        assert_eq!(app.transforms().model, TransformStack::new());
    }

    #[test]
    fn test_projection_switch() {
        let mut app = app();
        assert_eq!(app.projection_mode(), ProjectionMode::Perspective);
        app.handle_key(KeyCode::Char('2')).unwrap();
        assert_eq!(app.projection_mode(), ProjectionMode::Orthographic);
        app.handle_key(KeyCode::Char('-')).unwrap();
        app.handle_key(KeyCode::Char('1')).unwrap();
        assert_eq!(app.projection_mode(), ProjectionMode::Perspective);
    }

    #[test]
    fn test_ortho_zoom_to_zero_distance_renders() {
        let mut app = app();
        app.handle_key(KeyCode::Char('2')).unwrap();
        for _ in 0..10 {
            app.handle_key(KeyCode::Char('+')).unwrap();
        }
        assert_eq!(app.camera().distance, 0.0);

        let mut out = Vec::new();
        app.update();
        app.render(&mut out).unwrap();
        assert!(!out.is_empty());
        assert_eq!(app.transforms().projection.depth(), 1);
    }

    #[test]
    fn test_zero_width_resize_renders() {
        let mut app = app();
        app.handle_event(Event::Resize(0, 24)).unwrap();
        assert_eq!(app.renderer.aspect(), 1.0);
        assert!(app.transforms().projection.top().iter().all(|v| v.is_finite()));

        let mut out = Vec::new();
        app.render(&mut out).unwrap();
    }

    #[test]
    fn test_square_camera_key() {
        let mut app = app();
        app.handle_key(KeyCode::Char('3')).unwrap();
        assert_eq!(app.camera_mode(), CameraMode::Square);

        let mut transforms = Transforms::new();
        let mut uploads: Vec<(String, nalgebra::Matrix4<f32>)> = Vec::new();
        SquareCamera::default().apply(&mut transforms, app.renderer.aspect(), &mut uploads);
        assert_eq!(app.transforms().view, transforms.view);
        assert_eq!(app.transforms().projection, transforms.projection);

        // Zooming leaves the square camera alone.
        app.handle_key(KeyCode::Char('+')).unwrap();
        let mut out = Vec::new();
        app.render(&mut out).unwrap();
        assert_eq!(app.transforms().view, transforms.view);

        app.handle_key(KeyCode::Char('1')).unwrap();
        assert_eq!(app.camera_mode(), CameraMode::Orbit);
        assert_eq!(app.projection_mode(), ProjectionMode::Perspective);
    }

    #[test]
    fn test_quit_key() {
        let mut app = app();
        assert!(app.is_running());
        app.handle_key(KeyCode::Esc).unwrap();
        assert!(!app.is_running());
    }

    #[test]
    fn test_resize_event() {
        let mut app = app();
        app.handle_event(Event::Resize(100, 40)).unwrap();
        assert_eq!(app.renderer.width(), 100);
        assert_eq!(app.renderer.height(), 40);
    }
}
