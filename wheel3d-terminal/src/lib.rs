//! Terminal host for the wheel carousel
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use wheel3d_core::{Bitmap, CarouselError, PointerState, Subscription, WheelCarousel};

pub mod loader;
pub mod renderer;

pub use loader::FileLoader;
pub use renderer::{AsciiRenderer, CELL_ASPECT};

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Carousel(#[from] CarouselError),
}

/// Viewport handed to the camera for a terminal of `cols` x `rows` cells
pub fn viewport(cols: u16, rows: u16) -> (u32, u32) {
    (cols as u32, rows as u32 * CELL_ASPECT)
}

/// Mouse reporting, enabled for as long as the subscription lives
#[derive(Debug)]
pub struct MouseCapture {
    active: bool,
}

impl MouseCapture {
    pub fn enable() -> io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        Ok(Self { active: true })
    }
}

impl Subscription for MouseCapture {
    fn unsubscribe(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Err(e) = execute!(stdout(), DisableMouseCapture) {
            log::warn!("failed to disable mouse capture: {}", e);
        }
    }
}

/// Loop timing and input scaling
#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    pub fps: u32,
    /// Wheel delta reported for one scroll notch or arrow key press
    pub notch_delta: f32,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            fps: 30,
            notch_delta: 100.0,
        }
    }
}

/// Main application struct for the terminal carousel
pub struct TerminalApp {
    carousel: WheelCarousel<Arc<Bitmap>>,
    settings: LoopSettings,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(carousel: WheelCarousel<Arc<Bitmap>>, settings: LoopSettings) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        let mut app = Self {
            carousel,
            settings,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.resize(width, height);
        Ok(app)
    }

    pub fn run(&mut self) -> Result<(), TerminalError> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        let capture = MouseCapture::enable()?;
        self.carousel.attach_subscription(Box::new(capture));

        let result = self.main_loop();

        // Cleanup
        self.carousel.dispose();
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> Result<(), TerminalError> {
        let target_frame_time = Duration::from_millis(1000 / self.settings.fps.max(1) as u64);

        while self.running {
            let frame_start = Instant::now();

            // Drain every pending event before the frame
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }
            if !self.running {
                break;
            }

            // Update
            self.carousel.tick()?;

            // Render
            self.render()?;

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

    fn handle_event(&mut self, event: Event) -> Result<(), TerminalError> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.carousel.on_wheel(-self.settings.notch_delta)?;
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.carousel.on_wheel(self.settings.notch_delta)?;
                }
                _ => {}
            },
            Event::Mouse(mouse) => self.handle_mouse(mouse)?,
            Event::Resize(width, height) => self.resize(width, height),
            Event::FocusLost => self.carousel.on_pointer_leave(),
            _ => {}
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<(), TerminalError> {
        match mouse.kind {
            MouseEventKind::ScrollDown => {
                self.carousel.on_wheel(self.settings.notch_delta)?;
            }
            MouseEventKind::ScrollUp => {
                self.carousel.on_wheel(-self.settings.notch_delta)?;
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let pointer = PointerState::from_screen(
                    mouse.column as f32 + 0.5,
                    mouse.row as f32 + 0.5,
                    self.renderer.width() as f32,
                    self.renderer.height() as f32,
                );
                match pointer.ndc() {
                    Some(ndc) => self.carousel.on_pointer_move(ndc),
                    None => self.carousel.on_pointer_leave(),
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.renderer.resize(width as usize, height as usize);
        let (vw, vh) = viewport(width, height);
        self.carousel.camera_mut().set_viewport(vw, vh);
        log::debug!("viewport resized to {}x{} cells", width, height);
    }

    fn render(&mut self) -> io::Result<()> {
        // Clear renderer
        self.renderer.clear();

        if let Some(carousel) = self.carousel.carousel() {
            self.renderer.render_carousel(carousel, self.carousel.camera());
        }

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let hover = self.carousel.last_hover();
        let describe = |index: Option<usize>| match index {
            Some(i) => i.to_string(),
            None => "-".to_string(),
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Wheel3D | FPS: {:.1} | spin: {:+.3} | hover: top {} bottom {} | Wheel/Arrows=Spin Q=Quit",
                self.fps,
                self.carousel.scroll().last_increment(),
                describe(hover.top),
                describe(hover.bottom),
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
