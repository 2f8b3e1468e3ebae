/// Terminal viewer for rastr3d scenes
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, warn};
use nalgebra::Vector3;
use rastr3d_core::{LoadStatus, ProjectionMode, RasterBuffer, Scene, ZoomDirection};
use std::io::{self, stdout, Write};
use std::path::Path;

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Radians per rotation key press
const ROTATION_STEP: f32 = 0.1;

/// User-facing text for a failed load, `None` on success
pub fn status_message(path: &Path, status: LoadStatus) -> Option<String> {
    let reason = match status {
        LoadStatus::Success => return None,
        LoadStatus::NotExist => "File does not exist.",
        LoadStatus::IoError => "File could not be read.",
        LoadStatus::SyntaxNotSupported => "File syntax not supported.",
    };
    Some(format!("Failed opening '{}'. {reason}", path.display()))
}

/// Write a raster buffer to an image file (format from the extension)
pub fn save_snapshot(raster: &RasterBuffer, path: &Path) -> Result<()> {
    let (width, height) = (raster.width(), raster.height());
    let image = image::RgbImage::from_raw(width, height, raster.as_bytes().to_vec())
        .context("raster buffer does not match its dimensions")?;
    image
        .save(path)
        .with_context(|| format!("failed to write snapshot {}", path.display()))?;
    Ok(())
}

/// Raw mode and alternate screen, restored when dropped
struct ScreenGuard;

impl ScreenGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        let restored = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)
            .and_then(|()| terminal::disable_raw_mode());
        if let Err(err) = restored {
            warn!("failed to restore terminal: {err}");
        }
    }
}

/// Interactive terminal front-end: renders on every key press
pub struct TerminalApp {
    scene: Scene,
    renderer: AsciiRenderer,
    status: String,
    running: bool,
}

impl TerminalApp {
    pub fn new(scene: Scene) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            scene,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            status: String::new(),
            running: true,
        })
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn run(&mut self) -> io::Result<()> {
        let _screen = ScreenGuard::enter()?;
        self.main_loop()
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            self.render()?;
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
                Event::Resize(width, height) => {
                    self.renderer.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, KeyEvent { code, .. }: KeyEvent) {
        let rotation = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                None
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.scene.zoom(ZoomDirection::In);
                None
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                self.scene.zoom(ZoomDirection::Out);
                None
            }
            KeyCode::Char('p') => {
                let next = match self.scene.flags().projection {
                    ProjectionMode::Perspective => ProjectionMode::Rectangular,
                    ProjectionMode::Rectangular => ProjectionMode::Perspective,
                };
                self.scene.set_projection_mode(next);
                None
            }
            KeyCode::Char('w') | KeyCode::Up => Some((Vector3::x(), -ROTATION_STEP)),
            KeyCode::Char('s') | KeyCode::Down => Some((Vector3::x(), ROTATION_STEP)),
            KeyCode::Char('a') | KeyCode::Left => Some((Vector3::y(), -ROTATION_STEP)),
            KeyCode::Char('d') | KeyCode::Right => Some((Vector3::y(), ROTATION_STEP)),
            KeyCode::Char('e') => Some((Vector3::z(), ROTATION_STEP)),
            KeyCode::Char('r') => Some((Vector3::z(), -ROTATION_STEP)),
            _ => None,
        };

        if let Some((axis, angle)) = rotation {
            if let Err(err) = self.scene.rotate_models(axis, angle) {
                self.status = err.to_string();
            }
        }
        debug!("key {code:?}, focal length {:?}", self.scene.camera().focal_length());
    }

    fn render(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0), terminal::Clear(ClearType::All))?;

        match self.scene.render() {
            Ok(raster) => {
                self.renderer.rasterize(&raster);
                self.renderer.draw(&mut stdout)?;
            }
            Err(err) => {
                self.renderer.clear();
                self.renderer.draw(&mut stdout)?;
                queue!(
                    stdout,
                    cursor::MoveTo(0, 1),
                    SetForegroundColor(Color::Red),
                    Print(err.to_string()),
                    ResetColor
                )?;
            }
        }

        // Draw UI overlay
        let (fx, _) = self.scene.camera().focal_length();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "rastr3d | models: {} | f: {fx:.0} | +/- zoom  WASD/arrows/E/R rotate  P projection  Q quit {}",
                self.scene.models().len(),
                self.status
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        let path = Path::new("model.obj");
        assert_eq!(status_message(path, LoadStatus::Success), None);
        assert_eq!(
            status_message(path, LoadStatus::NotExist).unwrap(),
            "Failed opening 'model.obj'. File does not exist."
        );
        assert!(status_message(path, LoadStatus::IoError)
            .unwrap()
            .ends_with("could not be read."));
        assert!(status_message(path, LoadStatus::SyntaxNotSupported)
            .unwrap()
            .ends_with("syntax not supported."));
    }

    #[test]
    fn test_save_snapshot_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut raster = RasterBuffer::new(16, 8);
        raster.put_pixel(3, 4, [255, 255, 255]);
        save_snapshot(&raster, &path).unwrap();

        let image = image::open(&path).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (16, 8));
        assert_eq!(image.get_pixel(3, 4).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0]);
    }
}
