// SPDX-License-Identifier: GPL-3.0-only

//! Terminal presentation layer
//!
//! Renders the capture screen to the terminal using Unicode half-block
//! characters for improved vertical resolution, and turns key presses into
//! controller messages.

use crate::app::{MainView, Message, PreviewView, ScreenController, ScreenView};
use crate::backends::camera::{CameraCapability, CameraFrame};
use crate::backends::virtual_camera::VirtualCamera;
use crate::config::Config;
use crate::constants::ui::INPUT_POLL;
use crate::errors::{PhotoError, PhotoResult};
use crate::{ControllerSettings, storage};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use std::io::{self, stdout};
use std::sync::Arc;
use tracing::{error, info};

/// Run the interactive capture screen
pub fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let camera = Arc::new(VirtualCamera::from_config(&config));
    let mut controller =
        ScreenController::with_shared(camera, ControllerSettings::from_config(&config));
    runtime.block_on(controller.mount());

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut controller);
    controller.teardown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<C: CameraCapability>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut ScreenController<C>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut frame_widget = FrameWidget::new();
    let mut review = ReviewCache::default();
    let mut show_help = false;
    let mut status_message =
        build_status_message(ScreenView::from_state(controller.state()).main_flip_enabled());

    loop {
        for message in controller.drain_pending() {
            if let Message::CaptureFinished(result) = message {
                status_message = capture_status(&result);
            }
        }

        let view = ScreenView::from_state(controller.state());

        if let MainView::Preview(preview) = &view.main {
            if let Some(frame) = controller.camera().preview_frame(&preview.device) {
                frame_widget.update_frame(frame);
            }
        } else {
            frame_widget.clear();
        }
        if let Err(e) = review.sync(view.review.as_deref()) {
            error!(error = %e, "Failed to load photo for review");
            status_message = format!("Error: {}", e);
        }

        terminal.draw(|f| {
            let area = f.area();
            let screen_area = Rect {
                height: area.height.saturating_sub(1),
                ..area
            };
            let status_area = Rect {
                y: area.y + area.height.saturating_sub(1),
                height: area.height.min(1),
                ..area
            };

            match (&view.main, review.frame.as_ref()) {
                (_, Some(photo)) => f.render_widget(ReviewWidget { photo }, screen_area),
                (MainView::Preview(preview), None) => {
                    f.render_widget(&frame_widget, screen_area);
                    f.render_widget(PreviewControls { preview }, screen_area);
                }
                (main, None) => f.render_widget(
                    CenteredText {
                        text: main.message().unwrap_or_default(),
                        hint: placeholder_hint(main),
                    },
                    screen_area,
                ),
            }

            f.render_widget(
                StatusBar {
                    message: &status_message,
                },
                status_area,
            );
        })?;

        // Handle input with timeout for frame updates
        if event::poll(INPUT_POLL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            if key.code == KeyCode::Char('q') {
                break;
            }
            if key.code == KeyCode::Char('h') {
                show_help = !show_help;
                status_message = if show_help {
                    build_help_message(view.main_flip_enabled())
                } else {
                    build_status_message(view.main_flip_enabled())
                };
                continue;
            }

            if let Some(message) = key_to_message(key.code, &view) {
                show_help = false;
                if message == Message::Capture {
                    status_message = "Capturing...".to_string();
                }
                controller.dispatch(message);
            }
        }
    }

    info!("Leaving capture screen");
    Ok(())
}

/// Map a key to a controller message, honouring which controls are on screen
pub fn key_to_message(code: KeyCode, view: &ScreenView) -> Option<Message> {
    if view.review.is_some() {
        return matches!(code, KeyCode::Esc | KeyCode::Char('x')).then_some(Message::CloseReview);
    }

    match (&view.main, code) {
        (MainView::Preview(_), KeyCode::Char(' ') | KeyCode::Char('p')) => Some(Message::Capture),
        (MainView::Preview(_), KeyCode::Char('f')) => Some(Message::ToggleDevice),
        (MainView::Preview(_), KeyCode::Char('x')) => Some(Message::RequestClose),
        (MainView::Preview(preview), KeyCode::Char('r')) if preview.thumbnail.is_some() => {
            Some(Message::OpenReview)
        }
        (MainView::Placeholder { .. }, KeyCode::Char('o') | KeyCode::Enter) => {
            Some(Message::ResumePreview)
        }
        _ => None,
    }
}

impl ScreenView {
    fn main_flip_enabled(&self) -> bool {
        matches!(&self.main, MainView::Preview(p) if p.flip_enabled)
    }
}

fn placeholder_hint(main: &MainView) -> Option<&'static str> {
    match main {
        MainView::Placeholder { denied: true } => Some("Camera access denied. Press 'o' to retry"),
        MainView::Placeholder { denied: false } => Some("Press 'o' to open the camera"),
        _ => None,
    }
}

fn capture_status(result: &PhotoResult<String>) -> String {
    match result {
        Ok(path) => format!("Saved: {}", storage::photo_uri(path)),
        Err(e) => format!("Error: {}", e),
    }
}

fn build_status_message(multi_camera: bool) -> String {
    let mut msg = "'p' picture".to_string();
    if multi_camera {
        msg.push_str(" | 'f' flip");
    }
    msg.push_str(" | 'h' help | 'q' quit");
    msg
}

fn build_help_message(multi_camera: bool) -> String {
    let mut msg = String::from("p/space: Take picture | ");
    if multi_camera {
        msg.push_str("f: Flip camera | ");
    }
    msg.push_str("x: Close | o: Open camera | r: Review | Esc: Close review | q/Ctrl+C: Quit");
    msg
}

/// Decoded photo for the review overlay, reloaded only when the path changes
#[derive(Default)]
struct ReviewCache {
    path: Option<String>,
    frame: Option<CameraFrame>,
}

impl ReviewCache {
    fn sync(&mut self, path: Option<&str>) -> Result<(), PhotoError> {
        if self.path.as_deref() == path {
            return Ok(());
        }
        self.path = path.map(str::to_string);
        self.frame = None;
        if let Some(path) = path {
            self.frame = Some(storage::load_review_image(path)?);
        }
        Ok(())
    }
}

/// Widget that renders a camera frame using half-block characters
struct FrameWidget {
    frame: Option<CameraFrame>,
}

impl FrameWidget {
    fn new() -> Self {
        Self { frame: None }
    }

    fn update_frame(&mut self, frame: CameraFrame) {
        self.frame = Some(frame);
    }

    fn clear(&mut self) {
        self.frame = None;
    }
}

impl Widget for &FrameWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = &self.frame else {
            CenteredText {
                text: "Waiting for camera...",
                hint: None,
            }
            .render(area, buf);
            return;
        };
        render_frame(frame, area, buf);
    }
}

/// Fit `frame` into `area` keeping its aspect ratio
fn render_frame(frame: &CameraFrame, area: Rect, buf: &mut Buffer) {
    if frame.width == 0 || frame.height == 0 || area.width == 0 || area.height == 0 {
        return;
    }

    // Each terminal cell displays 2 vertical pixels using half-block characters
    let frame_aspect = frame.width as f64 / frame.height as f64;
    let term_width = area.width as f64;
    let term_height = f64::from(area.height) * 2.0;

    let (display_width, display_height) = if term_width / term_height > frame_aspect {
        // Terminal is wider - fit to height
        let w = term_height * frame_aspect;
        (w as u16, (term_height / 2.0) as u16)
    } else {
        // Terminal is taller - fit to width
        let h = term_width / frame_aspect;
        (term_width as u16, (h / 2.0) as u16)
    };
    if display_width == 0 || display_height == 0 {
        return;
    }

    let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
    let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

    let x_scale = frame.width as f64 / display_width as f64;
    let y_scale = frame.height as f64 / (f64::from(display_height) * 2.0);

    // Upper half (▀) colored with fg, lower half with bg
    for ty in 0..display_height {
        for tx in 0..display_width {
            let src_x = (tx as f64 * x_scale) as u32;
            let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
            let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

            let (r, g, b) = frame.pixel(src_x, src_y_top);
            let top = Color::Rgb(r, g, b);
            let (r, g, b) = frame.pixel(src_x, src_y_bottom);
            let bottom = Color::Rgb(r, g, b);

            if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                cell.set_char('▀');
                cell.set_fg(top);
                cell.set_bg(bottom);
            }
        }
    }
}

/// Close, shutter, flip and thumbnail drawn over the preview
struct PreviewControls<'a> {
    preview: &'a PreviewView,
}

impl Widget for PreviewControls<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 2 {
            return;
        }
        let button = Style::default()
            .fg(Color::White)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD);

        // Close control, top right; dimmed during lockout
        let close_style = if self.preview.close_enabled {
            button
        } else {
            button.fg(Color::Gray).remove_modifier(Modifier::BOLD)
        };
        buf.set_string(area.x + area.width - 4, area.y, "[X]", close_style);

        let mut controls = Vec::new();
        if self.preview.thumbnail.is_some() {
            controls.push("[r] photo");
        }
        controls.push(if self.preview.capturing {
            "( ●● )"
        } else {
            "(  ●  )"
        });
        if self.preview.flip_enabled {
            controls.push("[f] Flip");
        }
        let line = controls.join("   ");

        let y = area.y + area.height - 1;
        let x = area.x + area.width.saturating_sub(line.chars().count() as u16) / 2;
        buf.set_string(x, y, &line, button.bg(Color::Red));

        let label = format!(" {} ", self.preview.device.name);
        buf.set_string(area.x, area.y, &label, button);
    }
}

/// Full-screen review overlay
struct ReviewWidget<'a> {
    photo: &'a CameraFrame,
}

impl Widget for ReviewWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(' ');
                    cell.set_bg(Color::Black);
                }
            }
        }
        render_frame(self.photo, area, buf);

        if area.width >= 4 {
            let style = Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD);
            buf.set_string(area.x + area.width - 4, area.y, "[X]", style);
        }
    }
}

/// Centered message with an optional hint line below
struct CenteredText {
    text: &'static str,
    hint: Option<&'static str>,
}

impl Widget for CenteredText {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let y = area.y + area.height / 2;
        let lines = std::iter::once(self.text).chain(self.hint);
        for (i, line) in lines.enumerate() {
            let row = y + i as u16;
            if row >= area.y + area.height {
                break;
            }
            let x = area.x + area.width.saturating_sub(line.chars().count() as u16) / 2;
            buf.set_string(x, row, line, Style::default());
        }
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        let text: String = self.message.chars().take(area.width as usize).collect();
        buf.set_string(
            area.x,
            area.y,
            text,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}
