use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};

use crate::core::app::App;
use crate::core::constants::{APP_TAGLINE, APP_TITLE};
use crate::core::error::CaptionError;
use crate::core::session::{CaptionSession, RequestState};

pub const IMAGE_HINT: &str = "Enter a path to a PNG, JPG, or WEBP image (Max 2MB)";
pub const THINKING_TEXT: &str = "Thinking of the perfect words...";
pub const RETRY_HINT: &str = "  Press Ctrl+G to retry.";
const KEY_HINTS: &str = "Enter select • Ctrl+G generate • Ctrl+Y copy • Ctrl+U clear • Esc quit";

pub fn draw(f: &mut Frame, app: &App, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title + tagline
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let session = &app.session;

    f.render_widget(header(), chunks[0]);
    f.render_widget(image_panel(session), chunks[1]);
    draw_path_input(f, app, chunks[2]);
    f.render_widget(generate_control(session), chunks[3]);

    if let Some(error) = error_line(session) {
        f.render_widget(error, chunks[4]);
    }

    if let Some(result) = result_panel(session) {
        f.render_widget(result, chunks[5]);
    }

    if let Some(status) = session.status_at(now) {
        f.render_widget(
            Paragraph::new(status).style(Style::default().fg(Color::Green)),
            chunks[6],
        );
    }

    f.render_widget(
        Paragraph::new(KEY_HINTS).style(Style::default().fg(Color::DarkGray)),
        chunks[7],
    );
}

fn header() -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            APP_TITLE,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(APP_TAGLINE, Style::default().fg(Color::Gray))),
    ])
}

fn image_panel(session: &CaptionSession) -> Paragraph<'static> {
    let body = match session.image() {
        Some(image) => Line::from(image.preview().summary()),
        None => Line::from(Span::styled(
            IMAGE_HINT,
            Style::default().fg(Color::DarkGray),
        )),
    };
    Paragraph::new(body).block(Block::bordered().title("Image"))
}

fn draw_path_input(f: &mut Frame, app: &App, area: Rect) {
    let input = Paragraph::new(app.ui.path_input.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(Block::bordered().title("Path"));
    f.render_widget(input, area);

    // keep the cursor inside the borders
    let max_x = area.x + area.width.saturating_sub(2);
    let cursor_x = (area.x + 1).saturating_add(app.ui.input_width()).min(max_x);
    f.set_cursor_position((cursor_x, area.y + 1));
}

fn generate_control(session: &CaptionSession) -> Paragraph<'static> {
    let label = if session.in_flight().is_some() {
        " Generating... "
    } else {
        " Generate Caption "
    };
    let style = if session.can_generate() {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    };
    Paragraph::new(Line::from(vec![
        Span::styled(label, style),
        Span::raw("  Ctrl+G"),
    ]))
}

/// The error text, plus a retry hint when another attempt could succeed.
fn error_line(session: &CaptionSession) -> Option<Paragraph<'_>> {
    let error = session.error()?;
    let mut spans = vec![Span::styled(error, Style::default().fg(Color::Red))];

    let retryable = session
        .state()
        .failure()
        .is_some_and(CaptionError::is_retryable);
    if retryable && session.can_generate() {
        spans.push(Span::styled(
            RETRY_HINT,
            Style::default().fg(Color::DarkGray),
        ));
    }
    Some(Paragraph::new(Line::from(spans)))
}

fn result_panel(session: &CaptionSession) -> Option<Paragraph<'static>> {
    let lines = match session.state() {
        RequestState::Submitting => vec![Line::from(Span::styled(
            THINKING_TEXT,
            Style::default().add_modifier(Modifier::ITALIC),
        ))],
        RequestState::Succeeded => {
            let caption = session.caption()?;
            vec![
                Line::from(format!("\"{caption}\"")),
                Line::from(""),
                Line::from(Span::styled(
                    "Ctrl+Y to copy",
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        }
        _ => return None,
    };

    Some(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title("Caption")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::image::test_images::TINY_PNG;
    use crate::core::image::{ImageFile, MediaType};
    use crate::utils::test_utils::{test_caption_client, FakeClipboard};
    use ratatui::{backend::TestBackend, Terminal};

    fn test_app() -> App {
        App::new(test_caption_client("http://127.0.0.1:9"))
    }

    fn select_png(app: &mut App) {
        let file = ImageFile::from_bytes("beach.png", TINY_PNG.to_vec(), Some(MediaType::Png));
        app.controller().select_image(file).expect("valid image");
    }

    fn render(app: &App, now: Instant) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 24)).expect("test terminal");
        terminal.draw(|f| draw(f, app, now)).expect("frame draws");
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let rows: Vec<String> = buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect();
        rows.join("\n")
    }

    #[test]
    fn empty_session_shows_hint_and_header() {
        let app = test_app();
        let screen = render(&app, Instant::now());

        assert!(screen.contains(APP_TITLE));
        assert!(screen.contains(APP_TAGLINE));
        assert!(screen.contains(IMAGE_HINT));
        assert!(screen.contains("Generate Caption"));
        assert!(!screen.contains(THINKING_TEXT));
    }

    #[test]
    fn selected_image_shows_preview_summary() {
        let mut app = test_app();
        select_png(&mut app);
        let screen = render(&app, Instant::now());

        assert!(screen.contains("beach.png"));
        assert!(screen.contains("PNG"));
        assert!(screen.contains("1×1"));
        assert!(!screen.contains(IMAGE_HINT));
    }

    #[test]
    fn submitting_shows_placeholder_and_busy_label() {
        let mut app = test_app();
        select_png(&mut app);
        app.controller().generate_caption().expect("submission");
        let screen = render(&app, Instant::now());

        assert!(screen.contains("Generating..."));
        assert!(screen.contains(THINKING_TEXT));
    }

    #[test]
    fn success_shows_quoted_caption_and_copy_status() {
        let mut app = test_app();
        select_png(&mut app);
        app.controller().generate_caption().expect("submission");
        app.controller()
            .complete_caption(1, Ok("Waves at sunset".to_string()));

        let now = Instant::now();
        app.controller().copy_result(&FakeClipboard::default(), now);
        let screen = render(&app, now);

        assert!(screen.contains("\"Waves at sunset\""));
        assert!(screen.contains("Copied!"));
        assert!(screen.contains("Generate Caption"));

        let later = render(&app, now + std::time::Duration::from_secs(3));
        assert!(!later.contains("Copied!"));
        assert!(later.contains("\"Waves at sunset\""));
    }

    #[test]
    fn precondition_error_is_rendered() {
        let mut app = test_app();
        let _ = app.controller().generate_caption();
        let screen = render(&app, Instant::now());

        assert!(screen.contains("Please upload an image first."));
        assert!(!screen.contains("Ctrl+G to retry"));
    }

    #[test]
    fn retryable_failure_offers_retry() {
        let mut app = test_app();
        select_png(&mut app);
        app.controller().generate_caption().expect("submission");
        app.controller()
            .complete_caption(1, Err(CaptionError::Remote { status: 500 }));
        let screen = render(&app, Instant::now());

        assert!(screen.contains("API request failed with status 500."));
        assert!(screen.contains("Press Ctrl+G to retry."));
        assert!(screen.contains("Generate Caption"));
    }

    #[test]
    fn rejected_image_gets_no_retry_hint() {
        let mut app = test_app();
        let oversize = ImageFile::from_bytes(
            "huge.png",
            vec![0_u8; 2 * 1024 * 1024 + 1],
            Some(MediaType::Png),
        );
        let _ = app.controller().select_image(oversize);
        let screen = render(&app, Instant::now());

        assert!(screen.contains("Please select an image smaller than 2MB."));
        assert!(!screen.contains("Ctrl+G to retry"));
    }
}
