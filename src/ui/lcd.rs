use crate::ui::render::render_lcd;
use crate::ui::state::LcdState;
use anyhow::{Context, Result};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Position,
    Terminal, TerminalOptions, Viewport,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub lines: usize,
    pub columns: usize,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            lines: 4,
            columns: 20,
        }
    }
}

/// Commands understood by a character display.
pub trait Surface {
    fn init(&mut self, geometry: Geometry, backlight: bool) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
    fn home(&mut self) -> Result<()>;
    fn set_cursor_position(&mut self, line: usize, column: usize) -> Result<()>;
    /// Writes at the cursor without wrapping.
    fn write(&mut self, text: &str) -> Result<()>;
    /// Replaces the display content with `text`, wrapping at the column limit.
    fn message(&mut self, text: &str) -> Result<()>;
    /// Hands the output device back before the process exits.
    fn release(&mut self) -> Result<()> {
        Ok(())
    }
}

/// An emulated LCD drawn into the terminal after every command.
pub struct TerminalLcd<B: Backend> {
    terminal: Terminal<B>,
    state: LcdState,
}

impl TerminalLcd<CrosstermBackend<io::Stdout>> {
    /// Draws below the current shell prompt instead of taking over the screen.
    pub fn inline() -> Result<Self> {
        let geometry = Geometry::default();
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(geometry.lines as u16 + 2),
            },
        )
        .context("Failed to set up terminal")?;
        Ok(Self::new(terminal))
    }
}

impl<B: Backend> TerminalLcd<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            state: LcdState::default(),
        }
    }

    fn redraw(&mut self) -> Result<()> {
        let state = &self.state;
        self.terminal
            .draw(|f| render_lcd(f, state))
            .context("Failed to draw display")?;
        Ok(())
    }
}

impl<B: Backend> Surface for TerminalLcd<B> {
    fn init(&mut self, geometry: Geometry, backlight: bool) -> Result<()> {
        self.state.init(geometry, backlight)?;
        self.terminal.clear()?;
        self.redraw()
    }

    fn clear(&mut self) -> Result<()> {
        self.state.clear()?;
        self.redraw()
    }

    fn home(&mut self) -> Result<()> {
        self.state.home()
    }

    fn set_cursor_position(&mut self, line: usize, column: usize) -> Result<()> {
        self.state.set_cursor_position(line, column)
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.state.write(text)?;
        self.redraw()
    }

    fn message(&mut self, text: &str) -> Result<()> {
        self.state.message(text)?;
        self.redraw()
    }

    /// Leaves the cursor on the line below the drawn panel so later output
    /// does not land inside it.
    fn release(&mut self) -> Result<()> {
        self.redraw()?;
        let area = self.terminal.get_frame().area();
        let last_row = area.bottom().saturating_sub(1);
        self.terminal
            .set_cursor_position(Position::new(0, last_row))
            .context("Failed to move cursor")?;
        self.terminal.show_cursor()?;
        self.terminal.backend_mut().append_lines(1)?;
        Backend::flush(self.terminal.backend_mut())?;
        Ok(())
    }
}
