use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::config::{
    GLYPH_BODY, GLYPH_FOOD, GLYPH_HEAD_DOWN, GLYPH_HEAD_LEFT, GLYPH_HEAD_RIGHT, GLYPH_HEAD_UP,
    GLYPH_TAIL_DOWN, GLYPH_TAIL_LEFT, GLYPH_TAIL_RIGHT, GLYPH_TAIL_UP,
};
use crate::direction::Direction;
use crate::grid::{Cell, GridSize};
use crate::snapshot::Snapshot;

/// What occupies a drawn cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Sprite {
    Food,
    Head(Direction),
    Body,
    Tail(Direction),
}

impl Sprite {
    fn glyph(self) -> &'static str {
        match self {
            Self::Food => GLYPH_FOOD,
            Self::Body => GLYPH_BODY,
            Self::Head(Direction::Left) => GLYPH_HEAD_LEFT,
            Self::Head(Direction::Right) => GLYPH_HEAD_RIGHT,
            Self::Head(Direction::Up) => GLYPH_HEAD_UP,
            Self::Head(Direction::Down) => GLYPH_HEAD_DOWN,
            Self::Tail(Direction::Left) => GLYPH_TAIL_LEFT,
            Self::Tail(Direction::Right) => GLYPH_TAIL_RIGHT,
            Self::Tail(Direction::Up) => GLYPH_TAIL_UP,
            Self::Tail(Direction::Down) => GLYPH_TAIL_DOWN,
        }
    }

    fn style(self) -> Style {
        match self {
            Self::Food => Style::new().fg(Color::Red),
            Self::Head(_) => Style::new().fg(Color::Green).add_modifier(Modifier::BOLD),
            Self::Body | Self::Tail(_) => Style::new().fg(Color::LightGreen),
        }
    }
}

/// Lists the sprites for a snapshot in draw order: food, tail, body, head.
#[must_use]
pub fn sprites(snapshot: &Snapshot) -> Vec<(Cell, Sprite)> {
    let mut sprites = Vec::with_capacity(snapshot.body.len() + 1);
    sprites.push((snapshot.food, Sprite::Food));

    if let Some(tail) = snapshot.tail_cell() {
        sprites.push((tail, Sprite::Tail(snapshot.tail)));
    }
    sprites.extend(snapshot.interior().iter().map(|cell| (*cell, Sprite::Body)));
    if let Some(head) = snapshot.head_cell() {
        sprites.push((head, Sprite::Head(snapshot.head)));
    }

    sprites
}

/// Renders the board and scoreboard for one snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot) {
    let board_area = centered(frame.area(), snapshot.board);
    let block = Block::bordered()
        .title(Line::from(format!(" score {} ", snapshot.score_label())).centered())
        .title_bottom(Line::from(" arrows/WASD move, q quits ").centered())
        .border_style(Style::new().fg(Color::DarkGray));

    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    let buffer = frame.buffer_mut();
    for (cell, sprite) in sprites(snapshot) {
        let Some((x, y)) = cell_to_terminal(inner, snapshot.board, cell) else {
            continue;
        };
        buffer.set_string(x, y, sprite.glyph(), sprite.style());
    }
}

fn centered(area: Rect, board: GridSize) -> Rect {
    let [column] = Layout::horizontal([Constraint::Length(board.width.saturating_add(2))])
        .flex(Flex::Center)
        .areas(area);
    let [board_area] = Layout::vertical([Constraint::Length(board.height.saturating_add(2))])
        .flex(Flex::Center)
        .areas(column);
    board_area
}

fn cell_to_terminal(inner: Rect, board: GridSize, cell: Cell) -> Option<(u16, u16)> {
    if !board.contains(cell) {
        return None;
    }

    let x = inner.x.saturating_add(u16::try_from(cell.x).ok()?);
    let y = inner.y.saturating_add(u16::try_from(cell.y).ok()?);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::Terminal;

    use crate::direction::Direction;
    use crate::grid::{Cell, GridSize};
    use crate::snapshot::Snapshot;

    use super::{cell_to_terminal, render, sprites, Sprite};

    fn snapshot() -> Snapshot {
        Snapshot {
            board: GridSize {
                width: 6,
                height: 4,
            },
            body: vec![Cell::new(3, 1), Cell::new(2, 1), Cell::new(1, 1)],
            food: Cell::new(5, 3),
            head: Direction::Right,
            tail: Direction::Right,
            score: 4,
            tick: 9,
            rounds: 0,
        }
    }

    #[test]
    fn sprites_mark_head_tail_and_body() {
        let sprites = sprites(&snapshot());

        assert_eq!(
            sprites,
            vec![
                (Cell::new(5, 3), Sprite::Food),
                (Cell::new(1, 1), Sprite::Tail(Direction::Right)),
                (Cell::new(2, 1), Sprite::Body),
                (Cell::new(3, 1), Sprite::Head(Direction::Right)),
            ]
        );
    }

    #[test]
    fn cells_outside_the_board_are_not_drawn() {
        let inner = Rect::new(1, 1, 6, 4);
        let board = GridSize {
            width: 6,
            height: 4,
        };

        assert_eq!(cell_to_terminal(inner, board, Cell::new(0, 0)), Some((1, 1)));
        assert_eq!(cell_to_terminal(inner, board, Cell::new(6, 0)), None);
        assert_eq!(cell_to_terminal(inner, board, Cell::new(-1, 0)), None);
    }

    #[test]
    fn render_draws_glyphs_inside_the_border() {
        let mut terminal = Terminal::new(TestBackend::new(8, 6)).expect("test terminal");

        terminal
            .draw(|frame| render(frame, &snapshot()))
            .expect("draw should succeed");

        let buffer = terminal.backend().buffer();
        let symbol = |x: u16, y: u16| buffer.cell((x, y)).map(|cell| cell.symbol().to_owned());
        assert_eq!(symbol(4, 2).as_deref(), Some("▶"));
        assert_eq!(symbol(3, 2).as_deref(), Some("■"));
        assert_eq!(symbol(2, 2).as_deref(), Some(">"));
        assert_eq!(symbol(6, 4).as_deref(), Some("●"));
    }
}
