use chrono::NaiveDate;
use std::convert::TryFrom;
use termion::event::{MouseButton, MouseEvent};

use crate::config::Config;
use crate::error::Result;
use crate::events::{Dispatcher, Event};
use crate::select::{BoxSelector, DragState};

use super::command::CommandParser;
use super::context::pointer_at;
use super::{Context, Mode, YearWindow};
use crate::daytype::DayType;

use unsegen::base::{Color, Cursor, GraphemeCluster, StyleModifier, Terminal, Window};
use unsegen::input::{
    EditBehavior, Event as InputEvent, Input, Key, Navigatable, NavigateBehavior,
    OperationResult, ScrollBehavior,
};
use unsegen::widget::*;

const SCROLL_STEP: i32 = 3;

pub struct App {
    context: Context,
    selector: BoxSelector<NaiveDate>,
}

fn report(context: &mut Context, result: Result<()>) {
    if let Err(e) = result {
        context.report_error(e.to_string());
    }
}

struct StatusLine<'a>(&'a Context);

impl Widget for StatusLine<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(1),
            height: RowDemand::exact(1),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let context = self.0;
        let mut cursor = Cursor::new(&mut window);

        if let Some(error) = &context.last_error_message {
            cursor.set_style_modifier(context.theme.error_style);
            cursor.write(error);
        } else if let Some(status) = &context.status_message {
            cursor.write(status);
        } else if context.mode == Mode::Normal {
            cursor.set_style_modifier(StyleModifier::new().fg_color(Color::LightBlack));
            cursor.write(
                "drag to select days  h/l year  j/k scroll  w week start  t today  : command  q quit",
            );
        }
    }
}

impl App {
    pub fn new(config: &Config) -> Result<App> {
        Ok(App {
            context: Context::new(config)?,
            selector: BoxSelector::new(),
        })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    fn bottom_bar<'w>(&'w self) -> impl Widget + 'w {
        let spacer = " ".with_demand(|_| Demand2D {
            width: ColDemand::exact(1),
            height: RowDemand::exact(1),
        });

        let mut layout = HLayout::new()
            .separator(GraphemeCluster::try_from(' ').unwrap())
            .widget(spacer);
        if self.context.mode == Mode::Command {
            layout = layout.widget(self.context.command_line.as_widget());
        } else {
            layout = layout.widget(StatusLine(&self.context));
        }

        layout
    }

    fn as_widget<'w>(&'w self) -> impl Widget + 'w {
        VLayout::new()
            .widget(YearWindow::new(&self.context, self.selector.overlay()))
            .widget(self.bottom_bar())
    }

    fn handle_mouse(&mut self, event: &MouseEvent) {
        match *event {
            MouseEvent::Press(MouseButton::Left, x, y) => {
                if self.context.mode == Mode::Normal {
                    let (col, row) = (x as i32 - 1, y as i32 - 1);
                    self.selector
                        .press(pointer_at(None, col, row), &mut self.context);
                }
            }
            MouseEvent::Press(MouseButton::WheelUp, _, _) => {
                self.scroll(-SCROLL_STEP);
            }
            MouseEvent::Press(MouseButton::WheelDown, _, _) => {
                self.scroll(SCROLL_STEP);
            }
            MouseEvent::Press(..) => {}
            MouseEvent::Hold(x, y) => self.drag_to(x, y),
            MouseEvent::Release(x, y) => {
                self.drag_to(x, y);
                self.selector.release(&mut self.context);
            }
        }
    }

    fn drag_to(&mut self, x: u16, y: u16) {
        if let DragState::Dragging { anchor, .. } = self.selector.state() {
            let (col, row) = (x as i32 - 1, y as i32 - 1);
            self.selector
                .move_to(pointer_at(Some(anchor), col, row), &mut self.context);
        }
    }

    fn scroll(&mut self, rows: i32) -> bool {
        let moved = self.context.scroll_by(rows);
        if moved {
            self.selector.scroll(&mut self.context);
        }
        moved
    }

    fn cancel(&mut self) {
        self.selector.cancel(&mut self.context);
        self.context.cancel_selection();
    }

    fn handle_input(&mut self, input: Input) {
        if let InputEvent::Mouse(event) = &input.event {
            self.handle_mouse(event);
            return;
        }

        if input.matches(Key::Esc) {
            match self.context.mode {
                Mode::Command => self.context.leave_command_line(),
                Mode::Normal | Mode::Assign => self.cancel(),
            }
            return;
        }

        match self.context.mode {
            Mode::Normal => {
                let context = &mut self.context;
                input
                    .chain((Key::Char('q'), || context.quit = true))
                    .chain((Key::Char(':'), || {
                        context.last_error_message = None;
                        context.mode = Mode::Command;
                    }))
                    .chain((Key::Char('w'), || {
                        let result = context.toggle_week_start();
                        report(context, result);
                    }))
                    .chain((Key::Char('t'), || {
                        let result = context.goto_today();
                        report(context, result);
                    }))
                    .chain(
                        NavigateBehavior::new(&mut YearNavigation(self))
                            .down_on(Key::Char('j'))
                            .up_on(Key::Char('k'))
                            .left_on(Key::Char('h'))
                            .right_on(Key::Char('l')),
                    )
                    .finish();
            }
            Mode::Assign => {
                let context = &mut self.context;
                match input.event {
                    InputEvent::Key(Key::Char('1')) => context.assign_selection(Some(DayType::Work)),
                    InputEvent::Key(Key::Char('2')) => context.assign_selection(Some(DayType::Rest)),
                    InputEvent::Key(Key::Char('3')) => {
                        context.assign_selection(Some(DayType::Holiday))
                    }
                    InputEvent::Key(Key::Char('0')) => context.assign_selection(None),
                    InputEvent::Key(Key::Char(':')) => {
                        context.last_error_message = None;
                        context.mode = Mode::Command;
                    }
                    _ => {}
                }
            }
            Mode::Command => {
                input
                    .chain(
                        EditBehavior::new(&mut self.context.command_line)
                            .delete_forwards_on(Key::Delete)
                            .delete_backwards_on(Key::Backspace)
                            .left_on(Key::Left)
                            .right_on(Key::Right),
                    )
                    .chain(
                        ScrollBehavior::new(&mut self.context.command_line)
                            .backwards_on(Key::Up)
                            .forwards_on(Key::Down),
                    )
                    .chain(CommandParser::new(&mut self.context))
                    .finish();
            }
        }
    }

    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        while !self.context.quit {
            // Draw
            {
                let root = term.create_root_window();
                let width = root.get_width().raw_value();
                let height = root.get_height().raw_value();
                // One row for the bottom bar.
                self.context.resize(width, height - 1);

                self.as_widget().draw(root, RenderingHints::new());
            }
            term.present();

            // Handle events
            match dispatcher.next()? {
                Event::Update => self.context.update(),
                Event::Signal(_) => {}
                Event::Input(input) => self.handle_input(input),
            }
        }

        Ok(())
    }
}

struct YearNavigation<'a>(&'a mut App);

impl Navigatable for YearNavigation<'_> {
    fn move_down(&mut self) -> OperationResult {
        if self.0.scroll(SCROLL_STEP) {
            Ok(())
        } else {
            Err(())
        }
    }

    fn move_up(&mut self) -> OperationResult {
        if self.0.scroll(-SCROLL_STEP) {
            Ok(())
        } else {
            Err(())
        }
    }

    fn move_left(&mut self) -> OperationResult {
        let result = self.0.context.shift_year(-1);
        report(&mut self.0.context, result);
        Ok(())
    }

    fn move_right(&mut self) -> OperationResult {
        let result = self.0.context.shift_year(1);
        report(&mut self.0.context, result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::layout::{HEADER_ROWS, PANE_HEADER_ROWS, PANE_WIDTH};

    fn app() -> App {
        let config: Config = "year = 2024".parse().unwrap();
        let mut app = App::new(&config).unwrap();
        app.context.resize(PANE_WIDTH, 40);
        app
    }

    fn mouse(event: MouseEvent) -> Input {
        Input {
            event: InputEvent::Mouse(event),
            raw: Vec::new(),
        }
    }

    fn key(key: Key) -> Input {
        Input {
            event: InputEvent::Key(key),
            raw: Vec::new(),
        }
    }

    // Terminal coordinates are one-based.
    const ROW: u16 = (HEADER_ROWS + PANE_HEADER_ROWS + 1) as u16;

    #[test]
    fn drag_and_assign_with_keys() {
        let mut app = app();
        // Monday 2024-01-01 sits in the second column.
        app.handle_input(mouse(MouseEvent::Press(MouseButton::Left, 9, ROW)));
        app.handle_input(mouse(MouseEvent::Hold(21, ROW)));
        app.handle_input(mouse(MouseEvent::Release(21, ROW)));

        assert_eq!(app.context.mode, Mode::Assign);
        assert_eq!(app.context.selected.len(), 2);

        app.handle_input(key(Key::Char('3')));
        assert_eq!(app.context.mode, Mode::Normal);
        assert_eq!(
            app.context
                .day_types
                .get(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
            Some(DayType::Holiday)
        );
    }

    #[test]
    fn escape_cancels_drag_and_assignment() {
        let mut app = app();
        app.handle_input(mouse(MouseEvent::Press(MouseButton::Left, 9, ROW)));
        app.handle_input(key(Key::Esc));
        assert!(!app.selector.is_active());
        assert!(app.context.selected.is_empty());

        app.handle_input(mouse(MouseEvent::Press(MouseButton::Left, 9, ROW)));
        app.handle_input(mouse(MouseEvent::Release(9, ROW)));
        assert_eq!(app.context.mode, Mode::Assign);
        app.handle_input(key(Key::Esc));
        assert_eq!(app.context.mode, Mode::Normal);
        assert!(app.context.day_types.is_empty());
    }

    #[test]
    fn keys_change_year_and_week_start() {
        let mut app = app();
        app.handle_input(key(Key::Char('l')));
        app.handle_input(key(Key::Char('l')));
        app.handle_input(key(Key::Char('h')));
        app.handle_input(key(Key::Char('w')));

        assert_eq!(app.context.year(), 2025);
        assert_eq!(app.context.week_start(), crate::grid::WeekStart::Monday);

        app.handle_input(key(Key::Char('q')));
        assert!(app.context.quit);
    }

    #[test]
    fn command_line_runs_commands() {
        let mut app = app();
        app.handle_input(key(Key::Char(':')));
        assert_eq!(app.context.mode, Mode::Command);
        for c in "year 2030\n".chars() {
            app.handle_input(key(Key::Char(c)));
        }
        assert_eq!(app.context.mode, Mode::Normal);
        assert_eq!(app.context.year(), 2030);
    }

    #[test]
    fn selection_can_be_assigned_from_command_line() {
        let mut app = app();
        app.handle_input(mouse(MouseEvent::Press(MouseButton::Left, 9, ROW)));
        app.handle_input(mouse(MouseEvent::Release(9, ROW)));
        assert_eq!(app.context.mode, Mode::Assign);

        app.handle_input(key(Key::Char(':')));
        assert_eq!(app.context.mode, Mode::Command);
        for c in "rest\n".chars() {
            app.handle_input(key(Key::Char(c)));
        }

        assert_eq!(app.context.mode, Mode::Normal);
        assert_eq!(app.context.last_error_message, None);
        assert!(app.context.selected.is_empty());
        assert_eq!(
            app.context
                .day_types
                .get(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            Some(DayType::Rest)
        );
    }

    #[test]
    fn leaving_command_line_keeps_pending_selection() {
        let mut app = app();
        app.handle_input(mouse(MouseEvent::Press(MouseButton::Left, 9, ROW)));
        app.handle_input(mouse(MouseEvent::Release(9, ROW)));

        app.handle_input(key(Key::Char(':')));
        app.handle_input(key(Key::Esc));
        assert_eq!(app.context.mode, Mode::Assign);
        assert_eq!(app.context.selected.len(), 1);

        app.handle_input(key(Key::Char(':')));
        for c in "next\n".chars() {
            app.handle_input(key(Key::Char(c)));
        }
        assert_eq!(app.context.mode, Mode::Assign);
        assert_eq!(app.context.year(), 2025);

        app.handle_input(key(Key::Char('3')));
        assert_eq!(
            app.context
                .day_types
                .get(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            Some(DayType::Holiday)
        );
    }

    #[test]
    fn wheel_scrolls_under_a_drag() {
        let mut app = app();
        app.handle_input(mouse(MouseEvent::Press(MouseButton::Left, 9, ROW)));
        let before = app.context.selected.clone();
        app.handle_input(mouse(MouseEvent::Press(MouseButton::WheelDown, 9, ROW)));

        assert!(app.selector.is_active());
        assert_ne!(app.context.selected, before);
    }
}
