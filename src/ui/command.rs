use std::convert::TryFrom;
use unsegen::input::*;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    sequence::{delimited, pair, preceded},
    IResult,
};

use super::context::Context;
use crate::daytype::DayType;
use crate::error::{Error, ErrorKind, Result};
use crate::grid::WeekStart;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Year(i32),
    Next(u32),
    Prev(u32),
    Week(WeekStart),
    Today,
    /// `None` removes the type of the selected days.
    Assign(Option<DayType>),
    Quit,
}

fn count(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |digits: &str| digits.parse::<u32>())(input)
}

fn year(input: &str) -> IResult<&str, Command> {
    map(
        preceded(
            pair(tag("year"), space1),
            map_res(recognize(pair(opt(char('-')), digit1)), |y: &str| {
                y.parse::<i32>()
            }),
        ),
        Command::Year,
    )(input)
}

fn step(input: &str) -> IResult<&str, Command> {
    map(
        pair(
            alt((tag("next"), tag("prev"))),
            opt(preceded(space1, count)),
        ),
        |(direction, n)| {
            let n = n.unwrap_or(1);
            if direction == "next" {
                Command::Next(n)
            } else {
                Command::Prev(n)
            }
        },
    )(input)
}

fn week(input: &str) -> IResult<&str, Command> {
    map(
        preceded(
            pair(tag("week"), space1),
            alt((
                value(WeekStart::Sunday, tag("sunday")),
                value(WeekStart::Monday, tag("monday")),
                map_res(count, WeekStart::try_from),
            )),
        ),
        Command::Week,
    )(input)
}

fn keyword(input: &str) -> IResult<&str, Command> {
    alt((
        value(Command::Today, tag("today")),
        value(Command::Assign(Some(DayType::Work)), tag("work")),
        value(Command::Assign(Some(DayType::Rest)), tag("rest")),
        value(Command::Assign(Some(DayType::Holiday)), tag("holiday")),
        value(Command::Assign(None), tag("clear")),
        value(Command::Quit, alt((tag("quit"), tag("q")))),
    ))(input)
}

pub fn parse_command(input: &str) -> Result<Command> {
    let (_, command) = all_consuming(delimited(
        space0,
        alt((year, step, week, keyword)),
        space0,
    ))(input)
    .map_err(|e| Error::from(e).with_msg(&format!("Unknown command '{}'", input.trim())))?;

    Ok(command)
}

pub struct CommandParser<'a> {
    context: &'a mut Context,
}

impl<'a> CommandParser<'a> {
    pub fn new(context: &'a mut Context) -> Self {
        CommandParser { context }
    }

    pub fn run_command(&mut self, cmd: &str) -> Result<()> {
        log::debug!("Running command '{}'", cmd);

        match parse_command(cmd)? {
            Command::Year(year) => self.context.set_year(year),
            Command::Next(n) => self.context.shift_year(n as i32),
            Command::Prev(n) => self.context.shift_year(-(n as i32)),
            Command::Week(week_start) => self.context.set_week_start(week_start),
            Command::Today => self.context.goto_today(),
            Command::Assign(ty) => {
                if self.context.selected.is_empty() {
                    return Err(Error::new(ErrorKind::ParseError, "No days selected"));
                }
                self.context.assign_selection(ty);
                Ok(())
            }
            Command::Quit => {
                self.context.quit = true;
                Ok(())
            }
        }
    }
}

impl Behavior for CommandParser<'_> {
    fn input(mut self, input: Input) -> Option<Input> {
        if let Event::Key(Key::Char('\n')) = input.event {
            let cmd = self.context.command_line.finish_line().to_owned();
            self.context.leave_command_line();
            if let Err(e) = self.run_command(&cmd) {
                self.context.report_error(e.to_string());
            }
            None
        } else {
            Some(input)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_commands() {
        assert_eq!(parse_command("year 2024").unwrap(), Command::Year(2024));
        assert_eq!(parse_command("  year   1999 ").unwrap(), Command::Year(1999));
        assert_eq!(parse_command("year -5").unwrap(), Command::Year(-5));
        assert!(parse_command("year").is_err());
        assert!(parse_command("year twenty").is_err());
    }

    #[test]
    fn steps_with_counts() {
        assert_eq!(parse_command("next").unwrap(), Command::Next(1));
        assert_eq!(parse_command("next 3").unwrap(), Command::Next(3));
        assert_eq!(parse_command("prev 10").unwrap(), Command::Prev(10));
        assert!(parse_command("prev x").is_err());
    }

    #[test]
    fn week_start() {
        assert_eq!(
            parse_command("week monday").unwrap(),
            Command::Week(WeekStart::Monday)
        );
        assert_eq!(
            parse_command("week 0").unwrap(),
            Command::Week(WeekStart::Sunday)
        );
        assert_eq!(
            parse_command("week 1").unwrap(),
            Command::Week(WeekStart::Monday)
        );
        assert!(parse_command("week 2").is_err());
        assert!(parse_command("week friday").is_err());
    }

    #[test]
    fn keywords() {
        assert_eq!(parse_command("today").unwrap(), Command::Today);
        assert_eq!(
            parse_command("holiday").unwrap(),
            Command::Assign(Some(DayType::Holiday))
        );
        assert_eq!(parse_command("clear").unwrap(), Command::Assign(None));
        assert_eq!(parse_command("q").unwrap(), Command::Quit);
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert!(parse_command("quitt").is_err());
    }

    #[test]
    fn unknown_command_message() {
        let err = parse_command("frobnicate").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ParseError));
        assert_eq!(err.message.as_deref(), Some("Unknown command 'frobnicate'"));
    }

    #[test]
    fn running_commands() {
        let config = "year = 2024".parse().unwrap();
        let mut context = Context::new(&config).unwrap();
        let mut parser = CommandParser::new(&mut context);

        parser.run_command("next 2").unwrap();
        parser.run_command("week monday").unwrap();
        assert!(parser.run_command("work").is_err());
        assert!(parser.run_command("year 1800").is_err());
        parser.run_command("q").unwrap();

        assert_eq!(context.year(), 2026);
        assert_eq!(context.week_start(), WeekStart::Monday);
        assert!(context.quit);
    }
}
