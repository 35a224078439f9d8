//! Translates typed lines into discrete session commands.

use services::{KeyChord, ProctoringSignal, SessionCommand};

pub const HELP: &str = "\
Commands:
  <n> | a <n>     choose option n for the current question
  n | next        next question
  p | prev        previous question
  g <n>           go to question n
  resume          return to exam mode after a warning
  blur            simulate switching away from the exam
  leave           simulate leaving exam mode
  key <chord>     simulate a key press, e.g. key ctrl+shift+i
  submit          submit the quiz
  exit            abandon the quiz without scoring";

fn one_based(raw: Option<&str>) -> Result<usize, String> {
    let raw = raw.ok_or_else(|| "expected a number".to_string())?;
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("not a valid number: {raw}")),
    }
}

/// Parse one input line. Numbers typed by the user are 1-based.
pub fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err("empty command".into());
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "a" | "answer" => SessionCommand::SelectCurrent(one_based(words.next())?),
        "n" | "next" => SessionCommand::Advance(1),
        "p" | "prev" => SessionCommand::Advance(-1),
        "g" | "go" => SessionCommand::GoTo(one_based(words.next())?),
        "resume" => SessionCommand::RestorePresentation,
        "blur" => SessionCommand::Signal(ProctoringSignal::FocusLost),
        "leave" => SessionCommand::Signal(ProctoringSignal::PresentationModeLost),
        "key" => {
            let raw = words.next().ok_or_else(|| "expected a key chord".to_string())?;
            SessionCommand::Key(KeyChord::parse(raw).ok_or_else(|| format!("bad chord: {raw}"))?)
        }
        "submit" => SessionCommand::Submit,
        "exit" | "quit" => SessionCommand::Exit,
        _ if head.chars().all(|c| c.is_ascii_digit()) => {
            SessionCommand::SelectCurrent(one_based(Some(head))?)
        }
        _ => return Err(format!("unknown command: {head}")),
    };

    if words.next().is_some() {
        return Err(format!("too many arguments for {head}"));
    }
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_select_options_one_based() {
        assert_eq!(parse_command("2").unwrap(), SessionCommand::SelectCurrent(1));
        assert_eq!(parse_command("a 1").unwrap(), SessionCommand::SelectCurrent(0));
        assert!(parse_command("0").is_err());
    }

    #[test]
    fn navigation_and_lifecycle() {
        assert_eq!(parse_command("next").unwrap(), SessionCommand::Advance(1));
        assert_eq!(parse_command(" p ").unwrap(), SessionCommand::Advance(-1));
        assert_eq!(parse_command("g 3").unwrap(), SessionCommand::GoTo(2));
        assert_eq!(parse_command("SUBMIT").unwrap(), SessionCommand::Submit);
        assert_eq!(parse_command("quit").unwrap(), SessionCommand::Exit);
    }

    #[test]
    fn proctoring_simulation() {
        assert_eq!(
            parse_command("blur").unwrap(),
            SessionCommand::Signal(ProctoringSignal::FocusLost)
        );
        assert_eq!(
            parse_command("key ctrl+u").unwrap(),
            SessionCommand::Key(KeyChord::new("u", true, false))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_command("").is_err());
        assert!(parse_command("dance").is_err());
        assert!(parse_command("next 2").is_err());
        assert!(parse_command("key").is_err());
    }
}
