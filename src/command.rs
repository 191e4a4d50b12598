//! Line commands understood by the interactive driver

use crate::app::FormEvent;
use crate::state::{ConsentItem, FieldName, FocusTarget, TextField};
use anyhow::{anyhow, bail, Result};

pub const HELP: &str = "\
commands:
  set <field> [value]       edit a text field (email, password, passwordConfirm, userName)
  blur <field>              leave a text field, running its validation
  check <item> on|off       set a consent checkbox
  all                       toggle \"select all\"
  move-consent              focus moved to a sibling checkbox
  leave-consent             focus left the consent group
  send                      send the verification code
  confirm <success> <done>  report the confirmation widget result (true/false)
  code                      read and clear the stashed correlation value
  show                      print the form state
  help                      this text
  quit                      exit";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Event(FormEvent),
    TakeCorrelation,
    Show,
    Help,
    Quit,
}

fn text_field(name: Option<&str>) -> Result<TextField> {
    let name = name.ok_or_else(|| anyhow!("missing field name"))?;
    match name.parse::<FieldName>()? {
        FieldName::Text(field) => Ok(field),
        FieldName::Consent(_) => bail!("`{name}` is a checkbox, use `check`"),
    }
}

fn consent_item(name: Option<&str>) -> Result<ConsentItem> {
    let name = name.ok_or_else(|| anyhow!("missing checkbox name"))?;
    match name.parse::<FieldName>()? {
        FieldName::Consent(item) => Ok(item),
        FieldName::Text(_) => bail!("`{name}` is a text field, use `set`"),
    }
}

fn flag(word: Option<&str>) -> Result<bool> {
    match word {
        Some("on" | "true" | "yes" | "1") => Ok(true),
        Some("off" | "false" | "no" | "0") => Ok(false),
        Some(other) => bail!("expected on/off or true/false, got `{other}`"),
        None => bail!("missing on/off value"),
    }
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim_start();
    let mut words = rest.split_whitespace();

    let command = match verb {
        "set" => {
            let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let field = text_field((!name.is_empty()).then_some(name))?;
            Command::Event(FormEvent::Input {
                field,
                value: value.to_string(),
            })
        }
        "blur" => Command::Event(FormEvent::Blur(text_field(words.next())?)),
        "check" => {
            let item = consent_item(words.next())?;
            let checked = flag(words.next())?;
            Command::Event(FormEvent::Check { item, checked })
        }
        "all" => Command::Event(FormEvent::ToggleAll),
        "move-consent" => Command::Event(FormEvent::ConsentBlur(FocusTarget::InsideGroup)),
        "leave-consent" => Command::Event(FormEvent::ConsentBlur(FocusTarget::OutsideGroup)),
        "send" => Command::Event(FormEvent::SendCode),
        "confirm" => {
            let success = flag(words.next())?;
            let completed = flag(words.next())?;
            Command::Event(FormEvent::VerificationResult { success, completed })
        }
        "code" => Command::TakeCorrelation,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command `{other}`, try `help`"),
    };
    Ok(Some(command))
}
