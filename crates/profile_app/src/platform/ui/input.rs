use profile_core::{Msg, RefreshTrigger};

use crate::platform::effects::AppInput;

/// Maps one line of keyboard input to an app input. Unknown input is ignored.
pub fn parse_command(line: &str) -> Option<AppInput> {
    let command = line.trim().to_ascii_lowercase();
    let input = match command.as_str() {
        "" => return None,
        "r" | "refresh" => AppInput::Core(Msg::RefreshRequested {
            trigger: RefreshTrigger::Manual,
        }),
        "x" | "esc" | "close" => AppInput::Core(Msg::DetailClosed),
        "h" | "?" | "help" => AppInput::Help,
        "q" | "quit" => AppInput::Quit,
        other => {
            let number: usize = other.parse().ok()?;
            AppInput::Core(Msg::FileSelected(number.checked_sub(1)?))
        }
    };
    Some(input)
}
