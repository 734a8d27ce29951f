/// Palette commands and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "news",
    aliases: &["n", "home", "list"],
    description: "Back to the article listing",
  },
  Command {
    name: "about",
    aliases: &["a", "info"],
    description: "How the reader works",
  },
  Command {
    name: "help",
    aliases: &["h", "?", "keys"],
    description: "Key bindings",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit newsdeck",
  },
];

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.trim().to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = COMMANDS
    .iter()
    .filter_map(|cmd| match_priority(cmd, &input_lower).map(|p| (cmd, p)))
    .collect();

  // Stable, so ties keep declaration order
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

/// Lower is a better match; None when the command does not match at all
fn match_priority(cmd: &Command, input: &str) -> Option<u32> {
  if cmd.name == input {
    Some(0)
  } else if cmd.aliases.contains(&input) {
    Some(1)
  } else if cmd.name.starts_with(input) {
    Some(2)
  } else if cmd.aliases.iter().any(|a| a.starts_with(input)) {
    Some(3)
  } else if cmd.name.contains(input) {
    Some(4)
  } else if cmd.aliases.iter().any(|a| a.contains(input)) {
    Some(5)
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match() {
    let suggestions = get_suggestions("about");
    assert_eq!(suggestions[0].name, "about");
  }

  #[test]
  fn test_alias_match() {
    assert_eq!(get_suggestions("?")[0].name, "help");
    assert_eq!(get_suggestions("exit")[0].name, "quit");
  }

  #[test]
  fn test_alias_beats_prefix() {
    // "h" is help's alias and a prefix of "home"
    let suggestions = get_suggestions("h");
    assert_eq!(suggestions[0].name, "help");
    assert!(suggestions.iter().any(|c| c.name == "news"));
  }

  #[test]
  fn test_prefix_match() {
    assert_eq!(get_suggestions("ne")[0].name, "news");
  }

  #[test]
  fn test_fuzzy_match() {
    assert_eq!(get_suggestions("bou")[0].name, "about");
  }

  #[test]
  fn test_no_match() {
    assert!(get_suggestions("zzz").is_empty());
  }
}
