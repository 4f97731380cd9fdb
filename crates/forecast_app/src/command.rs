/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: the next weekly query.
    Query(String),
    /// `:now`, refresh current conditions for the active query.
    RefreshCurrent,
    /// `:quit`
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            ":quit" | ":q" => Command::Quit,
            ":now" => Command::RefreshCurrent,
            _ => Command::Query(line.to_string()),
        }
    }
}
