#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    ResolveSemester,
    Consolidate,
    Normalize,
    Render,
    FetchDepartments,
    Scrape,
    Format,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "semester.resolve" => Command::ResolveSemester,
            "consolidate" => Command::Consolidate,
            "normalize" => Command::Normalize,
            "render" => Command::Render,
            "departments.fetch" => Command::FetchDepartments,
            "scrape" => Command::Scrape,
            "format" => Command::Format,
            _ => Command::Unknown,
        }
    }
}
