use crate::domain::model::Division;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::str::FromStr;

/// One entry of the interactive console menu. Also accepted by the
/// `--division` flag so scripted runs can skip the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuChoice {
    All,
    ProPrelims,
    ProFinals,
    Amateur,
    NonFinalists,
    Exit,
}

impl MenuChoice {
    /// Divisions to archive, in the order they get processed.
    pub fn divisions(&self) -> Vec<Division> {
        match self {
            MenuChoice::All => Division::ALL.to_vec(),
            MenuChoice::ProPrelims => vec![Division::ProPrelims],
            MenuChoice::ProFinals => vec![Division::ProFinals],
            MenuChoice::Amateur => vec![Division::Amateur],
            MenuChoice::NonFinalists => vec![Division::NonFinalists],
            MenuChoice::Exit => vec![],
        }
    }
}

impl FromStr for MenuChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "all" => Ok(MenuChoice::All),
            "2" | "pro-prelims" => Ok(MenuChoice::ProPrelims),
            "3" | "pro-finals" => Ok(MenuChoice::ProFinals),
            "4" | "amateur" => Ok(MenuChoice::Amateur),
            "5" | "non-finalists" => Ok(MenuChoice::NonFinalists),
            "6" | "exit" => Ok(MenuChoice::Exit),
            other => Err(format!("unknown selection '{}'", other)),
        }
    }
}

pub fn render() -> String {
    [
        "1. download all freestyles",
        "2. download pro prelims",
        "3. download pro finalists",
        "4. download amateur",
        "5. download non-finalist pro freestyles",
        "6. exit",
        "",
        "Select an option (1-6):",
    ]
    .join("\n")
}

/// Read lines until one parses as a selection. EOF counts as exit.
pub fn prompt<R: BufRead>(input: R) -> MenuChoice {
    println!("{}", render());

    for line in input.lines() {
        let Ok(line) = line else { break };
        match line.parse() {
            Ok(choice) => return choice,
            Err(_) => println!("Select an option (1-6):"),
        }
    }

    MenuChoice::Exit
}
