//! Player command parsing and dispatch.
//!
//! One line of input is one command. Cells are addressed as `row col`,
//! both 0 to 2; harvested items by their index in the `show` listing.

use std::str::FromStr;

use zengarden_core::{ActionError, Garden, StateStore};
use zengarden_types::{CellPos, EpochMillis};

use crate::error::CommandError;

/// Help text printed by the `help` command.
pub const HELP: &str = "\
Commands:
  buy <seed>          buy one seed from the shop
  select <seed>       select (or deselect) a seed for planting
  plant <row> <col>   plant the selected seed
  harvest <row> <col> harvest a ready plant
  collect             harvest every ready plant
  sell <index>        sell one harvested crop
  sell all            sell every harvested crop
  tool <id>           select (or put away) a tool, e.g. `tool shovel`
  use <row> <col>     use the selected tool on a plot
  show                redraw the garden
  json                print the garden snapshot as JSON
  help                show this help
  quit                save and exit";

/// A player action forwarded to the garden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Buy one seed.
    Buy(String),
    /// Toggle the seed selection.
    SelectSeed(String),
    /// Plant the selected seed.
    Plant(CellPos),
    /// Harvest one cell.
    Harvest(CellPos),
    /// Harvest every ready cell.
    CollectAll,
    /// Sell one harvested item.
    Sell(usize),
    /// Sell every harvested item.
    SellAll,
    /// Toggle the tool selection.
    SelectTool(String),
    /// Use the selected tool.
    UseTool(CellPos),
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Change the game.
    Action(Action),
    /// Redraw the garden.
    Show,
    /// Print the snapshot as JSON.
    Json,
    /// Print the command list.
    Help,
    /// Leave the game.
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let head = head.to_ascii_lowercase();
        let command = match head.as_str() {
            "buy" => Self::Action(Action::Buy(word(&mut words, "buy", "seed")?)),
            "select" | "seed" => {
                Self::Action(Action::SelectSeed(word(&mut words, "select", "seed")?))
            }
            "plant" => Self::Action(Action::Plant(cell(&mut words, "plant")?)),
            "harvest" => Self::Action(Action::Harvest(cell(&mut words, "harvest")?)),
            "collect" => Self::Action(Action::CollectAll),
            "sell" => {
                let target = word(&mut words, "sell", "item index or `all`")?;
                if target.eq_ignore_ascii_case("all") {
                    Self::Action(Action::SellAll)
                } else {
                    Self::Action(Action::Sell(number(&target)?))
                }
            }
            "sellall" => Self::Action(Action::SellAll),
            "tool" => Self::Action(Action::SelectTool(word(&mut words, "tool", "tool id")?)),
            "use" => Self::Action(Action::UseTool(cell(&mut words, "use")?)),
            "show" | "look" => Self::Show,
            "json" => Self::Json,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Err(CommandError::Unknown(head)),
        };
        Ok(command)
    }
}

fn word<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<String, CommandError> {
    words
        .next()
        .map(str::to_ascii_lowercase)
        .ok_or(CommandError::MissingArgument { command, argument })
}

fn number<T: FromStr>(value: &str) -> Result<T, CommandError> {
    value
        .parse()
        .ok()
        .ok_or_else(|| CommandError::InvalidNumber(value.to_owned()))
}

fn cell<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<CellPos, CommandError> {
    let row: u8 = number(&word(words, command, "row")?)?;
    let col: u8 = number(&word(words, command, "column")?)?;
    CellPos::new(row, col).ok_or(CommandError::OutOfGrid { row, col })
}

impl Action {
    /// Run this action against `garden` at wall-clock time `now`.
    ///
    /// # Errors
    ///
    /// Returns the garden's rejection; the matching notice is already queued.
    pub fn apply<S: StateStore>(
        &self,
        garden: &mut Garden<S>,
        now: EpochMillis,
    ) -> Result<(), ActionError> {
        match self {
            Self::Buy(seed) => garden.buy(seed),
            Self::SelectSeed(seed) => garden.select_seed(seed).map(drop),
            Self::Plant(pos) => garden.plant(*pos, now),
            Self::Harvest(pos) => garden.harvest(*pos, now).map(drop),
            Self::CollectAll => garden.collect_all(now).map(drop),
            Self::Sell(index) => garden.sell(*index).map(drop),
            Self::SellAll => garden.sell_all().map(drop),
            Self::SelectTool(tool) => garden.select_tool(tool).map(drop),
            Self::UseTool(pos) => garden.use_tool(*pos).map(drop),
        }
    }
}
